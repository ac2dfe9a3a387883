//! URL handling module for pagelens
//!
//! Provides target-URL normalization/validation and the host-pattern
//! matching used by the broken-link checker's deny-list.

mod matcher;
mod normalize;

pub use matcher::host_matches;
pub use normalize::normalize_target_url;
