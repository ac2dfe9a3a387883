//! Configuration module for pagelens
//!
//! Configuration can be loaded from a TOML file or built from
//! [`Config::default`], which carries usable settings for every knob so the
//! library works standalone. Loading goes through a parse pass and a
//! validation pass; invalid configurations are rejected before any crawl
//! starts.

mod parser;
mod types;
mod validation;

pub use parser::load_config;
pub use types::{CheckerConfig, Config, FetchConfig, UserAgentConfig};
pub use validation::validate;
