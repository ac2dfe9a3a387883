use crate::config::types::{CheckerConfig, Config, FetchConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_checker_config(&config.checker)?;
    validate_user_agent_config(&config.user_agent)?;
    Ok(())
}

/// Validates fetch policy ranges
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch.request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_redirects > 20 {
        return Err(ConfigError::Validation(format!(
            "fetch.max-redirects must be <= 20, got {}",
            config.max_redirects
        )));
    }

    if config.max_retries > 10 {
        return Err(ConfigError::Validation(format!(
            "fetch.max-retries must be <= 10, got {}",
            config.max_retries
        )));
    }

    Ok(())
}

/// Validates checker policy ranges
fn validate_checker_config(config: &CheckerConfig) -> Result<(), ConfigError> {
    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "checker.request-timeout-secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    if config.max_concurrent < 1 || config.max_concurrent > 100 {
        return Err(ConfigError::Validation(format!(
            "checker.max-concurrent must be between 1 and 100, got {}",
            config.max_concurrent
        )));
    }

    for host in &config.skip_hosts {
        if host.trim().is_empty() {
            return Err(ConfigError::Validation(
                "checker.skip-hosts entries cannot be empty".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates client identification
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent.name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "user-agent.name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if let Some(contact) = &config.contact_url {
        Url::parse(contact)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact-url: {}", e)))?;
    }

    Ok(())
}
