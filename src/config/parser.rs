use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Every section and key is optional; omitted values fall back to the
/// defaults from [`Config::default`]. The parsed configuration is validated
/// before being returned.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use pagelens::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Max retries: {}", config.fetch.max_retries);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let config: Config = toml::from_str(&content)?;

    validate(&config)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[fetch]
request-timeout-secs = 15
follow-redirects = false
max-redirects = 5
max-retries = 3
retry-delay-ms = 250

[checker]
enabled = true
request-timeout-secs = 3
max-concurrent = 4
skip-hosts = ["facebook.com"]

[user-agent]
name = "TestLens"
version = "2.0"
contact-url = "https://example.com/about"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.fetch.request_timeout_secs, 15);
        assert!(!config.fetch.follow_redirects);
        assert_eq!(config.fetch.max_retries, 3);
        assert_eq!(config.checker.max_concurrent, 4);
        assert_eq!(config.checker.skip_hosts, vec!["facebook.com"]);
        assert_eq!(config.user_agent.name, "TestLens");
    }

    #[test]
    fn test_empty_file_yields_defaults() {
        let file = create_temp_config("");
        let config = load_config(file.path()).unwrap();

        assert_eq!(
            config.fetch.max_retries,
            Config::default().fetch.max_retries
        );
        assert!(config.checker.enabled);
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let file = create_temp_config("[fetch]\nmax-retries = 7\n");
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.fetch.max_retries, 7);
        assert_eq!(
            config.fetch.request_timeout_secs,
            Config::default().fetch.request_timeout_secs
        );
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let file = create_temp_config("[checker]\nmax-concurrent = 0\n");
        let result = load_config(file.path());
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }
}
