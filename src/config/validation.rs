use crate::config::types::{Config, NetworkConfig, SourceEntry};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_network_config(&config.network)?;
    validate_sources(&config.sources)?;
    Ok(())
}

/// Validates network configuration
fn validate_network_config(config: &NetworkConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.request_timeout_secs < config.connect_timeout_secs {
        return Err(ConfigError::Validation(format!(
            "request-timeout-secs ({}) must be >= connect-timeout-secs ({})",
            config.request_timeout_secs, config.connect_timeout_secs
        )));
    }

    Ok(())
}

/// Validates source entries
fn validate_sources(sources: &[SourceEntry]) -> Result<(), ConfigError> {
    for entry in sources {
        if entry.name.is_empty() {
            return Err(ConfigError::Validation(
                "source name cannot be empty".to_string(),
            ));
        }

        if entry.candidates.is_empty() {
            return Err(ConfigError::Validation(format!(
                "source '{}' must have at least one candidate URL",
                entry.name
            )));
        }

        for candidate in &entry.candidates {
            let url = Url::parse(candidate).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid candidate URL '{}': {}", candidate, e))
            })?;

            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(ConfigError::Validation(format!(
                    "Candidate URL '{}' must use an http(s) scheme",
                    candidate
                )));
            }

            if url.host_str().is_none() {
                return Err(ConfigError::Validation(format!(
                    "Candidate URL '{}' has no host",
                    candidate
                )));
            }
        }
    }

    // Duplicate names would make candidates_for ambiguous
    for (i, entry) in sources.iter().enumerate() {
        if sources[..i].iter().any(|s| s.name == entry.name) {
            return Err(ConfigError::Validation(format!(
                "Duplicate source entry '{}'",
                entry.name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::types::CropperConfig;

    fn create_test_config() -> Config {
        Config {
            network: NetworkConfig::default(),
            sources: vec![SourceEntry {
                name: "prestige".to_string(),
                candidates: vec!["https://www.prestige-av.com".to_string()],
            }],
            cropper: CropperConfig::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        let config = create_test_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_candidates_rejected() {
        let mut config = create_test_config();
        config.sources[0].candidates.clear();
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_malformed_candidate_rejected() {
        let mut config = create_test_config();
        config.sources[0].candidates = vec!["not a url".to_string()];
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = create_test_config();
        config.sources[0].candidates = vec!["ftp://mirror.example.com".to_string()];
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_duplicate_source_rejected() {
        let mut config = create_test_config();
        let dup = config.sources[0].clone();
        config.sources.push(dup);
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_timeout_ordering_enforced() {
        let mut config = create_test_config();
        config.network.connect_timeout_secs = 60;
        config.network.request_timeout_secs = 30;
        let result = validate(&config);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
