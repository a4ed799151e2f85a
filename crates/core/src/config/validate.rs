use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Fetch asks for at least one restaurant
/// - Picker runs at least one tick with a non-zero interval
/// - Gemini model is named and the timeout is not 0
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.fetch.restaurant_count == 0 {
        return Err(ConfigError::ValidationError(
            "fetch.restaurant_count must be at least 1".to_string(),
        ));
    }

    if config.picker.ticks == 0 {
        return Err(ConfigError::ValidationError(
            "picker.ticks must be at least 1".to_string(),
        ));
    }

    if config.picker.tick_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "picker.tick_interval_ms cannot be 0".to_string(),
        ));
    }

    if let Some(gemini) = &config.gemini {
        if gemini.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "gemini.model cannot be empty".to_string(),
            ));
        }
        if gemini.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "gemini.timeout_secs cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::llm::GeminiConfig;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                port: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_ticks_fails() {
        let mut config = Config::default();
        config.picker.ticks = 0;
        assert!(validate_config(&config).is_err());

        let mut config = Config::default();
        config.picker.tick_interval_ms = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_restaurant_count_fails() {
        let mut config = Config::default();
        config.fetch.restaurant_count = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_blank_model_fails() {
        let config = Config {
            gemini: Some(GeminiConfig {
                model: " ".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("gemini.model"));
    }
}
