use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Source and cache paths are set and distinct
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.data.source_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "data.source_path cannot be empty".to_string(),
        ));
    }

    if config.data.cache_path.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError(
            "data.cache_path cannot be empty".to_string(),
        ));
    }

    // Clearing the cache would delete the source dump
    if config.data.cache_path == config.data.source_path {
        return Err(ConfigError::ValidationError(
            "data.cache_path must differ from data.source_path".to_string(),
        ));
    }

    Ok(())
}
