use crate::{AppError, Config, ValidationResult};

/// Application configuration holder and lifecycle logger
pub struct App {
    config: Config,
    validation: ValidationResult,
}

impl App {
    /// Create a new application instance from the on-disk configuration
    pub fn new() -> Result<Self, AppError> {
        let (config, validation) = Config::load_validated()?;
        Ok(Self {
            config,
            validation,
        })
    }

    /// Create an application instance from an already loaded configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let validation = config.validate();
        if !validation.is_valid() {
            return Err(crate::ConfigError::Invalid(validation.error_summary()).into());
        }
        Ok(Self {
            config,
            validation,
        })
    }

    /// Log startup information
    pub fn initialize(&self) {
        tracing::info!(
            backend = %self.config.backend.base_url,
            warnings = self.validation.warnings.len(),
            "Application initialized"
        );
    }

    pub fn shutdown(&self) {
        tracing::info!("Shutting down application");
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }
}
