use super::{types::Config, ConfigError};
use crate::transport::ServiceEndpoint;

/// Validate configuration
/// Currently validates:
/// - Service hosts non-empty, ports non-zero, paths absolute
/// - Poll interval and attestation read limit non-zero
/// - Trip threshold finite, confirmation message non-empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    let sales = &config.services.sales;
    validate_endpoint("services.sales", &sales.latest_sale_endpoint())?;
    validate_path("services.sales.attestation_path", &sales.attestation_path)?;
    validate_endpoint("services.booking", &config.services.booking)?;
    validate_endpoint("services.messaging", &config.services.messaging)?;

    if config.poller.interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "poller.interval_ms cannot be 0".to_string(),
        ));
    }
    if config.poller.attestation_read_limit == 0 {
        return Err(ConfigError::ValidationError(
            "poller.attestation_read_limit cannot be 0".to_string(),
        ));
    }

    if !config.trip.threshold.is_finite() {
        return Err(ConfigError::ValidationError(
            "trip.threshold must be a finite number".to_string(),
        ));
    }
    if config.trip.confirmation_message.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "trip.confirmation_message cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_endpoint(section: &str, endpoint: &ServiceEndpoint) -> Result<(), ConfigError> {
    if endpoint.host.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "{}.host cannot be empty",
            section
        )));
    }
    if endpoint.port == 0 {
        return Err(ConfigError::ValidationError(format!(
            "{}.port cannot be 0",
            section
        )));
    }
    validate_path(&format!("{}.path", section), &endpoint.path)
}

fn validate_path(key: &str, path: &str) -> Result<(), ConfigError> {
    if !path.starts_with('/') {
        return Err(ConfigError::ValidationError(format!(
            "{} must start with '/'",
            key
        )));
    }
    Ok(())
}
