//! Load scenario configurations from JSON

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use super::ScenarioConfiguration;
use crate::error::ConfigError;

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_PATH: &str = "mortgage_config.json";

/// Load and validate a configuration file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ScenarioConfiguration, ConfigError> {
    let file = File::open(path.as_ref())?;
    load_config_from_reader(BufReader::new(file))
}

/// Load and validate a configuration from any reader (e.g., request body, stdin)
pub fn load_config_from_reader<R: std::io::Read>(reader: R) -> Result<ScenarioConfiguration, ConfigError> {
    let config: ScenarioConfiguration = serde_json::from_reader(reader)?;
    config.validate()?;
    log::debug!(
        "Loaded configuration: {} rate change(s), {} overpayment(s)",
        config.rate_changes.len(),
        config.overpayments.len()
    );
    Ok(config)
}

/// Parse and validate a configuration held in memory
pub fn parse_config(json: &str) -> Result<ScenarioConfiguration, ConfigError> {
    load_config_from_reader(json.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config = parse_config(
            r#"{"base_loan": {"principal": 200000, "start_rate": 5.5, "years": 25},
                "overpayments": [{"month": 6, "amount": 5000}]}"#,
        )
        .expect("valid config");
        assert_eq!(config.loan.term_months(), 300);
        assert_eq!(config.overpayments.len(), 1);
    }

    #[test]
    fn test_parse_config_rejects_invalid_values() {
        let err = parse_config(r#"{"base_loan": {"principal": -5, "start_rate": 5.5, "years": 25}}"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidInput { .. }));
    }

    #[test]
    fn test_parse_config_rejects_malformed_json() {
        let err = parse_config(r#"{"base_loan": "#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config("definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
