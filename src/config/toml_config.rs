use crate::core::transformer::DEFAULT_DELIMITER;
use crate::core::{InvalidRecordPolicy, TransformSettings};
use crate::utils::error::{Result, TransformError};
use crate::utils::validation::{validate_delimiter, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub transform: TransformSection,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransformSection {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    #[serde(default)]
    pub validate_json: bool,
    #[serde(default)]
    pub on_invalid: InvalidRecordPolicy,
}

impl Default for TransformSection {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            validate_json: false,
            on_invalid: InvalidRecordPolicy::default(),
        }
    }
}

fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses `content` after replacing `${VAR}` references with environment
    /// values. Unset variables are left as written.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |key| std::env::var(key).ok())
    }

    /// Like [`from_toml_str`](Self::from_toml_str), resolving `${VAR}`
    /// through `lookup` instead of the process environment.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed = Self::substitute_vars(content, lookup)?;
        Ok(toml::from_str(&processed)?)
    }

    fn substitute_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            TransformError::ConfigError {
                message: format!("Invalid substitution pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().is_some_and(|m| m.enabled)
    }
}

impl TransformSettings for TomlConfig {
    fn delimiter(&self) -> &str {
        &self.transform.delimiter
    }

    fn validate_json(&self) -> bool {
        self.transform.validate_json
    }

    fn invalid_record_policy(&self) -> InvalidRecordPolicy {
        self.transform.on_invalid
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_delimiter("transform.delimiter", &self.transform.delimiter)?;
        tracing::debug!("TOML configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[transform]
delimiter = "\r\n"
validate_json = true
on_invalid = "dropped"

[monitoring]
enabled = true
"#,
        )
        .unwrap();

        assert_eq!(config.delimiter(), "\r\n");
        assert!(config.validate_json());
        assert_eq!(config.invalid_record_policy(), InvalidRecordPolicy::Dropped);
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.delimiter(), "\n");
        assert!(!config.validate_json());
        assert_eq!(
            config.invalid_record_policy(),
            InvalidRecordPolicy::ProcessingFailed
        );
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        let err = TomlConfig::from_toml_str("[transform]\non_invalid = \"retry\"\n").unwrap_err();
        assert!(matches!(err, TransformError::TomlParse(_)));
    }

    #[test]
    fn test_empty_delimiter_fails_validation() {
        let config = TomlConfig::from_toml_str("[transform]\ndelimiter = \"\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_variable_substitution() {
        let lookup = |key: &str| (key == "POLICY").then(|| "dropped".to_string());
        let config = TomlConfig::from_toml_str_with(
            "[transform]\non_invalid = \"${POLICY}\"\n",
            lookup,
        )
        .unwrap();
        assert_eq!(config.invalid_record_policy(), InvalidRecordPolicy::Dropped);
    }

    #[test]
    fn test_unset_variable_is_left_as_written() {
        let config = TomlConfig::from_toml_str_with(
            "[transform]\ndelimiter = \"${MISSING}\"\n",
            |_: &str| None,
        )
        .unwrap();
        assert_eq!(config.delimiter(), "${MISSING}");
    }
}
