use crate::core::transformer::DEFAULT_DELIMITER;
use crate::core::{InvalidRecordPolicy, TransformSettings};
use crate::utils::error::{Result, TransformError};
use crate::utils::validation::{parse_bool_flag, unescape_delimiter};
use std::env;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

pub const DEFAULT_DEADLINE_MARGIN_MS: u64 = 500;
pub const MAX_DEADLINE_MARGIN_MS: u64 = 60_000;

#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub delimiter: String,
    pub validate_json: bool,
    pub invalid_record_policy: InvalidRecordPolicy,
    pub deadline_margin: Duration,
}

impl Default for LambdaConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            validate_json: false,
            invalid_record_policy: InvalidRecordPolicy::default(),
            deadline_margin: Duration::from_millis(DEFAULT_DEADLINE_MARGIN_MS),
        }
    }
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let delimiter = lookup("RECORD_DELIMITER")
            .map(|raw| unescape_delimiter(&raw))
            .unwrap_or(defaults.delimiter);

        let validate_json = match lookup("VALIDATE_JSON") {
            Some(raw) => parse_bool_flag("VALIDATE_JSON", &raw)?,
            None => defaults.validate_json,
        };

        let invalid_record_policy = match lookup("INVALID_RECORD_POLICY") {
            Some(raw) => raw.parse::<InvalidRecordPolicy>().map_err(|reason| {
                TransformError::InvalidConfigValueError {
                    field: "INVALID_RECORD_POLICY".to_string(),
                    value: raw.clone(),
                    reason,
                }
            })?,
            None => defaults.invalid_record_policy,
        };

        let deadline_margin = match lookup("DEADLINE_MARGIN_MS") {
            Some(raw) => {
                let millis = raw.trim().parse::<u64>().map_err(|e| {
                    TransformError::InvalidConfigValueError {
                        field: "DEADLINE_MARGIN_MS".to_string(),
                        value: raw.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Duration::from_millis(millis)
            }
            None => defaults.deadline_margin,
        };

        Ok(Self {
            delimiter,
            validate_json,
            invalid_record_policy,
            deadline_margin,
        })
    }

    /// Converts the invocation deadline (epoch milliseconds) into the
    /// instant at which the transformer should stop taking new records.
    pub fn processing_deadline(&self, deadline_epoch_ms: u64) -> Option<Instant> {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .ok()?
            .as_millis() as u64;
        let remaining = Duration::from_millis(deadline_epoch_ms.saturating_sub(now_ms));

        Some(Instant::now() + remaining.saturating_sub(self.deadline_margin))
    }
}

impl TransformSettings for LambdaConfig {
    fn delimiter(&self) -> &str {
        &self.delimiter
    }

    fn validate_json(&self) -> bool {
        self.validate_json
    }

    fn invalid_record_policy(&self) -> InvalidRecordPolicy {
        self.invalid_record_policy
    }
}

impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_delimiter("RECORD_DELIMITER", &self.delimiter)?;
        validate_range(
            "DEADLINE_MARGIN_MS",
            self.deadline_margin.as_millis() as u64,
            0,
            MAX_DEADLINE_MARGIN_MS,
        )?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::validation::Validate;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = LambdaConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.delimiter, "\n");
        assert!(!config.validate_json);
        assert_eq!(
            config.invalid_record_policy,
            InvalidRecordPolicy::ProcessingFailed
        );
        assert_eq!(config.deadline_margin, Duration::from_millis(500));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reads_all_variables() {
        let config = LambdaConfig::from_lookup(lookup_from(&[
            ("RECORD_DELIMITER", "\\r\\n"),
            ("VALIDATE_JSON", "true"),
            ("INVALID_RECORD_POLICY", "dropped"),
            ("DEADLINE_MARGIN_MS", "1500"),
        ]))
        .unwrap();

        assert_eq!(config.delimiter, "\r\n");
        assert!(config.validate_json);
        assert_eq!(config.invalid_record_policy, InvalidRecordPolicy::Dropped);
        assert_eq!(config.deadline_margin, Duration::from_millis(1500));
    }

    #[test]
    fn test_bad_values_are_errors() {
        assert!(LambdaConfig::from_lookup(lookup_from(&[("INVALID_RECORD_POLICY", "retry")])).is_err());
        assert!(LambdaConfig::from_lookup(lookup_from(&[("DEADLINE_MARGIN_MS", "-1")])).is_err());
        assert!(LambdaConfig::from_lookup(lookup_from(&[("VALIDATE_JSON", "sometimes")])).is_err());

        let too_wide = LambdaConfig::from_lookup(lookup_from(&[("DEADLINE_MARGIN_MS", "120000")])).unwrap();
        assert!(too_wide.validate().is_err());
    }

    #[test]
    fn test_processing_deadline_respects_margin() {
        let config = LambdaConfig::default();
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;

        let deadline = config.processing_deadline(now_ms + 10_000).unwrap();
        let left = deadline.saturating_duration_since(Instant::now());
        assert!(left <= Duration::from_millis(9_500));
        assert!(left > Duration::from_millis(8_000));

        // already past: stop immediately
        let expired = config.processing_deadline(now_ms.saturating_sub(1_000)).unwrap();
        assert!(expired <= Instant::now());
    }
}
