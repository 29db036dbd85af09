#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::transformer::DEFAULT_DELIMITER;
#[cfg(feature = "cli")]
use crate::core::{InvalidRecordPolicy, TransformSettings};
#[cfg(feature = "cli")]
use crate::utils::validation::unescape_delimiter;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "clickstream-transform")]
#[command(about = "Replay a Firehose transformation event through the record transformer")]
pub struct CliConfig {
    /// Firehose transformation event (JSON) to replay
    #[arg(long)]
    pub input: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// Optional TOML file; flags given on the command line take precedence
    #[arg(long)]
    pub config: Option<String>,

    /// Delimiter appended to every record; accepts \n, \r and \t escapes
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<String>,

    #[arg(long, help = "Reject payloads that are not JSON documents")]
    pub validate_json: bool,

    /// processing-failed or dropped
    #[arg(long)]
    pub on_invalid: Option<InvalidRecordPolicy>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
fn parse_delimiter(raw: &str) -> std::result::Result<String, String> {
    Ok(unescape_delimiter(raw))
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Fills every setting not given on the command line from `file`.
    pub fn merge_file(&mut self, file: &toml_config::TomlConfig) {
        if self.delimiter.is_none() {
            self.delimiter = Some(file.delimiter().to_string());
        }
        if self.on_invalid.is_none() {
            self.on_invalid = Some(file.invalid_record_policy());
        }
        self.validate_json |= file.validate_json();
        self.monitor |= file.monitoring_enabled();
    }
}

#[cfg(feature = "cli")]
impl TransformSettings for CliConfig {
    fn delimiter(&self) -> &str {
        self.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER)
    }

    fn validate_json(&self) -> bool {
        self.validate_json
    }

    fn invalid_record_policy(&self) -> InvalidRecordPolicy {
        self.on_invalid.unwrap_or_default()
    }
}

#[cfg(feature = "cli")]
impl crate::utils::validation::Validate for CliConfig {
    fn validate(&self) -> crate::utils::error::Result<()> {
        use crate::utils::validation::*;

        validate_path("input", &self.input)?;
        validate_path("output_path", &self.output_path)?;
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        validate_delimiter("delimiter", self.delimiter())?;

        tracing::debug!("CLI configuration validation passed");
        Ok(())
    }
}
