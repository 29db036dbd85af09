pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{cli::LocalStorage, CliConfig};

pub use crate::config::lambda::LambdaConfig;
pub use crate::config::toml_config::TomlConfig;

pub use crate::core::replay::ReplayPipeline;
pub use crate::core::transformer::{transform, RecordTransformer};
pub use crate::core::ReplayEngine;
pub use crate::domain::model::{
    BatchSummary, IncomingBatch, InvalidRecordPolicy, OutgoingBatch, Record, RecordStatus,
    TransformResult,
};
pub use crate::utils::error::{Result, TransformError};
