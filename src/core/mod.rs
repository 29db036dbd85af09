pub mod engine;
pub mod handler;
pub mod replay;
pub mod transformer;

pub use crate::domain::model::{
    BatchSummary, IncomingBatch, InvalidRecordPolicy, OutgoingBatch, Record, RecordStatus,
    TransformResult,
};
pub use crate::domain::ports::{Pipeline, Storage, TransformSettings};
pub use crate::utils::error::Result;
pub use engine::ReplayEngine;
