use crate::core::TransformSettings;
use crate::domain::model::{
    IncomingBatch, InvalidRecordPolicy, OutgoingBatch, Record, TransformResult,
};
use crate::utils::error::{Result, TransformError};
use base64::{engine::general_purpose::STANDARD, Engine};
use std::time::Instant;

pub const DEFAULT_DELIMITER: &str = "\n";

/// Re-encodes Firehose records so that every payload ends with a delimiter.
///
/// Holds only configuration; every call to [`RecordTransformer::transform`]
/// starts from nothing and keeps nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordTransformer {
    delimiter: String,
    validate_json: bool,
    policy: InvalidRecordPolicy,
}

impl Default for RecordTransformer {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            validate_json: false,
            policy: InvalidRecordPolicy::default(),
        }
    }
}

impl RecordTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings<C: TransformSettings + ?Sized>(settings: &C) -> Self {
        Self {
            delimiter: settings.delimiter().to_string(),
            validate_json: settings.validate_json(),
            policy: settings.invalid_record_policy(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn with_json_validation(mut self, enabled: bool) -> Self {
        self.validate_json = enabled;
        self
    }

    pub fn with_policy(mut self, policy: InvalidRecordPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> InvalidRecordPolicy {
        self.policy
    }

    pub fn transform(&self, batch: &IncomingBatch) -> OutgoingBatch {
        let records = batch
            .records
            .iter()
            .map(|record| self.transform_record(record))
            .collect();

        OutgoingBatch { records }
    }

    /// Same as [`transform`](Self::transform), but gives up on the whole
    /// batch once `deadline` passes. A failed invocation is retried by
    /// Firehose, a `ProcessingFailed` record is not.
    pub fn transform_until(
        &self,
        batch: &IncomingBatch,
        deadline: Option<Instant>,
    ) -> Result<OutgoingBatch> {
        let Some(limit) = deadline else {
            return Ok(self.transform(batch));
        };

        let mut records = Vec::with_capacity(batch.len());
        for record in &batch.records {
            if Instant::now() >= limit {
                return Err(TransformError::DeadlineExceeded {
                    record_id: record.record_id.clone(),
                });
            }
            records.push(self.transform_record(record));
        }

        Ok(OutgoingBatch { records })
    }

    pub fn transform_record(&self, record: &Record) -> TransformResult {
        match self.reencode(&record.data) {
            Ok(data) => TransformResult::ok(record.record_id.clone(), data),
            Err(err) => {
                tracing::warn!(
                    record_id = %record.record_id,
                    status = %self.policy.status(),
                    "{}",
                    err
                );
                TransformResult::rejected(record.record_id.clone(), self.policy.status())
            }
        }
    }

    /// Decodes `payload`, appends the delimiter and encodes it again.
    pub fn reencode(&self, payload: &str) -> Result<String> {
        let bytes = STANDARD.decode(payload)?;
        let mut text = String::from_utf8(bytes)?;

        if self.validate_json {
            serde_json::from_str::<serde::de::IgnoredAny>(&text).map_err(|e| {
                TransformError::InvalidJson {
                    message: e.to_string(),
                }
            })?;
        }

        text.push_str(&self.delimiter);
        Ok(STANDARD.encode(text))
    }
}

/// Transforms `batch` with the default settings: newline delimiter, no JSON
/// check, invalid records marked `ProcessingFailed`.
pub fn transform(batch: &IncomingBatch) -> OutgoingBatch {
    RecordTransformer::default().transform(batch)
}
