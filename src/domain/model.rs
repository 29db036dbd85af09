use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One record of a Firehose transformation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub record_id: String,
    /// Epoch milliseconds at which Firehose accepted the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_arrival_timestamp: Option<i64>,
    /// Base64-encoded payload.
    pub data: String,
}

impl Record {
    pub fn new(record_id: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            approximate_arrival_timestamp: None,
            data: data.into(),
        }
    }

    pub fn arrived_at(&self) -> Option<DateTime<Utc>> {
        self.approximate_arrival_timestamp
            .and_then(DateTime::from_timestamp_millis)
    }
}

/// The event Firehose hands to a transformation function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingBatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_stream_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub records: Vec<Record>,
}

impl IncomingBatch {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordStatus {
    Ok,
    Dropped,
    ProcessingFailed,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordStatus::Ok => "Ok",
            RecordStatus::Dropped => "Dropped",
            RecordStatus::ProcessingFailed => "ProcessingFailed",
        };
        f.write_str(name)
    }
}

/// What happens to a record whose payload cannot be transformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidRecordPolicy {
    /// Firehose sends the original record to the error output prefix.
    #[default]
    ProcessingFailed,
    /// The record is discarded silently.
    Dropped,
}

impl InvalidRecordPolicy {
    pub fn status(self) -> RecordStatus {
        match self {
            InvalidRecordPolicy::ProcessingFailed => RecordStatus::ProcessingFailed,
            InvalidRecordPolicy::Dropped => RecordStatus::Dropped,
        }
    }
}

impl std::str::FromStr for InvalidRecordPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "processing_failed" => Ok(InvalidRecordPolicy::ProcessingFailed),
            "dropped" => Ok(InvalidRecordPolicy::Dropped),
            other => Err(format!(
                "unknown policy '{}', expected processing_failed or dropped",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    pub record_id: String,
    #[serde(rename = "result")]
    pub status: RecordStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl TransformResult {
    pub fn ok(record_id: impl Into<String>, data: String) -> Self {
        Self {
            record_id: record_id.into(),
            status: RecordStatus::Ok,
            data: Some(data),
        }
    }

    pub fn rejected(record_id: impl Into<String>, status: RecordStatus) -> Self {
        Self {
            record_id: record_id.into(),
            status,
            data: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RecordStatus::Ok
    }
}

/// The response returned to Firehose: one result per incoming record, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingBatch {
    pub records: Vec<TransformResult>,
}

impl OutgoingBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-invocation counters. Logged, never sent back to Firehose.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub ok: usize,
    pub dropped: usize,
    pub failed: usize,
    pub bytes_in: usize,
    pub bytes_out: usize,
    pub oldest_arrival: Option<DateTime<Utc>>,
}

impl BatchSummary {
    pub fn collect(incoming: &IncomingBatch, outgoing: &OutgoingBatch) -> Self {
        let mut summary = BatchSummary {
            total: outgoing.len(),
            bytes_in: incoming.records.iter().map(|r| r.data.len()).sum(),
            oldest_arrival: incoming.records.iter().filter_map(Record::arrived_at).min(),
            ..Default::default()
        };

        for result in &outgoing.records {
            match result.status {
                RecordStatus::Ok => summary.ok += 1,
                RecordStatus::Dropped => summary.dropped += 1,
                RecordStatus::ProcessingFailed => summary.failed += 1,
            }
            summary.bytes_out += result.data.as_ref().map_or(0, String::len);
        }

        summary
    }

    /// Time between the oldest record reaching Firehose and `now`.
    pub fn lag_at(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.oldest_arrival.map(|oldest| now - oldest)
    }
}
