use crate::core::transformer::RecordTransformer;
use crate::core::{IncomingBatch, OutgoingBatch, Pipeline, Storage, TransformSettings};
use crate::utils::error::{Result, TransformError};
use base64::{engine::general_purpose::STANDARD, Engine};

pub const RESPONSE_FILE: &str = "firehose_response.json";
pub const DELIVERED_FILE: &str = "delivered.ndjson";

/// Replays a saved Firehose transformation event from storage.
///
/// `input` is read through the storage port; both output files are written
/// next to each other under the storage root.
pub struct ReplayPipeline<S: Storage> {
    storage: S,
    input: String,
    transformer: RecordTransformer,
}

impl<S: Storage> ReplayPipeline<S> {
    pub fn new<C: TransformSettings>(storage: S, config: &C, input: impl Into<String>) -> Self {
        Self {
            storage,
            input: input.into(),
            transformer: RecordTransformer::from_settings(config),
        }
    }
}

/// Concatenates the decoded payloads of accepted records, i.e. the object
/// body Firehose would write for this batch.
pub fn delivered_payload(outgoing: &OutgoingBatch) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    for data in outgoing.records.iter().filter_map(|r| r.data.as_deref()) {
        body.extend(STANDARD.decode(data)?);
    }
    Ok(body)
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for ReplayPipeline<S> {
    async fn extract(&self) -> Result<IncomingBatch> {
        tracing::debug!("Reading event from: {}", self.input);
        let raw = self.storage.read_file(&self.input).await?;

        serde_json::from_slice(&raw).map_err(|e| TransformError::Envelope {
            message: format!("{}: {}", self.input, e),
        })
    }

    async fn transform(&self, batch: &IncomingBatch) -> Result<OutgoingBatch> {
        if let Some(invocation_id) = &batch.invocation_id {
            tracing::debug!("Replaying invocation {}", invocation_id);
        }
        Ok(self.transformer.transform(batch))
    }

    async fn load(&self, result: &OutgoingBatch) -> Result<String> {
        let response = serde_json::to_vec_pretty(result)?;
        tracing::debug!("Writing response ({} bytes)", response.len());
        self.storage.write_file(RESPONSE_FILE, &response).await?;

        let delivered = delivered_payload(result)?;
        tracing::debug!("Writing delivered preview ({} bytes)", delivered.len());
        self.storage.write_file(DELIVERED_FILE, &delivered).await?;

        Ok(RESPONSE_FILE.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ReplayEngine;
    use crate::domain::model::{InvalidRecordPolicy, RecordStatus};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &[u8]) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                TransformError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig {
        policy: InvalidRecordPolicy,
    }

    impl TransformSettings for MockConfig {
        fn delimiter(&self) -> &str {
            "\n"
        }

        fn validate_json(&self) -> bool {
            true
        }

        fn invalid_record_policy(&self) -> InvalidRecordPolicy {
            self.policy
        }
    }

    fn event() -> Vec<u8> {
        serde_json::json!({
            "invocationId": "inv-1",
            "deliveryStreamArn": "arn:aws:firehose:us-east-1:123456789012:deliverystream/clickstream",
            "region": "us-east-1",
            "records": [
                {"recordId": "r1", "approximateArrivalTimestamp": 1700000000000i64, "data": STANDARD.encode(r#"{"page":"/home"}"#)},
                {"recordId": "r2", "approximateArrivalTimestamp": 1700000000100i64, "data": STANDARD.encode("not json")},
                {"recordId": "r3", "approximateArrivalTimestamp": 1700000000200i64, "data": STANDARD.encode(r#"{"page":"/cart"}"#)}
            ]
        })
        .to_string()
        .into_bytes()
    }

    #[tokio::test]
    async fn test_replay_writes_response_and_delivered_preview() {
        let storage = MockStorage::with_file("event.json", &event());
        let config = MockConfig {
            policy: InvalidRecordPolicy::Dropped,
        };
        let engine = ReplayEngine::new(ReplayPipeline::new(storage.clone(), &config, "event.json"));

        let path = engine.run().await.unwrap();
        assert_eq!(path, RESPONSE_FILE);

        let response: OutgoingBatch =
            serde_json::from_slice(&storage.get_file(RESPONSE_FILE).await.unwrap()).unwrap();
        let statuses: Vec<_> = response.records.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![RecordStatus::Ok, RecordStatus::Dropped, RecordStatus::Ok]
        );

        let delivered = storage.get_file(DELIVERED_FILE).await.unwrap();
        assert_eq!(
            String::from_utf8(delivered).unwrap(),
            "{\"page\":\"/home\"}\n{\"page\":\"/cart\"}\n"
        );
    }

    #[tokio::test]
    async fn test_malformed_envelope_is_batch_error() {
        let storage = MockStorage::with_file("event.json", b"{\"records\": 5}");
        let config = MockConfig {
            policy: InvalidRecordPolicy::ProcessingFailed,
        };
        let pipeline = ReplayPipeline::new(storage, &config, "event.json");

        let err = pipeline.extract().await.unwrap_err();
        assert!(matches!(err, TransformError::Envelope { .. }));
        assert!(!err.is_record_level());
    }

    #[tokio::test]
    async fn test_missing_input_is_io_error() {
        let storage = MockStorage::with_file("other.json", b"{}");
        let config = MockConfig {
            policy: InvalidRecordPolicy::ProcessingFailed,
        };
        let engine = ReplayEngine::new(ReplayPipeline::new(storage, &config, "event.json"));

        assert!(matches!(
            engine.run().await,
            Err(TransformError::IoError(_))
        ));
    }
}
