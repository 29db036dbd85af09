use crate::domain::model::{IncomingBatch, InvalidRecordPolicy, OutgoingBatch};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Knobs of the record transform, shared by every configuration source.
pub trait TransformSettings: Send + Sync {
    fn delimiter(&self) -> &str;
    fn validate_json(&self) -> bool;
    fn invalid_record_policy(&self) -> InvalidRecordPolicy;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<IncomingBatch>;
    async fn transform(&self, batch: &IncomingBatch) -> Result<OutgoingBatch>;
    async fn load(&self, result: &OutgoingBatch) -> Result<String>;
}
