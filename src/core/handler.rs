use crate::config::lambda::LambdaConfig;
use crate::core::transformer::RecordTransformer;
use crate::core::{BatchSummary, IncomingBatch, OutgoingBatch};
use crate::utils::error::Result;

/// Handles one Firehose invocation. `deadline_epoch_ms` is the invocation
/// deadline from the Lambda context.
///
/// Returns an error, failing the invocation so Firehose retries the whole
/// batch, when the deadline (minus the configured margin) passes first.
pub fn handle_batch(
    batch: &IncomingBatch,
    deadline_epoch_ms: u64,
    config: &LambdaConfig,
    transformer: &RecordTransformer,
) -> Result<(OutgoingBatch, BatchSummary)> {
    let deadline = config.processing_deadline(deadline_epoch_ms);

    let outgoing = transformer.transform_until(batch, deadline).map_err(|err| {
        tracing::error!("{}; failing the invocation ({} records)", err, batch.len());
        err
    })?;

    let summary = BatchSummary::collect(batch, &outgoing);
    Ok((outgoing, summary))
}
