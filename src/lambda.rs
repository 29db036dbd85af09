use chrono::Utc;
use clickstream_transform::core::handler::handle_batch;
use clickstream_transform::core::transformer::RecordTransformer;
use clickstream_transform::core::{IncomingBatch, OutgoingBatch};
use clickstream_transform::utils::{logger, validation::Validate};
use clickstream_transform::LambdaConfig;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};

async fn function_handler(
    event: LambdaEvent<IncomingBatch>,
    config: &LambdaConfig,
    transformer: &RecordTransformer,
) -> Result<OutgoingBatch, Error> {
    let (batch, context) = event.into_parts();
    tracing::info!(
        request_id = %context.request_id,
        invocation_id = batch.invocation_id.as_deref().unwrap_or("-"),
        "Transforming {} records",
        batch.len()
    );

    let (outgoing, summary) = handle_batch(&batch, context.deadline, config, transformer)?;
    let lag_ms = summary.lag_at(Utc::now()).map(|lag| lag.num_milliseconds());
    tracing::info!(
        total = summary.total,
        ok = summary.ok,
        dropped = summary.dropped,
        failed = summary.failed,
        bytes_in = summary.bytes_in,
        bytes_out = summary.bytes_out,
        lag_ms,
        "Batch transformed"
    );

    Ok(outgoing)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let config = LambdaConfig::from_env()?;
    config.validate()?;
    let transformer = RecordTransformer::from_settings(&config);
    tracing::info!(
        policy = ?transformer.policy(),
        validate_json = config.validate_json,
        "Record transformer ready"
    );

    let config = &config;
    let transformer = &transformer;
    run(service_fn(move |event: LambdaEvent<IncomingBatch>| async move {
        function_handler(event, config, transformer).await
    }))
    .await
}
