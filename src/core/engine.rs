use crate::core::Pipeline;
use crate::domain::model::BatchSummary;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ReplayEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ReplayEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load once and returns the response path.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting replay");
        self.monitor.log_phase("Start");

        let batch = self.pipeline.extract().await?;
        tracing::info!("Extracted {} records", batch.len());
        self.monitor.log_phase("Extract");

        let outgoing = self.pipeline.transform(&batch).await?;
        let summary = BatchSummary::collect(&batch, &outgoing);
        tracing::info!(
            "Transformed {} records: {} ok, {} dropped, {} failed",
            summary.total,
            summary.ok,
            summary.dropped,
            summary.failed
        );
        self.monitor.log_phase("Transform");

        let output_path = self.pipeline.load(&outgoing).await?;
        tracing::info!("Response saved to: {}", output_path);
        self.monitor.log_phase("Load");
        self.monitor.log_throughput(summary.total);

        Ok(output_path)
    }
}
