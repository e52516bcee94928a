use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Runs a pipeline phase by phase, logging progress and optional
/// resource usage after each phase.
pub struct SiteEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> SiteEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting site build...");

        // Extract
        tracing::info!("📥 Loading collection sheet...");
        let data = self.pipeline.extract().await?;
        tracing::info!("📥 Loaded {} specimens", data.collection.len());
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("🔄 Resolving images and rendering pages...");
        let site = self.pipeline.transform(data).await?;
        tracing::info!(
            "🔄 Rendered {} files for {} specimens",
            site.files.len(),
            site.specimen_count
        );
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("💾 Writing site...");
        let output_path = self.pipeline.load(site).await?;
        tracing::info!("💾 Site written to: {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
