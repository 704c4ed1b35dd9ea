use std::path::Path;

use async_trait::async_trait;
use darkship_core::{SignalLostMarker, TrajectoryPlot, TrackedPosition, VisualizationSink};
use snafu::ResultExt;
use tokio::sync::Mutex;

use crate::{
    Result,
    error::error::{IoSnafu, JsonSnafu},
};

/// Collects the per-vessel paths and the signal lost marker for a separate path renderer.
#[derive(Debug, Default)]
pub struct TrajectoryRecorder {
    plot: Mutex<TrajectoryPlot>,
}

impl TrajectoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn plot(&self) -> TrajectoryPlot {
        self.plot.lock().await.clone()
    }

    pub async fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(&*self.plot.lock().await).context(JsonSnafu)?;
        tokio::fs::write(path, json)
            .await
            .context(IoSnafu { path })?;
        Ok(())
    }
}

#[async_trait]
impl VisualizationSink for TrajectoryRecorder {
    async fn record_positions(
        &self,
        _frame_index: usize,
        positions: &[TrackedPosition],
    ) -> darkship_core::Result<()> {
        self.plot.lock().await.push_positions(positions);
        Ok(())
    }

    async fn signal_lost(&self, marker: &SignalLostMarker) -> darkship_core::Result<()> {
        self.plot.lock().await.mark_signal_lost(marker.clone());
        Ok(())
    }
}
