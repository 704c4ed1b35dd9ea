use std::time::Duration;

use crate::*;
use async_trait::async_trait;

#[async_trait]
pub trait DisplaySink: Send + Sync {
    async fn publish(&self, batch: &PublishedBatch) -> Result<()>;
    async fn notify(&self, notification: &Notification) -> Result<()>;
}

#[async_trait]
pub trait VisualizationSink: Send + Sync {
    async fn record_positions(&self, frame_index: usize, positions: &[TrackedPosition])
    -> Result<()>;
    async fn signal_lost(&self, marker: &SignalLostMarker) -> Result<()>;
}

/// Simulated sensor dwell time after a frame with detections.
#[async_trait]
pub trait ScanDelay: Send + Sync {
    async fn wait(&self, duration: Duration);
}
