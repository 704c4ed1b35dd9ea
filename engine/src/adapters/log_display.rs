use async_trait::async_trait;
use darkship_core::{DisplaySink, Notification, PublishedBatch, Result};
use tracing::{error, info, warn};

/// Emits every published batch and notification as structured tracing events.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDisplay;

#[async_trait]
impl DisplaySink for LogDisplay {
    async fn publish(&self, batch: &PublishedBatch) -> Result<()> {
        info!(
            frame_index = batch.frame_index,
            frame = %batch.frame_name,
            kind = %batch.kind,
            num_vessels = batch.rows.len(),
            "vessel batch"
        );

        for row in &batch.rows {
            info!(
                id = %row.id,
                mmsi = %row.mmsi,
                status = %row.status,
                speed = ?row.speed,
                heading = ?row.heading,
                latitude = ?row.latitude,
                longitude = ?row.longitude,
                timestamp = row.timestamp.as_deref().unwrap_or(""),
                "vessel row"
            );
        }

        Ok(())
    }

    async fn notify(&self, notification: &Notification) -> Result<()> {
        match notification {
            Notification::FrameUnreadable { .. } => error!("{notification}"),
            Notification::DarkShipDetected { .. } => warn!("{notification}"),
            Notification::NoShipsDetected { .. }
            | Notification::ScanInProgress { .. }
            | Notification::NoAnomaly { .. } => info!("{notification}"),
        }
        Ok(())
    }
}
