use std::time::Duration;

use async_trait::async_trait;
use darkship_core::ScanDelay;

pub struct TokioScanDelay;

#[async_trait]
impl ScanDelay for TokioScanDelay {
    async fn wait(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
