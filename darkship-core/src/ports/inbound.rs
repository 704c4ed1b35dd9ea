use crate::*;
use async_trait::async_trait;

/// Ordered sequence of frames selected outside of the engine.
#[async_trait]
pub trait FrameSource: Send + Sync {
    fn frames(&self) -> Vec<FrameRef>;
    async fn load(&self, frame: &FrameRef) -> Result<Frame>;
}

/// Turns a frame into vessel detections, the order of the returned boxes defines their slots.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(&self, frame: &Frame) -> Result<Vec<BoundingBox>>;
}
