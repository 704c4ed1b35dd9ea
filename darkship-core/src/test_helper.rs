use std::{
    collections::{HashMap, HashSet},
    time::Duration,
};

use async_trait::async_trait;
use snafu::ResultExt;
use tokio::sync::Mutex;

use crate::{
    error::error::{DetectionSnafu, FrameUnreadableSnafu},
    *,
};

impl BoundingBox {
    /// Non-overlapping boxes laid out left to right by `slot`.
    pub fn test_default(slot: usize) -> BoundingBox {
        let x = slot as f32 * 100.0;
        BoundingBox::new(x, 10.0, x + 80.0, 60.0)
    }
}

/// Frames named `frame_0`, `frame_1`, ... where selected frames fail to load.
#[derive(Debug, Default, Clone)]
pub struct MemoryFrameSource {
    frames: Vec<String>,
    unreadable: HashSet<String>,
}

/// Detector replaying a fixed number of boxes per frame name.
#[derive(Debug, Default, Clone)]
pub struct ScriptedDetector {
    detections: HashMap<String, Vec<BoundingBox>>,
    failing: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct RecordingDisplay {
    batches: Mutex<Vec<PublishedBatch>>,
    notifications: Mutex<Vec<Notification>>,
}

/// Records requested waits and returns immediately.
#[derive(Debug, Default)]
pub struct InstantScanDelay {
    waits: Mutex<Vec<Duration>>,
}

impl MemoryFrameSource {
    pub fn new(num_frames: usize) -> Self {
        Self {
            frames: (0..num_frames).map(|i| format!("frame_{i}")).collect(),
            unreadable: HashSet::new(),
        }
    }

    pub fn unreadable(mut self, frame_index: usize) -> Self {
        self.unreadable.insert(format!("frame_{frame_index}"));
        self
    }
}

impl ScriptedDetector {
    /// Detects `num_boxes` vessels in every frame in `frame_indexes`.
    pub fn boxes(
        mut self,
        frame_indexes: impl IntoIterator<Item = usize>,
        num_boxes: usize,
    ) -> Self {
        for i in frame_indexes {
            self.detections.insert(
                format!("frame_{i}"),
                (0..num_boxes).map(BoundingBox::test_default).collect(),
            );
        }
        self
    }

    /// Detects exactly `boxes`, in that order, in frame `frame_index`.
    pub fn detections(mut self, frame_index: usize, boxes: Vec<BoundingBox>) -> Self {
        self.detections.insert(format!("frame_{frame_index}"), boxes);
        self
    }

    pub fn failing(mut self, frame_index: usize) -> Self {
        self.failing.insert(format!("frame_{frame_index}"));
        self
    }
}

impl RecordingDisplay {
    pub async fn batches(&self) -> Vec<PublishedBatch> {
        self.batches.lock().await.clone()
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().await.clone()
    }
}

impl InstantScanDelay {
    pub async fn waits(&self) -> Vec<Duration> {
        self.waits.lock().await.clone()
    }
}

#[async_trait]
impl FrameSource for MemoryFrameSource {
    fn frames(&self) -> Vec<FrameRef> {
        self.frames
            .iter()
            .map(|name| FrameRef { name: name.clone() })
            .collect()
    }

    async fn load(&self, frame: &FrameRef) -> Result<Frame> {
        if self.unreadable.contains(&frame.name) {
            return Err(std::io::Error::from(std::io::ErrorKind::NotFound))
                .boxed()
                .context(FrameUnreadableSnafu {
                    frame: frame.name.clone(),
                });
        }

        Ok(Frame {
            name: frame.name.clone(),
            data: vec![0; 16],
        })
    }
}

#[async_trait]
impl Detector for ScriptedDetector {
    async fn detect(&self, frame: &Frame) -> Result<Vec<BoundingBox>> {
        if self.failing.contains(&frame.name) {
            return Err(std::io::Error::other("inference failed"))
                .boxed()
                .context(DetectionSnafu {
                    frame: frame.name.clone(),
                });
        }

        Ok(self
            .detections
            .get(&frame.name)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl DisplaySink for RecordingDisplay {
    async fn publish(&self, batch: &PublishedBatch) -> Result<()> {
        self.batches.lock().await.push(batch.clone());
        Ok(())
    }

    async fn notify(&self, notification: &Notification) -> Result<()> {
        self.notifications.lock().await.push(notification.clone());
        Ok(())
    }
}

#[async_trait]
impl ScanDelay for InstantScanDelay {
    async fn wait(&self, duration: Duration) {
        self.waits.lock().await.push(duration);
    }
}
