use std::{collections::HashMap, path::Path};

use async_trait::async_trait;
use darkship_core::{BoundingBox, Detector, Frame, Result, error::error::ModelUnavailableSnafu};
use snafu::ResultExt;
use tracing::info;

/// Detector backed by a JSON file of precomputed detections, keyed by frame file name:
///
/// ```json
/// { "harbour_0.jpg": [{ "x1": 10.0, "y1": 20.0, "x2": 80.0, "y2": 60.0 }] }
/// ```
///
/// Frames without an entry have no detections.
#[derive(Debug, Clone)]
pub struct AnnotationDetector {
    detections: HashMap<String, Vec<BoundingBox>>,
}

impl AnnotationDetector {
    /// Fails with `ModelUnavailable` when the file is missing or malformed.
    pub async fn load(model: &Path) -> Result<Self> {
        let raw = tokio::fs::read(model)
            .await
            .boxed()
            .context(ModelUnavailableSnafu {
                model: model.display().to_string(),
            })?;

        let detections: HashMap<String, Vec<BoundingBox>> = serde_json::from_slice(&raw)
            .boxed()
            .context(ModelUnavailableSnafu {
                model: model.display().to_string(),
            })?;

        info!(
            model = %model.display(),
            num_frames = detections.len(),
            "loaded detector model"
        );

        Ok(Self { detections })
    }
}

#[async_trait]
impl Detector for AnnotationDetector {
    async fn detect(&self, frame: &Frame) -> Result<Vec<BoundingBox>> {
        let key = Path::new(&frame.name)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| frame.name.clone());

        Ok(self.detections.get(&key).cloned().unwrap_or_default())
    }
}
