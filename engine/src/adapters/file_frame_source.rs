use std::path::PathBuf;

use async_trait::async_trait;
use darkship_core::{
    Frame, FrameRef, FrameSource, Result,
    error::error::{EmptyFrameSnafu, FrameUnreadableSnafu},
};
use snafu::{ResultExt, ensure};

/// Frames read from image files in the order they were selected.
#[derive(Debug, Clone)]
pub struct FileFrameSource {
    paths: Vec<PathBuf>,
}

impl FileFrameSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

#[async_trait]
impl FrameSource for FileFrameSource {
    fn frames(&self) -> Vec<FrameRef> {
        self.paths
            .iter()
            .map(|p| FrameRef {
                name: p.display().to_string(),
            })
            .collect()
    }

    async fn load(&self, frame: &FrameRef) -> Result<Frame> {
        let data = tokio::fs::read(&frame.name)
            .await
            .boxed()
            .context(FrameUnreadableSnafu {
                frame: frame.name.clone(),
            })?;

        ensure!(
            !data.is_empty(),
            EmptyFrameSnafu {
                frame: frame.name.clone(),
            }
        );

        Ok(Frame {
            name: frame.name.clone(),
            data,
        })
    }
}
