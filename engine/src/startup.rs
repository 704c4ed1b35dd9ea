use std::{path::PathBuf, sync::Arc};

use darkship_core::VisualizationSink;
use tracing::info;

use crate::{
    AnnotationDetector, Collaborators, FileFrameSource, FrameSequencer, LogDisplay, Result,
    RunReport, TokioScanDelay, TrajectoryRecorder, settings::Settings,
};

pub struct App {
    sequencer: FrameSequencer,
    trajectories: Arc<TrajectoryRecorder>,
    trajectory_output: Option<PathBuf>,
}

impl App {
    /// Loads the detector before anything else, a missing model aborts the run before any frame
    /// is read.
    pub async fn build(settings: &Settings, frames: Vec<PathBuf>) -> Result<App> {
        let detector = AnnotationDetector::load(&settings.detector.annotations).await?;
        let trajectories = Arc::new(TrajectoryRecorder::new());

        let collaborators = Collaborators {
            frames: Arc::new(FileFrameSource::new(frames)),
            detector: Arc::new(detector),
            display: Arc::new(LogDisplay),
            visualization: Some(trajectories.clone() as Arc<dyn VisualizationSink>),
            scan_delay: Arc::new(TokioScanDelay),
        };

        let sequencer = FrameSequencer::new(
            settings.simulation.sequencer_config()?,
            collaborators,
            settings.simulation.rng(),
        );

        Ok(App {
            sequencer,
            trajectories,
            trajectory_output: settings.trajectory_output.clone(),
        })
    }

    pub async fn run(self) -> Result<RunReport> {
        let report = self.sequencer.run().await?;

        if let Some(path) = &self.trajectory_output {
            self.trajectories.write_json(path).await?;
            info!(path = %path.display(), "wrote trajectory plot");
        }

        Ok(report)
    }
}
