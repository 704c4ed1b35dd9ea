use std::{collections::BTreeMap, sync::Arc, time::Duration};

use chrono::{Local, NaiveDateTime, SubsecRound, TimeDelta};
use darkship_core::{
    BatchKind, BoundingBox, Detector, DisplaySink, FrameBatch, FrameRef, FrameSource,
    Notification, Position, PublishedBatch, ScanDelay, TrackedPosition, VesselId, VesselRecord,
    VesselSlot, VisualizationSink,
};
use rand::rngs::StdRng;
use snafu::OptionExt;
use tracing::{Span, debug, info, instrument, warn};

use crate::{
    DarkShipOutcome, DarkShipStateMachine, DriftModel, DriftSettings, IdentityResolver,
    MmsiRegistry, OrdinalIdentityResolver, Result, TelemetrySynthesizer,
    error::error::TimestampOverflowSnafu, random_origin, telemetry::DEFAULT_MAX_SPEED_KNOTS,
};

#[derive(Debug, Clone)]
pub struct SequencerConfig {
    /// Number of vessel positions seeded before the first frame.
    pub vessel_count: usize,
    /// Simulated time between two consecutive frames.
    pub frame_interval: TimeDelta,
    pub scan_delay: Duration,
    /// Random when absent.
    pub origin: Option<Position>,
    /// Local wall clock at run start when absent.
    pub start_time: Option<NaiveDateTime>,
    /// Forces the dark ship to a given slot instead of picking one at random.
    pub dark_ship_slot: Option<VesselSlot>,
    pub drift: DriftSettings,
    pub max_speed_knots: f64,
}

pub struct Collaborators {
    pub frames: Arc<dyn FrameSource>,
    pub detector: Arc<dyn Detector>,
    pub display: Arc<dyn DisplaySink>,
    pub visualization: Option<Arc<dyn VisualizationSink>>,
    pub scan_delay: Arc<dyn ScanDelay>,
}

/// Drives one run over an ordered sequence of frames. Frames are processed strictly one after
/// the other: drift, synthesis, publish, scan pause and, for the final frame, the dark ship pass.
pub struct FrameSequencer {
    config: SequencerConfig,
    collaborators: Collaborators,
    identity: Box<dyn IdentityResolver>,
    registry: MmsiRegistry,
    drift: DriftModel,
    telemetry: TelemetrySynthesizer,
    dark_ship: DarkShipStateMachine,
    rng: StdRng,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub frames_processed: usize,
    pub skipped: Vec<SkippedFrame>,
    /// Every batch handed to the display, in publish order.
    pub batches: Vec<PublishedBatch>,
    pub dark_ship: DarkShipOutcome,
    pub registry: MmsiRegistry,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedFrame {
    pub frame_index: usize,
    pub frame: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Unreadable(String),
    NoDetections,
}

enum FrameDetections {
    Vessels(Vec<BoundingBox>),
    Skipped(SkipReason),
}

struct Run {
    origin: Position,
    start_time: NaiveDateTime,
    last_index: usize,
    /// Seeded positions no vessel has claimed yet, by the slot they were seeded for.
    unclaimed: BTreeMap<VesselSlot, Position>,
    positions: BTreeMap<VesselId, Position>,
    report: RunReport,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            vessel_count: 5,
            frame_interval: TimeDelta::hours(2),
            scan_delay: Duration::from_secs(5),
            origin: None,
            start_time: None,
            dark_ship_slot: None,
            drift: DriftSettings::default(),
            max_speed_knots: DEFAULT_MAX_SPEED_KNOTS,
        }
    }
}

impl RunReport {
    pub fn tracking_batches(&self) -> impl Iterator<Item = &PublishedBatch> {
        self.batches
            .iter()
            .filter(|b| b.kind == BatchKind::Tracking)
    }

    pub fn dark_ship_batch(&self) -> Option<&PublishedBatch> {
        self.batches
            .iter()
            .find(|b| b.kind == BatchKind::DarkShipScan)
    }
}

impl FrameSequencer {
    pub fn new(config: SequencerConfig, collaborators: Collaborators, rng: StdRng) -> Self {
        Self {
            drift: DriftModel::new(config.drift),
            telemetry: TelemetrySynthesizer::new(config.max_speed_knots),
            config,
            collaborators,
            identity: Box::new(OrdinalIdentityResolver),
            registry: MmsiRegistry::new(),
            dark_ship: DarkShipStateMachine::new(),
            rng,
        }
    }

    pub fn with_identity_resolver(mut self, resolver: Box<dyn IdentityResolver>) -> Self {
        self.identity = resolver;
        self
    }

    #[instrument(skip_all, fields(app.num_frames))]
    pub async fn run(mut self) -> Result<RunReport> {
        let frames = self.collaborators.frames.frames();
        Span::current().record("app.num_frames", frames.len());

        let origin = match self.config.origin {
            Some(origin) => origin,
            None => random_origin(&mut self.rng),
        };
        let unclaimed = self
            .drift
            .seed_positions(origin, self.config.vessel_count, &mut self.rng)
            .into_iter()
            .enumerate()
            .map(|(i, p)| (VesselSlot::new(i), p))
            .collect();

        let mut run = Run {
            origin,
            start_time: self
                .config
                .start_time
                .unwrap_or_else(|| Local::now().naive_local())
                .trunc_subsecs(0),
            last_index: frames.len().saturating_sub(1),
            unclaimed,
            positions: BTreeMap::new(),
            report: RunReport::default(),
        };

        info!(
            latitude = origin.latitude,
            longitude = origin.longitude,
            "starting run"
        );

        for (frame_index, frame) in frames.iter().enumerate() {
            self.process_frame(&mut run, frame_index, frame).await?;
        }

        let mut report = run.report;
        report.dark_ship = self.dark_ship.outcome();
        report.registry = self.registry;

        info!(
            processed = report.frames_processed,
            skipped = report.skipped.len(),
            "run completed"
        );

        Ok(report)
    }

    #[instrument(skip(self, run, frame), fields(frame = %frame.name))]
    async fn process_frame(
        &mut self,
        run: &mut Run,
        frame_index: usize,
        frame: &FrameRef,
    ) -> Result<()> {
        for position in run
            .unclaimed
            .values_mut()
            .chain(run.positions.values_mut())
        {
            *position = self.drift.advance(*position, &mut self.rng);
        }

        let timestamp = frame_timestamp(run.start_time, self.config.frame_interval, frame_index)?;
        let is_last = frame_index == run.last_index;

        let boxes = match self.detect(frame_index, frame).await? {
            FrameDetections::Vessels(boxes) => boxes,
            FrameDetections::Skipped(reason) => {
                run.report.skipped.push(SkippedFrame {
                    frame_index,
                    frame: frame.name.clone(),
                    reason,
                });
                if is_last {
                    self.notify(&Notification::NoAnomaly { frame_index }).await?;
                }
                return Ok(());
            }
        };

        let batch = self.track(run, frame_index, frame, timestamp, &boxes)?;
        self.publish(&batch, BatchKind::Tracking, &mut run.report)
            .await?;
        self.record_positions(&batch).await?;
        run.report.frames_processed += 1;

        self.collaborators
            .scan_delay
            .wait(self.config.scan_delay)
            .await;
        self.notify(&Notification::ScanInProgress { frame_index })
            .await?;

        if is_last {
            self.dark_ship_pass(&batch, &mut run.report).await?;
        }

        Ok(())
    }

    async fn detect(&self, frame_index: usize, frame: &FrameRef) -> Result<FrameDetections> {
        let detected = match self.collaborators.frames.load(frame).await {
            Ok(loaded) => self.collaborators.detector.detect(&loaded).await,
            Err(e) => Err(e),
        };

        match detected {
            Ok(boxes) if boxes.is_empty() => {
                info!("no ships detected");
                self.notify(&Notification::NoShipsDetected {
                    frame_index,
                    frame: frame.name.clone(),
                })
                .await?;
                Ok(FrameDetections::Skipped(SkipReason::NoDetections))
            }
            Ok(boxes) => {
                debug!(num_boxes = boxes.len(), "detections received");
                Ok(FrameDetections::Vessels(boxes))
            }
            Err(e) if e.is_frame_local() => {
                let reason = describe(&e);
                warn!("skipping frame: {reason}");
                self.notify(&Notification::FrameUnreadable {
                    frame_index,
                    frame: frame.name.clone(),
                    reason: reason.clone(),
                })
                .await?;
                Ok(FrameDetections::Skipped(SkipReason::Unreadable(reason)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn track(
        &mut self,
        run: &mut Run,
        frame_index: usize,
        frame: &FrameRef,
        timestamp: NaiveDateTime,
        boxes: &[BoundingBox],
    ) -> Result<FrameBatch> {
        let mut records = Vec::with_capacity(boxes.len());

        for (i, bounding_box) in boxes.iter().enumerate() {
            let slot = VesselSlot::new(i);
            let id = self.identity.resolve(slot, bounding_box);
            let mmsi = self.registry.get_or_create(&id, &mut self.rng)?;
            let position = self.position(run, slot, &id);

            let telemetry = self
                .telemetry
                .synthesize(&id, position, timestamp, &mut self.rng);

            records.push(VesselRecord {
                slot,
                status: self.dark_ship.status(&id),
                id,
                mmsi,
                bounding_box: *bounding_box,
                telemetry,
            });
        }

        Ok(FrameBatch {
            frame_index,
            frame_name: frame.name.clone(),
            timestamp,
            records,
        })
    }

    /// Current position of `id`. A vessel seen for the first time claims the position seeded for
    /// the slot it was detected in, or gets a fresh one near the origin when that slot has none
    /// left.
    fn position(&mut self, run: &mut Run, slot: VesselSlot, id: &VesselId) -> Position {
        if let Some(position) = run.positions.get(id) {
            return *position;
        }

        let position = match run.unclaimed.remove(&slot) {
            Some(position) => position,
            None => {
                debug!(%slot, %id, "seeded position for vessel beyond the initial fleet");
                self.drift.seed_position(run.origin, &mut self.rng)
            }
        };
        run.positions.insert(id.clone(), position);
        position
    }

    async fn dark_ship_pass(&mut self, batch: &FrameBatch, report: &mut RunReport) -> Result<()> {
        let updated = match self.config.dark_ship_slot {
            Some(slot) if batch.record(slot).is_some() => Some(self.dark_ship.apply(batch, slot)?),
            Some(slot) => {
                warn!(%slot, "designated dark ship was not detected in the final frame");
                None
            }
            None => self.dark_ship.scan(batch, &mut self.rng)?,
        };

        let (Some(updated), Some(event)) = (updated, self.dark_ship.event().cloned()) else {
            return self
                .notify(&Notification::NoAnomaly {
                    frame_index: batch.frame_index,
                })
                .await;
        };

        self.publish(&updated, BatchKind::DarkShipScan, report)
            .await?;

        if let Some(visualization) = &self.collaborators.visualization {
            visualization.signal_lost(&event.marker()).await?;
        }

        self.notify(&Notification::DarkShipDetected {
            frame_index: batch.frame_index,
            id: event.id,
            mmsi: event.mmsi,
        })
        .await
    }

    async fn publish(
        &self,
        batch: &FrameBatch,
        kind: BatchKind,
        report: &mut RunReport,
    ) -> Result<()> {
        let published = batch.publish(kind);
        debug!(%kind, num_vessels = published.rows.len(), "publishing batch");

        self.collaborators.display.publish(&published).await?;
        report.batches.push(published);
        Ok(())
    }

    async fn record_positions(&self, batch: &FrameBatch) -> Result<()> {
        let Some(visualization) = &self.collaborators.visualization else {
            return Ok(());
        };

        let positions: Vec<TrackedPosition> = batch
            .records
            .iter()
            .map(|r| TrackedPosition {
                slot: r.slot,
                id: r.id.clone(),
                position: r.telemetry.position(),
            })
            .collect();

        visualization
            .record_positions(batch.frame_index, &positions)
            .await?;
        Ok(())
    }

    async fn notify(&self, notification: &Notification) -> Result<()> {
        self.collaborators.display.notify(notification).await?;
        Ok(())
    }
}

fn frame_timestamp(
    start_time: NaiveDateTime,
    frame_interval: TimeDelta,
    frame_index: usize,
) -> Result<NaiveDateTime> {
    i32::try_from(frame_index)
        .ok()
        .and_then(|i| frame_interval.checked_mul(i))
        .and_then(|offset| start_time.checked_add_signed(offset))
        .context(TimestampOverflowSnafu { frame_index })
}

fn describe(e: &darkship_core::Error) -> String {
    match std::error::Error::source(e) {
        Some(source) => format!("{e}: {source}"),
        None => e.to_string(),
    }
}
