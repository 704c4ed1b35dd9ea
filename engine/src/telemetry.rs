use chrono::{NaiveDateTime, SubsecRound};
use darkship_core::{Position, TelemetryRecord, VesselId};
use rand::Rng;
use tracing::trace;

use crate::round_to;

pub const DEFAULT_MAX_SPEED_KNOTS: f64 = 30.0;

/// Produces one frame's synthetic AIS telemetry for a vessel, nothing is kept between calls.
#[derive(Debug, Clone, Copy)]
pub struct TelemetrySynthesizer {
    max_speed_knots: f64,
}

impl Default for TelemetrySynthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SPEED_KNOTS)
    }
}

impl TelemetrySynthesizer {
    pub fn new(max_speed_knots: f64) -> Self {
        Self { max_speed_knots }
    }

    /// `position` must already be advanced for the current frame.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        id: &VesselId,
        position: Position,
        timestamp: NaiveDateTime,
        rng: &mut R,
    ) -> TelemetryRecord {
        let record = TelemetryRecord {
            speed: round_to(rng.random_range(0.0..=self.max_speed_knots), 2),
            heading: rng.random_range(0..360),
            latitude: round_to(position.latitude, 6),
            longitude: round_to(position.longitude, 6),
            timestamp: timestamp.trunc_subsecs(0),
        };

        trace!(%id, speed = record.speed, heading = record.heading, "synthesized telemetry");

        record
    }
}
