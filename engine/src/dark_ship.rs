use std::collections::HashMap;

use darkship_core::{AisStatus, FrameBatch, Mmsi, Position, SignalLostMarker, VesselId, VesselSlot};
use rand::Rng;
use snafu::ResultExt;
use tracing::{info, instrument};

use crate::{
    Result,
    error::error::{DarkShipAlreadyFiredSnafu, SlotNotInBatchSnafu, StatusSnafu},
};

/// The one vessel that stopped broadcasting during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct DarkShipEvent {
    pub frame_index: usize,
    pub slot: VesselSlot,
    pub id: VesselId,
    pub mmsi: Mmsi,
    pub last_known_position: Position,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DarkShipOutcome {
    Detected(DarkShipEvent),
    #[default]
    NoAnomaly,
}

/// Tracks the AIS status of every vessel and fires the `Active -> Inactive` transition at most
/// once per run.
#[derive(Debug, Default)]
pub struct DarkShipStateMachine {
    statuses: HashMap<VesselId, AisStatus>,
    event: Option<DarkShipEvent>,
}

impl DarkShipEvent {
    pub fn marker(&self) -> SignalLostMarker {
        SignalLostMarker {
            slot: self.slot,
            id: self.id.clone(),
            position: self.last_known_position,
        }
    }
}

impl DarkShipStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vessels that were never seen are considered active.
    pub fn status(&self, id: &VesselId) -> AisStatus {
        self.statuses.get(id).copied().unwrap_or_default()
    }

    pub fn event(&self) -> Option<&DarkShipEvent> {
        self.event.as_ref()
    }

    pub fn outcome(&self) -> DarkShipOutcome {
        match &self.event {
            Some(e) => DarkShipOutcome::Detected(e.clone()),
            None => DarkShipOutcome::NoAnomaly,
        }
    }

    /// Returns a copy of `batch` where every vessel is confirmed active except `chosen`, which
    /// goes dark. `batch` itself is left untouched so the view before the event stays available.
    #[instrument(skip(self, batch), fields(frame_index = batch.frame_index))]
    pub fn apply(&mut self, batch: &FrameBatch, chosen: VesselSlot) -> Result<FrameBatch> {
        if let Some(event) = &self.event {
            return DarkShipAlreadyFiredSnafu {
                id: event.id.clone(),
            }
            .fail();
        }

        let Some(target) = batch.record(chosen) else {
            return SlotNotInBatchSnafu {
                slot: chosen,
                frame_index: batch.frame_index,
            }
            .fail();
        };

        let mut updated = batch.clone();
        for record in updated.records.iter_mut() {
            let next = if record.slot == chosen {
                AisStatus::Inactive
            } else {
                AisStatus::Active
            };

            record.status = self
                .status(&record.id)
                .transition(next)
                .context(StatusSnafu {
                    id: record.id.clone(),
                })?;
            self.statuses.insert(record.id.clone(), record.status);
        }

        info!(id = %target.id, mmsi = %target.mmsi, "vessel went dark");
        self.event = Some(DarkShipEvent {
            frame_index: batch.frame_index,
            slot: target.slot,
            id: target.id.clone(),
            mmsi: target.mmsi,
            last_known_position: target.telemetry.position(),
        });

        Ok(updated)
    }

    /// Picks the dark ship uniformly among the vessels of `batch`. An empty batch has no
    /// candidate and yields `None`, that is not an error.
    pub fn scan<R: Rng + ?Sized>(
        &mut self,
        batch: &FrameBatch,
        rng: &mut R,
    ) -> Result<Option<FrameBatch>> {
        if batch.is_empty() {
            return Ok(None);
        }

        let chosen = batch.records[rng.random_range(0..batch.len())].slot;
        self.apply(batch, chosen).map(Some)
    }
}
