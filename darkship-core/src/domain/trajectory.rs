use serde::Serialize;

use crate::{Position, VesselId, VesselSlot};

/// Position of one vessel in one frame, as handed to the visualization sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackedPosition {
    pub slot: VesselSlot,
    pub id: VesselId,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselPath {
    /// Slot the vessel was first detected in.
    pub slot: VesselSlot,
    pub id: VesselId,
    pub points: Vec<Position>,
}

/// The single "AIS signal lost" annotation, placed at the dark ship's last known position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalLostMarker {
    pub slot: VesselSlot,
    pub id: VesselId,
    pub position: Position,
}

/// Everything a path renderer consumes: one polyline per vessel in the order vessels were first
/// seen, so a path keeps its colour for the whole run, and at most one signal lost marker.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrajectoryPlot {
    pub paths: Vec<VesselPath>,
    pub signal_lost: Option<SignalLostMarker>,
}

impl TrajectoryPlot {
    pub fn push_positions(&mut self, positions: &[TrackedPosition]) {
        for p in positions {
            match self.paths.iter_mut().find(|path| path.id == p.id) {
                Some(path) => path.points.push(p.position),
                None => self.paths.push(VesselPath {
                    slot: p.slot,
                    id: p.id.clone(),
                    points: vec![p.position],
                }),
            }
        }
    }

    pub fn mark_signal_lost(&mut self, marker: SignalLostMarker) {
        self.signal_lost = Some(marker);
    }

    pub fn path(&self, id: &VesselId) -> Option<&VesselPath> {
        self.paths.iter().find(|p| p.id == *id)
    }
}
