use std::fmt::Display;

use chrono::NaiveDateTime;
use serde::Serialize;
use strum::AsRefStr;

use crate::{AisStatus, BoundingBox, Mmsi, TelemetryRecord, VesselId, VesselSlot};

/// Handle to one frame of the externally selected sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameRef {
    pub name: String,
}

/// A loaded frame, the image data is opaque to the engine and only handed to the detector.
#[derive(Debug, Clone)]
pub struct Frame {
    pub name: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VesselRecord {
    pub slot: VesselSlot,
    pub id: VesselId,
    pub mmsi: Mmsi,
    pub status: AisStatus,
    pub bounding_box: BoundingBox,
    pub telemetry: TelemetryRecord,
}

/// Every vessel record produced for one frame, in slot order.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBatch {
    pub frame_index: usize,
    pub frame_name: String,
    pub timestamp: NaiveDateTime,
    pub records: Vec<VesselRecord>,
}

/// Table row handed to display collaborators. Telemetry is omitted for vessels that have gone
/// dark while `id` and `mmsi` stay visible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub id: VesselId,
    pub mmsi: Mmsi,
    pub status: AisStatus,
    pub speed: Option<f64>,
    pub heading: Option<u16>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<String>,
}

/// What a renderer needs to draw one detection: the box, its label and the status colour.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxAnnotation {
    pub bounding_box: BoundingBox,
    pub label: String,
    pub status: AisStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display, AsRefStr)]
pub enum BatchKind {
    /// The regular per-frame batch.
    Tracking,
    /// The final frame republished after the dark ship was chosen.
    DarkShipScan,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedBatch {
    pub frame_index: usize,
    pub frame_name: String,
    pub kind: BatchKind,
    pub rows: Vec<DisplayRow>,
    pub annotations: Vec<BoxAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Notification {
    FrameUnreadable {
        frame_index: usize,
        frame: String,
        reason: String,
    },
    NoShipsDetected {
        frame_index: usize,
        frame: String,
    },
    ScanInProgress {
        frame_index: usize,
    },
    DarkShipDetected {
        frame_index: usize,
        id: VesselId,
        mmsi: Mmsi,
    },
    NoAnomaly {
        frame_index: usize,
    },
}

impl VesselRecord {
    pub fn display_row(&self) -> DisplayRow {
        let telemetry = self.status.is_active().then_some(&self.telemetry);

        DisplayRow {
            id: self.id.clone(),
            mmsi: self.mmsi,
            status: self.status,
            speed: telemetry.map(|t| t.speed),
            heading: telemetry.map(|t| t.heading),
            latitude: telemetry.map(|t| t.latitude),
            longitude: telemetry.map(|t| t.longitude),
            timestamp: telemetry.map(TelemetryRecord::formatted_timestamp),
        }
    }

    pub fn annotation(&self) -> BoxAnnotation {
        BoxAnnotation {
            bounding_box: self.bounding_box,
            label: format!("{} (MMSI: {})", self.id, self.mmsi),
            status: self.status,
        }
    }
}

impl FrameBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, slot: VesselSlot) -> Option<&VesselRecord> {
        self.records.iter().find(|r| r.slot == slot)
    }

    pub fn publish(&self, kind: BatchKind) -> PublishedBatch {
        PublishedBatch {
            frame_index: self.frame_index,
            frame_name: self.frame_name.clone(),
            kind,
            rows: self.records.iter().map(VesselRecord::display_row).collect(),
            annotations: self.records.iter().map(VesselRecord::annotation).collect(),
        }
    }
}

impl PublishedBatch {
    pub fn row(&self, id: &VesselId) -> Option<&DisplayRow> {
        self.rows.iter().find(|r| r.id == *id)
    }
}

impl DisplayRow {
    pub fn has_telemetry(&self) -> bool {
        self.speed.is_some()
            || self.heading.is_some()
            || self.latitude.is_some()
            || self.longitude.is_some()
            || self.timestamp.is_some()
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notification::FrameUnreadable { frame, reason, .. } => {
                write!(f, "Image '{frame}' not found or unable to load: {reason}")
            }
            Notification::NoShipsDetected { frame, .. } => {
                write!(f, "No ships detected in '{frame}'")
            }
            Notification::ScanInProgress { .. } => {
                f.write_str("Performing scan, checking for dark ship")
            }
            Notification::DarkShipDetected { id, mmsi, .. } => {
                write!(f, "Dark ship detected: {id} (MMSI: {mmsi})")
            }
            Notification::NoAnomaly { .. } => f.write_str("No dark ship detected"),
        }
    }
}
