use darkship_core::{AisStatusError, MmsiError, VesselId, VesselSlot};
use snafu::{Location, Snafu};
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(context(false), display("Collaborator error"))]
    Core {
        #[snafu(implicit)]
        location: Location,
        source: darkship_core::Error,
    },
    #[snafu(display("Failed to load configuration"))]
    Config {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: config::ConfigError,
    },
    #[snafu(display("Invalid settings: {reason}"))]
    InvalidSettings {
        #[snafu(implicit)]
        location: Location,
        reason: String,
    },
    #[snafu(display("The dark ship event already fired for '{id}'"))]
    DarkShipAlreadyFired {
        #[snafu(implicit)]
        location: Location,
        id: VesselId,
    },
    #[snafu(display("Slot '{slot}' is not part of the batch of frame '{frame_index}'"))]
    SlotNotInBatch {
        #[snafu(implicit)]
        location: Location,
        slot: VesselSlot,
        frame_index: usize,
    },
    #[snafu(display("Failed to assign an MMSI to '{id}'"))]
    Mmsi {
        #[snafu(implicit)]
        location: Location,
        id: VesselId,
        source: MmsiError,
    },
    #[snafu(display("Invalid AIS status transition for '{id}'"))]
    Status {
        #[snafu(implicit)]
        location: Location,
        id: VesselId,
        source: AisStatusError,
    },
    #[snafu(display("Timestamp of frame '{frame_index}' is out of range"))]
    TimestampOverflow {
        #[snafu(implicit)]
        location: Location,
        frame_index: usize,
    },
    #[snafu(display("Failed to write '{}'", path.display()))]
    Io {
        #[snafu(implicit)]
        location: Location,
        path: PathBuf,
        #[snafu(source)]
        error: std::io::Error,
    },
    #[snafu(display("Failed to serialize json"))]
    Json {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: serde_json::Error,
    },
}
