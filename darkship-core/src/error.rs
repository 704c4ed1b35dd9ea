use snafu::{Location, Snafu};
use std::num::ParseIntError;

pub type Result<T> = std::result::Result<T, Error>;

pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Detector model '{model}' could not be loaded"))]
    ModelUnavailable {
        #[snafu(implicit)]
        location: Location,
        model: String,
        #[snafu(source)]
        error: BoxedError,
    },
    #[snafu(display("Frame '{frame}' could not be read"))]
    FrameUnreadable {
        #[snafu(implicit)]
        location: Location,
        frame: String,
        #[snafu(source)]
        error: BoxedError,
    },
    #[snafu(display("Frame '{frame}' contained no image data"))]
    EmptyFrame {
        #[snafu(implicit)]
        location: Location,
        frame: String,
    },
    #[snafu(display("Detection failed on frame '{frame}'"))]
    Detection {
        #[snafu(implicit)]
        location: Location,
        frame: String,
        #[snafu(source)]
        error: BoxedError,
    },
    #[snafu(display("Failed to publish to the '{sink}' sink"))]
    Publish {
        #[snafu(implicit)]
        location: Location,
        sink: String,
        #[snafu(source)]
        error: BoxedError,
    },
}

impl Error {
    /// Errors that only concern the frame being processed, the sequence continues with the next
    /// frame.
    pub fn is_frame_local(&self) -> bool {
        match self {
            Error::FrameUnreadable { .. } | Error::EmptyFrame { .. } | Error::Detection { .. } => {
                true
            }
            Error::ModelUnavailable { .. } | Error::Publish { .. } => false,
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum MmsiError {
    #[snafu(display("MMSI '{value}' is not a 9 digit number"))]
    OutOfRange {
        #[snafu(implicit)]
        location: Location,
        value: u32,
    },
    #[snafu(display("Failed to parse MMSI '{value}'"))]
    Parse {
        #[snafu(implicit)]
        location: Location,
        value: String,
        #[snafu(source)]
        error: ParseIntError,
    },
}

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum AisStatusError {
    #[snafu(display("An inactive AIS transponder cannot become active again"))]
    Reactivation {
        #[snafu(implicit)]
        location: Location,
    },
}
