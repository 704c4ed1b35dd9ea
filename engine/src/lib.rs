#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Simulates AIS telemetry for vessels found by an object detector across a sequence of frames,
//! and scripts a single vessel going dark on the final frame.

pub mod adapters;
pub mod dark_ship;
pub mod drift;
pub mod error;
pub mod identity;
pub mod sequencer;
pub mod settings;
pub mod startup;
pub mod telemetry;

pub use adapters::*;
pub use dark_ship::*;
pub use drift::*;
pub use error::{Error, Result};
pub use identity::*;
pub use sequencer::*;
pub use settings::*;
pub use startup::*;
pub use telemetry::*;
