#![deny(warnings)]
#![deny(rust_2018_idioms)]

//! Domain types and collaborator ports shared by the dark ship simulation engine.

mod domain;
pub mod error;
mod ports;

#[cfg(feature = "test")]
mod test_helper;

pub use domain::*;
pub use error::{AisStatusError, Error, MmsiError, Result};
pub use ports::*;

#[cfg(feature = "test")]
pub use test_helper::*;
