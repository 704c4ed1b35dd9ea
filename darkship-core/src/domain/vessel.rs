use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use snafu::{ResultExt, ensure};
use strum::AsRefStr;

use crate::error::{
    AisStatusError, MmsiError, ais_status_error::ReactivationSnafu,
    mmsi_error::{OutOfRangeSnafu, ParseSnafu},
};

pub const MMSI_MIN: u32 = 100_000_000;
pub const MMSI_MAX: u32 = 999_999_999;

/// Ordinal position of a detection within one frame's detection batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct VesselSlot(usize);

/// Stable key of a tracked vessel, assigned the first time its slot is observed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct VesselId(String);

/// Maritime Mobile Service Identity, always exactly 9 digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Mmsi(u32);

/// Broadcast status of a vessel's AIS transponder.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Deserialize,
    Serialize,
    strum::Display,
    AsRefStr,
)]
pub enum AisStatus {
    #[default]
    Active,
    Inactive,
}

impl VesselSlot {
    pub fn new(slot: usize) -> Self {
        Self(slot)
    }

    pub fn into_inner(self) -> usize {
        self.0
    }
}

impl From<usize> for VesselSlot {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl Display for VesselSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl VesselId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn from_slot(slot: VesselSlot) -> Self {
        Self(format!("Vessel_{}", slot.0))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for VesselId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for VesselId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Mmsi {
    pub fn new(value: u32) -> Result<Self, MmsiError> {
        ensure!(
            (MMSI_MIN..=MMSI_MAX).contains(&value),
            OutOfRangeSnafu { value }
        );
        Ok(Self(value))
    }

    pub fn into_inner(self) -> u32 {
        self.0
    }
}

impl FromStr for Mmsi {
    type Err = MmsiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.parse::<u32>().context(ParseSnafu { value: s })?;
        Self::new(value)
    }
}

impl TryFrom<u32> for Mmsi {
    type Error = MmsiError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Mmsi> for u32 {
    fn from(value: Mmsi) -> Self {
        value.0
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for Mmsi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Mmsi {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(de::Error::custom)
    }
}

impl AisStatus {
    pub fn is_active(self) -> bool {
        matches!(self, AisStatus::Active)
    }

    /// Moves to `next`, `Inactive -> Active` is rejected.
    pub fn transition(self, next: AisStatus) -> Result<AisStatus, AisStatusError> {
        match (self, next) {
            (AisStatus::Inactive, AisStatus::Active) => ReactivationSnafu.fail(),
            (_, next) => Ok(next),
        }
    }
}
