use std::collections::HashMap;

use darkship_core::{BoundingBox, MMSI_MAX, MMSI_MIN, Mmsi, VesselId, VesselSlot};
use rand::Rng;
use snafu::ResultExt;
use tracing::debug;

use crate::{Result, error::error::MmsiSnafu};

/// Decides which vessel a detection belongs to.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&mut self, slot: VesselSlot, detection: &BoundingBox) -> VesselId;
}

/// Ties identity to the detection's position in the batch, reordered detections swap identities.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrdinalIdentityResolver;

/// Hands out one MMSI per vessel for the lifetime of a run. Entries are never removed.
#[derive(Debug, Default, Clone)]
pub struct MmsiRegistry {
    mmsis: HashMap<VesselId, Mmsi>,
}

impl IdentityResolver for OrdinalIdentityResolver {
    fn resolve(&mut self, slot: VesselSlot, _detection: &BoundingBox) -> VesselId {
        VesselId::from_slot(slot)
    }
}

impl MmsiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_create<R: Rng + ?Sized>(&mut self, id: &VesselId, rng: &mut R) -> Result<Mmsi> {
        if let Some(mmsi) = self.mmsis.get(id) {
            return Ok(*mmsi);
        }

        let mmsi = Mmsi::new(rng.random_range(MMSI_MIN..=MMSI_MAX))
            .context(MmsiSnafu { id: id.clone() })?;
        debug!(%id, %mmsi, "assigned mmsi");
        self.mmsis.insert(id.clone(), mmsi);
        Ok(mmsi)
    }

    pub fn get(&self, id: &VesselId) -> Option<Mmsi> {
        self.mmsis.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.mmsis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmsis.is_empty()
    }
}
