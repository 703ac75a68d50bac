//! Weapon targeting: ray casts against per-character hit volumes.
//!
//! - [`targets`]: the ordered set of hit volumes a weapon can strike.
//! - [`raycaster`]: near-plane ray classification and fire resolution.
//! - [`hits`]: frame-driven delay line releasing hit events after travel time.

pub mod hits;
pub mod raycaster;
pub mod targets;

pub use hits::{HitEvent, HitQueue};
pub use raycaster::{CombatRaycaster, FireOutcome, TargetHit, ViewRay};
pub use targets::{CharacterVolumes, HitShape, HitVolume, TargetSet};

use serde::{Deserialize, Serialize};

use crate::constants::VOLUMES_PER_CHARACTER;

/// Part of a character struck by a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRegion {
    Head,
    Torso,
    Limb,
}

impl BodyRegion {
    /// Region of the volume at `index` in a target set laid out in runs of
    /// head, torso, then four limbs.
    pub fn from_index(index: usize) -> Self {
        match index % VOLUMES_PER_CHARACTER {
            0 => BodyRegion::Head,
            1 => BodyRegion::Torso,
            _ => BodyRegion::Limb,
        }
    }
}
