/*!
Core data types and math aliases shared by the physics submodules.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- the boundary generator (level polygons in, box descriptors out)
- the rigid body world (bodies, proxies, scene notifications)
- the combat raycaster (hit volumes and their owners)
- the spawn sampler (planar level coordinates)

Conventions
- Units are meters, angles are radians.
- +Y is up. Planar coordinates are `(x, z)` pairs stored as `[x, z]`.
*/

use nalgebra as na;
use serde::{Deserialize, Serialize};

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// A planar `(x, z)` level coordinate.
pub type Coords = [f32; 2];

/// Stable identity of a renderable proxy (the mesh a body drives).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MeshId(pub u64);

/// Identity of a character. Hit events carry this, never a collider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CharacterId(pub u32);

/// A rigid transform (isometry) in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
        }
    }
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::identity(),
        }
    }

    /// Yaw-only transform (rotation about +Y).
    #[inline]
    pub fn from_yaw(translation: Vec3, yaw: f32) -> Self {
        Self {
            translation,
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), yaw),
        }
    }

    /// Convert to nalgebra `Isometry3` for use with rapier/parry queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }
}

/// Character geometry supplied by the rendering/asset layer.
///
/// `height` is the length of the capsule's cylindrical section (the caps add
/// `radius` on each end), so the full capsule height is `height + 2 * radius`.
#[derive(Clone, Copy, Debug)]
pub struct CharacterMesh {
    pub id: MeshId,
    pub radius: f32,
    pub height: f32,
    /// Initial world pose of the mesh.
    pub transform: Transform,
}

/// Returns true if every component of `v` is finite.
#[inline]
pub fn is_finite_vec(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
