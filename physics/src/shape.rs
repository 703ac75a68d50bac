//! Body and collider definitions plus the single factory that turns them into
//! rapier objects.
//!
//! Every body the world creates goes through [`rigid_body_from_def`] and
//! [`collider_from_def`]; call sites never construct rapier builders directly.

use rapier3d::prelude::*;

use crate::{
    error::PhysicsError,
    layers::CollisionLayer,
    types::{Quat, Vec3, is_finite_vec},
};

/// Supported collider shapes.
///
/// Keep this intentionally small: world geometry is boxes, characters are capsules.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeDef {
    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    /// Y-aligned capsule (meters). `half_height` is half the cylinder length.
    CapsuleY { radius: f32, half_height: f32 },
}

impl ShapeDef {
    /// Box from full `(width, height, depth)` sizes.
    pub fn cuboid_from_size(size: Vec3) -> Self {
        ShapeDef::Cuboid {
            half_extents: size * 0.5,
        }
    }

    fn validate(&self) -> Result<(), PhysicsError> {
        match *self {
            ShapeDef::Cuboid { half_extents } => {
                if !is_finite_vec(&half_extents) {
                    return Err(PhysicsError::NonFinite("cuboid half extents"));
                }
                if half_extents.iter().any(|h| *h <= 0.0) {
                    return Err(PhysicsError::InvalidShape("cuboid half extents must be positive"));
                }
            }
            ShapeDef::CapsuleY {
                radius,
                half_height,
            } => {
                if !radius.is_finite() || !half_height.is_finite() {
                    return Err(PhysicsError::NonFinite("capsule dimensions"));
                }
                if radius <= 0.0 || half_height < 0.0 {
                    return Err(PhysicsError::InvalidShape(
                        "capsule radius must be positive and half height non-negative",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// How a body participates in the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyKind {
    /// Zero mass, never moves under simulation forces.
    Static,
    /// Character body with the given mass (kilograms). Rotations are locked.
    Character { mass: f32 },
}

impl BodyKind {
    pub fn layer(&self) -> CollisionLayer {
        match self {
            BodyKind::Static => CollisionLayer::World,
            BodyKind::Character { .. } => CollisionLayer::Character,
        }
    }
}

/// Canonical definition of one body and its single attached collider.
#[derive(Clone, Copy, Debug)]
pub struct BodyDef {
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation (unit quaternion).
    pub rotation: Quat,
    pub shape: ShapeDef,
    pub kind: BodyKind,
}

impl BodyDef {
    /// Check the definition before anything is inserted into the simulation.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if !is_finite_vec(&self.translation) {
            return Err(PhysicsError::NonFinite("body translation"));
        }
        if !self.rotation.coords.iter().all(|c| c.is_finite()) {
            return Err(PhysicsError::NonFinite("body rotation"));
        }
        if let BodyKind::Character { mass } = self.kind {
            if !mass.is_finite() || mass <= 0.0 {
                return Err(PhysicsError::InvalidMass(mass));
            }
        }
        self.shape.validate()
    }
}

/// Build the rapier rigid body for a definition.
///
/// Damping is zero for every body; characters additionally lock all rotations
/// so facing stays under the rendering layer's control.
pub fn rigid_body_from_def(def: &BodyDef) -> RigidBody {
    let builder = match def.kind {
        BodyKind::Static => RigidBodyBuilder::fixed(),
        BodyKind::Character { .. } => RigidBodyBuilder::dynamic().lock_rotations().can_sleep(true),
    };

    builder
        .translation(def.translation)
        .rotation(def.rotation.scaled_axis())
        .linear_damping(0.0)
        .angular_damping(0.0)
        .build()
}

/// Build the rapier collider for a definition.
///
/// The collider is attached to its parent body with an identity local transform.
/// Friction and restitution are zero so characters never bounce or stick to walls.
pub fn collider_from_def(def: &BodyDef) -> Collider {
    let builder = match def.shape {
        ShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
        ShapeDef::CapsuleY {
            radius,
            half_height,
        } => ColliderBuilder::capsule_y(half_height, radius),
    };

    let builder = match def.kind {
        // Mass with inertia computed from the shape.
        BodyKind::Character { mass } => builder.mass(mass),
        BodyKind::Static => builder,
    };

    builder
        .friction(0.0)
        .friction_combine_rule(CoefficientCombineRule::Min)
        .restitution(0.0)
        .restitution_combine_rule(CoefficientCombineRule::Min)
        .collision_groups(def.kind.layer().groups())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character(mass: f32, radius: f32) -> BodyDef {
        BodyDef {
            translation: Vec3::new(0.0, 1.0, 0.0),
            rotation: Quat::identity(),
            shape: ShapeDef::CapsuleY {
                radius,
                half_height: 0.6,
            },
            kind: BodyKind::Character { mass },
        }
    }

    #[test]
    fn cuboid_from_size_halves_extents() {
        let shape = ShapeDef::cuboid_from_size(Vec3::new(2.0, 4.0, 0.02));
        assert_eq!(
            shape,
            ShapeDef::Cuboid {
                half_extents: Vec3::new(1.0, 2.0, 0.01)
            }
        );
    }

    #[test]
    fn validate_rejects_bad_mass_and_shape() {
        assert_eq!(character(0.0, 0.25).validate(), Err(PhysicsError::InvalidMass(0.0)));
        assert!(matches!(
            character(90.0, 0.0).validate(),
            Err(PhysicsError::InvalidShape(_))
        ));
        assert!(character(90.0, 0.25).validate().is_ok());

        let mut bad = character(90.0, 0.25);
        bad.translation.x = f32::NAN;
        assert!(matches!(bad.validate(), Err(PhysicsError::NonFinite(_))));
    }

    #[test]
    fn character_body_is_dynamic_with_locked_rotation() {
        let def = character(90.0, 0.25);
        let body = rigid_body_from_def(&def);
        assert!(body.is_dynamic());
        assert!(body.locked_axes().contains(LockedAxes::ROTATION_LOCKED));
        assert_eq!(body.linear_damping(), 0.0);

        let collider = collider_from_def(&def);
        assert!((collider.mass() - 90.0).abs() < 1.0e-3);
        assert_eq!(collider.friction(), 0.0);
        assert_eq!(collider.restitution(), 0.0);
        assert_eq!(collider.collision_groups().memberships.bits(), 128);
    }

    #[test]
    fn static_body_is_fixed_on_world_layer() {
        let def = BodyDef {
            translation: Vec3::zeros(),
            rotation: Quat::from_axis_angle(&Vec3::y_axis(), 0.5),
            shape: ShapeDef::cuboid_from_size(Vec3::new(1.0, 1.0, 1.0)),
            kind: BodyKind::Static,
        };
        assert!(rigid_body_from_def(&def).is_fixed());
        assert_eq!(collider_from_def(&def).collision_groups().memberships.bits(), 2);
    }
}
