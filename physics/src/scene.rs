//! Notifications and proxy state shared with the rendering layer.
//!
//! The world never touches renderer objects. It queues [`SceneEvent`]s for
//! every body it creates and keeps one [`MeshProxy`] per registered character,
//! whose transform is written only by `PhysicsWorld::step`.

use crate::{
    boundary::SegmentKind,
    types::{MeshId, Transform, Vec3},
};

/// How the renderer should draw a static box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StaticMaterial {
    /// Debug-visible collider material.
    Collider,
    /// Depth-only; receives shadows but is otherwise invisible.
    Transparent,
}

impl From<SegmentKind> for StaticMaterial {
    fn from(kind: SegmentKind) -> Self {
        match kind {
            SegmentKind::Ground => StaticMaterial::Transparent,
            SegmentKind::Wall | SegmentKind::FloorStrip => StaticMaterial::Collider,
        }
    }
}

/// Something the rendering layer should add to the scene.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneObject {
    StaticBox {
        mesh: MeshId,
        size: Vec3,
        transform: Transform,
        material: StaticMaterial,
    },
    Character {
        mesh: MeshId,
        transform: Transform,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneEvent {
    AddObject(SceneObject),
}

/// The world's copy of a renderable character's pose.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshProxy {
    pub id: MeshId,
    pub transform: Transform,
}
