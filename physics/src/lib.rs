pub mod bitmask_flags;
pub mod boundary;
pub mod combat;
pub mod config;
pub mod constants;
pub mod error;
pub mod layers;
pub mod scene;
pub mod shape;
pub mod spawn;
pub mod types;
pub mod utils;
pub mod world;

// Downstream crates can reach rapier types without depending on it directly.
pub use rapier3d;

pub use boundary::{
    BoundSegment, BoundaryLayout, BoundsOptions, SegmentKind, border_overflow, edge_segment,
    generate_bounds, ground_segment,
};
pub use combat::{
    BodyRegion, CharacterVolumes, CombatRaycaster, FireOutcome, HitEvent, HitQueue, HitShape,
    HitVolume, TargetHit, TargetSet, ViewRay,
};
pub use config::{GroundRect, LevelConfig, SpawnSettings, WeaponConfig, WorldSettings};
pub use constants::{
    DEFAULT_FRAME_TIME, MIN_PLAYER_DISTANCE, MIN_SIZE, PLAYER_MASS, VOLUMES_PER_CHARACTER,
};
pub use error::{BoundaryError, ConfigError, PhysicsError, TargetError};
pub use layers::{CollisionLayer, LayerMask};
pub use scene::{MeshProxy, SceneEvent, SceneObject, StaticMaterial};
pub use shape::{BodyDef, BodyKind, ShapeDef, collider_from_def, rigid_body_from_def};
pub use spawn::{SpawnSample, SpawnSampler};
pub use types::{CharacterId, CharacterMesh, Coords, Iso, MeshId, Quat, Transform, Vec3};
pub use utils::{coords_bounds, planar_distance, planar_distance_sq, to_planar};
pub use world::{Collider, PhysicsWorld};
