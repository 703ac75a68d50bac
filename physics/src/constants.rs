use std::time::Duration;

/// Gravity along +Y in meters per second squared (negative = down).
pub const GRAVITY_Y_MPS2: f32 = -9.81;

/// Smallest size any generated box collider may have along an axis (meters).
///
/// Zero-thickness cuboids are degenerate for the solver; wall thin axes and the
/// ground slab use this thickness.
pub const MIN_SIZE: f32 = 0.01;

/// Mass assigned to the player's character body (kilograms).
pub const PLAYER_MASS: f32 = 90.0;

/// Largest simulation step accepted by `PhysicsWorld::step` (seconds).
///
/// Frames longer than this (debugger stalls, tab switches) are clamped to avoid
/// tunneling through thin walls.
pub const MAX_STEP_DT: f32 = 0.1;

/// Floor strips on diagonal walkway edges are stretched by this factor to close
/// corner gaps.
pub const DIAGONAL_LENGTH_SCALE: f32 = 1.1;

/// Fraction of the half wall-to-walkway distance covered by a floor strip.
pub const FLOOR_STRIP_FILL: f32 = 0.95;

/// Number of hit volumes registered per character (head, torso, 4 limbs).
pub const VOLUMES_PER_CHARACTER: usize = 6;

/// Ray near distance while the weapon is not aimed (meters).
pub const WEAPON_NEAR: f32 = 4.5;

/// Ray near distance while aiming down sights (meters).
pub const WEAPON_AIM_NEAR: f32 = 3.0;

/// Projectile speed used to delay hit events (meters per millisecond).
pub const PROJECTILE_SPEED_M_PER_MS: f32 = 0.5;

/// Minimum distance a spawn point keeps from the player on at least one axis (meters).
pub const MIN_PLAYER_DISTANCE: f32 = 10.0;

/// Depth above which the level widens; spawn intervals switch bracket choice here.
pub const LEVEL_TOP_COORD: f32 = 37.0;

/// Inset applied to sampled spawn intervals so points don't touch the walls (meters).
pub const SPAWN_INSET: f32 = 0.5;

/// Retry bound for each spawn sampling loop.
pub const SPAWN_MAX_ATTEMPTS: u32 = 64;

/// Fixed frame used by the harness when no frame time is configured.
pub const DEFAULT_FRAME_TIME: Duration = Duration::from_micros(16_667);
