//! Level and tuning configuration.
//!
//! Everything here is read once at level load and is static for the session.
//! Each settings block implements `Default` with the game's shipped values, and
//! `#[serde(default)]` lets level files override only what they need.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    boundary::BoundsOptions,
    constants::{
        GRAVITY_Y_MPS2, LEVEL_TOP_COORD, MAX_STEP_DT, MIN_PLAYER_DISTANCE, PLAYER_MASS,
        PROJECTILE_SPEED_M_PER_MS, SPAWN_INSET, SPAWN_MAX_ATTEMPTS, WEAPON_AIM_NEAR, WEAPON_NEAR,
    },
    error::ConfigError,
    types::Coords,
    utils::coords_bounds,
};

/// Rigid body world tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    /// Gravity along +Y (m/s^2).
    pub gravity_y: f32,
    /// Longest accepted step (seconds).
    pub max_step_dt: f32,
    /// Player body mass (kg).
    pub player_mass: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gravity_y: GRAVITY_Y_MPS2,
            max_step_dt: MAX_STEP_DT,
            player_mass: PLAYER_MASS,
        }
    }
}

/// Spawn sampler tuning.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    pub min_player_distance: f32,
    /// Depth where the level's right edge flips from narrowing to widening.
    pub top_coord: f32,
    pub inset: f32,
    pub max_attempts: u32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            min_player_distance: MIN_PLAYER_DISTANCE,
            top_coord: LEVEL_TOP_COORD,
            inset: SPAWN_INSET,
            max_attempts: SPAWN_MAX_ATTEMPTS,
        }
    }
}

/// Weapon ray settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Ray near distance when not aiming (meters).
    pub near: f32,
    /// Ray near distance while aiming (meters).
    pub aim_near: f32,
    /// Meters travelled per millisecond; hit events are delayed by `distance / speed`.
    pub projectile_speed: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            near: WEAPON_NEAR,
            aim_near: WEAPON_AIM_NEAR,
            projectile_speed: PROJECTILE_SPEED_M_PER_MS,
        }
    }
}

/// Axis-aligned playable rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundRect {
    pub min: Coords,
    pub max: Coords,
}

/// Everything needed to build one level's physics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub perimeter: BoundsOptions,
    pub walkway: BoundsOptions,
    /// Playable rectangle; defaults to the perimeter's bounding box.
    #[serde(default)]
    pub ground: Option<GroundRect>,
    /// Polygon used for spawn sampling; defaults to the perimeter.
    #[serde(default)]
    pub spawn_bounds: Option<Vec<Coords>>,
    #[serde(default)]
    pub player_start: [f32; 3],
    #[serde(default)]
    pub world: WorldSettings,
    #[serde(default)]
    pub spawn: SpawnSettings,
    #[serde(default)]
    pub weapon: WeaponConfig,
}

impl LevelConfig {
    /// Parse and validate a level from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: LevelConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a level JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded level config from {}", path.display());
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.perimeter.borders.len() != self.walkway.borders.len() {
            return Err(ConfigError::Invalid(format!(
                "perimeter has {} points, walkway has {}",
                self.perimeter.borders.len(),
                self.walkway.borders.len()
            )));
        }
        if self.perimeter.borders.len() < 3 {
            return Err(ConfigError::Invalid(
                "perimeter needs at least 3 points".into(),
            ));
        }
        if !(self.world.max_step_dt > 0.0) {
            return Err(ConfigError::Invalid("max_step_dt must be positive".into()));
        }
        if !(self.weapon.projectile_speed > 0.0) {
            return Err(ConfigError::Invalid(
                "projectile_speed must be positive".into(),
            ));
        }
        if self.spawn.max_attempts == 0 {
            return Err(ConfigError::Invalid("spawn max_attempts must be non-zero".into()));
        }
        Ok(())
    }

    /// Playable rectangle, falling back to the perimeter's bounding box.
    pub fn ground_rect(&self) -> GroundRect {
        self.ground.unwrap_or_else(|| {
            let (min, max) = coords_bounds(&self.perimeter.borders).unwrap_or_default();
            GroundRect { min, max }
        })
    }

    /// Polygon used by the spawn sampler.
    pub fn spawn_polygon(&self) -> Vec<Coords> {
        self.spawn_bounds
            .clone()
            .unwrap_or_else(|| self.perimeter.borders.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_LEVEL: &str = r#"{
        "perimeter": { "borders": [[-10, -10], [10, -10], [10, 10], [-10, 10]], "height": 3.0 },
        "walkway":   { "borders": [[-12, -12], [12, -12], [12, 12], [-12, 12]], "height": 0.2, "y": -0.1 },
        "weapon": { "projectile_speed": 2.0 }
    }"#;

    #[test]
    fn defaults_fill_missing_sections() {
        let level = LevelConfig::from_json(SQUARE_LEVEL).unwrap();
        assert_eq!(level.world, WorldSettings::default());
        assert_eq!(level.spawn, SpawnSettings::default());
        assert_eq!(level.weapon.projectile_speed, 2.0);
        assert_eq!(level.weapon.near, WEAPON_NEAR);
        assert_eq!(level.perimeter.y, 0.0);
        assert_eq!(level.walkway.y, -0.1);
        assert_eq!(level.player_start, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn ground_and_spawn_polygon_fall_back_to_perimeter() {
        let level = LevelConfig::from_json(SQUARE_LEVEL).unwrap();
        let ground = level.ground_rect();
        assert_eq!(ground.min, [-10.0, -10.0]);
        assert_eq!(ground.max, [10.0, 10.0]);
        assert_eq!(level.spawn_polygon(), level.perimeter.borders);
    }

    #[test]
    fn mismatched_polygons_are_rejected() {
        let text = r#"{
            "perimeter": { "borders": [[0, 0], [1, 0], [1, 1]], "height": 1.0 },
            "walkway":   { "borders": [[0, 0], [1, 0], [1, 1], [0, 1]], "height": 1.0 }
        }"#;
        assert!(matches!(
            LevelConfig::from_json(text),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            LevelConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = LevelConfig::load("/definitely/not/here/level.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
