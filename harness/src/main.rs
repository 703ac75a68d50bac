//! Headless driver for the combat physics crate.
//!
//! Loads a level, spawns a few enemies away from the player, walks the player
//! around the level and fires at the nearest enemy at a fixed interval, logging
//! every delivered hit.
//!
//! Usage: `combat_harness [LEVEL_JSON] [FRAMES]`

mod logging;

use std::{env, path::PathBuf};

use anyhow::Context;
use combat_physics::{
    CharacterId, CharacterMesh, CharacterVolumes, CombatRaycaster, DEFAULT_FRAME_TIME,
    FireOutcome, HitQueue, HitShape, Iso, LevelConfig, MeshId, PhysicsWorld, SceneEvent,
    SceneObject, SpawnSampler, Transform, VOLUMES_PER_CHARACTER, Vec3, ViewRay,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

const DEFAULT_LEVEL: &str = include_str!("../levels/square.json");
const DEFAULT_FRAMES: u32 = 600;

const ENEMY_COUNT: u32 = 3;
const ENEMY_MASS: f32 = 70.0;
const ENEMY_MESH_BASE: u64 = 100;
const CAPSULE_RADIUS: f32 = 0.25;
const CAPSULE_LENGTH: f32 = 1.2;
/// Capsule centre height when resting on the ground.
const STANDING_Y: f32 = 0.855;
/// Camera height above the capsule centre.
const EYE_OFFSET_Y: f32 = 0.85;

const WALK_SPEED: f32 = 3.0;
const TURN_INTERVAL: u32 = 120;
const FIRE_INTERVAL: u32 = 30;
const RNG_SEED: u64 = 0x5eed;

/// Local offsets of head, torso and the four limb volumes from the body centre.
const VOLUME_OFFSETS: [[f32; 3]; VOLUMES_PER_CHARACTER] = [
    [0.0, 0.85, 0.0],
    [0.0, 0.35, 0.0],
    [-0.1, -0.15, 0.0],
    [0.1, -0.15, 0.0],
    [-0.1, -0.6, 0.0],
    [0.1, -0.6, 0.0],
];

struct Args {
    level: Option<PathBuf>,
    frames: u32,
}

impl Args {
    fn parse() -> anyhow::Result<Self> {
        let mut args = env::args().skip(1);
        let level = args.next().map(PathBuf::from);
        let frames = match args.next() {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("frame count must be a positive integer, got {raw:?}"))?,
            None => DEFAULT_FRAMES,
        };
        Ok(Self { level, frames })
    }
}

struct Enemy {
    id: CharacterId,
    mesh: MeshId,
}

fn character_mesh(id: MeshId, position: Vec3) -> CharacterMesh {
    CharacterMesh {
        id,
        radius: CAPSULE_RADIUS,
        height: CAPSULE_LENGTH,
        transform: Transform::from_translation(position),
    }
}

fn player_mesh(level: &LevelConfig) -> CharacterMesh {
    let [x, y, z] = level.player_start;
    character_mesh(MeshId(1), Vec3::new(x, y, z))
}

/// World pose of volume `slot` on a character body.
fn volume_pose(body: &Transform, slot: usize) -> Iso {
    let [x, y, z] = VOLUME_OFFSETS[slot];
    body.iso() * Iso::translation(x, y, z)
}

fn enemy_volumes(body: &Transform) -> CharacterVolumes {
    CharacterVolumes {
        head: HitShape::cuboid(0.2, 0.25, 0.25, volume_pose(body, 0)),
        torso: HitShape::capsule(0.2, 0.5, volume_pose(body, 1)),
        limbs: [
            HitShape::cuboid(0.15, 0.5, 0.15, volume_pose(body, 2)),
            HitShape::cuboid(0.15, 0.5, 0.15, volume_pose(body, 3)),
            HitShape::cuboid(0.1, 0.5, 0.1, volume_pose(body, 4)),
            HitShape::cuboid(0.1, 0.5, 0.1, volume_pose(body, 5)),
        ],
    }
}

fn walk_direction(frame: u32) -> Vec3 {
    match (frame / TURN_INTERVAL) % 4 {
        0 => Vec3::new(1.0, 0.0, 0.0),
        1 => Vec3::new(0.0, 0.0, 1.0),
        2 => Vec3::new(-1.0, 0.0, 0.0),
        _ => Vec3::new(0.0, 0.0, -1.0),
    }
}

fn load_level(args: &Args) -> anyhow::Result<LevelConfig> {
    match &args.level {
        Some(path) => LevelConfig::load(path)
            .with_context(|| format!("failed to load level {}", path.display())),
        None => LevelConfig::from_json(DEFAULT_LEVEL).context("built-in level is invalid"),
    }
}

fn main() -> anyhow::Result<()> {
    logging::init_logging()?;
    let args = Args::parse()?;
    let level = load_level(&args)?;

    let mut world = PhysicsWorld::new(level.world);
    let layout = world
        .create_bounds(&level.perimeter, &level.walkway)
        .context("failed to build level bounds")?;
    let ground = level.ground_rect();
    world.create_ground(ground.min, ground.max)?;

    world.set_player(&player_mesh(&level))?;
    info!(
        walls = layout.walls().count(),
        floor_strips = layout.floor_strips().count(),
        overflowed = layout.overflowed_edges.len(),
        "level built"
    );

    let mut rng = ChaCha8Rng::seed_from_u64(RNG_SEED);
    let mut sampler = SpawnSampler::new(level.spawn_polygon(), ground.min, ground.max, level.spawn);
    let mut raycaster = CombatRaycaster::new(level.weapon);
    let mut enemies = Vec::new();

    let player_start = world.player_position().context("player body missing")?;
    for i in 0..ENEMY_COUNT {
        let sample = sampler.sample(&mut rng, &player_start);
        if !sample.clear_of_player {
            warn!(?sample, "enemy spawned close to the player");
        }
        let [x, z] = sample.coords;
        let enemy = Enemy {
            id: CharacterId(i),
            mesh: MeshId(ENEMY_MESH_BASE + u64::from(i)),
        };
        let mesh = character_mesh(enemy.mesh, Vec3::new(x, STANDING_Y, z));
        world.create_character_collider(&mesh, ENEMY_MASS)?;
        raycaster
            .targets_mut()
            .attach(enemy.id, enemy_volumes(&mesh.transform))?;
        debug!(id = enemy.id.0, x, z, attempts = sample.attempts, "enemy spawned");
        enemies.push(enemy);
    }

    for event in world.drain_scene_events() {
        match event {
            SceneEvent::AddObject(SceneObject::StaticBox { mesh, size, material, .. }) => {
                debug!(mesh = mesh.0, ?size, ?material, "add static box")
            }
            SceneEvent::AddObject(SceneObject::Character { mesh, .. }) => {
                debug!(mesh = mesh.0, "add character")
            }
        }
    }

    let dt = DEFAULT_FRAME_TIME;
    let mut hits = HitQueue::new();
    let mut delivered = 0;

    for frame in 0..args.frames {
        world.move_player(walk_direction(frame) * WALK_SPEED);
        world.step(dt.as_secs_f32());

        for enemy in &enemies {
            let Some(proxy) = world.proxy(enemy.mesh) else {
                continue;
            };
            let body = proxy.transform;
            for slot in 0..VOLUMES_PER_CHARACTER {
                raycaster
                    .targets_mut()
                    .set_pose(enemy.id, slot, volume_pose(&body, slot))?;
            }
        }

        if frame % FIRE_INTERVAL == 0 {
            let player = world.player_position().context("player body missing")?;
            let eye = player + Vec3::new(0.0, EYE_OFFSET_Y, 0.0);
            raycaster.set_aiming((frame / FIRE_INTERVAL) % 2 == 1);

            let nearest = raycaster
                .targets()
                .volumes()
                .iter()
                .step_by(VOLUMES_PER_CHARACTER)
                .map(|head| head.pose.translation.vector)
                .min_by(|a, b| (a - eye).norm().total_cmp(&(b - eye).norm()));

            if let Some(head) = nearest {
                match raycaster.fire(&ViewRay::new(eye, head - eye), &eye) {
                    FireOutcome::Hit { event, delay } => hits.schedule(event, delay),
                    FireOutcome::Miss => debug!(frame, "shot missed"),
                }
            }
        }

        for event in hits.advance(dt) {
            delivered += 1;
            info!(
                frame,
                character = event.character.0,
                region = ?event.region,
                distance = event.distance,
                "hit delivered"
            );
        }
    }

    world.stop_player();
    world.set_paused(true);
    info!(
        frames = args.frames,
        delivered,
        pending = hits.len(),
        player = ?world.player_position(),
        "run finished"
    );
    world.destroy();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_spawns_at_the_configured_start() {
        let mut level = LevelConfig::from_json(DEFAULT_LEVEL).unwrap();
        assert_eq!(player_mesh(&level).transform.translation, Vec3::new(0.0, STANDING_Y, 0.0));

        level.player_start = [3.0, 2.5, -4.0];
        let mesh = player_mesh(&level);
        assert_eq!(mesh.id, MeshId(1));
        assert_eq!(mesh.transform.translation, Vec3::new(3.0, 2.5, -4.0));
    }
}
