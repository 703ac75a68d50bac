use std::time::Duration;

use combat_physics::{
    BodyRegion, CharacterId, CharacterMesh, CharacterVolumes, CombatRaycaster, FireOutcome,
    HitQueue, HitShape, Iso, LevelConfig, MeshId, PhysicsWorld, SceneEvent, SceneObject,
    SegmentKind, SpawnSampler, StaticMaterial, Transform, Vec3, ViewRay, generate_bounds,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SQUARE_LEVEL: &str = r#"{
    "perimeter": { "borders": [[-10, -10], [10, -10], [10, 10], [-10, 10]], "height": 3.0 },
    "walkway":   { "borders": [[-12, -12], [12, -12], [12, 12], [-12, 12]], "height": 0.2 },
    "player_start": [0.0, 0.855, 0.0]
}"#;

fn player_mesh(start: [f32; 3]) -> CharacterMesh {
    CharacterMesh {
        id: MeshId(1),
        radius: 0.25,
        height: 1.2,
        transform: Transform::from_translation(Vec3::from(start)),
    }
}

fn enemy_volumes(x: f32, z: f32) -> CharacterVolumes {
    let at = |y: f32| Iso::translation(x, y, z);
    CharacterVolumes {
        head: HitShape::cuboid(0.2, 0.25, 0.25, at(1.7)),
        torso: HitShape::capsule(0.2, 0.5, at(1.2)),
        limbs: [
            HitShape::cuboid(0.15, 0.5, 0.15, at(0.7)),
            HitShape::cuboid(0.15, 0.5, 0.15, at(0.7)),
            HitShape::cuboid(0.1, 0.5, 0.1, at(0.25)),
            HitShape::cuboid(0.1, 0.5, 0.1, at(0.25)),
        ],
    }
}

#[test]
fn square_level_yields_four_walls_and_four_strips() {
    let level = LevelConfig::from_json(SQUARE_LEVEL).unwrap();
    let layout = generate_bounds(&level.perimeter, &level.walkway).unwrap();

    assert_eq!(layout.walls().count(), 4);
    assert_eq!(layout.floor_strips().count(), 4);
    assert!(layout.overflowed_edges.is_empty());
    for segment in &layout.segments {
        assert!(segment.size.iter().all(|s| *s >= 0.01));
    }
}

#[test]
fn level_build_step_fire_and_spawn() {
    let level = LevelConfig::from_json(SQUARE_LEVEL).unwrap();
    let mut world = PhysicsWorld::new(level.world);

    let layout = world.create_bounds(&level.perimeter, &level.walkway).unwrap();
    let ground = level.ground_rect();
    world.create_ground(ground.min, ground.max).unwrap();
    world.set_player(&player_mesh(level.player_start)).unwrap();

    assert_eq!(world.static_count(), layout.segments.len() + 1);
    assert_eq!(world.collider_count(), 1);

    let events = world.drain_scene_events();
    assert_eq!(events.len(), 10);
    let transparent = events
        .iter()
        .filter(|e| {
            matches!(
                e,
                SceneEvent::AddObject(SceneObject::StaticBox {
                    material: StaticMaterial::Transparent,
                    ..
                })
            )
        })
        .count();
    assert_eq!(transparent, 1);
    assert!(layout.segments.iter().all(|s| s.kind != SegmentKind::Ground));

    // Walk towards +x for one second.
    world.move_player(Vec3::new(2.0, 0.0, 0.0));
    for _ in 0..60 {
        world.step(1.0 / 60.0);
    }
    let position = world.player_position().unwrap();
    assert!(position.x > 1.5 && position.x < 2.5, "x = {}", position.x);
    assert!(position.y > 0.0, "player fell through the ground: y = {}", position.y);
    world.stop_player();

    // Spawn an enemy away from the player and shoot it.
    let mut sampler = SpawnSampler::new(
        level.spawn_polygon(),
        ground.min,
        ground.max,
        level.spawn,
    );
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let spawn = sampler.sample(&mut rng, &position);
    let [sx, sz] = spawn.coords;
    assert!((-9.5..=9.5).contains(&sx) && (-9.5..=9.5).contains(&sz));

    let mut raycaster = CombatRaycaster::new(level.weapon);
    raycaster
        .targets_mut()
        .attach(CharacterId(9), enemy_volumes(-8.0, -8.0))
        .unwrap();

    let eye = Vec3::new(position.x, 1.7, position.z);
    let aim = Vec3::new(-8.0, 1.7, -8.0) - eye;
    let outcome = raycaster.fire(&ViewRay::new(eye, aim), &eye);

    let FireOutcome::Hit { event, delay } = outcome else {
        panic!("expected a head shot, got {outcome:?}");
    };
    assert_eq!(event.character, CharacterId(9));
    assert_eq!(event.region, BodyRegion::Head);

    let mut queue = HitQueue::new();
    queue.schedule(event, delay);
    assert!(queue.advance(delay.saturating_sub(Duration::from_millis(1))).is_empty());
    assert_eq!(queue.advance(Duration::from_millis(1)), vec![event]);

    world.destroy();
    world.destroy();
    assert_eq!(world.collider_count(), 0);
}
