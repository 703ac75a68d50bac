//! Rigid body world: owns the rapier simulation for one level.
//!
//! The world holds:
//! - fixed bodies for walls, floor strips and the ground slab,
//! - one dynamic capsule per registered character, keyed by [`MeshId`],
//! - a [`MeshProxy`] per character that `step` keeps in sync with its body,
//! - a queue of [`SceneEvent`]s for the rendering layer.
//!
//! All simulation state lives in an `Option` so `destroy` can drop it and be
//! called any number of times.

use std::collections::HashMap;

use rapier3d::prelude::*;

use crate::{
    boundary::{BoundSegment, BoundaryLayout, BoundsOptions, generate_bounds, ground_segment},
    config::WorldSettings,
    error::PhysicsError,
    scene::{MeshProxy, SceneEvent, SceneObject, StaticMaterial},
    shape::{BodyDef, BodyKind, ShapeDef, collider_from_def, rigid_body_from_def},
    types::{CharacterMesh, Coords, MeshId, Transform, Vec3, is_finite_vec},
};

/// Static boxes get ids from this base upward so they never collide with ids
/// handed out by the rendering layer for characters.
const STATIC_MESH_ID_BASE: u64 = 1 << 48;

/// A registered character body.
#[derive(Clone, Copy, Debug)]
pub struct Collider {
    pub mesh: MeshId,
    pub body: RigidBodyHandle,
}

/// Everything rapier needs to advance one frame.
struct Simulation {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    gravity: Vector<f32>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
}

impl Simulation {
    fn new(settings: &WorldSettings) -> Self {
        Self {
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            gravity: Vector::new(0.0, settings.gravity_y, 0.0),
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseBvh::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
        }
    }

    fn insert(&mut self, def: &BodyDef) -> RigidBodyHandle {
        let handle = self.bodies.insert(rigid_body_from_def(def));
        self.colliders
            .insert_with_parent(collider_from_def(def), handle, &mut self.bodies);
        handle
    }

    fn advance(&mut self, dt: f32) {
        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            &(),
            &(),
        );
    }
}

/// The level's rigid body world.
pub struct PhysicsWorld {
    sim: Option<Simulation>,
    settings: WorldSettings,
    colliders: HashMap<MeshId, Collider>,
    proxies: HashMap<MeshId, MeshProxy>,
    player: Option<MeshId>,
    paused: bool,
    events: Vec<SceneEvent>,
    next_static_id: u64,
    static_count: usize,
}

impl PhysicsWorld {
    pub fn new(settings: WorldSettings) -> Self {
        log::debug!(
            "physics world created (gravity {} m/s^2, max step {}s)",
            settings.gravity_y,
            settings.max_step_dt
        );
        Self {
            sim: Some(Simulation::new(&settings)),
            settings,
            colliders: HashMap::new(),
            proxies: HashMap::new(),
            player: None,
            paused: false,
            events: Vec::new(),
            next_static_id: STATIC_MESH_ID_BASE,
            static_count: 0,
        }
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    fn sim_mut(&mut self) -> Result<&mut Simulation, PhysicsError> {
        self.sim.as_mut().ok_or(PhysicsError::Destroyed)
    }

    /// Insert one generated segment as a fixed box.
    pub fn create_static_collider(
        &mut self,
        segment: &BoundSegment,
    ) -> Result<MeshId, PhysicsError> {
        self.create_static_box(
            segment.size,
            segment.position,
            segment.rotation_y,
            StaticMaterial::from(segment.kind),
        )
    }

    /// Fixed body plus cuboid collider of full `size`, rotated about +Y.
    ///
    /// Queues an `AddObject` so the renderer can draw the box.
    pub fn create_static_box(
        &mut self,
        size: Vec3,
        position: Vec3,
        rotation_y: f32,
        material: StaticMaterial,
    ) -> Result<MeshId, PhysicsError> {
        if !rotation_y.is_finite() {
            return Err(PhysicsError::NonFinite("static box rotation"));
        }
        let transform = Transform::from_yaw(position, rotation_y);
        let def = BodyDef {
            translation: transform.translation,
            rotation: transform.rotation,
            shape: ShapeDef::cuboid_from_size(size),
            kind: BodyKind::Static,
        };
        def.validate()?;

        self.sim_mut()?.insert(&def);

        let mesh = MeshId(self.next_static_id);
        self.next_static_id += 1;
        self.static_count += 1;

        self.events.push(SceneEvent::AddObject(SceneObject::StaticBox {
            mesh,
            size,
            transform,
            material,
        }));
        log::trace!("static box {:?} size {:?} at {:?}", mesh, size, position);
        Ok(mesh)
    }

    /// Dynamic capsule body for a character mesh.
    ///
    /// The capsule takes the mesh's radius and cylinder length; rotations are
    /// locked and translation is free on all axes.
    pub fn create_character_collider(
        &mut self,
        mesh: &CharacterMesh,
        mass: f32,
    ) -> Result<MeshId, PhysicsError> {
        if self.colliders.contains_key(&mesh.id) {
            return Err(PhysicsError::DuplicateMesh(mesh.id));
        }
        let def = BodyDef {
            translation: mesh.transform.translation,
            rotation: mesh.transform.rotation,
            shape: ShapeDef::CapsuleY {
                radius: mesh.radius,
                half_height: mesh.height * 0.5,
            },
            kind: BodyKind::Character { mass },
        };
        def.validate()?;

        let body = self.sim_mut()?.insert(&def);

        self.colliders.insert(mesh.id, Collider { mesh: mesh.id, body });
        self.proxies.insert(
            mesh.id,
            MeshProxy {
                id: mesh.id,
                transform: mesh.transform,
            },
        );
        self.events.push(SceneEvent::AddObject(SceneObject::Character {
            mesh: mesh.id,
            transform: mesh.transform,
        }));
        log::debug!("character collider {:?} (mass {} kg)", mesh.id, mass);
        Ok(mesh.id)
    }

    /// Register the player's character body and put it to sleep until it moves.
    pub fn set_player(&mut self, mesh: &CharacterMesh) -> Result<(), PhysicsError> {
        let id = self.create_character_collider(mesh, self.settings.player_mass)?;
        self.player = Some(id);
        if let Some(body) = self.player_body_mut() {
            body.sleep();
        }
        Ok(())
    }

    fn player_body_mut(&mut self) -> Option<&mut RigidBody> {
        let handle = self.colliders.get(&self.player?)?.body;
        self.sim.as_mut()?.bodies.get_mut(handle)
    }

    fn player_body(&self) -> Option<&RigidBody> {
        let handle = self.colliders.get(&self.player?)?.body;
        self.sim.as_ref()?.bodies.get(handle)
    }

    /// Drive the player with `velocity` (m/s) and wake its body.
    pub fn move_player(&mut self, velocity: Vec3) {
        if !is_finite_vec(&velocity) {
            log::warn!("ignoring non-finite player velocity {:?}", velocity);
            return;
        }
        match self.player_body_mut() {
            Some(body) => {
                body.set_linvel(velocity, true);
                body.wake_up(true);
            }
            None => log::debug!("move_player without a player body"),
        }
    }

    /// Zero the player's velocity and put its body to sleep.
    pub fn stop_player(&mut self) {
        match self.player_body_mut() {
            Some(body) => {
                body.set_linvel(Vector::zeros(), false);
                body.sleep();
            }
            None => log::debug!("stop_player without a player body"),
        }
    }

    /// Pausing sleeps the player and freezes `step`; resuming wakes it.
    pub fn set_paused(&mut self, paused: bool) {
        match self.player_body_mut() {
            Some(body) if paused => body.sleep(),
            Some(body) => body.wake_up(true),
            None => log::debug!("set_paused({paused}) without a player body"),
        }
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advance the simulation by `dt` seconds and copy every character body's
    /// pose onto its proxy.
    ///
    /// `dt` is clamped to `[0, max_step_dt]`. Does nothing while paused or
    /// after `destroy`.
    pub fn step(&mut self, dt: f32) {
        if self.paused {
            return;
        }
        let Some(sim) = self.sim.as_mut() else {
            return;
        };

        let dt = if dt.is_finite() {
            dt.min(self.settings.max_step_dt).max(0.0)
        } else {
            0.0
        };
        if dt > 0.0 {
            sim.advance(dt);
        }

        for (mesh, collider) in &self.colliders {
            let Some(body) = sim.bodies.get(collider.body) else {
                log::trace!("no body for {:?}, skipping sync", mesh);
                continue;
            };
            if let Some(proxy) = self.proxies.get_mut(mesh) {
                proxy.transform = Transform::new(*body.translation(), *body.rotation());
            }
        }
    }

    /// Drop all simulation state. Safe to call more than once.
    pub fn destroy(&mut self) {
        if self.sim.take().is_some() {
            log::debug!(
                "physics world destroyed ({} characters, {} statics)",
                self.colliders.len(),
                self.static_count
            );
        }
        self.colliders.clear();
        self.proxies.clear();
        self.events.clear();
        self.player = None;
        self.static_count = 0;
        self.paused = true;
    }

    pub fn is_destroyed(&self) -> bool {
        self.sim.is_none()
    }

    /// Generate walls and floor strips from the level polygons and insert them.
    pub fn create_bounds(
        &mut self,
        perimeter: &BoundsOptions,
        walkway: &BoundsOptions,
    ) -> Result<BoundaryLayout, PhysicsError> {
        if self.sim.is_none() {
            return Err(PhysicsError::Destroyed);
        }
        let layout = generate_bounds(perimeter, walkway)?;
        for segment in &layout.segments {
            self.create_static_collider(segment)?;
        }
        Ok(layout)
    }

    /// Thin transparent slab covering the rectangle `min..max`.
    pub fn create_ground(&mut self, min: Coords, max: Coords) -> Result<MeshId, PhysicsError> {
        self.create_static_collider(&ground_segment(min, max))
    }

    pub fn player(&self) -> Option<MeshId> {
        self.player
    }

    pub fn player_position(&self) -> Option<Vec3> {
        self.player_body().map(|body| *body.translation())
    }

    pub fn is_player_sleeping(&self) -> bool {
        self.player_body().is_some_and(|body| body.is_sleeping())
    }

    pub fn proxy(&self, mesh: MeshId) -> Option<&MeshProxy> {
        self.proxies.get(&mesh)
    }

    pub fn proxies(&self) -> impl Iterator<Item = &MeshProxy> {
        self.proxies.values()
    }

    pub fn collider(&self, mesh: MeshId) -> Option<&Collider> {
        self.colliders.get(&mesh)
    }

    /// Registered character bodies.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    pub fn static_count(&self) -> usize {
        self.static_count
    }

    /// Take every queued scene notification, oldest first.
    pub fn drain_scene_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }
}
