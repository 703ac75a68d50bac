use rapier3d::prelude::SharedShape;

use crate::{
    combat::BodyRegion,
    constants::VOLUMES_PER_CHARACTER,
    error::TargetError,
    types::{CharacterId, Iso},
};

/// A hit volume shape and its current world pose.
#[derive(Clone)]
pub struct HitShape {
    pub shape: SharedShape,
    pub pose: Iso,
}

impl HitShape {
    pub fn new(shape: SharedShape, pose: Iso) -> Self {
        Self { shape, pose }
    }

    /// Box from full sizes.
    pub fn cuboid(width: f32, height: f32, depth: f32, pose: Iso) -> Self {
        Self::new(SharedShape::cuboid(width * 0.5, height * 0.5, depth * 0.5), pose)
    }

    /// Y-aligned capsule; `length` is the cylinder section.
    pub fn capsule(radius: f32, length: f32, pose: Iso) -> Self {
        Self::new(SharedShape::capsule_y(length * 0.5, radius), pose)
    }
}

/// The six volumes registered for one character.
#[derive(Clone)]
pub struct CharacterVolumes {
    pub head: HitShape,
    pub torso: HitShape,
    /// Upper right, upper left, lower right, lower left.
    pub limbs: [HitShape; 4],
}

impl CharacterVolumes {
    fn into_ordered(self) -> [(BodyRegion, HitShape); VOLUMES_PER_CHARACTER] {
        let [a, b, c, d] = self.limbs;
        [
            (BodyRegion::Head, self.head),
            (BodyRegion::Torso, self.torso),
            (BodyRegion::Limb, a),
            (BodyRegion::Limb, b),
            (BodyRegion::Limb, c),
            (BodyRegion::Limb, d),
        ]
    }
}

/// One entry of a [`TargetSet`].
#[derive(Clone)]
pub struct HitVolume {
    pub owner: CharacterId,
    pub region: BodyRegion,
    pub shape: SharedShape,
    pub pose: Iso,
}

impl std::fmt::Debug for HitVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitVolume")
            .field("owner", &self.owner)
            .field("region", &self.region)
            .field("shape", &self.shape.shape_type())
            .field("pose", &self.pose)
            .finish()
    }
}

/// Ordered hit volumes, in runs of six per character.
///
/// Volumes are never reordered: attaching appends a full run and detaching
/// removes one, so `BodyRegion::from_index` agrees with every stored tag.
#[derive(Clone, Debug, Default)]
pub struct TargetSet {
    volumes: Vec<HitVolume>,
}

impl TargetSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(
        &mut self,
        owner: CharacterId,
        volumes: CharacterVolumes,
    ) -> Result<(), TargetError> {
        if self.run_start(owner).is_some() {
            return Err(TargetError::AlreadyAttached(owner));
        }
        self.volumes.extend(
            volumes
                .into_ordered()
                .into_iter()
                .map(|(region, hit)| HitVolume {
                    owner,
                    region,
                    shape: hit.shape,
                    pose: hit.pose,
                }),
        );
        log::debug!("attached hit volumes for {:?} ({} total)", owner, self.volumes.len());
        Ok(())
    }

    pub fn detach(&mut self, owner: CharacterId) -> Result<(), TargetError> {
        let start = self.run_start(owner).ok_or(TargetError::NotAttached(owner))?;
        self.volumes.drain(start..start + VOLUMES_PER_CHARACTER);
        log::debug!("detached hit volumes for {:?}", owner);
        Ok(())
    }

    /// Update the world pose of one of `owner`'s volumes (`slot` in `0..6`).
    pub fn set_pose(
        &mut self,
        owner: CharacterId,
        slot: usize,
        pose: Iso,
    ) -> Result<(), TargetError> {
        if slot >= VOLUMES_PER_CHARACTER {
            return Err(TargetError::SlotOutOfRange(slot));
        }
        let start = self.run_start(owner).ok_or(TargetError::NotAttached(owner))?;
        self.volumes[start + slot].pose = pose;
        Ok(())
    }

    fn run_start(&self, owner: CharacterId) -> Option<usize> {
        self.volumes
            .iter()
            .step_by(VOLUMES_PER_CHARACTER)
            .position(|v| v.owner == owner)
            .map(|run| run * VOLUMES_PER_CHARACTER)
    }

    pub fn volumes(&self) -> &[HitVolume] {
        &self.volumes
    }

    pub fn get(&self, index: usize) -> Option<&HitVolume> {
        self.volumes.get(index)
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn characters(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.volumes.iter().step_by(VOLUMES_PER_CHARACTER).map(|v| v.owner)
    }
}
