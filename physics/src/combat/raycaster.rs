use std::time::Duration;

use rapier3d::parry::query::Ray;

use crate::{
    combat::{BodyRegion, HitEvent, TargetSet},
    config::WeaponConfig,
    types::{CharacterId, Vec3, is_finite_vec},
};

/// Ray from the camera through the view centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewRay {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl ViewRay {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }
}

/// Nearest volume struck by a ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TargetHit {
    /// Index into the target set.
    pub index: usize,
    pub owner: CharacterId,
    pub region: BodyRegion,
    /// Distance along the ray (meters).
    pub distance: f32,
    pub point: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FireOutcome {
    Miss,
    /// `event` should be delivered after `delay`.
    Hit { event: HitEvent, delay: Duration },
}

/// Per-weapon ray caster against a [`TargetSet`].
#[derive(Clone, Debug)]
pub struct CombatRaycaster {
    config: WeaponConfig,
    aiming: bool,
    targets: TargetSet,
}

impl CombatRaycaster {
    pub fn new(config: WeaponConfig) -> Self {
        Self {
            config,
            aiming: false,
            targets: TargetSet::new(),
        }
    }

    pub fn set_aiming(&mut self, aiming: bool) {
        self.aiming = aiming;
    }

    pub fn is_aiming(&self) -> bool {
        self.aiming
    }

    /// Hits closer than this are ignored.
    pub fn near(&self) -> f32 {
        if self.aiming {
            self.config.aim_near
        } else {
            self.config.near
        }
    }

    pub fn targets(&self) -> &TargetSet {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut TargetSet {
        &mut self.targets
    }

    /// Replace the whole target set (weapon equipped).
    pub fn set_targets(&mut self, targets: TargetSet) {
        self.targets = targets;
    }

    /// Nearest volume hit by `ray` at or beyond the near distance.
    pub fn target(&self, ray: &ViewRay) -> Option<TargetHit> {
        if !is_finite_vec(&ray.origin) {
            return None;
        }
        let direction = ray.direction.try_normalize(f32::EPSILON)?;
        let query = Ray::new(ray.origin.into(), direction);
        let near = self.near();

        let mut best: Option<(usize, f32)> = None;
        for (index, volume) in self.targets.volumes().iter().enumerate() {
            let Some(toi) = volume.shape.cast_ray(&volume.pose, &query, f32::MAX, true) else {
                continue;
            };
            if toi < near {
                continue;
            }
            // Strictly closer only, so ties keep the lowest index.
            if best.is_none_or(|(_, d)| toi < d) {
                best = Some((index, toi));
            }
        }

        let (index, distance) = best?;
        let volume = &self.targets.volumes()[index];
        debug_assert_eq!(volume.region, BodyRegion::from_index(index));

        Some(TargetHit {
            index,
            owner: volume.owner,
            region: volume.region,
            distance,
            point: ray.origin + direction * distance,
        })
    }

    /// Resolve a shot fired from `shooter` along `ray`.
    ///
    /// The hit event is delayed by the travel time from the shooter to the
    /// struck volume's centre, rounded to whole milliseconds.
    pub fn fire(&self, ray: &ViewRay, shooter: &Vec3) -> FireOutcome {
        let Some(hit) = self.target(ray) else {
            log::trace!("shot missed");
            return FireOutcome::Miss;
        };

        let centre = self.targets.volumes()[hit.index].pose.translation.vector;
        let distance = (centre - shooter).norm();
        let millis = (distance / self.config.projectile_speed).round().max(0.0);

        let event = HitEvent {
            character: hit.owner,
            region: hit.region,
            distance,
        };
        log::debug!(
            "hit {:?} {:?} at {:.2}m, delivering in {}ms",
            event.character,
            event.region,
            distance,
            millis
        );
        FireOutcome::Hit {
            event,
            delay: Duration::from_millis(millis as u64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::targets::tests::humanoid;

    fn forward_ray(y: f32) -> ViewRay {
        ViewRay::new(Vec3::new(0.0, y, 0.0), Vec3::new(0.0, 0.0, -1.0))
    }

    fn raycaster_with(characters: &[(u32, f32, f32)]) -> CombatRaycaster {
        let mut raycaster = CombatRaycaster::new(WeaponConfig::default());
        for &(id, x, z) in characters {
            raycaster
                .targets_mut()
                .attach(CharacterId(id), humanoid(x, z))
                .unwrap();
        }
        raycaster
    }

    #[test]
    fn empty_target_set_misses() {
        let raycaster = raycaster_with(&[]);
        assert_eq!(raycaster.target(&forward_ray(1.7)), None);
        assert_eq!(raycaster.fire(&forward_ray(1.7), &Vec3::zeros()), FireOutcome::Miss);
    }

    #[test]
    fn classifies_head_torso_and_limb() {
        let raycaster = raycaster_with(&[(1, 0.0, -10.0)]);

        let head = raycaster.target(&forward_ray(1.7)).unwrap();
        assert_eq!((head.index, head.region), (0, BodyRegion::Head));
        assert!((head.distance - 9.875).abs() < 1.0e-4);

        let torso = raycaster.target(&forward_ray(1.2)).unwrap();
        assert_eq!(torso.region, BodyRegion::Torso);

        let leg = raycaster.target(&ViewRay::new(
            Vec3::new(-0.1, 0.25, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        ));
        assert_eq!(leg.unwrap().region, BodyRegion::Limb);
    }

    #[test]
    fn second_character_uses_indices_six_to_eleven() {
        let raycaster = raycaster_with(&[(1, 0.0, -10.0), (2, 5.0, -10.0)]);
        let ray = ViewRay::new(Vec3::new(5.0, 1.7, 0.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = raycaster.target(&ray).unwrap();
        assert_eq!(hit.index, 6);
        assert_eq!(hit.owner, CharacterId(2));
        assert_eq!(hit.region, BodyRegion::Head);
    }

    #[test]
    fn nearest_volume_wins() {
        let raycaster = raycaster_with(&[(1, 0.0, -20.0), (2, 0.0, -10.0)]);
        let hit = raycaster.target(&forward_ray(1.7)).unwrap();
        assert_eq!(hit.owner, CharacterId(2));
        assert_eq!(hit.index, 6);
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        // Two characters occupying the same spot.
        let raycaster = raycaster_with(&[(1, 0.0, -10.0), (2, 0.0, -10.0)]);
        let hit = raycaster.target(&forward_ray(1.7)).unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.owner, CharacterId(1));
    }

    #[test]
    fn near_distance_depends_on_aiming() {
        // Head front face at 3.875m: inside the hip-fire near plane.
        let mut raycaster = raycaster_with(&[(1, 0.0, -4.0)]);
        assert!(!raycaster.is_aiming());
        assert_eq!(raycaster.target(&forward_ray(1.7)), None);

        raycaster.set_aiming(true);
        assert!(raycaster.is_aiming());
        assert_eq!(raycaster.near(), 3.0);
        let hit = raycaster.target(&forward_ray(1.7)).unwrap();
        assert_eq!(hit.region, BodyRegion::Head);
    }

    #[test]
    fn equipping_replaces_the_target_set() {
        let mut raycaster = raycaster_with(&[(1, 0.0, -20.0), (2, 3.0, -20.0)]);

        let mut targets = TargetSet::new();
        targets.attach(CharacterId(5), humanoid(0.0, -10.0)).unwrap();
        raycaster.set_targets(targets);

        assert_eq!(raycaster.targets().len(), 6);
        let hit = raycaster.target(&forward_ray(1.7)).unwrap();
        assert_eq!(hit.owner, CharacterId(5));
        assert_eq!(hit.index, 0);
        assert!((hit.distance - 9.875).abs() < 1.0e-4);
    }

    #[test]
    fn fire_delays_by_travel_time() {
        let raycaster = raycaster_with(&[(3, 0.0, -10.0)]);
        let shooter = Vec3::new(0.0, 1.7, 0.0);
        match raycaster.fire(&forward_ray(1.7), &shooter) {
            FireOutcome::Hit { event, delay } => {
                assert_eq!(event.character, CharacterId(3));
                assert_eq!(event.region, BodyRegion::Head);
                assert!((event.distance - 10.0).abs() < 1.0e-4);
                // 10m at 0.5 m/ms.
                assert_eq!(delay, Duration::from_millis(20));
            }
            FireOutcome::Miss => panic!("expected a hit"),
        }
    }

    #[test]
    fn degenerate_ray_misses() {
        let raycaster = raycaster_with(&[(1, 0.0, -10.0)]);
        let ray = ViewRay::new(Vec3::new(0.0, 1.7, 0.0), Vec3::zeros());
        assert_eq!(raycaster.target(&ray), None);
    }
}
