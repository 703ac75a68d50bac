/*!
Spawn sampler: random points inside the level polygon, away from the player.

This is not a point-in-polygon test. It assumes a single closed polygon that is
roughly star-shaped around the level centre and recovers the horizontal extent
at a sampled depth from the polygon's own vertices:

1. Rotate the vertex list left by one (round-robin, so repeated calls don't
   keep favouring the same ordering).
2. Split vertices into the right side (`x < 0`) and left side (`x > 0`).
3. Sample a depth `z` until it is at least `min_player_distance` from the
   player's depth, or lies at or above `top_coord`.
4. On each side find the vertices bracketing `z` from below and above.
5. Build the `x` interval from those brackets, inset from the walls. Below
   `top_coord` the left bound takes the nearer bracket, above it the farther.
6. Sample `x` in that interval until the point is clear of the player on at
   least one axis.

Both loops are bounded by `max_attempts`. On exhaustion the candidate farthest
from the player on that axis is used and the sample is flagged.
*/

use rand::Rng;

use crate::{
    config::SpawnSettings,
    types::{Coords, Vec3},
};

/// An accepted spawn point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnSample {
    pub coords: Coords,
    /// Draws used across both loops.
    pub attempts: u32,
    /// False when a retry loop gave up and fell back to its best candidate.
    pub clear_of_player: bool,
}

#[derive(Clone, Copy, Debug, Default)]
struct Bracket {
    below: Option<Coords>,
    above: Option<Coords>,
}

impl Bracket {
    /// Tightest vertices strictly below and above depth `z`.
    fn scan<'a>(points: impl Iterator<Item = &'a Coords>, z: f32) -> Self {
        let mut bracket = Bracket::default();
        for p in points {
            if p[1] < z && bracket.below.is_none_or(|b| p[1] > b[1]) {
                bracket.below = Some(*p);
            }
            if p[1] > z && bracket.above.is_none_or(|a| p[1] < a[1]) {
                bracket.above = Some(*p);
            }
        }
        bracket
    }

    fn xs(&self) -> impl Iterator<Item = f32> {
        self.below.into_iter().chain(self.above).map(|p| p[0])
    }
}

#[derive(Clone, Debug)]
pub struct SpawnSampler {
    bounds: Vec<Coords>,
    min: Coords,
    max: Coords,
    settings: SpawnSettings,
}

impl SpawnSampler {
    /// `bounds` is the level polygon; `min`/`max` its overall rectangle.
    pub fn new(bounds: Vec<Coords>, min: Coords, max: Coords, settings: SpawnSettings) -> Self {
        Self {
            bounds,
            min,
            max,
            settings,
        }
    }

    pub fn bounds(&self) -> &[Coords] {
        &self.bounds
    }

    pub fn settings(&self) -> &SpawnSettings {
        &self.settings
    }

    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R, player: &Vec3) -> SpawnSample {
        if !self.bounds.is_empty() {
            self.bounds.rotate_left(1);
        }

        let SpawnSettings {
            min_player_distance,
            top_coord,
            inset,
            max_attempts,
        } = self.settings;

        let mut attempts = 0;

        let (z, z_clear) = retry(max_attempts, &mut attempts, || {
            let z = uniform(rng, self.min[1] + inset, self.max[1] - inset);
            let gap = (z - player.z).abs();
            (z, gap, z >= top_coord || gap >= min_player_distance)
        });
        let too_close_z = (z - player.z).abs() < min_player_distance;

        let right = Bracket::scan(self.bounds.iter().filter(|p| p[0] < 0.0), z);
        let left = Bracket::scan(self.bounds.iter().filter(|p| p[0] > 0.0), z);

        let lo_limit = self.min[0] + inset;
        let hi_limit = self.max[0] - inset;

        let lo = right
            .xs()
            .reduce(f32::max)
            .map_or(lo_limit, |x| x + inset)
            .max(lo_limit);
        let hi = if z < top_coord {
            left.xs().reduce(f32::min)
        } else {
            left.xs().reduce(f32::max)
        }
        .map_or(hi_limit, |x| x - inset)
        .min(hi_limit);

        let (x, x_clear) = retry(max_attempts, &mut attempts, || {
            let x = uniform(rng, lo, hi);
            let gap = (x - player.x).abs();
            (x, gap, gap >= min_player_distance || !too_close_z)
        });

        let clear_of_player = z_clear && x_clear;
        if !clear_of_player {
            log::warn!(
                "spawn sampling gave up after {attempts} draws, using best candidate ({x:.2}, {z:.2})"
            );
        }

        SpawnSample {
            coords: [x, z],
            attempts,
            clear_of_player,
        }
    }
}

/// Draw until `draw` reports success or `max_attempts` is reached.
///
/// `draw` returns `(value, distance from player, accepted)`. On exhaustion the
/// value with the largest distance is returned along with `false`.
fn retry(
    max_attempts: u32,
    attempts: &mut u32,
    mut draw: impl FnMut() -> (f32, f32, bool),
) -> (f32, bool) {
    let mut best = (f32::NAN, f32::NEG_INFINITY);
    for _ in 0..max_attempts.max(1) {
        *attempts += 1;
        let (value, gap, accepted) = draw();
        if accepted {
            return (value, true);
        }
        if gap > best.1 {
            best = (value, gap);
        }
    }
    (best.0, false)
}

/// Uniform draw in `[lo, hi]`; collapses to the midpoint of an inverted range.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.gen_range(lo..=hi)
    } else {
        (lo + hi) * 0.5
    }
}
