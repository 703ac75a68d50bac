use nalgebra::Vector2;

use crate::types::{Coords, Vec3};

/// Project a world position onto the XZ plane.
#[inline]
pub fn to_planar(v: &Vec3) -> Vector2<f32> {
    Vector2::new(v.x, v.z)
}

/// Planar (XZ) distance squared between two world positions (meters^2).
#[inline]
pub fn planar_distance_sq(a: &Vec3, b: &Vec3) -> f32 {
    (to_planar(b) - to_planar(a)).norm_squared()
}

/// Planar (XZ) distance between two world positions (meters).
#[inline]
pub fn planar_distance(a: &Vec3, b: &Vec3) -> f32 {
    planar_distance_sq(a, b).sqrt()
}

/// Axis-aligned bounds `(min, max)` of a set of planar coordinates.
///
/// Returns `None` for an empty set.
pub fn coords_bounds(points: &[Coords]) -> Option<(Coords, Coords)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(min, max), p| {
        (
            [min[0].min(p[0]), min[1].min(p[1])],
            [max[0].max(p[0]), max[1].max(p[1])],
        )
    }))
}
