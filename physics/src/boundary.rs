/*!
Boundary generator: level polygons to oriented box colliders.

Input is two index-aligned closed polygons in the XZ plane:
- the perimeter, which becomes a ring of wall boxes, and
- the walkway (sidewalk) around it, which is never collided with directly but
  positions the floor strips that close the gap between wall and walkway.

Each edge `i` runs from point `i` to point `i + 1`, wrapping to point 0.

# Edge boxes
- Axis-aligned edges produce a box whose long axis is the edge and whose thin
  axis is [`MIN_SIZE`].
- Diagonal edges are rotated about +Y. The rotation comes from `atan` of the
  smaller/larger extent ratio, picking the branch by the dominant axis, so
  near-axis edges stay near their axis. The dominant axis takes the full edge
  length and the other axis collapses to [`MIN_SIZE`].
- No generated size is below [`MIN_SIZE`]; rapier cuboids with zero extent are
  degenerate.

# Floor strips
For every edge whose walkway box does not overflow the wall box (walkway centre
farther out on both axes), a strip is placed half-way between the two centres.
*/

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::{
    constants::{DIAGONAL_LENGTH_SCALE, FLOOR_STRIP_FILL, MIN_SIZE},
    error::BoundaryError,
    types::{Coords, Vec3},
    utils::planar_distance,
};

/// One closed boundary polygon plus the height and vertical offset of the boxes
/// built from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundsOptions {
    pub borders: Vec<Coords>,
    pub height: f32,
    #[serde(default)]
    pub y: f32,
}

impl BoundsOptions {
    pub fn new(borders: Vec<Coords>, height: f32, y: f32) -> Self {
        Self { borders, height, y }
    }

    fn validate(&self) -> Result<(), BoundaryError> {
        if self.borders.len() < 3 {
            return Err(BoundaryError::TooFewPoints(self.borders.len()));
        }
        if let Some(index) = self
            .borders
            .iter()
            .position(|p| !p[0].is_finite() || !p[1].is_finite())
        {
            return Err(BoundaryError::NonFinitePoint { index });
        }
        Ok(())
    }

    /// Edge `i` as `(start, end)`, wrapping the last point back to the first.
    fn edge(&self, i: usize) -> (Coords, Coords) {
        let n = self.borders.len();
        (self.borders[i], self.borders[(i + 1) % n])
    }
}

/// What a generated box is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Wall,
    FloorStrip,
    Ground,
}

/// An oriented box collider descriptor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundSegment {
    pub kind: SegmentKind,
    /// Box centre in world space.
    pub position: Vec3,
    /// Full `(width, height, depth)` before rotation.
    pub size: Vec3,
    /// Rotation about +Y (radians).
    pub rotation_y: f32,
}

/// Output of [`generate_bounds`].
#[derive(Clone, Debug, Default)]
pub struct BoundaryLayout {
    /// Walls and floor strips, in edge order (each wall followed by its strip).
    pub segments: Vec<BoundSegment>,
    /// Edge indices whose floor strip was skipped by the overflow guard.
    pub overflowed_edges: Vec<usize>,
}

impl BoundaryLayout {
    pub fn walls(&self) -> impl Iterator<Item = &BoundSegment> {
        self.segments.iter().filter(|s| s.kind == SegmentKind::Wall)
    }

    pub fn floor_strips(&self) -> impl Iterator<Item = &BoundSegment> {
        self.segments
            .iter()
            .filter(|s| s.kind == SegmentKind::FloorStrip)
    }
}

/// Build the box for a single polygon edge.
pub fn edge_segment(
    start: Coords,
    end: Coords,
    height: f32,
    y: f32,
    kind: SegmentKind,
) -> BoundSegment {
    let dx = end[0] - start[0];
    let dz = end[1] - start[1];

    let position = Vec3::new(start[0] + dx * 0.5, y, start[1] + dz * 0.5);

    let mut width = dx.abs();
    let mut depth = dz.abs();
    let mut rotation_y = 0.0;

    if width > 0.0 && depth > 0.0 {
        let deeper = depth > width;
        let length = width.hypot(depth);

        rotation_y = if deeper {
            FRAC_PI_2 + (depth / width).atan()
        } else {
            FRAC_PI_2 - (width / depth).atan()
        };

        // Both branches lay the box along (+x, -z); edges running along (+x, +z) mirror.
        if dx * dz > 0.0 {
            rotation_y = -rotation_y;
        }

        if deeper {
            depth = length;
        } else {
            width = length;
        }
    }

    if width < depth {
        width = MIN_SIZE;
    }
    if depth < width {
        depth = MIN_SIZE;
    }

    BoundSegment {
        kind,
        position,
        size: Vec3::new(width.max(MIN_SIZE), height.max(MIN_SIZE), depth.max(MIN_SIZE)),
        rotation_y,
    }
}

/// True when the walkway box lies farther out than the wall box on both axes.
///
/// Such edges (typically diagonal corners) would get a strip outside the
/// playable area, so none is generated.
pub fn border_overflow(wall: &Vec3, walkway: &Vec3) -> bool {
    walkway.x.abs() > wall.x.abs() && walkway.z.abs() > wall.z.abs()
}

/// Floor strip connecting a wall box to its walkway box.
fn floor_strip(wall: &BoundSegment, walkway: &BoundSegment) -> BoundSegment {
    let length_scale = if walkway.rotation_y != 0.0 {
        DIAGONAL_LENGTH_SCALE
    } else {
        1.0
    };
    let thickness =
        (planar_distance(&walkway.position, &wall.position) * 0.5 * FLOOR_STRIP_FILL).max(MIN_SIZE);

    let mut position = walkway.position;
    position.x -= (walkway.position.x - wall.position.x) * 0.5;
    position.z -= (walkway.position.z - wall.position.z) * 0.5;

    // The walkway's thin axis spans the gap; its long axis keeps the edge length.
    let mut size = walkway.size;
    if size.z == MIN_SIZE {
        size.z = thickness;
        size.x *= length_scale;
    } else {
        size.x = thickness;
        size.z *= length_scale;
    }

    BoundSegment {
        kind: SegmentKind::FloorStrip,
        position,
        size,
        rotation_y: walkway.rotation_y,
    }
}

/// Generate perimeter walls and floor strips for a level.
///
/// Emits exactly one wall per perimeter edge and at most one floor strip per
/// edge (none when [`border_overflow`] triggers).
pub fn generate_bounds(
    perimeter: &BoundsOptions,
    walkway: &BoundsOptions,
) -> Result<BoundaryLayout, BoundaryError> {
    perimeter.validate()?;
    walkway.validate()?;
    if perimeter.borders.len() != walkway.borders.len() {
        return Err(BoundaryError::MismatchedPolygons {
            perimeter: perimeter.borders.len(),
            walkway: walkway.borders.len(),
        });
    }

    let mut layout = BoundaryLayout::default();

    for i in 0..perimeter.borders.len() {
        let (a, b) = perimeter.edge(i);
        let wall = edge_segment(a, b, perimeter.height, perimeter.y, SegmentKind::Wall);
        layout.segments.push(wall);

        let (a, b) = walkway.edge(i);
        let walk = edge_segment(a, b, walkway.height, walkway.y, SegmentKind::FloorStrip);

        if border_overflow(&wall.position, &walk.position) {
            layout.overflowed_edges.push(i);
            continue;
        }

        layout.segments.push(floor_strip(&wall, &walk));
    }

    log::debug!(
        "generated {} boundary segments ({} edges, {} overflowed)",
        layout.segments.len(),
        perimeter.borders.len(),
        layout.overflowed_edges.len()
    );

    Ok(layout)
}

/// Thin slab covering the playable rectangle at ground level.
///
/// Used as a floor raycast target independent of the perimeter walls; rendered
/// transparent.
pub fn ground_segment(min: Coords, max: Coords) -> BoundSegment {
    BoundSegment {
        kind: SegmentKind::Ground,
        position: Vec3::new((min[0] + max[0]) * 0.5, 0.0, (min[1] + max[1]) * 0.5),
        size: Vec3::new(
            (min[0] - max[0]).abs().max(MIN_SIZE),
            MIN_SIZE,
            (min[1] - max[1]).abs().max(MIN_SIZE),
        ),
        rotation_y: 0.0,
    }
}
