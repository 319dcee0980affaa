//! Planes and plane-plane intersection.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Below this value of `|n1 x n2|^2` two planes are treated as parallel.
pub const PARALLEL_EPSILON: f32 = 0.006;

/// An infinite plane.
///
/// Points `p` on the plane satisfy `normal.dot(p) == distance`, so
/// [`Plane::point`] (the foot of the normal) lies on the plane. Which origin the
/// plane is measured from is up to the caller; the spill logic measures both the
/// opening and the liquid surface from the container pivot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vec3,
    /// Signed offset along the normal.
    pub distance: f32,
}

impl Plane {
    /// Creates a plane, normalizing `normal`.
    ///
    /// A zero normal produces a degenerate plane that never intersects anything.
    #[must_use]
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            distance,
        }
    }

    /// Creates the plane with the given normal passing through `point`.
    #[must_use]
    pub fn from_normal_and_point(normal: Vec3, point: Vec3) -> Self {
        let normal = normal.normalize_or_zero();
        Self {
            normal,
            distance: normal.dot(point),
        }
    }

    /// The point of the plane closest to the origin.
    #[inline]
    #[must_use]
    pub fn point(&self) -> Vec3 {
        self.normal * self.distance
    }

    /// Signed distance from `point` to the plane, positive on the normal side.
    #[inline]
    #[must_use]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.distance
    }
}

impl Default for Plane {
    fn default() -> Self {
        Self {
            normal: Vec3::ZERO,
            distance: 0.0,
        }
    }
}

/// An infinite line, the result of intersecting two planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    /// A point on the line.
    pub point: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

/// Intersects two planes.
///
/// Returns `None` when the planes are parallel or nearly so, including when
/// either plane is degenerate.
#[must_use]
pub fn plane_plane_intersection(a: &Plane, b: &Plane) -> Option<Line> {
    let line_dir = a.normal.cross(b.normal);
    // In-plane direction of `b` pointing toward `a`.
    let toward_a = b.normal.cross(line_dir);
    let denominator = a.normal.dot(toward_a);

    if denominator.abs() <= PARALLEL_EPSILON {
        return None;
    }

    let t = a.normal.dot(a.point() - b.point()) / denominator;
    Some(Line {
        point: b.point() + toward_a * t,
        direction: line_dir.normalize_or_zero(),
    })
}
