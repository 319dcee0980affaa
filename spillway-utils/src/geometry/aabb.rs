//! Axis-aligned bounding boxes.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::Transform;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// Creates a box from its corners as given.
    #[must_use]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Creates a box from two arbitrary opposite corners.
    #[must_use]
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Creates a box from its center and half extents.
    #[must_use]
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        let extents = extents.abs();
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box containing all `points`. Returns `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    /// Center point.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Half size along each axis.
    #[inline]
    #[must_use]
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Inclusive containment test.
    #[must_use]
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Closest point of the box to `point`.
    #[inline]
    #[must_use]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.clamp(self.min, self.max)
    }

    /// Squared distance from `point` to the box, zero when inside.
    #[inline]
    #[must_use]
    pub fn sqr_distance(&self, point: Vec3) -> f32 {
        point.distance_squared(self.closest_point(point))
    }

    /// The corner lying in the direction of `dir`.
    ///
    /// Per axis, picks `max` when the component of `dir` is positive and `min`
    /// otherwise (zero components pick `min`).
    #[must_use]
    pub fn corner_towards(&self, dir: Vec3) -> Vec3 {
        Vec3::select(dir.cmpgt(Vec3::ZERO), self.max, self.min)
    }

    /// The eight corners.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// World-space box enclosing this local box after `transform`.
    #[must_use]
    pub fn transformed(&self, transform: &Transform) -> Self {
        let corners = self.corners().map(|c| transform.transform_point(c));
        // Eight corners, never empty
        Self::from_points(corners).unwrap_or(*self)
    }

    /// Box grown by `amount` on every side.
    #[must_use]
    pub fn inflated(&self, amount: f32) -> Self {
        Self {
            min: self.min - Vec3::splat(amount),
            max: self.max + Vec3::splat(amount),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    #[test]
    fn test_sqr_distance() {
        let aabb = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.sqr_distance(Vec3::splat(0.5)), 0.0);
        assert_eq!(aabb.sqr_distance(Vec3::new(0.5, 3.0, 0.5)), 4.0);
        assert_eq!(aabb.sqr_distance(Vec3::new(2.0, 2.0, 0.5)), 2.0);
    }

    #[test]
    fn test_corner_towards() {
        let aabb = Aabb::new(Vec3::new(-1.0, -2.0, -3.0), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(
            aabb.corner_towards(Vec3::new(0.7, -0.7, 0.0)),
            Vec3::new(1.0, -2.0, -3.0)
        );
        assert_eq!(aabb.corner_towards(Vec3::ONE), aabb.max);
        assert_eq!(aabb.corner_towards(Vec3::ZERO), aabb.min);
    }

    #[test]
    fn test_transformed_rotated_box() {
        let aabb = Aabb::new(Vec3::new(-1.0, -0.5, -0.5), Vec3::new(1.0, 0.5, 0.5));
        let transform = Transform::new(
            Vec3::new(10.0, 0.0, 0.0),
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
            Vec3::ONE,
        );
        let world = aabb.transformed(&transform);
        // Long axis now points along y
        assert!((world.min - Vec3::new(9.5, -1.0, -0.5)).length() < 1e-5);
        assert!((world.max - Vec3::new(10.5, 1.0, 0.5)).length() < 1e-5);
    }

    #[test]
    fn test_from_points_empty() {
        assert!(Aabb::from_points(std::iter::empty()).is_none());
    }
}
