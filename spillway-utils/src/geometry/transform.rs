//! Rigid transform with lossy scale.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World placement of a scene object.
///
/// `lossy_scale` is the accumulated world scale, which is only exact for
/// non-skewed hierarchies; it is applied per axis before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position of the pivot.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quat,
    /// World scale.
    pub lossy_scale: Vec3,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        lossy_scale: Vec3::ONE,
    };

    /// Creates a transform.
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat, lossy_scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            lossy_scale,
        }
    }

    /// Unscaled transform at `position` with `rotation`.
    #[must_use]
    pub const fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self::new(position, rotation, Vec3::ONE)
    }

    /// The local up axis in world space.
    #[inline]
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Scalar scale used for opening radii: the length of `lossy_scale`.
    #[inline]
    #[must_use]
    pub fn scale_factor(&self) -> f32 {
        self.lossy_scale.length()
    }

    /// Maps a local point into world space.
    #[inline]
    #[must_use]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.position + self.rotation * (point * self.lossy_scale)
    }

    /// Maps a world point into local space. Zero scale axes map to zero.
    #[must_use]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        let unrotated = self.rotation.inverse() * (point - self.position);
        let inv_scale = Vec3::select(
            self.lossy_scale.cmpeq(Vec3::ZERO),
            Vec3::ZERO,
            self.lossy_scale.recip(),
        );
        unrotated * inv_scale
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
