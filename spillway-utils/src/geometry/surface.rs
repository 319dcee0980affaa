//! Searches over surfaces: the lowest rim point and the downhill direction.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};

/// Default angular step, in radians, of [`lowest_point_on_circle`].
pub const DEFAULT_ANGLE_STEP: f32 = 0.1;

/// Finest step [`lowest_point_on_circle`] samples at, about 63 thousand points.
pub const MIN_ANGLE_STEP: f32 = 1e-4;

/// Finds the point of a circle with the lowest world `y`.
///
/// The circle lies in the local XZ plane of `orientation`, centered at `center`.
/// Samples are taken every `angle_step` radians, so the result is within one
/// step's arc of the true minimum. A non-positive or non-finite step uses
/// [`DEFAULT_ANGLE_STEP`]; steps finer than [`MIN_ANGLE_STEP`] are raised to it.
#[must_use]
pub fn lowest_point_on_circle(center: Vec3, radius: f32, orientation: Quat, angle_step: f32) -> Vec3 {
    let step = if angle_step.is_finite() && angle_step > 0.0 {
        angle_step.max(MIN_ANGLE_STEP)
    } else {
        DEFAULT_ANGLE_STEP
    };
    let samples = (TAU / step).ceil() as u32;

    let mut lowest = center;
    let mut lowest_y = f32::INFINITY;
    for i in 0..samples {
        let angle = i as f32 * step;
        let local = Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin());
        let point = center + orientation * local;
        if point.y < lowest_y {
            lowest_y = point.y;
            lowest = point;
        }
    }
    lowest
}

/// Downhill direction along a surface with the given normal.
///
/// This is `up` projected onto the surface and negated, normalized. Returns
/// [`Vec3::ZERO`] when the surface is flat (normal parallel to `up`).
#[inline]
#[must_use]
pub fn slope_direction(up: Vec3, normal: Vec3) -> Vec3 {
    up.cross(normal).cross(normal).normalize_or_zero()
}
