//! Geometry helpers for overflow detection and surface walking.
//!
//! Everything here is pure math on `glam` types: planes, boxes, transforms,
//! and the few searches the spill logic needs.

mod aabb;
mod plane;
mod surface;
mod transform;

pub use aabb::Aabb;
pub use plane::{Line, PARALLEL_EPSILON, Plane, plane_plane_intersection};
pub use surface::{DEFAULT_ANGLE_STEP, MIN_ANGLE_STEP, lowest_point_on_circle, slope_direction};
pub use transform::Transform;
