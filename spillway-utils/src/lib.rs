//! # Spillway Utils
//!
//! Stateless geometry shared by the spillway crates.

pub mod geometry;

pub use geometry::{
    Aabb, DEFAULT_ANGLE_STEP, Line, MIN_ANGLE_STEP, PARALLEL_EPSILON, Plane, Transform,
    lowest_point_on_circle, plane_plane_intersection, slope_direction,
};
