//! Converts container tilt into a flow rate and drains the source.

use glam::Vec3;

use crate::container::LiquidContainer;

/// Flow added on top of the tilt term, so a barely tipped container still drips.
pub const FLOW_BIAS: f32 = 0.2;

/// The volume removed from a container in one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpillStep {
    /// Fraction of the source capacity removed this tick.
    pub lost_fraction: f32,
    /// Tilt-derived intensity, from `FLOW_BIAS` upright to `1 + FLOW_BIAS` upside down.
    pub flow_scale: f32,
}

/// Flow intensity for a container whose up axis is `container_up`.
///
/// `1 - (tilt + 1) / 2 + FLOW_BIAS` where `tilt` is the cosine between world up
/// and the container's up axis; never negative.
#[inline]
#[must_use]
pub fn flow_scale(container_up: Vec3) -> f32 {
    let tilt = Vec3::Y.dot(container_up);
    (1.0 - (tilt + 1.0) * 0.5 + FLOW_BIAS).max(0.0)
}

/// Removes this tick's spill from `container` and reports how much left.
///
/// The removed fraction is `opening_radius * split_speed * delta_time *
/// flow_scale`, capped at the current fill so the container ends at exactly
/// zero rather than below it.
pub fn quantify_spill(
    container: &mut dyn LiquidContainer,
    opening_radius: f32,
    split_speed: f32,
    delta_time: f32,
) -> SpillStep {
    let flow_scale = flow_scale(container.transform().up());
    let fill = container.fill_amount_percent();

    let mut step = opening_radius * split_speed * delta_time.max(0.0) * flow_scale;
    let mut remaining = fill - step;
    if remaining < 0.0 {
        step = fill;
        remaining = 0.0;
    }

    container.set_fill_amount_percent(remaining);
    SpillStep {
        lost_fraction: step,
        flow_scale,
    }
}
