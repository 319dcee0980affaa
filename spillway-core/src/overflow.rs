//! Overflow detection.
//!
//! Decides, from the rim plane and the liquid surface plane alone, whether the
//! liquid crosses the rim and where the spill starts.

use glam::Vec3;
use spillway_utils::{Plane, plane_plane_intersection};

use crate::config::SplitterConfig;
use crate::container::LiquidContainer;
use crate::opening::Opening;

/// Which geometric rule detected the overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowKind {
    /// The surface crosses the rim plane inside the opening: liquid pours over the low edge.
    Rim,
    /// The container is upside down: liquid falls out of the opening center.
    Inverted,
    /// The crossing lies outside the opening but still inside the liquid body.
    InsideLiquid,
}

/// Where liquid leaves the container this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpillOrigin {
    /// World point the spilled liquid starts from.
    pub position: Vec3,
    /// The rule that fired.
    pub kind: OverflowKind,
}

/// Checks whether `container` overflows through `opening`.
///
/// `surface` is the liquid surface plane measured from the container pivot, the
/// same frame as `opening.plane`.
#[must_use]
pub fn check_overflow(
    container: &dyn LiquidContainer,
    opening: &Opening,
    surface: &Plane,
    config: &SplitterConfig,
) -> Option<SpillOrigin> {
    if container.fill_amount_percent() <= 0.0 || !container.is_open() {
        return None;
    }

    let transform = container.transform();
    let line = plane_plane_intersection(&opening.plane, surface);
    // Parallel surfaces fall back to the pivot itself
    let crossing = line.map_or(Vec3::ZERO, |line| line.point) + transform.position;

    if line.is_some() && crossing.distance(opening.position) < opening.radius {
        return Some(SpillOrigin {
            position: opening.lowest_point(config.angle_step),
            kind: OverflowKind::Rim,
        });
    }

    if opening.position.y >= crossing.y {
        return None;
    }

    // The opening hangs below the liquid
    if opening.plane.normal.dot(surface.normal) < 0.0 {
        return Some(SpillOrigin {
            position: opening.position,
            kind: OverflowKind::Inverted,
        });
    }

    let tolerance = config.liquid_bounds_tolerance * transform.lossy_scale.abs().max_element();
    let inside_liquid = container
        .liquid_world_bounds()
        .is_some_and(|bounds| bounds.sqr_distance(crossing) < tolerance * tolerance);

    inside_liquid.then(|| SpillOrigin {
        position: opening.lowest_point(config.angle_step),
        kind: OverflowKind::InsideLiquid,
    })
}
