//! Rim geometry of a container, rebuilt every tick.

use glam::{Quat, Vec3};
use spillway_utils::{Plane, lowest_point_on_circle};

use crate::container::LiquidContainer;

/// The opening liquid leaves a container through.
///
/// Derived from the container's live transform and liquid mesh each time it is
/// needed; nothing here is cached across ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Opening {
    /// Rim plane, measured from the container pivot. Its normal is the container's up axis.
    pub plane: Plane,
    /// World position of the opening center.
    pub position: Vec3,
    /// World radius of the opening.
    pub radius: f32,
    /// Container orientation, which the rim circle lies flat in.
    pub orientation: Quat,
}

impl Opening {
    /// Builds the opening of `container` with the given local radius.
    ///
    /// Returns `None` when the container has no liquid mesh to place the rim on.
    #[must_use]
    pub fn of(container: &dyn LiquidContainer, local_radius: f32) -> Option<Self> {
        let mesh = container.liquid_mesh_bounds()?;
        let transform = container.transform();

        let plane = Plane::new(transform.up(), mesh.max.y * transform.lossy_scale.y);
        Some(Self {
            plane,
            position: transform.position + plane.point(),
            radius: local_radius * transform.scale_factor(),
            orientation: transform.rotation,
        })
    }

    /// The rim point with the lowest world height, where liquid pours from.
    #[must_use]
    pub fn lowest_point(&self, angle_step: f32) -> Vec3 {
        lowest_point_on_circle(self.position, self.radius, self.orientation, angle_step)
    }
}
