//! Host-owned liquid containers.

use glam::Vec4;
use spillway_utils::{Aabb, Plane, Transform};

/// Identifies a container inside a [`ContainerStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(pub u32);

/// A vessel holding liquid, owned by the host scene.
///
/// The spill logic only reads geometry from a container and writes its fill
/// level; it never keeps a container between calls.
pub trait LiquidContainer {
    /// Total capacity in volume units.
    fn volume(&self) -> f32;

    /// Current liquid amount in volume units.
    fn fill_amount(&self) -> f32;

    /// Sets the liquid amount. Implementations must clamp to `[0, volume]`.
    fn set_fill_amount(&mut self, amount: f32);

    /// Current liquid amount as a fraction of capacity.
    fn fill_amount_percent(&self) -> f32 {
        let volume = self.volume();
        if volume > 0.0 {
            self.fill_amount() / volume
        } else {
            0.0
        }
    }

    /// Sets the liquid amount as a fraction of capacity, clamped to `[0, 1]`.
    fn set_fill_amount_percent(&mut self, percent: f32) {
        let volume = self.volume();
        self.set_fill_amount(percent.clamp(0.0, 1.0) * volume);
    }

    /// Whether liquid can leave through the opening.
    fn is_open(&self) -> bool;

    /// Bounds of the liquid mesh in container-local space, if the container has one.
    ///
    /// The top of these bounds is where the opening sits.
    fn liquid_mesh_bounds(&self) -> Option<Aabb>;

    /// World-space bounds of the liquid body as currently rendered.
    fn liquid_world_bounds(&self) -> Option<Aabb>;

    /// The liquid surface, measured from the container pivot in world orientation.
    fn surface_plane(&self) -> Plane;

    /// Liquid color, used to tint spill effects.
    fn liquid_color(&self) -> Vec4;

    /// Current world transform.
    fn transform(&self) -> Transform;
}

/// Lookup of containers by id.
pub trait ContainerStore {
    /// Shared access to a container.
    fn container(&self, id: ContainerId) -> Option<&dyn LiquidContainer>;

    /// Exclusive access to a container.
    fn container_mut(&mut self, id: ContainerId) -> Option<&mut dyn LiquidContainer>;
}
