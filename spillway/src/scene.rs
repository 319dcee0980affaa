//! A reference scene built from oriented boxes.
//!
//! Containers are boxes whose liquid fills them from the lowest point up with
//! a level surface. Obstacles are boxes too, and may be flagged as triggers.
//! Ray casts use a slab test in each box's local space; downward sphere casts
//! are answered as ray casts against boxes inflated by the sphere radius.

use glam::{EulerRot, Quat, Vec3, Vec4};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use spillway_core::{
    ColliderId, ContainerId, ContainerStore, Hit, HitBuffer, LiquidContainer, LiquidOpening,
    Opening, SceneQuery,
};
use spillway_utils::{Aabb, Plane, Transform};
use thiserror::Error;

/// A scene that could not be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    /// Two containers or obstacles share a name.
    #[error("duplicate name {0:?}")]
    DuplicateName(String),
    /// A box has a non-positive or non-finite extent.
    #[error("{name}: half extents must be positive, got {extents}")]
    InvalidExtents {
        /// Offending box.
        name: String,
        /// Offending extents.
        extents: Vec3,
    },
    /// A container cannot hold anything.
    #[error("{name}: volume must be positive, got {volume}")]
    InvalidVolume {
        /// Offending container.
        name: String,
        /// Offending volume.
        volume: f32,
    },
    /// A starting fill outside `[0, 1]`.
    #[error("{name}: fill must be between 0 and 1, got {fill}")]
    InvalidFill {
        /// Offending container.
        name: String,
        /// Offending fill.
        fill: f32,
    },
}

/// A container as written in the simulation config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// Unique name, used in logs and summaries.
    pub name: String,
    /// World position of the pivot, the box center.
    pub position: Vec3,
    /// Rotation as XYZ Euler angles in degrees.
    pub rotation: Vec3,
    /// Half size of the box along each local axis.
    pub half_extents: Vec3,
    /// Capacity in volume units.
    pub volume: f32,
    /// Starting fill as a fraction of capacity.
    pub fill: f32,
    /// Whether the opening is uncovered.
    pub open: bool,
    /// Liquid color.
    pub color: Vec4,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            name: "cup".to_string(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            half_extents: Vec3::splat(0.5),
            volume: 1.0,
            fill: 0.0,
            open: true,
            color: Vec4::new(0.2, 0.45, 0.9, 1.0),
        }
    }
}

/// A static box in the simulation config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    /// Unique name.
    pub name: String,
    /// World position of the box center.
    pub position: Vec3,
    /// Rotation as XYZ Euler angles in degrees.
    pub rotation: Vec3,
    /// Half size of the box along each local axis.
    pub half_extents: Vec3,
    /// Trigger volumes are reported by probes but never stop liquid.
    pub trigger: bool,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            name: "box".to_string(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            half_extents: Vec3::splat(0.5),
            trigger: false,
        }
    }
}

/// Everything placed in a [`BoxScene`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Containers, in tick order.
    pub containers: Vec<ContainerConfig>,
    /// Static obstacles.
    pub obstacles: Vec<ObstacleConfig>,
}

fn euler_degrees(rotation: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        rotation.x.to_radians(),
        rotation.y.to_radians(),
        rotation.z.to_radians(),
    )
}

fn check_extents(name: &str, extents: Vec3) -> Result<(), SceneError> {
    if extents.is_finite() && extents.cmpgt(Vec3::ZERO).all() {
        Ok(())
    } else {
        Err(SceneError::InvalidExtents {
            name: name.to_string(),
            extents,
        })
    }
}

/// A box-shaped container whose liquid settles level at the bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleContainer {
    /// Name used in logs.
    pub name: String,
    /// Half size of the liquid mesh along each local axis.
    pub half_extents: Vec3,
    /// Liquid color.
    pub color: Vec4,
    /// Whether the opening is uncovered.
    pub open: bool,
    /// World transform; moving or tipping the container is just writing this.
    pub transform: Transform,
    volume: f32,
    fill: f32,
}

impl SimpleContainer {
    /// An empty, open, upright container at the origin.
    #[must_use]
    pub fn new(name: impl Into<String>, half_extents: Vec3, volume: f32) -> Self {
        Self {
            name: name.into(),
            half_extents,
            color: ContainerConfig::default().color,
            open: true,
            transform: Transform::IDENTITY,
            volume: volume.max(0.0),
            fill: 0.0,
        }
    }

    /// Builds a container from its config entry.
    pub fn from_config(config: &ContainerConfig) -> Result<Self, SceneError> {
        check_extents(&config.name, config.half_extents)?;
        if !(config.volume.is_finite() && config.volume > 0.0) {
            return Err(SceneError::InvalidVolume {
                name: config.name.clone(),
                volume: config.volume,
            });
        }
        if !(0.0..=1.0).contains(&config.fill) {
            return Err(SceneError::InvalidFill {
                name: config.name.clone(),
                fill: config.fill,
            });
        }

        let mut container = Self::new(config.name.clone(), config.half_extents, config.volume)
            .placed(config.position, euler_degrees(config.rotation));
        container.color = config.color;
        container.open = config.open;
        container.set_fill_amount_percent(config.fill);
        Ok(container)
    }

    /// Moves the container.
    #[must_use]
    pub fn placed(mut self, position: Vec3, rotation: Quat) -> Self {
        self.transform = Transform::from_position_rotation(position, rotation);
        self
    }

    /// Sets the starting fill fraction.
    #[must_use]
    pub fn filled(mut self, percent: f32) -> Self {
        self.set_fill_amount_percent(percent);
        self
    }

    fn local_bounds(&self) -> Aabb {
        Aabb::new(-self.half_extents, self.half_extents)
    }

    /// World height of the liquid surface relative to the pivot.
    fn surface_height(&self) -> f32 {
        let (low, high) = self
            .local_bounds()
            .corners()
            .iter()
            .map(|&corner| (self.transform.rotation * corner).y)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(low, high), y| {
                (low.min(y), high.max(y))
            });
        low + self.fill_amount_percent() * (high - low)
    }
}

impl LiquidContainer for SimpleContainer {
    fn volume(&self) -> f32 {
        self.volume
    }

    fn fill_amount(&self) -> f32 {
        self.fill
    }

    fn set_fill_amount(&mut self, amount: f32) {
        self.fill = amount.clamp(0.0, self.volume);
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn liquid_mesh_bounds(&self) -> Option<Aabb> {
        Some(self.local_bounds())
    }

    fn liquid_world_bounds(&self) -> Option<Aabb> {
        if self.fill <= 0.0 {
            return None;
        }
        let bounds = self.local_bounds().transformed(&self.transform);
        let top = bounds.max.y.min(self.transform.position.y + self.surface_height());
        Some(Aabb::new(bounds.min, Vec3::new(bounds.max.x, top, bounds.max.z)))
    }

    fn surface_plane(&self) -> Plane {
        Plane::new(Vec3::Y, self.surface_height())
    }

    fn liquid_color(&self) -> Vec4 {
        self.color
    }

    fn transform(&self) -> Transform {
        self.transform
    }
}

/// One oriented box the scene can be probed against.
#[derive(Debug, Clone, PartialEq)]
struct Collider {
    name: String,
    transform: Transform,
    half_extents: Vec3,
    is_trigger: bool,
    container: Option<ContainerId>,
}

impl Collider {
    fn world_bounds(&self) -> Aabb {
        Aabb::new(-self.half_extents, self.half_extents).transformed(&self.transform)
    }

    /// Slab test of a ray against this box grown by `inflate` on every side.
    ///
    /// Returns the entry distance and the world normal of the entered face.
    /// Rays starting inside the box report nothing.
    fn raycast(&self, origin: Vec3, direction: Vec3, inflate: f32) -> Option<(f32, Vec3)> {
        let inverse = self.transform.rotation.inverse();
        let local_origin = inverse * (origin - self.transform.position);
        let local_direction = inverse * direction;
        let half = self.half_extents + Vec3::splat(inflate);

        let mut enter = f32::NEG_INFINITY;
        let mut exit = f32::INFINITY;
        let mut enter_axis = 0;

        for axis in 0..3 {
            let start = local_origin[axis];
            let step = local_direction[axis];
            if step.abs() <= f32::EPSILON {
                if start.abs() > half[axis] {
                    return None;
                }
                continue;
            }

            let near = (-half[axis] - start) / step;
            let far = (half[axis] - start) / step;
            let (near, far) = if near > far { (far, near) } else { (near, far) };
            if near > enter {
                enter = near;
                enter_axis = axis;
            }
            exit = exit.min(far);
            if enter > exit {
                return None;
            }
        }

        if enter < 0.0 {
            return None;
        }

        let mut normal = Vec3::ZERO;
        normal[enter_axis] = -local_direction[enter_axis].signum();
        Some((enter, self.transform.rotation * normal))
    }

    fn hit(&self, id: usize, point: Vec3, normal: Vec3, distance: f32) -> Hit {
        Hit {
            point,
            normal,
            distance,
            collider: ColliderId(id as u32),
            bounds: self.world_bounds(),
            is_trigger: self.is_trigger,
        }
    }
}

/// Boxes, containers and the probes the spill logic runs against them.
///
/// A container only receives liquid through an opening registered with
/// [`BoxScene::set_openings`], normally the openings of the splitters draining
/// the scene.
#[derive(Debug, Clone, Default)]
pub struct BoxScene {
    colliders: Vec<Collider>,
    containers: Vec<SimpleContainer>,
    container_colliders: Vec<ColliderId>,
    openings: FxHashMap<ContainerId, Opening>,
}

impl BoxScene {
    /// An empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every container and obstacle in `config`.
    pub fn from_config(config: &SceneConfig) -> Result<Self, SceneError> {
        let mut names = FxHashSet::default();
        let all_names = config
            .containers
            .iter()
            .map(|container| &container.name)
            .chain(config.obstacles.iter().map(|obstacle| &obstacle.name));
        for name in all_names {
            if !names.insert(name.as_str()) {
                return Err(SceneError::DuplicateName(name.clone()));
            }
        }

        let mut scene = Self::new();
        for container in &config.containers {
            scene.add_container(SimpleContainer::from_config(container)?);
        }
        for obstacle in &config.obstacles {
            check_extents(&obstacle.name, obstacle.half_extents)?;
            scene.add_obstacle(
                obstacle.name.clone(),
                Transform::from_position_rotation(obstacle.position, euler_degrees(obstacle.rotation)),
                obstacle.half_extents,
                obstacle.trigger,
            );
        }

        log::debug!(
            "Built scene with {} containers and {} colliders",
            scene.containers.len(),
            scene.colliders.len()
        );
        Ok(scene)
    }

    /// Adds a container along with a collider matching its box.
    pub fn add_container(&mut self, container: SimpleContainer) -> (ContainerId, ColliderId) {
        let id = ContainerId(self.containers.len() as u32);
        let collider = self.push_collider(Collider {
            name: container.name.clone(),
            transform: container.transform,
            half_extents: container.half_extents,
            is_trigger: false,
            container: Some(id),
        });
        self.containers.push(container);
        self.container_colliders.push(collider);
        (id, collider)
    }

    /// Adds a static box.
    pub fn add_obstacle(
        &mut self,
        name: impl Into<String>,
        transform: Transform,
        half_extents: Vec3,
        is_trigger: bool,
    ) -> ColliderId {
        self.push_collider(Collider {
            name: name.into(),
            transform,
            half_extents,
            is_trigger,
            container: None,
        })
    }

    fn push_collider(&mut self, collider: Collider) -> ColliderId {
        self.colliders.push(collider);
        ColliderId(self.colliders.len() as u32 - 1)
    }

    /// Containers with their ids, in insertion order.
    pub fn containers(&self) -> impl Iterator<Item = (ContainerId, &SimpleContainer)> {
        self.containers
            .iter()
            .enumerate()
            .map(|(index, container)| (ContainerId(index as u32), container))
    }

    /// The collider that moves with `container`.
    #[must_use]
    pub fn collider_of(&self, container: ContainerId) -> Option<ColliderId> {
        self.container_colliders.get(container.0 as usize).copied()
    }

    /// Looks a container up by name.
    #[must_use]
    pub fn container_named(&self, name: &str) -> Option<ContainerId> {
        self.containers()
            .find(|(_, container)| container.name == name)
            .map(|(id, _)| id)
    }

    /// Name of a collider, for logs.
    #[must_use]
    pub fn collider_name(&self, collider: ColliderId) -> Option<&str> {
        self.colliders
            .get(collider.0 as usize)
            .map(|collider| collider.name.as_str())
    }

    /// Replaces the openings containers receive liquid through.
    ///
    /// Openings follow the container transforms they were built from, so they
    /// must be refreshed after containers move.
    pub fn set_openings(&mut self, openings: impl IntoIterator<Item = (ContainerId, Opening)>) {
        self.openings.clear();
        self.openings.extend(openings);
    }

    /// Moves a container and its collider.
    pub fn set_container_transform(&mut self, id: ContainerId, transform: Transform) {
        let Some(container) = self.containers.get_mut(id.0 as usize) else {
            return;
        };
        container.transform = transform;
        if let Some(collider) = self
            .container_colliders
            .get(id.0 as usize)
            .and_then(|collider| self.colliders.get_mut(collider.0 as usize))
        {
            collider.transform = transform;
        }
    }
}

impl SceneQuery for BoxScene {
    fn cast_down(&self, origin: Vec3, radius: f32, hits: &mut HitBuffer) -> usize {
        let mut stored = 0;
        for (id, collider) in self.colliders.iter().enumerate() {
            let Some((distance, normal)) = collider.raycast(origin, Vec3::NEG_Y, radius) else {
                continue;
            };
            let point = origin + Vec3::NEG_Y * distance - normal * radius;
            if hits.push(collider.hit(id, point, normal, distance)) {
                stored += 1;
            }
        }
        stored
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, hits: &mut HitBuffer) -> usize {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return 0;
        }

        let mut stored = 0;
        for (id, collider) in self.colliders.iter().enumerate() {
            let Some((distance, normal)) = collider.raycast(origin, direction, 0.0) else {
                continue;
            };
            let point = origin + direction * distance;
            if hits.push(collider.hit(id, point, normal, distance)) {
                stored += 1;
            }
        }
        stored
    }

    fn opening_of(&self, collider: ColliderId) -> Option<LiquidOpening> {
        let id = self.colliders.get(collider.0 as usize)?.container?;
        if !self.containers.get(id.0 as usize)?.open {
            return None;
        }
        let opening = self.openings.get(&id)?;
        Some(LiquidOpening {
            container: id,
            position: opening.position,
            radius: opening.radius,
        })
    }
}

impl ContainerStore for BoxScene {
    fn container(&self, id: ContainerId) -> Option<&dyn LiquidContainer> {
        self.containers
            .get(id.0 as usize)
            .map(|container| container as &dyn LiquidContainer)
    }

    fn container_mut(&mut self, id: ContainerId) -> Option<&mut dyn LiquidContainer> {
        self.containers
            .get_mut(id.0 as usize)
            .map(|container| container as &mut dyn LiquidContainer)
    }
}
