//! In-memory containers and scripted scenes for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use glam::{Quat, Vec3, Vec4};
use rustc_hash::FxHashMap;
use spillway_utils::{Aabb, Plane, Transform};

use crate::container::{ContainerId, ContainerStore, LiquidContainer};
use crate::scene::{ColliderId, Hit, HitBuffer, LiquidOpening, SceneQuery};

/// Unit cube container with a freely settable surface.
#[derive(Debug, Clone)]
pub struct TestContainer {
    pub volume: f32,
    pub fill: f32,
    pub open: bool,
    pub mesh: Aabb,
    pub world_bounds: Option<Aabb>,
    pub surface: Plane,
    pub color: Vec4,
    pub transform: Transform,
}

impl TestContainer {
    /// Upright at the origin, surface level with its fill height.
    pub fn upright(volume: f32, fill_percent: f32) -> Self {
        let mesh = Aabb::new(Vec3::splat(-0.5), Vec3::splat(0.5));
        Self {
            volume,
            fill: volume * fill_percent,
            open: true,
            mesh,
            world_bounds: Some(mesh),
            surface: Plane::new(Vec3::Y, fill_percent - 0.5),
            color: Vec4::new(0.2, 0.4, 1.0, 1.0),
            transform: Transform::IDENTITY,
        }
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }
}

impl LiquidContainer for TestContainer {
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
        Some(self.mesh)
    }

    fn liquid_world_bounds(&self) -> Option<Aabb> {
        self.world_bounds
    }

    fn surface_plane(&self) -> Plane {
        self.surface
    }

    fn liquid_color(&self) -> Vec4 {
        self.color
    }

    fn transform(&self) -> Transform {
        self.transform
    }
}

/// Scene answering probes from queued hit lists.
///
/// Each cast takes the next list from its queue; an empty queue means a miss.
/// With `cycle` set, used lists are put back at the end.
#[derive(Debug, Default)]
pub struct ScriptedScene {
    pub containers: Vec<TestContainer>,
    pub openings: FxHashMap<ColliderId, LiquidOpening>,
    pub cycle: bool,
    down: RefCell<VecDeque<Vec<Hit>>>,
    rays: RefCell<VecDeque<Vec<Hit>>>,
    down_log: RefCell<Vec<(Vec3, f32)>>,
    ray_log: RefCell<Vec<(Vec3, Vec3)>>,
}

impl ScriptedScene {
    /// A scene that replays its queued answers forever.
    pub fn cycling() -> Self {
        Self {
            cycle: true,
            ..Self::default()
        }
    }

    pub fn add_container(&mut self, container: TestContainer) -> ContainerId {
        self.containers.push(container);
        ContainerId(self.containers.len() as u32 - 1)
    }

    pub fn add_opening(&mut self, collider: u32, container: ContainerId, position: Vec3, radius: f32) {
        self.openings.insert(
            ColliderId(collider),
            LiquidOpening {
                container,
                position,
                radius,
            },
        );
    }

    /// Queues the answer to the next downward probe.
    pub fn push_down(&mut self, hits: Vec<Hit>) {
        self.down.get_mut().push_back(hits);
    }

    /// Queues the answer to the next edge ray.
    pub fn push_ray(&mut self, hits: Vec<Hit>) {
        self.rays.get_mut().push_back(hits);
    }

    /// Origins and radii of every downward probe so far.
    pub fn down_casts(&self) -> Vec<(Vec3, f32)> {
        self.down_log.borrow().clone()
    }

    /// Origins and directions of every edge ray so far.
    pub fn ray_casts(&self) -> Vec<(Vec3, Vec3)> {
        self.ray_log.borrow().clone()
    }

    fn answer(&self, queue: &RefCell<VecDeque<Vec<Hit>>>, hits: &mut HitBuffer) -> usize {
        let mut queue = queue.borrow_mut();
        let Some(answer) = queue.pop_front() else {
            return 0;
        };
        let stored = answer.iter().filter(|hit| hits.push(**hit)).count();
        if self.cycle {
            queue.push_back(answer);
        }
        stored
    }
}

impl SceneQuery for ScriptedScene {
    fn cast_down(&self, origin: Vec3, radius: f32, hits: &mut HitBuffer) -> usize {
        self.down_log.borrow_mut().push((origin, radius));
        self.answer(&self.down, hits)
    }

    fn cast_ray(&self, origin: Vec3, direction: Vec3, hits: &mut HitBuffer) -> usize {
        self.ray_log.borrow_mut().push((origin, direction));
        self.answer(&self.rays, hits)
    }

    fn opening_of(&self, collider: ColliderId) -> Option<LiquidOpening> {
        self.openings.get(&collider).copied()
    }
}

impl ContainerStore for ScriptedScene {
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

/// A solid hit on `collider` whose bounds are a unit cube around the contact.
pub fn hit(collider: u32, point: Vec3, normal: Vec3, distance: f32) -> Hit {
    Hit {
        point,
        normal,
        distance,
        collider: ColliderId(collider),
        bounds: Aabb::from_center_extents(point, Vec3::splat(0.5)),
        is_trigger: false,
    }
}
