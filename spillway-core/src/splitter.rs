//! Per-container spill controller.

use glam::Vec3;

use crate::config::{ConfigError, SplitterConfig};
use crate::container::ContainerId;
use crate::effect::{EffectNotifier, EffectSink};
use crate::opening::Opening;
use crate::overflow::{OverflowKind, check_overflow};
use crate::quantify::quantify_spill;
use crate::router::{RouteReport, RouteRequest, TransferRouter};
use crate::scene::{ColliderId, HitBuffer, SpillScene};

/// A spill that happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpillEvent {
    /// Where the liquid left the container.
    pub position: Vec3,
    /// The overflow rule that fired.
    pub kind: OverflowKind,
    /// Fraction of the source capacity removed.
    pub lost_fraction: f32,
    /// Tilt-derived flow intensity.
    pub flow_scale: f32,
    /// Volume removed from the source.
    pub volume: f32,
}

/// What one [`Splitter::tick`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// The spill, if the container overflowed.
    pub spill: Option<SpillEvent>,
    /// Where the spilled liquid went.
    pub route: Option<RouteReport>,
}

/// Drains one container through its opening and routes the liquid onward.
///
/// Nothing about the container is cached between ticks: the opening, surface
/// and overflow state are rebuilt from the live container every call, so a
/// container that moves or tips needs no extra bookkeeping.
#[derive(Debug, Clone)]
pub struct Splitter {
    container: ContainerId,
    collider: Option<ColliderId>,
    config: SplitterConfig,
    router: TransferRouter,
    hits: HitBuffer,
    is_splitting: bool,
    last_report: TickReport,
}

impl Splitter {
    /// Creates a splitter draining `container`.
    pub fn new(container: ContainerId, config: SplitterConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            container,
            collider: None,
            router: TransferRouter::from_config(&config),
            hits: HitBuffer::with_capacity(config.probe_buffer_capacity),
            config,
            is_splitting: false,
            last_report: TickReport::default(),
        })
    }

    /// Sets the container's own collider, which the first downward probe ignores.
    #[must_use]
    pub fn with_collider(mut self, collider: ColliderId) -> Self {
        self.collider = Some(collider);
        self
    }

    /// The drained container.
    #[must_use]
    pub fn container(&self) -> ContainerId {
        self.container
    }

    /// The container's own collider, if set.
    #[must_use]
    pub fn collider(&self) -> Option<ColliderId> {
        self.collider
    }

    /// Settings this splitter was built with.
    #[must_use]
    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    /// Whether the last tick spilled.
    #[must_use]
    pub fn is_splitting(&self) -> bool {
        self.is_splitting
    }

    /// Report of the most recent tick.
    #[must_use]
    pub fn last_report(&self) -> &TickReport {
        &self.last_report
    }

    /// The container's current opening, for scenes that answer
    /// [`opening_of`](crate::SceneQuery::opening_of) lookups.
    pub fn opening<S>(&self, scene: &S) -> Option<Opening>
    where
        S: SpillScene + ?Sized,
    {
        let container = scene.container(self.container)?;
        Opening::of(container, self.config.opening_radius)
    }

    /// Runs one step: detect overflow, drain the container, route the spill and
    /// play a cue at the spill point.
    ///
    /// A container missing from `scene`, or one without a liquid mesh, is left
    /// untouched.
    pub fn tick<S>(
        &mut self,
        scene: &mut S,
        delta_time: f32,
        effects: &mut dyn EffectSink,
    ) -> TickReport
    where
        S: SpillScene + ?Sized,
    {
        let report = self.step(scene, delta_time, effects);
        self.is_splitting = report.spill.is_some();
        self.last_report = report.clone();
        report
    }

    fn step<S>(&mut self, scene: &mut S, delta_time: f32, effects: &mut dyn EffectSink) -> TickReport
    where
        S: SpillScene + ?Sized,
    {
        let Some(container) = scene.container_mut(self.container) else {
            log::debug!("Container {:?} is gone, skipping tick", self.container);
            return TickReport::default();
        };
        let Some(opening) = Opening::of(container, self.config.opening_radius) else {
            return TickReport::default();
        };

        let surface = container.surface_plane();
        let Some(origin) = check_overflow(container, &opening, &surface, &self.config) else {
            return TickReport::default();
        };

        let step = quantify_spill(
            container,
            self.config.opening_radius,
            self.config.split_speed,
            delta_time,
        );
        let source_volume = container.volume();
        let color = container.liquid_color();

        let spill = SpillEvent {
            position: origin.position,
            kind: origin.kind,
            lost_fraction: step.lost_fraction,
            flow_scale: step.flow_scale,
            volume: source_volume * step.lost_fraction,
        };
        log::trace!(
            "{:?} spills {} via {:?} at {}",
            self.container,
            spill.volume,
            spill.kind,
            spill.position
        );

        let route = self.router.route(
            scene,
            &mut self.hits,
            &RouteRequest {
                origin: origin.position,
                lost_fraction: step.lost_fraction,
                flow_scale: step.flow_scale,
                source_volume,
                exclude: self.collider,
            },
        );

        EffectNotifier::notify(
            effects,
            origin.position,
            step.flow_scale,
            opening.radius,
            color,
        );

        TickReport {
            spill: Some(spill),
            route: Some(route),
        }
    }
}
