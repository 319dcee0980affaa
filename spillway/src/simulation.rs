//! Headless fixed-step runner over a [`BoxScene`].

use spillway_core::{LiquidContainer, RecordingSink, SpillSystem, Splitter, SystemTickSummary};
use thiserror::Error;

use crate::config::SimulationConfig;
use crate::scene::{BoxScene, SceneError};

/// A simulation that could not be set up.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// The scene description was rejected.
    #[error(transparent)]
    Scene(#[from] SceneError),
    /// The splitter settings were rejected.
    #[error(transparent)]
    Splitter(#[from] spillway_core::ConfigError),
}

/// Totals over a whole run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Ticks simulated.
    pub ticks: u32,
    /// Ticks in which at least one container spilled.
    pub spilling_ticks: u32,
    /// Spills that reached another container.
    pub transfers: usize,
    /// Volume moved between containers.
    pub volume_transferred: f32,
    /// Volume that left the containers for good.
    pub volume_lost: f32,
    /// Spill cues played.
    pub effects: usize,
    /// Final fill of every container as `(name, amount, capacity)`.
    pub fills: Vec<(String, f32, f32)>,
}

impl RunSummary {
    fn record(&mut self, tick: &SystemTickSummary) {
        self.ticks += 1;
        if tick.spilling > 0 {
            self.spilling_ticks += 1;
        }
        self.transfers += tick.transfers;
        self.volume_transferred += tick.volume_transferred;
        self.volume_lost += tick.volume_lost;
    }
}

/// A scene plus the splitters draining its containers.
#[derive(Debug)]
pub struct Simulation {
    scene: BoxScene,
    system: SpillSystem,
    effects: RecordingSink,
    delta_time: f32,
    ticks: u32,
    log_every: u32,
}

impl Simulation {
    /// Builds the scene in `config` and gives every container a splitter.
    pub fn new(config: &SimulationConfig) -> Result<Self, SimulationError> {
        let scene = BoxScene::from_config(&config.scene)?;
        Self::with_scene(scene, config)
    }

    /// Runs `config`'s splitter settings and timing over an already built scene.
    pub fn with_scene(mut scene: BoxScene, config: &SimulationConfig) -> Result<Self, SimulationError> {
        let mut system = SpillSystem::new();
        for (id, _) in scene.containers() {
            let splitter = Splitter::new(id, config.splitter.clone())?;
            let splitter = match scene.collider_of(id) {
                Some(collider) => splitter.with_collider(collider),
                None => splitter,
            };
            system.add(splitter);
        }
        let openings = system.openings(&scene);
        scene.set_openings(openings);

        Ok(Self {
            scene,
            system,
            effects: RecordingSink::default(),
            delta_time: config.delta_time(),
            ticks: config.ticks,
            log_every: config.log_every.max(1),
        })
    }

    /// The simulated scene.
    #[must_use]
    pub fn scene(&self) -> &BoxScene {
        &self.scene
    }

    /// Mutable access for moving containers between ticks.
    pub fn scene_mut(&mut self) -> &mut BoxScene {
        &mut self.scene
    }

    /// Splitters in tick order.
    #[must_use]
    pub fn system(&self) -> &SpillSystem {
        &self.system
    }

    /// Every spill cue played so far.
    #[must_use]
    pub fn effects(&self) -> &RecordingSink {
        &self.effects
    }

    /// Advances the scene by one fixed step.
    ///
    /// Receiving openings are rebuilt from the splitters first, so containers
    /// moved since the last step pour and receive at their new place.
    pub fn step(&mut self) -> SystemTickSummary {
        let openings = self.system.openings(&self.scene);
        self.scene.set_openings(openings);
        self.system.tick(&mut self.scene, self.delta_time, &mut self.effects)
    }

    /// Runs every configured tick and reports the totals.
    pub fn run(&mut self) -> RunSummary {
        let mut summary = RunSummary::default();

        for tick in 1..=self.ticks {
            let span = tracing::debug_span!("tick", tick);
            let _entered = span.enter();

            let result = self.step();
            summary.record(&result);

            if tick % self.log_every == 0 {
                self.log_fills(tick);
            }
        }

        summary.effects = self.effects.effects.len();
        summary.fills = self
            .scene
            .containers()
            .map(|(_, container)| {
                (
                    container.name.clone(),
                    container.fill_amount(),
                    container.volume(),
                )
            })
            .collect();
        summary
    }

    fn log_fills(&self, tick: u32) {
        for (id, container) in self.scene.containers() {
            let splitting = self
                .system
                .get(id)
                .is_some_and(Splitter::is_splitting);
            log::info!(
                "tick {tick}: {} at {:.1}%{}",
                container.name,
                container.fill_amount_percent() * 100.0,
                if splitting { ", spilling" } else { "" }
            );
        }
    }
}
