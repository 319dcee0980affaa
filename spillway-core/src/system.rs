//! Ticks every splitter in a scene.

use std::mem;

use rustc_hash::FxHashMap;

use crate::container::ContainerId;
use crate::effect::EffectSink;
use crate::opening::Opening;
use crate::router::RouteOutcome;
use crate::scene::SpillScene;
use crate::splitter::Splitter;

/// Totals over one [`SpillSystem::tick`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SystemTickSummary {
    /// Splitters whose container overflowed.
    pub spilling: usize,
    /// Spills that landed in another container.
    pub transfers: usize,
    /// Volume moved into receiving containers.
    pub volume_transferred: f32,
    /// Volume that left a container without reaching another one, including
    /// whatever a full receiver could not take.
    pub volume_lost: f32,
}

/// Owns the splitters of a scene and ticks them in registration order.
///
/// Splitters run one after another, so each container has at most one writer
/// at a time and a transfer made early in a tick is visible to splitters
/// ticked later in the same tick.
#[derive(Debug, Default)]
pub struct SpillSystem {
    splitters: Vec<Splitter>,
    index: FxHashMap<ContainerId, usize>,
}

impl SpillSystem {
    /// Creates an empty system.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `splitter`, replacing any splitter already draining the same container.
    ///
    /// Returns the replaced splitter.
    pub fn add(&mut self, splitter: Splitter) -> Option<Splitter> {
        let container = splitter.container();
        if let Some(&slot) = self.index.get(&container) {
            log::warn!("Replacing splitter for {container:?}");
            return Some(mem::replace(&mut self.splitters[slot], splitter));
        }
        self.index.insert(container, self.splitters.len());
        self.splitters.push(splitter);
        None
    }

    /// Unregisters the splitter draining `container`.
    pub fn remove(&mut self, container: ContainerId) -> Option<Splitter> {
        let slot = self.index.remove(&container)?;
        let removed = self.splitters.remove(slot);
        for index in self.index.values_mut() {
            if *index > slot {
                *index -= 1;
            }
        }
        Some(removed)
    }

    /// The splitter draining `container`.
    #[must_use]
    pub fn get(&self, container: ContainerId) -> Option<&Splitter> {
        self.index.get(&container).map(|&slot| &self.splitters[slot])
    }

    /// Number of registered splitters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.splitters.len()
    }

    /// Whether no splitter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.splitters.is_empty()
    }

    /// Splitters in tick order.
    pub fn iter(&self) -> impl Iterator<Item = &Splitter> {
        self.splitters.iter()
    }

    /// Current opening of every registered container that has one.
    pub fn openings<S>(&self, scene: &S) -> Vec<(ContainerId, Opening)>
    where
        S: SpillScene + ?Sized,
    {
        self.splitters
            .iter()
            .filter_map(|splitter| Some((splitter.container(), splitter.opening(scene)?)))
            .collect()
    }

    /// Ticks every splitter once and sums up what moved.
    pub fn tick<S>(
        &mut self,
        scene: &mut S,
        delta_time: f32,
        effects: &mut dyn EffectSink,
    ) -> SystemTickSummary
    where
        S: SpillScene + ?Sized,
    {
        let mut summary = SystemTickSummary::default();

        for splitter in &mut self.splitters {
            let report = splitter.tick(scene, delta_time, effects);
            let Some(spill) = report.spill else {
                continue;
            };
            summary.spilling += 1;

            match report.route.map(|route| route.outcome) {
                Some(RouteOutcome::Transferred {
                    amount, accepted, ..
                }) => {
                    summary.transfers += 1;
                    summary.volume_transferred += accepted;
                    summary.volume_lost += amount - accepted;
                }
                _ => summary.volume_lost += spill.volume,
            }
        }

        summary
    }
}
