//! Visual and audio feedback at the spill point.

use glam::{Vec3, Vec4};

/// A cue requested at a spill point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpillEffect {
    /// Where the liquid leaves the container.
    pub position: Vec3,
    /// Uniform size of the cue: opening radius times flow scale.
    pub size: f32,
    /// Liquid tint.
    pub color: Vec4,
}

/// Receives spill cues. Purely observational.
pub trait EffectSink {
    /// Plays a cue. Returns `false` if nothing could be played, which callers ignore.
    fn trigger(&mut self, effect: SpillEffect) -> bool;
}

impl<F: FnMut(SpillEffect)> EffectSink for F {
    fn trigger(&mut self, effect: SpillEffect) -> bool {
        self(effect);
        true
    }
}

/// Sink for hosts without any cue configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEffects;

impl EffectSink for NoEffects {
    fn trigger(&mut self, _effect: SpillEffect) -> bool {
        false
    }
}

/// Sink that keeps every cue, for inspection and replay.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// Cues in the order they were triggered.
    pub effects: Vec<SpillEffect>,
}

impl EffectSink for RecordingSink {
    fn trigger(&mut self, effect: SpillEffect) -> bool {
        self.effects.push(effect);
        true
    }
}

/// Sizes and dispatches spill cues.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectNotifier;

impl EffectNotifier {
    /// Sends a cue sized relative to the opening to `sink`.
    ///
    /// A sink that cannot play anything never affects the simulation.
    pub fn notify(
        sink: &mut dyn EffectSink,
        position: Vec3,
        flow_scale: f32,
        opening_radius: f32,
        color: Vec4,
    ) {
        let effect = SpillEffect {
            position,
            size: opening_radius * flow_scale,
            color,
        };
        if !sink.trigger(effect) {
            log::debug!("No spill cue played at {position}");
        }
    }
}
