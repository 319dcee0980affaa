//! # Spillway Core
//!
//! Overflow detection and liquid transfer between open containers.
//!
//! Each tick a [`Splitter`] rebuilds its container's opening, checks whether
//! the liquid surface crosses the rim, removes the spilled fraction and routes
//! it downward through the scene until it lands in another container's opening,
//! runs off too many surfaces, or is lost.
//!
//! # Architecture
//!
//! - [`LiquidContainer`], [`ContainerStore`], [`SceneQuery`], [`EffectSink`] -
//!   the host-side collaborators the simulation reads and mutates
//! - [`Opening`] - per-tick rim geometry of a container
//! - [`check_overflow`] - decides whether and where liquid leaves the container
//! - [`quantify_spill`] - converts tilt into a flow rate and drains the source
//! - [`TransferRouter`] - hop-bounded walk from the spill point to a receiver
//! - [`EffectNotifier`] - fire-and-forget visual cue at the spill point
//! - [`Splitter`] / [`SpillSystem`] - per-container controller and tick coordinator

pub mod config;
pub mod container;
pub mod effect;
pub mod opening;
pub mod overflow;
pub mod quantify;
pub mod router;
pub mod scene;
pub mod splitter;
pub mod system;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, SplitterConfig};
pub use container::{ContainerId, ContainerStore, LiquidContainer};
pub use effect::{EffectNotifier, EffectSink, NoEffects, RecordingSink, SpillEffect};
pub use opening::Opening;
pub use overflow::{OverflowKind, SpillOrigin, check_overflow};
pub use quantify::{FLOW_BIAS, SpillStep, flow_scale, quantify_spill};
pub use router::{RouteOutcome, RouteReport, RouteRequest, TransferRouter};
pub use scene::{ColliderId, Hit, HitBuffer, LiquidOpening, SceneQuery, SpillScene};
pub use splitter::{SpillEvent, Splitter, TickReport};
pub use system::{SpillSystem, SystemTickSummary};
