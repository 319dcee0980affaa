//! # Spillway
//!
//! A headless liquid-pouring simulation built on [`spillway_core`].
//!
//! The binary loads a [`SimulationConfig`] from `spillway_config.json5`,
//! builds a [`BoxScene`] of box-shaped containers and obstacles, attaches a
//! splitter to every container and runs it at a fixed tick rate.

pub mod config;
pub mod scene;
pub mod simulation;

pub use config::{ConfigError, DEFAULT_CONFIG_PATH, SimulationConfig};
pub use scene::{
    BoxScene, ContainerConfig, ObstacleConfig, SceneConfig, SceneError, SimpleContainer,
};
pub use simulation::{RunSummary, Simulation, SimulationError};
