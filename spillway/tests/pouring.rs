//! End-to-end pours through the reference box scene.

use std::f32::consts::PI;
use std::path::Path;

use glam::{Quat, Vec3};
use spillway::{
    BoxScene, DEFAULT_CONFIG_PATH, SimpleContainer, Simulation, SimulationConfig,
    config::DEFAULT_CONFIG,
};
use spillway_core::{
    ContainerStore, LiquidContainer, NoEffects, OverflowKind, RouteOutcome, SceneQuery, Splitter,
    SplitterConfig,
};
use spillway_utils::Transform;

fn default_config() -> SimulationConfig {
    SimulationConfig::parse(DEFAULT_CONFIG, Path::new(DEFAULT_CONFIG_PATH))
        .expect("bundled config is valid")
}

fn fill_of(simulation: &Simulation, name: &str) -> f32 {
    let scene = simulation.scene();
    let id = scene.container_named(name).expect("container exists");
    scene.container(id).expect("container exists").fill_amount()
}

fn total_fill(simulation: &Simulation) -> f32 {
    simulation
        .scene()
        .containers()
        .map(|(_, container)| container.fill_amount())
        .sum()
}

#[test]
fn test_bundled_scene_pours_without_losing_liquid() {
    let config = default_config();
    let mut simulation = Simulation::new(&config).expect("bundled scene builds");
    let before = total_fill(&simulation);

    let summary = simulation.run();

    assert_eq!(summary.ticks, config.ticks);
    assert!(summary.transfers > 0);
    assert_eq!(summary.effects, simulation.effects().effects.len());
    assert!((before - total_fill(&simulation) - summary.volume_lost).abs() < 1e-3);
    assert!(summary.volume_lost < 1e-3);

    // The jar empties through the mist into the bucket
    assert_eq!(fill_of(&simulation, "jar"), 0.0);
    assert!((fill_of(&simulation, "bucket") - 0.9).abs() < 1e-3);

    // The pitcher pours down the ramp into the basin until its level drops below the rim
    assert!(fill_of(&simulation, "basin") > 0.1);
    let pitcher = simulation
        .scene()
        .container_named("pitcher")
        .expect("pitcher exists");
    let percent = simulation
        .scene()
        .container(pitcher)
        .expect("pitcher exists")
        .fill_amount_percent();
    assert!(percent > 0.5 && percent < 0.7, "pitcher ended at {percent}");
    assert!(
        !simulation
            .system()
            .get(pitcher)
            .expect("pitcher has a splitter")
            .is_splitting()
    );
}

#[test]
fn test_spill_runs_off_ramp_into_basin() {
    let config = default_config();
    let mut simulation = Simulation::new(&config).expect("bundled scene builds");
    simulation.step();

    let pitcher = simulation
        .scene()
        .container_named("pitcher")
        .expect("pitcher exists");
    let basin = simulation
        .scene()
        .container_named("basin")
        .expect("basin exists");
    let report = simulation
        .system()
        .get(pitcher)
        .expect("pitcher has a splitter")
        .last_report();

    let spill = report.spill.expect("pitcher overflows");
    assert_ne!(spill.kind, OverflowKind::Inverted);
    let route = report.route.as_ref().expect("spill was routed");
    assert_eq!(route.hops, 1);
    let RouteOutcome::Transferred {
        target,
        amount,
        accepted,
    } = route.outcome
    else {
        panic!("expected a transfer, got {:?}", route.outcome);
    };
    assert_eq!(target, basin);
    assert_eq!(amount, spill.volume);
    assert!((accepted - amount).abs() < 1e-6);
}

#[test]
fn test_tipping_a_cup_starts_the_pour() {
    let mut scene = BoxScene::new();
    let (cup, _) = scene.add_container(
        SimpleContainer::new("cup", Vec3::splat(0.25), 1.0)
            .placed(Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY)
            .filled(0.5),
    );
    let (bowl, bowl_collider) = scene.add_container(
        SimpleContainer::new("bowl", Vec3::splat(0.5), 4.0)
            .placed(Vec3::new(0.0, 0.5, 0.0), Quat::IDENTITY),
    );
    scene.add_obstacle(
        "floor",
        Transform::from_position_rotation(Vec3::new(0.0, -0.5, 0.0), Quat::IDENTITY),
        Vec3::new(5.0, 0.5, 5.0),
        false,
    );

    let config = SimulationConfig {
        ticks: 20,
        ..SimulationConfig::default()
    };
    let mut simulation =
        Simulation::with_scene(scene, &config).expect("default settings are valid");

    assert_eq!(simulation.step().spilling, 0);
    assert_eq!(fill_of(&simulation, "bowl"), 0.0);

    simulation.scene_mut().set_container_transform(
        cup,
        Transform::from_position_rotation(Vec3::new(0.0, 2.0, 0.0), Quat::from_rotation_x(PI)),
    );
    let opening = simulation
        .scene()
        .opening_of(bowl_collider)
        .expect("bowl is open");
    assert_eq!(opening.container, bowl);

    let summary = simulation.run();
    assert_eq!(summary.spilling_ticks, 20);
    assert_eq!(summary.transfers, 20);
    assert!((fill_of(&simulation, "cup") + fill_of(&simulation, "bowl") - 0.5).abs() < 1e-4);
    assert!(fill_of(&simulation, "bowl") > 0.0);
}

#[test]
fn test_closed_container_holds_when_inverted() {
    let mut scene = BoxScene::new();
    let mut jar = SimpleContainer::new("jar", Vec3::splat(0.25), 1.0)
        .placed(Vec3::new(0.0, 1.0, 0.0), Quat::from_rotation_x(PI))
        .filled(0.8);
    jar.open = false;
    let (jar, _) = scene.add_container(jar);

    let mut splitter = Splitter::new(jar, SplitterConfig::default()).expect("valid settings");
    let report = splitter.tick(&mut scene, 1.0, &mut NoEffects);

    assert!(report.spill.is_none());
    assert_eq!(scene.container(jar).expect("jar exists").fill_amount_percent(), 0.8);
}
