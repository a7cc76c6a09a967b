//! Integration tests for swarm_steering
//!
//! End-to-end scenarios: agents sensing a snapshot world and resolving the
//! steering plan.

use approx::assert_relative_eq;
use swarm_steering::prelude::*;
use swarm_steering::{cohesion, separation, steering_force, MovementConfig, WanderConfig};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn id(index: u32) -> EntityId {
    EntityId::new(index, 0)
}

fn fan(category: &str, reach: f32, half_angle: f32, rays: usize) -> SensorSpec {
    SensorSpec::ray_fan(SensorConfig::new(reach, half_angle, rays).with_category(category))
}

fn neighbor(index: u32, position: Vec3) -> PerceivedEntity {
    PerceivedEntity {
        entity: id(index),
        category: Category::from("boid"),
        position,
        distance: position.length(),
    }
}

#[test]
fn test_seek_scenario() {
    init_logging();
    let mut world = SpatialWorld::default();
    world
        .insert(Body::sphere(id(1), "target", Vec3::new(10.0, 0.0, 0.0), 0.5))
        .unwrap();
    let ctx = QueryContext::new(&world);

    let config = AgentConfig::default()
        .with_movement(2.0, 1.0)
        .with_seek_sensor(fan("target", 20.0, 180.0, 4));
    let mut agent = AutonomousAgent::new(id(0), Vec3::ZERO, Quat::IDENTITY, config, 0);

    let outcome = agent.steer(&ctx);
    assert!(outcome.fired.contains(Stage::Seek));
    assert_relative_eq!(outcome.force.x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(outcome.force.y, 0.0, epsilon = 1e-5);
    assert_relative_eq!(outcome.force.z, 0.0, epsilon = 1e-5);
}

#[test]
fn test_seek_uses_first_result_only() {
    let mut world = SpatialWorld::default();
    // +X is the second fan direction, -X the third
    world.insert(Body::sphere(id(1), "food", Vec3::new(3.0, 0.0, 0.0), 0.5)).unwrap();
    world.insert(Body::sphere(id(2), "food", Vec3::new(-2.0, 0.0, 0.0), 0.5)).unwrap();
    let ctx = QueryContext::new(&world);

    let config = AgentConfig::default().with_seek_sensor(fan("food", 5.0, 180.0, 4));
    let mut agent = AutonomousAgent::new(id(0), Vec3::ZERO, Quat::IDENTITY, config, 0);

    let outcome = agent.steer(&ctx);
    assert!(outcome.force.x > 0.0);
}

#[test]
fn test_flock_scenario() {
    let mover = Movement::new(Vec3::ZERO, Quat::IDENTITY, &MovementConfig::default());
    let neighbors = [
        neighbor(1, Vec3::new(1.0, 0.0, 0.0)),
        neighbor(2, Vec3::new(-1.0, 0.0, 0.0)),
        neighbor(3, Vec3::new(0.0, 0.0, 1.0)),
    ];

    let pull = cohesion(&mover, &neighbors);
    let expected = steering_force(&mover, Vec3::new(0.0, 0.0, 1.0 / 3.0));
    assert_relative_eq!(pull.x, expected.x, epsilon = 1e-5);
    assert_relative_eq!(pull.z, expected.z, epsilon = 1e-5);
    assert!(pull.z > 0.0);
    assert_relative_eq!(pull.x, 0.0, epsilon = 1e-5);

    // the lateral pushes cancel, the one ahead pushes back
    let push = separation(&mover, &neighbors, 2.0);
    assert_relative_eq!(push.x, 0.0, epsilon = 1e-5);
    assert!(push.z < 0.0);
}

#[test]
fn test_flock_through_sensor() {
    let mut world = SpatialWorld::default();
    for (index, position) in [(1, Vec3::X), (2, Vec3::NEG_X), (3, Vec3::Z)] {
        world
            .insert(Body::sphere(id(index), "boid", position, 0.25).with_velocity(Vec3::Z))
            .unwrap();
    }
    let ctx = QueryContext::new(&world);

    let mut config = AgentConfig::default().with_flock_sensor(SensorSpec::proximity(
        SensorConfig::new(3.0, 180.0, 8).with_category("boid"),
    ));
    config.separation_radius = 2.0;
    config.flock_weights.separation = 0.0;
    config.flock_weights.alignment = 0.0;
    let mut agent = AutonomousAgent::new(id(0), Vec3::ZERO, Quat::IDENTITY, config, 0);

    let outcome = agent.steer(&ctx);
    assert!(outcome.has_target);
    assert!(outcome.fired.contains(Stage::Flock));
    assert_relative_eq!(outcome.force.x, 0.0, epsilon = 1e-5);
    assert_relative_eq!(outcome.force.z, 1.0, epsilon = 1e-5);
}

#[test]
fn test_symmetric_cohesion_is_zero() {
    let mover = Movement::new(Vec3::ZERO, Quat::IDENTITY, &MovementConfig::default());
    let neighbors = [
        neighbor(1, Vec3::new(2.0, 0.0, 0.0)),
        neighbor(2, Vec3::new(-2.0, 0.0, 0.0)),
        neighbor(3, Vec3::new(0.0, 0.0, 2.0)),
        neighbor(4, Vec3::new(0.0, 0.0, -2.0)),
    ];
    assert!(cohesion(&mover, &neighbors).length() < 1e-5);
}

fn avoidance_world() -> SpatialWorld {
    let mut world = SpatialWorld::default();
    world.insert(Body::sphere(id(1), "wall", Vec3::new(0.0, 0.0, 2.0), 0.5)).unwrap();
    world.insert(Body::sphere(id(2), "food", Vec3::new(-8.0, 0.0, 0.0), 0.5)).unwrap();
    world
}

#[test]
fn test_obstacle_avoidance_preempts_seek() {
    let world = avoidance_world();
    let ctx = QueryContext::new(&world);

    let mut config = AgentConfig::default()
        .with_movement(2.0, 1.0)
        .with_obstacle_sensor(fan("wall", 5.0, 180.0, 4))
        .with_seek_sensor(fan("food", 10.0, 180.0, 4));
    config.obstacle_weight = 2.5;
    let mut agent = AutonomousAgent::new(id(0), Vec3::ZERO, Quat::IDENTITY, config, 0);

    let outcome = agent.steer(&ctx);
    assert!(outcome.fired.contains(Stage::ObstacleAvoidance));
    assert_eq!(outcome.fired.len(), 1);
    assert!(!outcome.has_target);
    // first open direction is +X, scaled by the obstacle weight
    assert_relative_eq!(outcome.force.x, 2.5, epsilon = 1e-5);
    assert_relative_eq!(outcome.force.z, 0.0, epsilon = 1e-5);
}

#[test]
fn test_blocked_fan_falls_through_to_seek() {
    let world = avoidance_world();
    let ctx = QueryContext::new(&world);

    let config = AgentConfig::default()
        .with_movement(2.0, 1.0)
        .with_obstacle_sensor(fan("wall", 5.0, 0.0, 1))
        .with_seek_sensor(fan("food", 10.0, 180.0, 4));
    let mut agent = AutonomousAgent::new(id(0), Vec3::ZERO, Quat::IDENTITY, config, 0);

    let outcome = agent.steer(&ctx);
    assert!(!outcome.fired.contains(Stage::ObstacleAvoidance));
    assert!(outcome.fired.contains(Stage::Seek));
    assert_relative_eq!(outcome.force.x, -1.0, epsilon = 1e-5);
}

#[test]
fn test_clear_path_skips_avoidance() {
    let world = avoidance_world();
    let ctx = QueryContext::new(&world);

    // facing +X: the wall is off to the side
    let config = AgentConfig::default().with_obstacle_sensor(fan("wall", 5.0, 180.0, 4));
    let rotation = Quat::look_rotation(Vec3::X, Vec3::UP);
    let mut agent = AutonomousAgent::new(id(0), Vec3::ZERO, rotation, config, 0);

    let outcome = agent.steer(&ctx);
    assert!(!outcome.fired.contains(Stage::ObstacleAvoidance));
    assert!(outcome.fired.contains(Stage::Wander));
}

#[test]
fn test_avoidance_uses_velocity_heading() {
    let world = avoidance_world();
    let ctx = QueryContext::new(&world);

    // facing away from the wall but moving toward it
    let config = AgentConfig::default().with_obstacle_sensor(fan("wall", 5.0, 180.0, 4));
    let rotation = Quat::look_rotation(Vec3::NEG_Z, Vec3::UP);
    let mut agent = AutonomousAgent::new(id(0), Vec3::ZERO, rotation, config, 0);
    agent.movement_mut().velocity = Vec3::Z;

    let outcome = agent.steer(&ctx);
    assert!(outcome.fired.contains(Stage::ObstacleAvoidance));
}

#[test]
fn test_wander_is_deterministic_per_seed() {
    let world = SpatialWorld::default();
    let ctx = QueryContext::new(&world);
    let config = AgentConfig {
        wander: WanderConfig {
            radius: 1.5,
            distance: 2.0,
            displacement: 20.0,
        },
        ..Default::default()
    };

    let run = |seed: u64| {
        let mut agent = AutonomousAgent::new(id(0), Vec3::ZERO, Quat::IDENTITY, config.clone(), seed);
        (0..20)
            .map(|_| {
                let outcome = agent.steer(&ctx);
                agent.integrate(0.1);
                (outcome.force, agent.wander_state().angle)
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(run(42), run(42));
    assert_ne!(run(42), run(43));
}

#[test]
fn test_wander_target_within_radius() {
    let world = SpatialWorld::default();
    let ctx = QueryContext::new(&world);
    let wander = WanderConfig {
        radius: 1.5,
        distance: 2.0,
        displacement: 45.0,
    };
    let config = AgentConfig {
        wander,
        ..Default::default()
    }
    .with_movement(100.0, 1000.0);
    let mut agent = AutonomousAgent::new(id(0), Vec3::ZERO, Quat::IDENTITY, config, 9);

    for _ in 0..20 {
        // stationary agent with an unbounded budget steers exactly along the target
        agent.movement_mut().velocity = Vec3::ZERO;
        let before = agent.wander_state().angle;
        let outcome = agent.steer(&ctx);
        agent.integrate(0.0);

        let angle = agent.wander_state().angle.to_radians();
        let target = Vec3::new(angle.sin(), 0.0, angle.cos()) * wander.radius + Vec3::Z * wander.distance;
        let expected = target.normalize() * 100.0;
        assert_relative_eq!(outcome.force.x, expected.x, epsilon = 1e-2);
        assert_relative_eq!(outcome.force.z, expected.z, epsilon = 1e-2);
        assert!((target - Vec3::Z * wander.distance).length() <= wander.radius + 1e-4);

        let step = (agent.wander_state().angle - before).rem_euclid(360.0);
        assert!(step <= 45.0 + 1e-3 || step >= 315.0 - 1e-3);
    }
}

#[test]
fn test_orientation_faces_velocity_after_tick() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.add_obstacle(Obstacle::sphere("food", Vec3::new(5.0, 0.0, 0.0), 0.5));
    let config = AgentConfig::default().with_seek_sensor(fan("food", 10.0, 180.0, 4));
    let agent = sim.spawn_agent(Vec3::ZERO, Quat::IDENTITY, config);

    sim.tick(0.5);
    let agent = sim.agent(agent).unwrap();
    let velocity = agent.velocity().normalize();
    let forward = agent.movement().direction();
    assert_relative_eq!(velocity.x, forward.x, epsilon = 1e-4);
    assert_relative_eq!(velocity.z, forward.z, epsilon = 1e-4);
}

#[test]
fn test_box_obstacle_is_avoided() {
    let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
    sim.add_obstacle(Obstacle::cuboid("wall", Vec3::new(0.0, 0.0, 3.0), Vec3::new(5.0, 2.0, 0.5)));
    let config = AgentConfig::default().with_obstacle_sensor(fan("wall", 4.0, 180.0, 8));
    sim.spawn_agent(Vec3::ZERO, Quat::IDENTITY, config);

    let report = sim.tick(0.1);
    assert_eq!(report.count(Stage::ObstacleAvoidance), 1);
    assert_eq!(report.count(Stage::Wander), 0);
}

#[test]
fn test_snapshot_isolates_agents_within_tick() {
    // two agents seeking each other: both must see the other's pre-tick position
    let mut sim = Simulation::new(SimulationConfig {
        parallel: false,
        ..Default::default()
    })
    .unwrap();
    let config = AgentConfig::default()
        .with_movement(2.0, 1.0)
        .with_seek_sensor(fan("boid", 10.0, 180.0, 4));
    let a = sim.spawn_agent(Vec3::new(-3.0, 0.0, 0.0), Quat::IDENTITY, config.clone());
    let b = sim.spawn_agent(Vec3::new(3.0, 0.0, 0.0), Quat::IDENTITY, config);

    sim.tick(1.0);
    let pa = sim.agent(a).unwrap().position();
    let pb = sim.agent(b).unwrap().position();
    assert_relative_eq!(pa.x, -2.0, epsilon = 1e-5);
    assert_relative_eq!(pb.x, 2.0, epsilon = 1e-5);
}

#[test]
fn test_insertion_order_does_not_matter() {
    let spawn_all = |order: &[usize]| {
        let mut sim = Simulation::new(SimulationConfig::default()).unwrap();
        let flock = SensorSpec::proximity(SensorConfig::new(5.0, 180.0, 8).with_category("boid"));
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.5),
            Vec3::new(-1.0, 0.0, 1.5),
            Vec3::new(0.5, 0.0, -2.0),
        ];
        for &i in order {
            let config = AgentConfig::default().with_flock_sensor(flock.clone()).with_seed(i as u64);
            sim.spawn_agent(positions[i], Quat::IDENTITY, config);
        }
        for _ in 0..5 {
            sim.tick(0.1);
        }
        let mut result: Vec<_> = sim.agents().map(|a| (a.config().seed, a.position())).collect();
        result.sort_by_key(|(seed, _)| *seed);
        result
    };

    let forward = spawn_all(&[0, 1, 2, 3]);
    let reverse = spawn_all(&[3, 2, 1, 0]);
    for ((seed_a, pa), (seed_b, pb)) in forward.iter().zip(&reverse) {
        assert_eq!(seed_a, seed_b);
        assert_relative_eq!(pa.x, pb.x, epsilon = 1e-4);
        assert_relative_eq!(pa.z, pb.z, epsilon = 1e-4);
    }
}

#[test]
fn test_fan_sensor_probes_four_quadrants() {
    let sensor = RaycastPerception::new(SensorConfig::new(5.0, 180.0, 4));
    let dirs = sensor.local_directions();
    assert_eq!(dirs.len(), 4);
    assert_relative_eq!(dirs[0].z, 1.0, epsilon = 1e-5);
    for (i, a) in dirs.iter().enumerate() {
        for b in &dirs[i + 1..] {
            let degrees = angle_between(*a, *b).to_degrees();
            assert!((degrees - 90.0).abs() < 1e-3 || (degrees - 180.0).abs() < 1e-3);
        }
    }
}
