//! End-to-end movement scenarios against a parry-backed world.

use glam::Vec3;
use jetstride_physics::collision::SKIN_DISTANCE;
use jetstride_physics::movement::{
    resolve, stay_on_ground, try_step, update_ground, MoveContext, MoveState, MovementEvent,
    ThrustLatch,
};
use jetstride_physics::{
    CollisionWorld, CommandButtons, ContentFlags, MovementConfig, PlayerCommand, PlayerController,
    SweepQuery, TraceFilter,
};

const DT: f32 = 1.0 / 60.0;

fn floor() -> CollisionWorld {
    let mut world = CollisionWorld::new();
    world
        .add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0), ContentFlags::SOLID)
        .unwrap();
    world
}

/// Floor plus a block of the given height whose riser faces -X at x=1.
fn floor_with_block(height: f32) -> CollisionWorld {
    let mut world = floor();
    world
        .add_box(
            Vec3::new(3.0, height / 2.0, 0.0),
            Vec3::new(2.0, height / 2.0, 5.0),
            ContentFlags::SOLID,
        )
        .unwrap();
    world
}

/// Floor plus a long wall whose face looks down -Z at z=0.5.
fn floor_with_wall() -> CollisionWorld {
    let mut world = floor();
    world
        .add_box(Vec3::new(0.0, 2.0, 1.0), Vec3::new(50.0, 2.0, 0.5), ContentFlags::SOLID)
        .unwrap();
    world
}

fn forward_command() -> PlayerCommand {
    PlayerCommand {
        forward_move: 1.0,
        ..Default::default()
    }
}

fn thrust_command() -> PlayerCommand {
    let mut command = PlayerCommand::default();
    command.buttons.press(CommandButtons::THRUST);
    command
}

#[test]
fn unobstructed_move_completes() {
    let world = floor();
    let config = MovementConfig::default();
    let ctx = MoveContext::new(&world, &config);

    let start = Vec3::new(-3.0, 0.5, 2.0);
    let velocity = Vec3::new(4.0, 1.0, -3.0);
    let mut state = MoveState::new(start, velocity);
    let fraction = resolve(&ctx, &mut state, 0.25, true, config.max_iterations);

    assert_eq!(fraction, 1.0);
    assert!((state.position - (start + velocity * 0.25)).length() < 1e-5);
    assert_eq!(state.velocity, velocity);
}

#[test]
fn blocked_move_reports_hit_fraction() {
    let mut world = CollisionWorld::new();
    world
        .add_box(Vec3::new(2.5, 2.0, 0.0), Vec3::new(0.5, 2.0, 5.0), ContentFlags::SOLID)
        .unwrap();
    let config = MovementConfig::default();
    let ctx = MoveContext::new(&world, &config);

    let start = Vec3::new(0.0, 0.5, 0.0);
    let velocity = Vec3::new(10.0, 0.0, 0.0);
    let expected = world.sweep(config.shape(), start, start + velocity * 0.5, TraceFilter::ACTOR);

    let mut state = MoveState::new(start, velocity);
    let fraction = resolve(&ctx, &mut state, 0.5, false, config.max_iterations);

    assert!(expected.hit_something());
    assert!((fraction - expected.fraction).abs() < 1e-5, "{fraction} vs {}", expected.fraction);
    assert!(state.velocity.dot(expected.normal_or_up()) >= -1e-5);
}

#[test]
fn step_within_height_climbs() {
    let world = floor_with_block(0.35);
    let config = MovementConfig::default();
    let ctx = MoveContext::new(&world, &config);

    let start = Vec3::new(0.3, 0.002, 0.0);
    let mut state = MoveState::new(start, Vec3::new(config.max_speed, 0.0, 0.0));
    let fraction = resolve(&ctx, &mut state, 0.1, true, config.max_iterations);

    assert!(state.stepped);
    assert!(fraction > 0.99, "fraction={fraction}");
    let rise = state.position.y - start.y;
    assert!((rise - 0.35).abs() < 0.01, "rise={rise}");
    assert!(state.velocity.x > 0.0);
}

#[test]
fn step_too_tall_is_blocked() {
    let world = floor_with_block(0.5);
    let config = MovementConfig::default();
    let ctx = MoveContext::new(&world, &config);

    let start = Vec3::new(0.3, 0.002, 0.0);
    let mut state = MoveState::new(start, Vec3::new(config.max_speed, 0.0, 0.0));
    resolve(&ctx, &mut state, 0.1, true, config.max_iterations);

    assert!(!state.stepped);
    assert!((state.position.y - start.y).abs() < 1e-4);
    assert!(state.position.x < 0.6 + 1e-3);
}

#[test]
fn step_of_exactly_step_height_climbs() {
    let config = MovementConfig::default();
    let world = floor_with_block(config.step_height);
    let ctx = MoveContext::new(&world, &config);

    let start = Vec3::new(0.3, 0.002, 0.0);
    let mut state = MoveState::new(start, Vec3::new(config.max_speed, 0.0, 0.0));
    resolve(&ctx, &mut state, 0.1, true, config.max_iterations);

    assert!(state.stepped);
    let rise = state.position.y - start.y;
    assert!((rise - config.step_height).abs() < 1e-3, "rise={rise}");
    assert!(state.position.x > 0.6);
}

#[test]
fn step_just_over_step_height_fails_cleanly() {
    let config = MovementConfig::default();
    let world = floor_with_block(config.step_height + 0.005);
    let ctx = MoveContext::new(&world, &config);

    let pressed = MoveState {
        position: Vec3::new(0.598, 0.002, 0.0),
        velocity: Vec3::new(config.max_speed, 0.0, 0.0),
        fraction_remaining: 0.6,
        stepped: false,
    };
    let mut state = pressed;
    assert!(!try_step(&ctx, &mut state, Vec3::NEG_X, DT));
    assert_eq!(state, pressed);

    let start = Vec3::new(0.3, 0.002, 0.0);
    let mut state = MoveState::new(start, Vec3::new(config.max_speed, 0.0, 0.0));
    resolve(&ctx, &mut state, 0.1, true, config.max_iterations);
    assert!(!state.stepped);
    assert!((state.position.y - start.y).abs() < 1e-4);
}

#[test]
fn failed_steps_leave_state_unchanged() {
    let config = MovementConfig::default();
    let pressed = MoveState {
        position: Vec3::new(0.598, 0.002, 0.0),
        velocity: Vec3::new(config.max_speed, 0.0, 0.0),
        fraction_remaining: 0.6,
        stepped: false,
    };

    // Too tall.
    let world = floor_with_block(config.step_height + 0.1);
    let ctx = MoveContext::new(&world, &config);
    let mut state = pressed;
    assert!(!try_step(&ctx, &mut state, Vec3::NEG_X, DT));
    assert_eq!(state, pressed);

    // Low riser topped by a slope too steep to land on.
    let mut world = floor();
    let slope_top = 0.2 + 0.5 * 50.0_f32.to_radians().tan();
    let points = [
        Vec3::new(1.0, 0.0, -1.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(1.0, 0.2, -1.0),
        Vec3::new(1.0, 0.2, 1.0),
        Vec3::new(1.5, 0.0, -1.0),
        Vec3::new(1.5, 0.0, 1.0),
        Vec3::new(1.5, slope_top, -1.0),
        Vec3::new(1.5, slope_top, 1.0),
    ];
    world.add_convex_hull(&points, ContentFlags::SOLID).unwrap();
    let ctx = MoveContext::new(&world, &config);
    let mut state = pressed;
    assert!(!try_step(&ctx, &mut state, Vec3::NEG_X, DT));
    assert_eq!(state, pressed);
}

#[test]
fn ground_probe_is_idempotent() {
    let world = floor_with_block(0.2);
    let config = MovementConfig::default();
    let ctx = MoveContext::new(&world, &config);

    for position in [Vec3::new(-2.0, 0.002, 0.0), Vec3::new(1.1, 0.202, 0.0), Vec3::new(0.0, 3.0, 0.0)] {
        let velocity = Vec3::new(2.0, -1.0, 0.0);
        let first = update_ground(&ctx, position, velocity, false);
        let second = update_ground(&ctx, position, velocity, false);
        assert_eq!(first, second);
    }
}

#[test]
fn ground_snap_keeps_skin_gap() {
    let world = floor();
    let config = MovementConfig::default();
    let ctx = MoveContext::new(&world, &config);

    for y in [0.002, 0.03, 0.2] {
        let snapped = stay_on_ground(&ctx, Vec3::new(0.1, y, 0.0));
        assert!((snapped.y - SKIN_DISTANCE).abs() < 1e-4, "from {y}: y={}", snapped.y);
    }
}

#[test]
fn walking_on_flat_ground_holds_skin_height() {
    let world = floor();
    let controller = PlayerController::with_default_config();

    let mut state = controller.new_state(Vec3::ZERO);
    controller.spawn_at(&mut state, Vec3::ZERO, &world);

    for _ in 0..60 {
        controller.update(&mut state, &forward_command(), &world, DT);
        assert!(state.flags.on_ground());
        assert!((state.position.y - SKIN_DISTANCE).abs() < 1e-4, "y={}", state.position.y);
    }
    assert!(state.position.x > 2.0);
}

#[test]
fn walking_inside_skin_stays_grounded() {
    let world = floor();
    let controller = PlayerController::with_default_config();

    let mut state = controller.new_state(Vec3::new(0.0, 0.0005, 0.0));
    state.velocity = Vec3::new(controller.config().max_speed, 0.0, 0.0);

    let events = controller.update(&mut state, &forward_command(), &world, DT);

    assert!(state.flags.on_ground());
    assert!(!events.contains(MovementEvent::Airborne));
    assert!(state.velocity.y.abs() < 1e-3, "velocity={:?}", state.velocity);
    assert!(state.position.x > 0.05, "x={}", state.position.x);
    assert!((0.0..0.01).contains(&state.position.y), "y={}", state.position.y);
}

#[test]
fn walking_along_wall_has_no_kicks() {
    let world = floor_with_wall();
    let controller = PlayerController::with_default_config();

    // Facing slightly into the wall so the actor slides along it.
    let mut state = controller.new_state(Vec3::ZERO);
    state.yaw = 0.05;
    controller.spawn_at(&mut state, Vec3::ZERO, &world);

    let mut touched = false;
    for tick in 0..300 {
        let events = controller.update(&mut state, &forward_command(), &world, DT);

        assert!(state.flags.on_ground(), "tick {tick}: airborne at {:?}", state.position);
        assert!(!events.contains(MovementEvent::Airborne), "tick {tick}");
        assert!((0.0..0.01).contains(&state.position.y), "tick {tick}: y={}", state.position.y);
        assert!(state.velocity.y.abs() < 1e-3, "tick {tick}: velocity={:?}", state.velocity);
        assert!(state.velocity.z >= -0.05, "tick {tick}: velocity={:?}", state.velocity);
        assert!(state.position.z <= 0.1 + 1e-3, "tick {tick}: z={}", state.position.z);
        touched |= state.position.z > 0.09;
    }

    assert!(touched);
    assert!(state.position.x > 20.0, "x={}", state.position.x);
}

#[test]
fn blocked_walk_keeps_clipped_velocity() {
    let mut world = floor();
    world
        .add_box(Vec3::new(1.5, 2.0, 0.0), Vec3::new(0.5, 2.0, 5.0), ContentFlags::SOLID)
        .unwrap();
    let controller = PlayerController::with_default_config();

    let spawn = Vec3::new(0.598, 0.0, 0.0);
    let mut state = controller.new_state(spawn);
    controller.spawn_at(&mut state, spawn, &world);

    for _ in 0..10 {
        controller.update(&mut state, &forward_command(), &world, DT);
        assert!(state.velocity.x.abs() < 1e-3, "velocity={:?}", state.velocity);
        assert!((state.position.x - spawn.x).abs() < 1e-3, "x={}", state.position.x);
        assert!(state.flags.on_ground());
    }
}

#[test]
fn at_rest_on_flat_ground_recharges() {
    let world = floor();
    let controller = PlayerController::new(MovementConfig::default()).unwrap();
    let config = controller.config().clone();

    let mut state = controller.new_state(Vec3::ZERO);
    controller.spawn_at(&mut state, Vec3::ZERO, &world);
    state.thrust.energy = 50.0;

    controller.update(&mut state, &PlayerCommand::default(), &world, DT);

    assert!(state.flags.on_ground());
    assert!(state.ground_normal.y > 0.99);
    assert!(state.horizontal_speed() < 1e-5);
    let expected = 50.0 + config.thrust.charge_rate * DT;
    assert!((state.thrust.energy - expected).abs() < 1e-4, "energy={}", state.thrust.energy);
}

#[test]
fn depleted_thrust_rearms_past_cutoff() {
    let world = floor();
    let controller = PlayerController::with_default_config();
    let config = controller.config().clone();

    let mut state = controller.new_state(Vec3::ZERO);
    controller.spawn_at(&mut state, Vec3::ZERO, &world);
    state.thrust.energy = 0.0;
    state.thrust.latch = ThrustLatch::Depleted;
    let mut idle = state;

    // Requesting thrust while depleted changes nothing but the request.
    let events = controller.update(&mut state, &thrust_command(), &world, DT);
    controller.update(&mut idle, &PlayerCommand::default(), &world, DT);
    assert!(events.is_empty());
    assert_eq!(state.velocity, idle.velocity);
    assert_eq!(state.position, idle.position);
    assert!(state.thrust.energy > 0.0);
    assert!(!state.flags.thrusting());

    let mut rearmed = false;
    for _ in 0..120 {
        let events = controller.update(&mut state, &thrust_command(), &world, DT);
        assert!(!state.flags.thrusting());
        if events.contains(MovementEvent::ThrustReady) {
            rearmed = true;
            break;
        }
        assert!(state.thrust.energy <= config.thrust.rearm_threshold + 1e-3);
    }
    assert!(rearmed);
    assert!(state.thrust.energy > config.thrust.rearm_threshold);

    let events = controller.update(&mut state, &thrust_command(), &world, DT);
    assert!(events.contains(MovementEvent::ThrustStart));
    assert!(state.flags.thrusting());
}

#[test]
fn unwalkable_slope_never_grounds() {
    let mut world = CollisionWorld::new();
    world
        .add_oriented_box(
            Vec3::ZERO,
            Vec3::new(20.0, 0.5, 20.0),
            Vec3::Z * 60.0_f32.to_radians(),
            ContentFlags::SOLID,
        )
        .unwrap();
    let controller = PlayerController::with_default_config();

    let mut state = controller.new_state(Vec3::ZERO);
    controller.spawn_at(&mut state, Vec3::new(0.0, 3.0, 0.0), &world);
    let start = state.position;

    for _ in 0..30 {
        controller.update(&mut state, &PlayerCommand::default(), &world, DT);
        assert!(!state.flags.on_ground(), "grounded at {:?}", state.position);
    }

    assert!(state.velocity.y < -1.0, "velocity={:?}", state.velocity);
    assert!(state.position.y < start.y - 0.3, "y={} start={}", state.position.y, start.y);
}

#[test]
fn controller_walks_up_stairs() {
    let mut world = floor();
    for i in 0..4 {
        let top = 0.2 * (i + 1) as f32;
        world
            .add_box(
                Vec3::new(12.0 + 0.4 * i as f32, top / 2.0, 0.0),
                Vec3::new(10.0, top / 2.0, 2.0),
                ContentFlags::SOLID,
            )
            .unwrap();
    }
    let controller = PlayerController::with_default_config();

    let mut state = controller.new_state(Vec3::ZERO);
    controller.spawn_at(&mut state, Vec3::ZERO, &world);

    let mut stepped = false;
    for _ in 0..90 {
        let events = controller.update(&mut state, &forward_command(), &world, DT);
        stepped |= events.contains(MovementEvent::Step);
    }

    assert!(stepped);
    assert!(state.position.x > 4.0, "x={}", state.position.x);
    assert!(state.position.y > 0.75, "y={}", state.position.y);
}

#[test]
fn overhang_free_falls() {
    // A wall leaning over the actor: its face normal points 5° below horizontal.
    let mut world = CollisionWorld::new();
    world
        .add_oriented_box(
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.5, 3.0, 3.0),
            Vec3::Z * 5.0_f32.to_radians(),
            ContentFlags::SOLID,
        )
        .unwrap();
    let controller = PlayerController::with_default_config();
    let gravity = controller.config().gravity;

    let mut state = controller.new_state(Vec3::new(-0.4, 3.0, 0.0));
    for tick in 1..=30 {
        controller.update(&mut state, &PlayerCommand::default(), &world, DT);
        assert!(!state.flags.on_ground());
        let expected = -gravity * DT * tick as f32;
        assert!((state.velocity.y - expected).abs() < 1e-3, "tick {tick}: {:?}", state.velocity);
    }
    assert!(state.position.y < 3.0 - 1.5);
}
