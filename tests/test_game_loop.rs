use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shooting_range::ammo::ReloadPhase;
use shooting_range::clock::{ClockError, TimerEvent};
use shooting_range::entities::ColorTag;
use shooting_range::game_loop::*;
use shooting_range::protocol::EntityKind;
use shooting_range::state::SimulationState;
use shooting_range::tuning::Tuning;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// No targets, default tuning.
fn make_loop() -> GameLoop {
    GameLoop::with_state(SimulationState::empty(Tuning::default()))
}

fn idle(dt: f32) -> FrameInput {
    FrameInput {
        aim: Vec3::NEG_Z,
        dt,
        ..FrameInput::default()
    }
}

fn firing(dt: f32) -> FrameInput {
    FrameInput {
        fire: true,
        ..idle(dt)
    }
}

// ── session start ─────────────────────────────────────────────────────────────

#[test]
fn new_session_has_initial_targets_and_full_magazine() {
    let mut rng = seeded_rng();
    let game = GameLoop::new(Tuning::default(), &mut rng);
    let s = game.state();

    assert_eq!(s.targets().len(), 5);
    assert_eq!(s.score(), 0);
    assert_eq!(s.ammo().current, 30);
    assert_eq!(s.viewpoint(), Vec3::new(0.0, 2.0, 0.0));
    assert!(s.clock().is_scheduled(TimerEvent::SpawnTick));

    for t in s.targets().iter_alive() {
        assert!(t.position.x.abs() <= 25.0 && t.position.z.abs() <= 25.0);
        assert!(t.position.y >= 0.5 && t.position.y <= 3.5);
        assert_eq!(t.velocity.y, 0.0);
    }
}

#[test]
fn initial_targets_appear_in_first_diff() {
    let mut rng = seeded_rng();
    let mut game = GameLoop::new(Tuning::default(), &mut rng);
    let diff = game.frame(&idle(1.0 / 60.0), &mut rng).unwrap();
    assert_eq!(diff.spawned_of(EntityKind::Target), 5);

    let diff = game.frame(&idle(1.0 / 60.0), &mut rng).unwrap();
    assert!(diff.is_quiet());
}

#[test]
fn same_seed_same_session() {
    let run = || {
        let mut rng = seeded_rng();
        let mut game = GameLoop::new(Tuning::default(), &mut rng);
        (0..120)
            .map(|_| game.frame(&firing(1.0 / 60.0), &mut rng).unwrap())
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

// ── fire & reload ─────────────────────────────────────────────────────────────

#[test]
fn fire_spawns_projectile_from_viewpoint() {
    let mut rng = seeded_rng();
    let mut game = make_loop();
    let diff = game.frame(&firing(0.0), &mut rng).unwrap();

    assert_eq!(diff.spawned_of(EntityKind::Projectile), 1);
    assert_eq!(diff.spawned[0].position, Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(diff.ammo.current, 29);
    assert!(diff.ammo_changed);

    let shot = game.state().projectiles().iter_alive().next().unwrap();
    assert_eq!(shot.velocity, Vec3::new(0.0, 0.0, -50.0));
}

#[test]
fn spawned_projectile_is_described_where_it_ends_the_frame() {
    let mut rng = seeded_rng();
    let mut game = make_loop();
    let diff = game.frame(&firing(0.1), &mut rng).unwrap();

    let shot = game.state().projectiles().iter_alive().next().unwrap();
    assert_eq!(diff.spawned[0].id, shot.id);
    assert_eq!(diff.spawned[0].position, shot.position);
    assert!((shot.position - Vec3::new(0.0, 2.0, -5.0)).length() < 1e-4);
}

#[test]
fn fire_with_empty_magazine_does_nothing() {
    let mut rng = seeded_rng();
    let mut game = make_loop();
    for _ in 0..30 {
        game.frame(&firing(0.0), &mut rng).unwrap();
    }
    let diff = game.frame(&firing(0.0), &mut rng).unwrap();
    assert_eq!(diff.spawned_of(EntityKind::Projectile), 0);
    assert_eq!(diff.ammo.current, 0);
    assert!(!diff.ammo_changed);
}

#[test]
fn reload_completes_after_duration() {
    let mut rng = seeded_rng();
    let mut game = make_loop();

    // frame 1 at t = 0.25: fire, then start the 2 s reload
    let diff = game
        .frame(&FrameInput { reload: true, ..firing(0.25) }, &mut rng)
        .unwrap();
    assert_eq!(diff.ammo.current, 29);
    assert!(diff.ammo.reloading);

    for _ in 2..=8 {
        game.frame(&idle(0.25), &mut rng).unwrap();
    }
    assert!(game.state().ammo().reloading);
    assert_eq!(game.state().reload_phase(), ReloadPhase::Reloading);
    assert_eq!(game.state().ammo().current, 29);

    // frame 9 at t = 2.25
    let diff = game.frame(&idle(0.25), &mut rng).unwrap();
    assert!(!diff.ammo.reloading);
    assert_eq!(diff.ammo.current, 30);
    assert!(diff.ammo_changed);
    assert_eq!(game.state().reload_phase(), ReloadPhase::Idle);
}

#[test]
fn repeated_reload_requests_schedule_one_completion() {
    let mut rng = seeded_rng();
    let mut game = make_loop();
    game.frame(&firing(0.25), &mut rng).unwrap();

    let reload = FrameInput { reload: true, ..idle(0.25) };
    game.frame(&reload, &mut rng).unwrap(); // t = 0.5, due 2.5
    game.frame(&reload, &mut rng).unwrap();
    game.frame(&reload, &mut rng).unwrap();

    for _ in 0..5 {
        game.frame(&idle(0.25), &mut rng).unwrap(); // t = 2.25
    }
    assert!(game.state().ammo().reloading);

    game.frame(&idle(0.25), &mut rng).unwrap(); // t = 2.5
    assert!(!game.state().ammo().reloading);
    assert_eq!(game.state().ammo().current, 30);

    // a duplicate completion would land at 2.75 or 3.0 and refill this shot
    game.frame(&firing(0.25), &mut rng).unwrap();
    game.frame(&idle(0.25), &mut rng).unwrap();
    assert_eq!(game.state().ammo().current, 29);
    assert!(!game.state().clock().is_scheduled(TimerEvent::ReloadComplete));
}

#[test]
fn fire_rejected_while_reloading() {
    let mut rng = seeded_rng();
    let mut game = make_loop();
    game.frame(&firing(0.1), &mut rng).unwrap();
    game.frame(&FrameInput { reload: true, ..idle(0.1) }, &mut rng).unwrap();

    let diff = game.frame(&firing(0.1), &mut rng).unwrap();
    assert_eq!(diff.spawned_of(EntityKind::Projectile), 0);
    assert_eq!(diff.ammo.current, 29);
}

// ── movement ──────────────────────────────────────────────────────────────────

#[test]
fn movement_is_added_to_viewpoint() {
    let mut rng = seeded_rng();
    let mut game = make_loop();
    let step = movement_intent(Vec3::new(3.0, 0.0, 4.0), 10.0, 0.5);
    assert!((step - Vec3::new(3.0, 0.0, 4.0)).length() < 1e-5);

    let diff = game
        .frame(&FrameInput { movement: step, ..idle(0.5) }, &mut rng)
        .unwrap();
    assert!((diff.viewpoint - Vec3::new(3.0, 2.0, 4.0)).length() < 1e-5);
}

#[test]
fn no_movement_for_zero_direction() {
    assert_eq!(movement_intent(Vec3::ZERO, 10.0, 1.0), Vec3::ZERO);
}

// ── hits & debris ─────────────────────────────────────────────────────────────

#[test]
fn kill_scores_and_spawns_fragments() {
    let mut rng = seeded_rng();
    let mut state = SimulationState::empty(Tuning::default());
    let target = state.insert_target(Vec3::new(0.0, 2.0, -50.0 / 60.0), Vec3::ZERO, ColorTag(0.3));
    let mut game = GameLoop::with_state(state);

    let diff = game.frame(&firing(1.0 / 60.0), &mut rng).unwrap();

    assert_eq!(diff.score_delta, 10);
    assert_eq!(diff.score, 10);
    assert!(diff.removed.contains(&target));
    assert_eq!(diff.spawned_of(EntityKind::Fragment), 15);
    assert_eq!(game.state().targets().len(), 0);
    assert_eq!(game.state().projectiles().len(), 0);

    for f in game.state().fragments().iter_alive() {
        assert_eq!(f.color(), Some(ColorTag(0.3)));
    }
    // a same-frame hit still reports the projectile as spawned, then removed
    let shot = diff
        .spawned
        .iter()
        .find(|d| d.kind == EntityKind::Projectile)
        .unwrap();
    assert!(diff.removed.contains(&shot.id));
}

#[test]
fn fragments_expire_after_lifetime() {
    let mut rng = seeded_rng();
    let mut state = SimulationState::empty(Tuning::default());
    state.spawn_burst(Vec3::new(0.0, 1.0, 0.0), ColorTag(0.0), &mut rng);
    let mut game = GameLoop::with_state(state);

    for _ in 0..5 {
        game.frame(&idle(0.5), &mut rng).unwrap(); // t = 2.5
    }
    assert_eq!(game.state().fragments().len(), 15);

    let diff = game.frame(&idle(0.5), &mut rng).unwrap(); // t = 3.0
    assert_eq!(diff.removed.len(), 15);
    assert!(game.state().fragments().is_empty());
}

#[test]
fn thirty_shots_at_lined_up_targets() {
    let mut rng = seeded_rng();
    let tuning = Tuning::default();
    let dt = 1.0 / 60.0;
    let aim = Vec3::NEG_Z;

    let mut state = SimulationState::empty(tuning);
    let spot = tuning.viewpoint_start + aim * tuning.projectile_speed * dt;
    for i in 0..5 {
        state.insert_target(spot, Vec3::ZERO, ColorTag(i as f32 / 5.0));
    }
    let mut game = GameLoop::with_state(state);

    let mut kills = 0;
    for _ in 0..30 {
        let diff = game.frame(&FrameInput { aim, fire: true, dt, ..FrameInput::default() }, &mut rng).unwrap();
        kills += diff.score_delta / 10;
        assert_eq!(diff.spawned_of(EntityKind::Fragment) as u32, diff.score_delta / 10 * 15);
    }

    let s = game.state();
    assert_eq!(s.ammo().current, 0);
    assert!(kills <= 5);
    assert_eq!(kills, 5);
    assert_eq!(s.score(), 10 * kills);
    assert_eq!(s.targets().len(), 0);
}

// ── population ────────────────────────────────────────────────────────────────

#[test]
fn spawn_tick_tops_up_until_cap() {
    let mut rng = seeded_rng();
    let mut game = GameLoop::new(Tuning::default(), &mut rng);

    let diff = game.frame(&idle(2.0), &mut rng).unwrap();
    assert_eq!(diff.spawned_of(EntityKind::Target), 6); // 5 initial + 1 tick
    assert_eq!(game.state().targets().len(), 6);

    // ten intervals in one long frame, capped at 10
    game.frame(&idle(20.0), &mut rng).unwrap();
    assert_eq!(game.state().targets().len(), 10);
}

#[test]
fn zero_spawn_interval_fills_to_cap_and_keeps_running() {
    let mut rng = seeded_rng();
    let tuning = Tuning {
        spawn_interval: 0.0,
        ..Tuning::default()
    };
    let mut game = GameLoop::with_state(SimulationState::empty(tuning));

    game.frame(&idle(2.5), &mut rng).unwrap();
    assert_eq!(game.state().targets().len(), 10);

    for _ in 0..10 {
        game.frame(&idle(0.5), &mut rng).unwrap();
    }
    assert_eq!(game.state().targets().len(), 10);
}

// ── bad input ─────────────────────────────────────────────────────────────────

#[test]
fn negative_dt_rejected_before_any_change() {
    let mut rng = seeded_rng();
    let mut game = make_loop();
    let err = game.frame(&firing(-1.0), &mut rng).unwrap_err();

    assert_eq!(err, ClockError::Negative(-1.0));
    assert_eq!(game.state().ammo().current, 30);
    assert_eq!(game.state().clock().frames(), 0);
}

#[test]
fn diff_serializes_as_json_line() {
    let mut rng = seeded_rng();
    let mut game = make_loop();
    let diff = game.frame(&firing(0.5), &mut rng).unwrap();
    let line = serde_json::to_string(&diff).unwrap();

    assert!(!line.contains('\n'));
    let v: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(v["frame"], 1);
    assert_eq!(v["ammo"]["current"], 29);
    assert_eq!(v["spawned"][0]["kind"], "Projectile");
}
