//! Per-frame orchestration.
//!
//! `GameLoop::frame` runs the whole pipeline for one frame in a fixed order
//! and returns the diff for the presentation layer.  All randomness comes
//! through the injected `rng` so callers control determinism (tests use a
//! seeded RNG).

use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::clock::{ClockError, TimerEvent};
use crate::collision::{self, CollisionRules};
use crate::integrator::{integrate_pool, KinematicPolicy};
use crate::protocol::FrameDiff;
use crate::state::SimulationState;
use crate::tuning::Tuning;

/// Player intent for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    /// Already scaled by the caller's speed convention; added to the viewpoint as-is.
    pub movement: Vec3,
    /// Firing direction; normalized on use.
    pub aim: Vec3,
    pub fire: bool,
    pub reload: bool,
    /// Elapsed seconds since the previous frame.
    pub dt: f32,
}

/// Turn a raw direction (e.g. summed WASD axes) into a per-frame movement vector.
pub fn movement_intent(direction: Vec3, speed: f32, dt: f32) -> Vec3 {
    direction.normalize_or_zero() * speed * dt
}

#[derive(Clone, Debug)]
pub struct GameLoop {
    state: SimulationState,
}

impl GameLoop {
    pub fn new(tuning: Tuning, rng: &mut impl Rng) -> Self {
        Self::with_state(SimulationState::new(tuning, rng))
    }

    pub fn with_state(state: SimulationState) -> Self {
        GameLoop { state }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Advance the simulation by one frame.
    ///
    /// A malformed `dt` is rejected before anything changes.
    pub fn frame(&mut self, input: &FrameInput, rng: &mut impl Rng) -> Result<FrameDiff, ClockError> {
        let s = &mut self.state;

        // ── 1. Time, then timers that came due between frames ───────────────
        let dt = s.clock.advance(input.dt)?;
        let mut spawn_ticks = 0usize;
        for event in s.clock.drain_due() {
            match event {
                TimerEvent::ReloadComplete => s.ammo.complete_reload(),
                TimerEvent::SpawnTick => spawn_ticks += 1,
            }
        }

        // ── 2. Viewpoint ─────────────────────────────────────────────────────
        s.viewpoint += input.movement;

        // ── 3. Fire ──────────────────────────────────────────────────────────
        if input.fire && s.ammo.request_fire() {
            let origin = s.viewpoint;
            s.spawn_projectile(origin, input.aim);
        }

        // ── 4. Reload ────────────────────────────────────────────────────────
        if input.reload && s.ammo.request_reload() {
            let delay = s.tuning.reload_duration;
            s.clock.schedule_once(delay, TimerEvent::ReloadComplete);
        }

        // ── 5. Integrate ─────────────────────────────────────────────────────
        let policy = KinematicPolicy::from(&s.tuning);
        integrate_pool(&mut s.targets, dt, &policy);
        integrate_pool(&mut s.projectiles, dt, &policy);
        integrate_pool(&mut s.fragments, dt, &policy);

        // ── 6. Collisions and debris ─────────────────────────────────────────
        let rules = CollisionRules {
            hit_threshold: s.tuning.hit_threshold,
            score_per_kill: s.tuning.score_per_kill,
        };
        let destructions = collision::resolve(&mut s.projectiles, &mut s.targets, rules);
        let mut score_delta = 0;
        for d in &destructions {
            s.spawn_burst(d.position, d.color, rng);
            score_delta += d.points;
        }
        s.score += score_delta;

        // ── 7. Commit removals ───────────────────────────────────────────────
        let mut removed = s.targets.commit_removals();
        removed.extend(s.projectiles.commit_removals());
        removed.extend(s.fragments.commit_removals());

        // ── 8. Keep the population topped up ─────────────────────────────────
        for _ in 0..spawn_ticks {
            if s.targets.len() < s.tuning.target_cap {
                s.spawn_random_target(rng);
            }
        }

        // ── 9. Diff ──────────────────────────────────────────────────────────
        let diff = FrameDiff {
            frame: s.clock.frames(),
            time: s.clock.elapsed(),
            spawned: s.take_spawned(),
            removed,
            score_delta,
            score: s.score,
            ammo: s.ammo.state(),
            ammo_changed: s.ammo.take_changed(),
            viewpoint: s.viewpoint,
        };
        if !diff.is_quiet() {
            debug!(
                frame = diff.frame,
                spawned = diff.spawned.len(),
                removed = diff.removed.len(),
                score = diff.score,
                "frame"
            );
        }
        Ok(diff)
    }
}
