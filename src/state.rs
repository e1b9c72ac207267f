//! Session state and the spawning rules that populate it.
//!
//! `SimulationState` is the single owner of every pool, the ammunition
//! controller and the clock.  Only the game loop holds it mutably; everyone
//! else gets `&SimulationState` through the read accessors.  Every spawn goes
//! through this module so it can record a descriptor for the next frame diff.

use glam::Vec3;
use rand::Rng;
use tracing::debug;

use crate::ammo::{AmmunitionController, ReloadPhase};
use crate::clock::{SimulationClock, TimerEvent};
use crate::entities::{AmmoState, Body, ColorTag, EntityId, FragmentState};
use crate::pool::EntityPool;
use crate::protocol::{EntityDescriptor, EntityKind};
use crate::tuning::Tuning;

#[derive(Clone, Debug)]
pub struct SimulationState {
    pub(crate) tuning: Tuning,
    pub(crate) targets: EntityPool<Body>,
    pub(crate) projectiles: EntityPool<Body>,
    pub(crate) fragments: EntityPool<Body>,
    pub(crate) ammo: AmmunitionController,
    pub(crate) clock: SimulationClock,
    pub(crate) viewpoint: Vec3,
    pub(crate) score: u32,
    next_id: u64,
    /// Descriptors for bodies created since the last diff.
    spawned: Vec<EntityDescriptor>,
}

// ── Constructors ─────────────────────────────────────────────────────────────

impl SimulationState {
    /// Fresh session: full magazine, the initial target population, and the
    /// periodic spawn timer armed.
    pub fn new(tuning: Tuning, rng: &mut impl Rng) -> Self {
        let mut state = Self::empty(tuning);
        for _ in 0..tuning.initial_targets {
            state.spawn_random_target(rng);
        }
        state
    }

    /// Like [`SimulationState::new`] but with no targets, for scripted setups.
    pub fn empty(tuning: Tuning) -> Self {
        let mut clock = SimulationClock::new();
        clock.schedule_repeating(tuning.spawn_interval, TimerEvent::SpawnTick);
        SimulationState {
            tuning,
            targets: EntityPool::new(),
            projectiles: EntityPool::new(),
            fragments: EntityPool::new(),
            ammo: AmmunitionController::new(tuning.max_ammo),
            clock,
            viewpoint: tuning.viewpoint_start,
            score: 0,
            next_id: 1,
            spawned: Vec::new(),
        }
    }
}

// ── Read-only views ──────────────────────────────────────────────────────────

impl SimulationState {
    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn targets(&self) -> &EntityPool<Body> {
        &self.targets
    }

    pub fn projectiles(&self) -> &EntityPool<Body> {
        &self.projectiles
    }

    pub fn fragments(&self) -> &EntityPool<Body> {
        &self.fragments
    }

    pub fn ammo(&self) -> AmmoState {
        self.ammo.state()
    }

    pub fn reload_phase(&self) -> ReloadPhase {
        self.ammo.phase()
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn viewpoint(&self) -> Vec3 {
        self.viewpoint
    }

    pub fn score(&self) -> u32 {
        self.score
    }
}

// ── Spawning ─────────────────────────────────────────────────────────────────

impl SimulationState {
    fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    fn record_spawn(&mut self, body: &Body) {
        self.spawned.push(EntityDescriptor::from(body));
    }

    /// Drain the frame's spawn records.  Bodies still alive are re-described
    /// so the pose matches the end of the frame; bodies already removed keep
    /// the pose they were created with.
    pub(crate) fn take_spawned(&mut self) -> Vec<EntityDescriptor> {
        let mut spawned = std::mem::take(&mut self.spawned);
        for d in &mut spawned {
            let pool = match d.kind {
                EntityKind::Target => &self.targets,
                EntityKind::Projectile => &self.projectiles,
                EntityKind::Fragment => &self.fragments,
            };
            if let Some(body) = pool.get(d.id) {
                *d = EntityDescriptor::from(body);
            }
        }
        spawned
    }

    /// Place a target with explicit kinematics.
    pub fn insert_target(&mut self, position: Vec3, velocity: Vec3, color: ColorTag) -> EntityId {
        let id = self.next_id();
        let body = Body::target(id, position, velocity, self.tuning.target_spin, color);
        self.record_spawn(&body);
        self.targets.add(body)
    }

    /// Random in-bounds position and horizontal drift.
    pub fn spawn_random_target(&mut self, rng: &mut impl Rng) -> EntityId {
        let extent = self.tuning.world_half_extent;
        let position = Vec3::new(
            (rng.gen::<f32>() - 0.5) * 2.0 * extent,
            rng.gen::<f32>() * 3.0 + self.tuning.target_ground_offset,
            (rng.gen::<f32>() - 0.5) * 2.0 * extent,
        );
        let velocity = Vec3::new(
            (rng.gen::<f32>() - 0.5) * 2.0,
            0.0,
            (rng.gen::<f32>() - 0.5) * 2.0,
        );
        let color = ColorTag(rng.gen::<f32>());
        let id = self.insert_target(position, velocity, color);
        debug!(target_id = id.0, population = self.targets.len(), "target spawned");
        id
    }

    pub fn spawn_projectile(&mut self, origin: Vec3, aim: Vec3) -> EntityId {
        let id = self.next_id();
        let t = &self.tuning;
        let body = Body::projectile(
            id,
            origin,
            aim,
            t.projectile_speed,
            t.projectile_lifetime,
            t.projectile_radius,
        );
        self.record_spawn(&body);
        self.projectiles.add(body)
    }

    /// Create `fragment_count` debris pieces at `position`, all at once.
    pub fn spawn_burst(&mut self, position: Vec3, color: ColorTag, rng: &mut impl Rng) -> Vec<EntityId> {
        let count = self.tuning.fragment_count;
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            let id = self.next_id();
            let velocity = Vec3::new(
                (rng.gen::<f32>() - 0.5) * 10.0,
                rng.gen::<f32>() * 8.0 + 2.0,
                (rng.gen::<f32>() - 0.5) * 10.0,
            );
            let state = FragmentState {
                angular_velocity: Vec3::new(
                    rng.gen::<f32>() * 10.0,
                    rng.gen::<f32>() * 10.0,
                    rng.gen::<f32>() * 10.0,
                ),
                gravity: self.tuning.fragment_gravity,
                color,
                size: Vec3::new(
                    rng.gen::<f32>() * 0.2 + 0.05,
                    rng.gen::<f32>() * 0.2 + 0.05,
                    rng.gen::<f32>() * 0.2 + 0.05,
                ),
            };
            let body = Body::fragment(id, position, velocity, self.tuning.fragment_lifetime, state);
            self.record_spawn(&body);
            ids.push(self.fragments.add(body));
        }
        ids
    }
}
