//! Gameplay tuning for the shooting range.
//!
//! Keep this separate from runtime configuration (frame rate, seeds, log files);
//! the binary layers environment overrides on top of `Tuning::default()`.

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    // Ammunition
    pub max_ammo: u32,
    /// Seconds from a granted reload request to a full magazine.
    pub reload_duration: f32,

    // Projectiles
    /// Speed factor applied to the unit aim direction.
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_radius: f32,

    // Debris
    pub fragment_count: usize,
    pub fragment_lifetime: f32,
    pub fragment_gravity: f32,
    /// Fraction of vertical speed kept (and inverted) on each ground contact.
    pub ground_restitution: f32,
    /// Horizontal speed multiplier on each ground contact.
    pub ground_friction: f32,

    // Targets
    pub initial_targets: usize,
    pub target_cap: usize,
    /// Seconds between periodic spawn ticks.
    pub spawn_interval: f32,
    pub target_ground_offset: f32,
    pub target_spin: Vec3,

    // World / scoring
    pub world_half_extent: f32,
    /// Centre distance below which a projectile hits a target.
    pub hit_threshold: f32,
    pub score_per_kill: u32,

    // Player
    pub viewpoint_start: Vec3,
    /// Units per second used by drivers to scale raw movement input.
    pub move_speed: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_ammo: 30,
            reload_duration: 2.0,

            projectile_speed: 50.0,
            projectile_lifetime: 2.0,
            projectile_radius: 0.05,

            fragment_count: 15,
            fragment_lifetime: 3.0,
            fragment_gravity: -9.8,
            ground_restitution: 0.3,
            ground_friction: 0.8,

            initial_targets: 5,
            target_cap: 10,
            spawn_interval: 2.0,
            target_ground_offset: 0.5,
            target_spin: Vec3::new(1.0, 0.5, 0.0),

            world_half_extent: 25.0,
            hit_threshold: 0.6,
            score_per_kill: 10,

            viewpoint_start: Vec3::new(0.0, 2.0, 0.0),
            move_speed: 10.0,
        }
    }
}
