//! All simulated entity types: pure data, no simulation logic.
//!
//! Every kinematic thing in the world is a [`Body`]; what kind of body it is
//! lives in the [`BodyKind`] tag so the integrator can match on it exhaustively.

use glam::Vec3;
use serde::Serialize;

// ── Identity ──────────────────────────────────────────────────────────────────

/// Session-unique handle.  Assigned once at creation and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

/// Opaque colour carried from a target to its debris.  Stored as a hue in `[0, 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColorTag(pub f32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Health {
    Alive,
    Destroyed,
}

// ── Per-kind state ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct TargetState {
    /// Constant spin in radians per second, per axis.
    pub spin: Vec3,
    pub color: ColorTag,
    pub health: Health,
    /// Box extents (geometry hint for presentation).
    pub size: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectileState {
    /// Unit firing direction.
    pub direction: Vec3,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FragmentState {
    pub angular_velocity: Vec3,
    /// Vertical acceleration, negative is down.
    pub gravity: f32,
    pub color: ColorTag,
    pub size: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BodyKind {
    Target(TargetState),
    Projectile(ProjectileState),
    Fragment(FragmentState),
}

// ── Body ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Body {
    pub id: EntityId,
    pub position: Vec3,
    pub velocity: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    /// Seconds until expiry; `None` means the body only leaves when removed.
    pub remaining_life: Option<f32>,
    pub kind: BodyKind,
}

impl Body {
    pub fn target(id: EntityId, position: Vec3, velocity: Vec3, spin: Vec3, color: ColorTag) -> Self {
        Body {
            id,
            position,
            velocity,
            rotation: Vec3::ZERO,
            remaining_life: None,
            kind: BodyKind::Target(TargetState {
                spin,
                color,
                health: Health::Alive,
                size: Vec3::ONE,
            }),
        }
    }

    /// `direction` need not be normalized; velocity is `direction.normalize() * speed`.
    pub fn projectile(
        id: EntityId,
        origin: Vec3,
        direction: Vec3,
        speed: f32,
        lifetime: f32,
        radius: f32,
    ) -> Self {
        let direction = direction.normalize_or_zero();
        Body {
            id,
            position: origin,
            velocity: direction * speed,
            rotation: Vec3::ZERO,
            remaining_life: Some(lifetime),
            kind: BodyKind::Projectile(ProjectileState { direction, radius }),
        }
    }

    pub fn fragment(
        id: EntityId,
        position: Vec3,
        velocity: Vec3,
        lifetime: f32,
        state: FragmentState,
    ) -> Self {
        Body {
            id,
            position,
            velocity,
            rotation: Vec3::ZERO,
            remaining_life: Some(lifetime),
            kind: BodyKind::Fragment(state),
        }
    }

    /// Colour for targets and fragments; projectiles have none.
    pub fn color(&self) -> Option<ColorTag> {
        match &self.kind {
            BodyKind::Target(t) => Some(t.color),
            BodyKind::Fragment(f) => Some(f.color),
            BodyKind::Projectile(_) => None,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_life.is_some_and(|life| life <= 0.0)
    }
}

// ── Ammunition ────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AmmoState {
    pub current: u32,
    pub max: u32,
    pub reloading: bool,
}

impl AmmoState {
    pub fn full(max: u32) -> Self {
        AmmoState {
            current: max,
            max,
            reloading: false,
        }
    }
}
