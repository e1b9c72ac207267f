//! Presentation-facing output: what changed this frame.
//!
//! Descriptors in [`FrameDiff::spawned`] carry the body's pose at the end of
//! the frame, or its creation pose if it was also removed in that frame.

use glam::Vec3;
use serde::Serialize;

use crate::entities::{AmmoState, Body, BodyKind, ColorTag, EntityId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntityKind {
    Target,
    Projectile,
    Fragment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "shape")]
pub enum Geometry {
    Box { size: Vec3 },
    Sphere { radius: f32 },
}

/// Enough for a presentation layer to instantiate a visual for a new body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDescriptor {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec3,
    pub rotation: Vec3,
    pub color: Option<ColorTag>,
    pub geometry: Geometry,
}

impl From<&Body> for EntityDescriptor {
    fn from(b: &Body) -> Self {
        let (kind, geometry) = match &b.kind {
            BodyKind::Target(t) => (EntityKind::Target, Geometry::Box { size: t.size }),
            BodyKind::Projectile(p) => (
                EntityKind::Projectile,
                Geometry::Sphere { radius: p.radius },
            ),
            BodyKind::Fragment(f) => (EntityKind::Fragment, Geometry::Box { size: f.size }),
        };
        Self {
            id: b.id,
            kind,
            position: b.position,
            rotation: b.rotation,
            color: b.color(),
            geometry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameDiff {
    pub frame: u64,
    /// Session time at the end of the frame, in seconds.
    pub time: f64,
    pub spawned: Vec<EntityDescriptor>,
    pub removed: Vec<EntityId>,
    pub score_delta: u32,
    pub score: u32,
    pub ammo: AmmoState,
    pub ammo_changed: bool,
    pub viewpoint: Vec3,
}

impl FrameDiff {
    pub fn spawned_of(&self, kind: EntityKind) -> usize {
        self.spawned.iter().filter(|d| d.kind == kind).count()
    }

    /// Nothing for the presentation layer to do besides moving bodies.
    pub fn is_quiet(&self) -> bool {
        self.spawned.is_empty() && self.removed.is_empty() && self.score_delta == 0 && !self.ammo_changed
    }
}
