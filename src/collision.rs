//! Projectile ↔ target hit detection.
//!
//! Naive O(P·T) scan.  Each alive projectile walks the alive targets in pool
//! order and takes the *first* one closer than the threshold, not the nearest.
//! A target hit by an earlier projectile is already marked and is skipped, so a
//! target is credited at most once per frame and a projectile destroys at most
//! one target.

use glam::Vec3;
use tracing::info;

use crate::entities::{Body, BodyKind, ColorTag, EntityId, Health};
use crate::pool::EntityPool;

/// Emitted once per credited hit.  Feeds the fragment burst and the score.
#[derive(Clone, Debug, PartialEq)]
pub struct Destruction {
    pub target: EntityId,
    pub projectile: EntityId,
    /// Target position at the moment of the hit.
    pub position: Vec3,
    pub color: ColorTag,
    pub points: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionRules {
    pub hit_threshold: f32,
    pub score_per_kill: u32,
}

pub fn resolve(
    projectiles: &mut EntityPool<Body>,
    targets: &mut EntityPool<Body>,
    rules: CollisionRules,
) -> Vec<Destruction> {
    let mut destructions = Vec::new();

    for projectile in projectiles.iter_alive() {
        let hit = targets
            .iter_alive()
            .find(|t| t.position.distance(projectile.position) < rules.hit_threshold)
            .map(|t| (t.id, t.position, t.color()));

        let Some((target_id, position, color)) = hit else {
            continue;
        };

        if let Some(Body {
            kind: BodyKind::Target(state),
            ..
        }) = targets.get_mut(target_id)
        {
            state.health = Health::Destroyed;
        }
        targets.mark_for_removal(target_id);

        info!(
            target_id = target_id.0,
            projectile_id = projectile.id.0,
            x = position.x,
            y = position.y,
            z = position.z,
            "target destroyed"
        );

        destructions.push(Destruction {
            target: target_id,
            projectile: projectile.id,
            position,
            color: color.unwrap_or(ColorTag(0.0)),
            points: rules.score_per_kill,
        });
    }

    for d in &destructions {
        projectiles.mark_for_removal(d.projectile);
    }

    destructions
}
