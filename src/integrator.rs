//! Kinematic integration, one rule per body kind.

use crate::entities::{Body, BodyKind};
use crate::pool::{EntityPool, Verdict};
use crate::tuning::Tuning;

/// Environment the per-kind rules read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicPolicy {
    /// Targets bounce when `|x|` or `|z|` exceeds this.
    pub half_extent: f32,
    /// Targets never sink below this height.
    pub target_ground_offset: f32,
    pub ground_restitution: f32,
    pub ground_friction: f32,
}

impl From<&Tuning> for KinematicPolicy {
    fn from(t: &Tuning) -> Self {
        Self {
            half_extent: t.world_half_extent,
            target_ground_offset: t.target_ground_offset,
            ground_restitution: t.ground_restitution,
            ground_friction: t.ground_friction,
        }
    }
}

/// Advance one body by `dt` seconds.  Lifetimes are counted down here but
/// expiry is left to the caller.
pub fn integrate(body: &mut Body, dt: f32, policy: &KinematicPolicy) {
    match &body.kind {
        BodyKind::Target(target) => {
            let spin = target.spin;
            body.position += body.velocity * dt;
            body.rotation += spin * dt;

            // Either axis out of bounds flips both horizontal components.
            if body.position.x.abs() > policy.half_extent
                || body.position.z.abs() > policy.half_extent
            {
                body.velocity.x = -body.velocity.x;
                body.velocity.z = -body.velocity.z;
            }

            if body.position.y < policy.target_ground_offset {
                body.position.y = policy.target_ground_offset;
            }
        }
        BodyKind::Projectile(_) => {
            body.position += body.velocity * dt;
            count_down(body, dt);
        }
        BodyKind::Fragment(fragment) => {
            let (gravity, angular_velocity) = (fragment.gravity, fragment.angular_velocity);
            body.velocity.y += gravity * dt;
            body.position += body.velocity * dt;
            body.rotation += angular_velocity * dt;
            count_down(body, dt);
            resolve_ground_contact(body, policy);
        }
    }
}

/// Inelastic bounce for a body at or below `y = 0`: clamp to the ground,
/// invert and damp vertical speed, apply friction horizontally.  Applied on
/// every frame of contact, not just the first.
pub fn resolve_ground_contact(body: &mut Body, policy: &KinematicPolicy) -> bool {
    if body.position.y > 0.0 {
        return false;
    }
    body.position.y = 0.0;
    body.velocity.y *= -policy.ground_restitution;
    body.velocity.x *= policy.ground_friction;
    body.velocity.z *= policy.ground_friction;
    true
}

fn count_down(body: &mut Body, dt: f32) {
    if let Some(life) = body.remaining_life.as_mut() {
        *life -= dt;
    }
}

/// Integrate every alive body in `pool`, then mark the ones whose lifetime ran
/// out.  Returns how many expired this pass.
pub fn integrate_pool(pool: &mut EntityPool<Body>, dt: f32, policy: &KinematicPolicy) -> usize {
    let mut expired = 0;
    pool.for_each_alive(|body| {
        integrate(body, dt, policy);
        if body.is_expired() {
            expired += 1;
            Verdict::Remove
        } else {
            Verdict::Keep
        }
    });
    expired
}

