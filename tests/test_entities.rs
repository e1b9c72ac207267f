use glam::Vec3;
use shooting_range::entities::*;
use shooting_range::protocol::{EntityDescriptor, EntityKind, Geometry};

fn fragment_state() -> FragmentState {
    FragmentState {
        angular_velocity: Vec3::ONE,
        gravity: -9.8,
        color: ColorTag(0.25),
        size: Vec3::splat(0.1),
    }
}

// ── constructors ──────────────────────────────────────────────────────────────

#[test]
fn target_starts_alive_without_lifetime() {
    let b = Body::target(EntityId(1), Vec3::ZERO, Vec3::X, Vec3::Y, ColorTag(0.5));
    assert_eq!(b.remaining_life, None);
    assert!(!b.is_expired());
    match &b.kind {
        BodyKind::Target(t) => {
            assert_eq!(t.health, Health::Alive);
            assert_eq!(t.size, Vec3::ONE);
        }
        other => panic!("expected target, got {:?}", other),
    }
}

#[test]
fn projectile_velocity_is_normalized_aim_times_speed() {
    let b = Body::projectile(EntityId(2), Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0), 50.0, 2.0, 0.05);
    assert_eq!(b.velocity, Vec3::new(0.0, 0.0, -50.0));
    assert_eq!(b.remaining_life, Some(2.0));
    assert_eq!(b.color(), None);
}

#[test]
fn projectile_with_zero_aim_stays_put() {
    let b = Body::projectile(EntityId(3), Vec3::ONE, Vec3::ZERO, 50.0, 2.0, 0.05);
    assert_eq!(b.velocity, Vec3::ZERO);
}

#[test]
fn fragment_carries_its_colour() {
    let b = Body::fragment(EntityId(4), Vec3::ZERO, Vec3::Y, 3.0, fragment_state());
    assert_eq!(b.color(), Some(ColorTag(0.25)));
    assert!(matches!(b.kind, BodyKind::Fragment(_)));
}

// ── expiry ────────────────────────────────────────────────────────────────────

#[test]
fn expired_at_zero_life() {
    let mut b = Body::fragment(EntityId(5), Vec3::ZERO, Vec3::ZERO, 3.0, fragment_state());
    b.remaining_life = Some(0.0);
    assert!(b.is_expired());
    b.remaining_life = Some(0.01);
    assert!(!b.is_expired());
}

// ── ammo ──────────────────────────────────────────────────────────────────────

#[test]
fn full_magazine() {
    let a = AmmoState::full(30);
    assert_eq!(a.current, 30);
    assert_eq!(a.max, 30);
    assert!(!a.reloading);
}

// ── descriptors ───────────────────────────────────────────────────────────────

#[test]
fn descriptor_geometry_follows_kind() {
    let target = Body::target(EntityId(1), Vec3::ZERO, Vec3::ZERO, Vec3::ZERO, ColorTag(0.1));
    let shot = Body::projectile(EntityId(2), Vec3::ZERO, Vec3::X, 50.0, 2.0, 0.05);

    let d = EntityDescriptor::from(&target);
    assert_eq!(d.kind, EntityKind::Target);
    assert_eq!(d.geometry, Geometry::Box { size: Vec3::ONE });
    assert_eq!(d.color, Some(ColorTag(0.1)));

    let d = EntityDescriptor::from(&shot);
    assert_eq!(d.kind, EntityKind::Projectile);
    assert_eq!(d.geometry, Geometry::Sphere { radius: 0.05 });
    assert_eq!(d.color, None);
}

#[test]
fn descriptor_serializes_to_json() {
    let shot = Body::projectile(EntityId(7), Vec3::ZERO, Vec3::X, 50.0, 2.0, 0.05);
    let json = serde_json::to_value(EntityDescriptor::from(&shot)).expect("serialize");
    assert_eq!(json["id"], 7);
    assert_eq!(json["kind"], "Projectile");
    assert_eq!(json["geometry"]["shape"], "Sphere");
}
