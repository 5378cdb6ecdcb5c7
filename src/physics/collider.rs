// Capsule proxy colliders queried with the ball sphere.
use bevy::prelude::*;
use rand::Rng;

/// Penetration of the ball sphere into a proxy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Point on the proxy surface closest to the ball centre.
    pub point: Vec3,
    /// Unit vector from the proxy toward the ball centre.
    pub normal: Vec3,
    pub depth: f32,
}

pub trait Collider {
    fn contact(&self, center: Vec3, radius: f32) -> Option<Contact>;
}

/// Segment `a`–`b` swept by `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleProxy {
    pub a: Vec3,
    pub b: Vec3,
    pub radius: f32,
}

impl CapsuleProxy {
    pub fn new(a: Vec3, b: Vec3, radius: f32) -> Self {
        Self { a, b, radius }
    }

    pub fn length(&self) -> f32 {
        (self.b - self.a).length()
    }

    pub fn midpoint(&self) -> Vec3 {
        (self.a + self.b) * 0.5
    }
}

impl Collider for CapsuleProxy {
    fn contact(&self, center: Vec3, radius: f32) -> Option<Contact> {
        let core = closest_point_on_segment(center, self.a, self.b);
        sphere_contact(center, radius, core, self.radius)
    }
}

pub fn closest_point_on_segment(p: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

fn sphere_contact(center: Vec3, radius: f32, core: Vec3, core_radius: f32) -> Option<Contact> {
    let offset = center - core;
    let dist = offset.length();
    let reach = radius + core_radius;
    if dist >= reach {
        return None;
    }
    // Centre sitting on the core axis: push straight up.
    let normal = if dist > 1e-6 { offset / dist } else { Vec3::Y };
    Some(Contact { point: core + normal * core_radius, normal, depth: reach - dist })
}

/// Uniform draw in `[-amount, amount)`; zero for non-positive amounts.
pub fn jitter<R: Rng + ?Sized>(rng: &mut R, amount: f32) -> f32 {
    if amount > 0.0 { rng.gen_range(-amount..amount) } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_projection_clamps_to_ends() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.0, 2.0, 0.0);
        assert_eq!(closest_point_on_segment(Vec3::new(1.0, 1.0, 0.0), a, b), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(closest_point_on_segment(Vec3::new(1.0, 5.0, 0.0), a, b), b);
        assert_eq!(closest_point_on_segment(Vec3::new(1.0, -5.0, 0.0), a, b), a);
        assert_eq!(closest_point_on_segment(Vec3::ONE, a, a), a);
    }

    #[test]
    fn capsule_contact_threshold() {
        let capsule = CapsuleProxy::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.25);
        let r = 0.11;
        let edge = 0.25 + r;
        assert!(capsule.contact(Vec3::new(edge, 1.0, 0.0), r).is_none());
        let hit = capsule.contact(Vec3::new(edge - 1e-3, 1.0, 0.0), r).unwrap();
        assert!((hit.normal - Vec3::X).length() < 1e-6);
        assert!((hit.point - Vec3::new(0.25, 1.0, 0.0)).length() < 1e-6);
        assert!((hit.depth - 1e-3).abs() < 1e-5);
    }

    #[test]
    fn centre_on_the_core_pushes_up() {
        let point = Vec3::new(0.0, 1.0, 0.0);
        let capsule = CapsuleProxy::new(point, point, 0.5);
        let hit = capsule.contact(point, 0.1).unwrap();
        assert_eq!(hit.normal, Vec3::Y);
        assert!((hit.depth - 0.6).abs() < 1e-6);
    }
}
