// Goal frame (two posts and a crossbar) plus the scoring volume behind the line.
use bevy::prelude::*;
use rand::Rng;

use crate::physics::ball::BallState;
use crate::physics::collider::{jitter, CapsuleProxy, Collider, Contact};
use crate::physics::config::{FieldConfig, PhysicsConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameSurface {
    LeftPost,
    RightPost,
    Crossbar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GoalFrame {
    left_post: CapsuleProxy,
    right_post: CapsuleProxy,
    crossbar: CapsuleProxy,
    line_z: f32,
    half_width: f32,
    height: f32,
    depth: f32,
}

impl GoalFrame {
    pub fn new(field: &FieldConfig) -> Self {
        let line_z = field.goal_line_z();
        let hw = field.goal_width * 0.5;
        let h = field.goal_height;
        let r = field.post_radius;
        Self {
            left_post: CapsuleProxy::new(Vec3::new(-hw, 0.0, line_z), Vec3::new(-hw, h, line_z), r),
            right_post: CapsuleProxy::new(Vec3::new(hw, 0.0, line_z), Vec3::new(hw, h, line_z), r),
            crossbar: CapsuleProxy::new(Vec3::new(-hw, h, line_z), Vec3::new(hw, h, line_z), r),
            line_z,
            half_width: hw,
            height: h,
            depth: field.goal_depth,
        }
    }

    pub fn line_z(&self) -> f32 { self.line_z }
    pub fn half_width(&self) -> f32 { self.half_width }
    pub fn height(&self) -> f32 { self.height }
    pub fn depth(&self) -> f32 { self.depth }

    pub fn centre(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, self.line_z)
    }

    pub fn surfaces(&self) -> [(FrameSurface, &CapsuleProxy); 3] {
        [
            (FrameSurface::LeftPost, &self.left_post),
            (FrameSurface::RightPost, &self.right_post),
            (FrameSurface::Crossbar, &self.crossbar),
        ]
    }

    pub fn check_collision(&self, center: Vec3, radius: f32) -> Option<(FrameSurface, Contact)> {
        // Every frame member lies on the goal line.
        if (center.z - self.line_z).abs() > radius + self.left_post.radius {
            return None;
        }
        self.surfaces()
            .into_iter()
            .find_map(|(surface, proxy)| proxy.contact(center, radius).map(|c| (surface, c)))
    }

    /// Reflect the normal part of the velocity with post restitution; a little random
    /// tangential scatter keeps repeated hits from looking identical.
    pub fn deflect<R: Rng + ?Sized>(ball: &mut BallState, contact: &Contact, cfg: &PhysicsConfig, rng: &mut R) {
        let n = contact.normal;
        let mut velocity = ball.velocity;
        let vn = velocity.dot(n);
        if vn < 0.0 {
            velocity -= n * vn * (1.0 + cfg.post_restitution);
        }
        let tangent = n.any_orthonormal_vector();
        velocity += tangent * jitter(rng, cfg.deflection_jitter * 0.5);
        ball.deflect(velocity, cfg.post_restitution, contact);
    }

    /// Ball wholly past the line inside the mouth and net.
    pub fn contains(&self, position: Vec3, radius: f32) -> bool {
        position.z < self.line_z + radius
            && position.z > self.line_z - self.depth - radius
            && position.x.abs() < self.half_width - radius
            && position.y > 0.0
            && position.y < self.height - radius
    }
}
