// Defensive wall: a row of vertical capsules set back from the ball toward goal.
use bevy::prelude::*;
use rand::Rng;

use crate::physics::ball::BallState;
use crate::physics::collider::{jitter, CapsuleProxy, Collider, Contact};
use crate::physics::config::{PhysicsConfig, WallConfig};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wall {
    players: Vec<CapsuleProxy>,
}

impl Wall {
    /// Line players up `cfg.distance` from the ball on the way to `goal_centre`,
    /// spread across the shooting line.
    pub fn line_up(ball: Vec3, goal_centre: Vec3, cfg: &WallConfig) -> Self {
        let to_goal = Vec3::new(goal_centre.x - ball.x, 0.0, goal_centre.z - ball.z);
        let dir = to_goal.try_normalize().unwrap_or(Vec3::NEG_Z);
        let centre = Vec3::new(ball.x, 0.0, ball.z) + dir * cfg.distance;
        let across = dir.cross(Vec3::Y).normalize_or_zero();

        let mid = (cfg.player_count as f32 - 1.0) / 2.0;
        let players = (0..cfg.player_count)
            .map(|i| {
                let base = centre + across * ((i as f32 - mid) * cfg.player_spacing);
                // Core segment starts at the feet so low balls meet a flat side, not the rounded base.
                CapsuleProxy::new(base, base + Vec3::Y * (cfg.player_height - cfg.body_radius).max(0.0), cfg.body_radius)
            })
            .collect();
        Self { players }
    }

    pub fn from_players(players: Vec<CapsuleProxy>) -> Self {
        Self { players }
    }

    pub fn players(&self) -> &[CapsuleProxy] {
        &self.players
    }

    /// First player touching the ball, if any.
    pub fn check_collision(&self, center: Vec3, radius: f32) -> Option<Contact> {
        self.players.iter().find_map(|p| p.contact(center, radius))
    }

    /// Knock the ball back off a player: most of the pace is lost, it pops up a little
    /// and gets a random sideways kick so it does not clip the same body again.
    pub fn deflect<R: Rng + ?Sized>(ball: &mut BallState, contact: &Contact, cfg: &PhysicsConfig, rng: &mut R) {
        let speed = ball.velocity.length();
        let mut velocity = contact.normal * speed * cfg.wall_restitution;
        velocity.y = velocity.y.abs() * 0.3;

        let across = contact.normal.cross(Vec3::Y).normalize_or_zero();
        velocity += across * jitter(rng, cfg.deflection_jitter);
        velocity.y += jitter(rng, cfg.deflection_jitter * 0.5).abs();

        ball.deflect(velocity, cfg.wall_spin_retention, contact);
    }
}
