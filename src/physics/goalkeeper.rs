// Goalkeeper: lateral tracking along the line and a spherical save envelope.
use bevy::prelude::*;
use rand::Rng;

use crate::physics::ball::BallState;
use crate::physics::collider::{jitter, Contact};
use crate::physics::config::{FieldConfig, KeeperConfig};

// Ball speed below which the keeper counts it as stationary and idles.
const IDLE_SPEED_SQ: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveKind {
    Caught,
    Parried,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Save {
    pub kind: SaveKind,
    pub keeper_position: Vec3,
    /// Fraction of the incoming speed the ball leaves with after a parry.
    pub deflection_strength: f32,
    /// Random spread applied to the parry direction; zero for a catch.
    pub angle_factor: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Goalkeeper {
    position: Vec3,
    idle_clock: f32,
    goal_half_width: f32,
    cfg: KeeperConfig,
}

impl Goalkeeper {
    pub fn new(field: &FieldConfig, cfg: &KeeperConfig) -> Self {
        Self {
            position: Vec3::new(0.0, cfg.height * 0.5, field.goal_line_z() + cfg.stand_off),
            idle_clock: 0.0,
            goal_half_width: field.goal_width * 0.5,
            cfg: *cfg,
        }
    }

    /// Body reference point (centre of mass).
    pub fn position(&self) -> Vec3 { self.position }
    pub fn reach(&self) -> f32 { self.cfg.reach() }

    pub fn in_reach(&self, ball: Vec3) -> bool {
        ball.distance(self.position) < self.reach()
    }

    pub fn place_at_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub fn reset(&mut self) {
        self.position.x = 0.0;
        self.idle_clock = 0.0;
    }

    /// Idle sway while the ball is still; shuffle toward the ball's line when it comes
    /// near and low enough to save.
    pub fn track(&mut self, ball_pos: Vec3, ball_vel: Vec3, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        if ball_vel.length_squared() < IDLE_SPEED_SQ {
            self.idle_clock += dt;
            let sway = (self.idle_clock * self.cfg.idle_frequency).sin() * self.goal_half_width * 2.0 * 0.15;
            let limit = (self.goal_half_width - 2.0).max(0.0);
            self.position.x = sway.clamp(-limit, limit);
            return;
        }
        let near = (ball_pos.z - self.position.z).abs() < self.cfg.track_depth;
        if near && ball_pos.y < self.cfg.height * 1.2 {
            let limit = (self.goal_half_width - self.cfg.torso_radius).max(0.0);
            let target = ball_pos.x.clamp(-limit, limit);
            // Agility is tuned per 60 Hz frame.
            let factor = 1.0 - (1.0 - self.cfg.agility.clamp(0.0, 1.0)).powf(dt * 60.0);
            self.position.x += (target - self.position.x) * factor;
        }
    }

    /// Decide whether a ball inside the reach sphere is caught or parried.
    pub fn check_save<R: Rng + ?Sized>(
        &self,
        ball_pos: Vec3,
        ball_vel: Vec3,
        ball_radius: f32,
        max_power: f32,
        rng: &mut R,
    ) -> Option<Save> {
        let reach = self.reach();
        let dist = ball_pos.distance(self.position);
        if dist >= reach {
            return None;
        }

        let speed = ball_vel.length();
        let planar_sq = (ball_pos.x - self.position.x).powi(2) + (ball_pos.y - self.position.y).powi(2);
        let sweet_spot = reach * 0.4;
        let catchable = (speed < self.cfg.catch_speed && planar_sq < sweet_spot * sweet_spot)
            || (speed < self.cfg.soft_catch_speed && planar_sq < reach * reach);
        let at_chest = ball_pos.y > ball_radius && ball_pos.y < self.cfg.height * 0.8;

        // Roll only when the catch is on, so the RNG stream stays stable for other saves.
        if catchable && at_chest && rng.gen::<f32>() < self.cfg.catch_chance {
            return Some(Save {
                kind: SaveKind::Caught,
                keeper_position: self.position,
                deflection_strength: 0.0,
                angle_factor: 0.0,
            });
        }

        let mut strength = self.cfg.parry_restitution;
        if dist > reach * 0.7 || speed > max_power * 0.6 {
            strength *= 1.1;
        }
        Some(Save {
            kind: SaveKind::Parried,
            keeper_position: self.position,
            deflection_strength: strength,
            angle_factor: rng.gen_range(0.0..0.3),
        })
    }

    /// Apply a save to the ball and return the contact on the keeper's body.
    pub fn apply_save<R: Rng + ?Sized>(&self, ball: &mut BallState, save: &Save, rng: &mut R) -> Contact {
        let offset = ball.position - save.keeper_position;
        let normal = offset.try_normalize().unwrap_or(Vec3::Z);
        let point = save.keeper_position + normal * (offset.length() - ball.radius()).max(0.0);

        match save.kind {
            SaveKind::Caught => {
                ball.stop();
                Contact { point, normal, depth: 0.0 }
            }
            SaveKind::Parried => {
                let spread = Vec3::new(
                    jitter(rng, save.angle_factor),
                    jitter(rng, save.angle_factor),
                    jitter(rng, save.angle_factor),
                );
                let dir = (normal + spread).try_normalize().unwrap_or(normal);
                let mut velocity = dir * ball.speed() * save.deflection_strength;
                let lift = if self.cfg.parry_lift > 0.0 { rng.gen_range(0.0..self.cfg.parry_lift) } else { 0.0 };
                velocity.y = velocity.y.abs() + lift;
                // The ball stays where it is; the keeper is disarmed until it leaves the envelope.
                let contact = Contact { point, normal, depth: 0.0 };
                ball.deflect(velocity, 0.5, &contact);
                contact
            }
        }
    }
}
