// Ball rigid body: kick, per-step integration (drag, Magnus, gravity, spin) and ground contact.
use bevy::prelude::*;

use crate::physics::collider::Contact;
use crate::physics::config::{ConfigError, ControlConfig, PhysicsConfig};

// Heights within this of the resting height still count as ground contact.
const CONTACT_SLOP: f32 = 1e-4;
// Extra clearance when pushing the ball out of an obstacle.
const SEPARATION_MARGIN: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallPhase {
    Flying,
    Rolling,
    Settled,
}

/// Per-step side information for callers that drive effects.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BallStep {
    /// Downward speed at a ground impact this step, if the ball bounced.
    pub ground_impact: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BallState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub angular_velocity: Vec3,
    pub orientation: Quat,
    pub phase: BallPhase,
    radius: f32,
    spawn: Vec3,
}

impl BallState {
    pub fn new(spawn: Vec3, cfg: &PhysicsConfig) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let spawn = Vec3::new(spawn.x, spawn.y.max(cfg.ball_radius), spawn.z);
        Ok(Self {
            position: spawn,
            velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            phase: BallPhase::Settled,
            radius: cfg.ball_radius,
            spawn,
        })
    }

    pub fn radius(&self) -> f32 { self.radius }
    pub fn spawn(&self) -> Vec3 { self.spawn }
    pub fn speed(&self) -> f32 { self.velocity.length() }

    pub fn is_moving(&self) -> bool {
        self.velocity.length_squared() > 1e-4
    }

    pub fn is_settled(&self) -> bool {
        !self.is_moving() && self.position.y <= self.radius + 0.01
    }

    fn is_at_rest(&self) -> bool {
        self.velocity == Vec3::ZERO
            && self.angular_velocity == Vec3::ZERO
            && self.position.y <= self.radius + CONTACT_SLOP
    }

    /// Back to the spawn point with no motion.
    pub fn reset(&mut self) {
        self.position = self.spawn;
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.orientation = Quat::IDENTITY;
        self.phase = BallPhase::Settled;
    }

    pub fn set_spawn(&mut self, spawn: Vec3) {
        self.spawn = Vec3::new(spawn.x, spawn.y.max(self.radius), spawn.z);
        self.reset();
    }

    /// Kill all motion in place (ball held by the keeper).
    pub fn stop(&mut self) {
        self.velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
    }

    /// Come to rest on the ground where the ball is.
    pub fn settle(&mut self) {
        self.stop();
        self.position.y = self.radius;
        self.phase = BallPhase::Settled;
    }

    /// Strike the ball. A degenerate direction leaves it untouched.
    pub fn kick(&mut self, direction: Vec3, power: f32, curve: Vec2, controls: &ControlConfig, cfg: &PhysicsConfig) {
        let Some(dir) = direction.try_normalize() else { return; };
        let power = power.clamp(0.0, controls.max_power);

        self.velocity = dir * power;
        // Extra loft grows with power and with how far above the horizon the shot is aimed.
        let pitch = dir.y.clamp(-1.0, 1.0).asin().max(0.0);
        self.velocity.y += (power / controls.max_power) * 10.0 * (0.3 + pitch.sin());

        self.angular_velocity = spin_from_curve(dir, curve, controls, cfg.max_spin_rate);
        self.phase = BallPhase::Flying;
    }

    pub fn drag_acceleration(&self, cfg: &PhysicsConfig) -> Vec3 {
        let speed = self.velocity.length();
        if speed <= cfg.speed_epsilon {
            return Vec3::ZERO;
        }
        let magnitude = 0.5 * cfg.air_density * speed * speed * cfg.drag_coefficient * cfg.cross_section_area() / cfg.ball_mass;
        -self.velocity / speed * magnitude
    }

    /// Lift from spin: along `ω × v`, scaled by the spin ratio of the spin component
    /// perpendicular to the flight direction.
    pub fn magnus_acceleration(&self, cfg: &PhysicsConfig) -> Vec3 {
        let speed = self.velocity.length();
        if speed <= cfg.speed_epsilon {
            return Vec3::ZERO;
        }
        let lift = self.angular_velocity.cross(self.velocity);
        if lift.length_squared() < 1e-8 {
            return Vec3::ZERO;
        }
        let Some(lift_dir) = lift.try_normalize() else { return Vec3::ZERO; };

        let spin_perp = self.angular_velocity - self.velocity * (self.angular_velocity.dot(self.velocity) / (speed * speed));
        let spin_ratio = spin_perp.length() * self.radius / speed;
        let lift_coefficient = (cfg.magnus_lift_slope * spin_ratio).max(0.0);
        let force = 0.5 * cfg.air_density * cfg.cross_section_area() * lift_coefficient * speed * speed;
        lift_dir * (force / cfg.ball_mass)
    }

    /// Advance one step. `dt` is clamped to `max_timestep`; non-positive steps do nothing.
    pub fn update(&mut self, dt: f32, cfg: &PhysicsConfig) -> BallStep {
        if !(dt > 0.0) || !dt.is_finite() {
            return BallStep::default();
        }
        let dt = dt.min(cfg.max_timestep);
        if self.phase == BallPhase::Settled && self.is_at_rest() {
            return BallStep::default();
        }

        let speed = self.velocity.length();
        let drag = self.drag_acceleration(cfg);
        // Never let drag reverse the ball within one step.
        self.velocity += drag.clamp_length_max(speed / dt) * dt;
        self.velocity += self.magnus_acceleration(cfg) * dt;
        self.velocity += cfg.gravity_vec() * dt;

        self.position += self.velocity * dt;
        self.integrate_orientation(dt, cfg);

        BallStep { ground_impact: self.resolve_ground(dt, cfg) }
    }

    fn integrate_orientation(&mut self, dt: f32, cfg: &PhysicsConfig) {
        if self.angular_velocity.length() > cfg.spin_epsilon {
            self.angular_velocity *= (1.0 - cfg.spin_decay * dt).max(0.0);
            let rate = self.angular_velocity.length();
            if let Some(axis) = self.angular_velocity.try_normalize() {
                self.orientation = (Quat::from_axis_angle(axis, rate * dt) * self.orientation).normalize();
            }
        } else {
            // Cosmetic roll for spinless balls.
            let roll = Quat::from_rotation_x(self.velocity.z * dt / self.radius)
                * Quat::from_rotation_z(-self.velocity.x * dt / self.radius);
            self.orientation = (roll * self.orientation).normalize();
        }
    }

    fn resolve_ground(&mut self, dt: f32, cfg: &PhysicsConfig) -> Option<f32> {
        if self.position.y > self.radius + CONTACT_SLOP {
            self.phase = BallPhase::Flying;
            return None;
        }
        self.position.y = self.radius;

        let r_contact = Vec3::new(0.0, -self.radius, 0.0);
        let impact_speed = -self.velocity.y;
        if impact_speed > cfg.rest_speed {
            let vy_in = self.velocity.y;
            let slip = Vec3::new(self.velocity.x, 0.0, self.velocity.z) + self.angular_velocity.cross(r_contact);
            let vy_out = -vy_in * cfg.ground_restitution;
            self.velocity.y = vy_out;
            let normal_impulse = cfg.ball_mass * (vy_out - vy_in);
            self.apply_friction_impulse(slip, cfg.ground_friction * normal_impulse, r_contact, cfg);

            if self.velocity.y < cfg.rest_speed {
                self.velocity.y = 0.0;
                self.phase = BallPhase::Rolling;
            } else {
                self.phase = BallPhase::Flying;
            }
            return Some(impact_speed);
        }

        if self.velocity.y > 0.0 {
            // Leaving the ground this step.
            self.phase = BallPhase::Flying;
            return None;
        }
        self.velocity.y = 0.0;
        self.roll(dt, r_contact, cfg);
        None
    }

    // Friction impulse opposite `slip`, capped so it brings the contact point to rest at most.
    fn apply_friction_impulse(&mut self, slip: Vec3, max_impulse: f32, r_contact: Vec3, cfg: &PhysicsConfig) {
        let slip_speed = slip.length();
        if slip_speed <= cfg.slip_epsilon || !(max_impulse > 0.0) {
            return;
        }
        let mass = cfg.ball_mass;
        let inertia = cfg.moment_of_inertia();
        // Contact-point velocity change per unit tangential impulse on a sphere.
        let compliance = 1.0 / mass + self.radius * self.radius / inertia;
        let magnitude = max_impulse.min(slip_speed / compliance);
        let impulse = -slip / slip_speed * magnitude;
        self.velocity += impulse / mass;
        self.angular_velocity += r_contact.cross(impulse) / inertia;
    }

    fn roll(&mut self, dt: f32, r_contact: Vec3, cfg: &PhysicsConfig) {
        let g = cfg.gravity_vec().length();
        let planar = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
        let contact_velocity = planar + self.angular_velocity.cross(r_contact);

        if contact_velocity.length() > cfg.slip_epsilon {
            // Sliding: kinetic friction drags the ball toward pure rolling.
            self.apply_friction_impulse(contact_velocity, cfg.ground_friction * cfg.ball_mass * g * dt, r_contact, cfg);
        } else {
            let speed = planar.length();
            let drop = cfg.rolling_resistance * g * dt;
            if speed > drop {
                let slowed = planar - planar / speed * drop;
                self.velocity.x = slowed.x;
                self.velocity.z = slowed.z;
            } else {
                self.velocity.x = 0.0;
                self.velocity.z = 0.0;
            }
            let planar = Vec3::new(self.velocity.x, 0.0, self.velocity.z);
            let rolling = Vec3::Y.cross(planar) / self.radius;
            self.angular_velocity = Vec3::new(rolling.x, self.angular_velocity.y, rolling.z);
        }
        self.angular_velocity.y *= (1.0 - cfg.ground_spin_decay * dt).max(0.0);
        self.phase = BallPhase::Rolling;

        let planar_speed = Vec3::new(self.velocity.x, 0.0, self.velocity.z).length();
        if planar_speed < cfg.settle_speed && self.angular_velocity.length() < cfg.settle_spin {
            self.velocity = Vec3::ZERO;
            self.angular_velocity = Vec3::ZERO;
            self.phase = BallPhase::Settled;
        }
    }

    /// Replace the velocity after an obstacle hit and move the ball clear of the contact.
    pub fn deflect(&mut self, velocity: Vec3, spin_scale: f32, contact: &Contact) {
        self.velocity = velocity;
        self.angular_velocity *= spin_scale;
        self.position += contact.normal * (contact.depth + SEPARATION_MARGIN);
        self.position.y = self.position.y.max(self.radius);
        self.phase = BallPhase::Flying;
    }
}

/// Map accumulated curve input to an angular velocity. Horizontal input spins about world up
/// (bend left/right), vertical input spins about the axis across the flight path (dip/float).
pub fn spin_from_curve(direction: Vec3, curve: Vec2, controls: &ControlConfig, max_spin_rate: f32) -> Vec3 {
    let magnitude = curve.length();
    if !(magnitude >= controls.min_curve_input) {
        return Vec3::ZERO;
    }
    let strength = (magnitude / controls.max_curve).clamp(0.0, 1.0).powf(controls.spin_response_exponent);
    let rate = strength * max_spin_rate;
    if rate <= 0.01 {
        return Vec3::ZERO;
    }

    let input = curve / magnitude;
    let mut spin = Vec3::Y * (-input.x * rate);
    let side = direction.cross(Vec3::Y);
    if side.length_squared() > 1e-3 {
        spin += side.normalize() * (-input.y * rate);
    }
    spin.clamp_length_max(max_spin_rate * 1.2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball_at(pos: Vec3) -> (BallState, PhysicsConfig) {
        let cfg = PhysicsConfig::default();
        (BallState::new(pos, &cfg).unwrap(), cfg)
    }

    #[test]
    fn construction_rejects_bad_mass() {
        let cfg = PhysicsConfig { ball_mass: -1.0, ..Default::default() };
        assert!(BallState::new(Vec3::ZERO, &cfg).is_err());
    }

    #[test]
    fn resting_ball_stays_put_for_any_step() {
        let (mut ball, cfg) = ball_at(Vec3::new(0.0, 0.11, 0.0));
        for dt in [1e-6, 1.0 / 240.0, 1.0 / 60.0, 1.0 / 30.0, 0.5, 10.0] {
            // Force the full integration path, not just the settled shortcut.
            ball.phase = BallPhase::Rolling;
            ball.update(dt, &cfg);
            assert_eq!(ball.position.y, ball.radius(), "dt={dt}");
            assert_eq!(ball.velocity, Vec3::ZERO, "dt={dt}");
            assert_eq!(ball.angular_velocity, Vec3::ZERO, "dt={dt}");
            assert_eq!(ball.phase, BallPhase::Settled);
        }
    }

    #[test]
    fn straight_kick_has_no_spin() {
        let (mut ball, cfg) = ball_at(Vec3::new(0.0, 0.11, 0.0));
        let controls = ControlConfig::default();
        for power in [0.0, 5.0, 20.0, controls.max_power] {
            ball.kick(Vec3::new(0.1, 0.2, -1.0), power, Vec2::ZERO, &controls, &cfg);
            assert_eq!(ball.angular_velocity, Vec3::ZERO);
        }
        // Input under the threshold is also ignored.
        ball.kick(-Vec3::Z, 20.0, Vec2::new(1.0, 1.0), &controls, &cfg);
        assert_eq!(ball.angular_velocity, Vec3::ZERO);
    }

    #[test]
    fn kick_adds_loft_and_spin() {
        let (mut ball, cfg) = ball_at(Vec3::new(0.0, 0.11, 0.0));
        let controls = ControlConfig::default();
        ball.kick(-Vec3::Z, controls.max_power, Vec2::new(controls.max_curve, 0.0), &controls, &cfg);
        assert!((ball.velocity.y - 3.0).abs() < 1e-4, "flat shot gets 10 * 0.3 lift");
        assert!((ball.velocity.z + controls.max_power).abs() < 1e-4);
        // Full right input: spin about -Y at the max rate.
        assert!((ball.angular_velocity.y + cfg.max_spin_rate).abs() < 1e-3);
        assert_eq!(ball.phase, BallPhase::Flying);
    }

    #[test]
    fn magnus_force_is_horizontal_for_sidespin() {
        let (mut ball, cfg) = ball_at(Vec3::new(0.0, 5.0, 0.0));
        ball.angular_velocity = Vec3::new(0.0, 5.0, 0.0);
        ball.velocity = Vec3::new(0.0, 0.0, -20.0);
        let a = ball.magnus_acceleration(&cfg);
        assert!(a.x < 0.0, "ω × v = (-100, 0, 0) so the push is toward -x, got {a:?}");
        assert!(a.y.abs() < 1e-6 && a.z.abs() < 1e-6);
    }

    #[test]
    fn magnus_skips_parallel_spin() {
        let (mut ball, cfg) = ball_at(Vec3::new(0.0, 5.0, 0.0));
        ball.angular_velocity = Vec3::new(0.0, 0.0, 30.0);
        ball.velocity = Vec3::new(0.0, 0.0, -20.0);
        assert_eq!(ball.magnus_acceleration(&cfg), Vec3::ZERO);
        ball.velocity = Vec3::ZERO;
        ball.angular_velocity = Vec3::new(0.0, 30.0, 0.0);
        assert_eq!(ball.magnus_acceleration(&cfg), Vec3::ZERO);
    }

    #[test]
    fn drag_opposes_motion() {
        let (mut ball, cfg) = ball_at(Vec3::new(0.0, 5.0, 0.0));
        ball.velocity = Vec3::new(3.0, 0.0, -20.0);
        let a = ball.drag_acceleration(&cfg);
        assert!(a.dot(ball.velocity) < 0.0);
        assert!(a.cross(ball.velocity).length() < 1e-3);
    }

    #[test]
    fn bounce_loses_energy() {
        let cfg = PhysicsConfig::default();
        let dt = 1.0 / 60.0;
        let spins = [Vec3::ZERO, Vec3::new(40.0, 0.0, 0.0), Vec3::new(0.0, 30.0, -20.0)];
        for v_in in [-0.6, -2.0, -6.0, -12.0, -25.0] {
            for spin in spins {
                let (mut ball, _) = ball_at(Vec3::new(0.0, 0.115, 0.0));
                ball.velocity = Vec3::new(1.5, v_in, -8.0);
                let incoming = ball.speed();
                ball.angular_velocity = spin;
                ball.phase = BallPhase::Flying;
                let step = ball.update(dt, &cfg);
                let impact = step.ground_impact.expect("ball should hit the ground");
                assert!(ball.velocity.y >= 0.0, "v_in={v_in} spin={spin:?}");
                assert!(
                    ball.velocity.y <= cfg.ground_restitution * impact + 1e-5,
                    "v_in={v_in} spin={spin:?}: {} > {}",
                    ball.velocity.y,
                    cfg.ground_restitution * impact
                );
                assert!(impact <= incoming - cfg.gravity.y * dt + 1e-3);
                assert_eq!(ball.position.y, ball.radius());
            }
        }
    }

    #[test]
    fn backspin_bounce_checks_forward_speed() {
        let (mut ball, cfg) = ball_at(Vec3::new(0.0, 0.115, 0.0));
        ball.velocity = Vec3::new(0.0, -5.0, -10.0);
        // Rolling toward -z spins about -x, so +x is backspin.
        ball.angular_velocity = Vec3::new(40.0, 0.0, 0.0);
        ball.phase = BallPhase::Flying;
        ball.update(1.0 / 60.0, &cfg);
        assert!(ball.velocity.z > -10.0, "friction should slow the ball, got {}", ball.velocity.z);
    }

    #[test]
    fn rolling_ball_comes_to_rest() {
        let (mut ball, cfg) = ball_at(Vec3::new(0.0, 0.11, 0.0));
        ball.velocity = Vec3::new(0.0, 0.0, -4.0);
        ball.phase = BallPhase::Rolling;
        let mut steps = 0;
        while ball.phase != BallPhase::Settled && steps < 60 * 60 {
            ball.update(1.0 / 60.0, &cfg);
            steps += 1;
        }
        assert_eq!(ball.phase, BallPhase::Settled);
        assert_eq!(ball.velocity, Vec3::ZERO);
        assert_eq!(ball.angular_velocity, Vec3::ZERO);
        assert!(ball.position.z < 0.0);
        assert!(ball.is_settled());
    }

    #[test]
    fn sliding_converts_to_rolling_spin() {
        let (mut ball, cfg) = ball_at(Vec3::new(0.0, 0.11, 0.0));
        ball.velocity = Vec3::new(0.0, 0.0, -6.0);
        ball.phase = BallPhase::Rolling;
        for _ in 0..120 {
            ball.update(1.0 / 60.0, &cfg);
        }
        let expected = Vec3::Y.cross(Vec3::new(ball.velocity.x, 0.0, ball.velocity.z)) / ball.radius();
        assert!((ball.angular_velocity.x - expected.x).abs() < 1e-3);
        assert!(ball.angular_velocity.x < 0.0);
    }

    #[test]
    fn reset_restores_spawn() {
        let (mut ball, cfg) = ball_at(Vec3::new(1.0, 0.11, 2.0));
        ball.kick(Vec3::new(0.0, 0.3, -1.0), 25.0, Vec2::new(120.0, -40.0), &ControlConfig::default(), &cfg);
        for _ in 0..30 {
            ball.update(1.0 / 60.0, &cfg);
        }
        ball.reset();
        assert_eq!(ball.position, Vec3::new(1.0, 0.11, 2.0));
        assert_eq!(ball.velocity, Vec3::ZERO);
        assert_eq!(ball.angular_velocity, Vec3::ZERO);
        assert_eq!(ball.orientation, Quat::IDENTITY);
    }

    #[test]
    fn oversized_step_is_clamped() {
        let (mut a, cfg) = ball_at(Vec3::new(0.0, 10.0, 0.0));
        let mut b = a;
        a.phase = BallPhase::Flying;
        b.phase = BallPhase::Flying;
        a.update(2.0, &cfg);
        b.update(cfg.max_timestep, &cfg);
        assert_eq!(a.position, b.position);
        assert_eq!(a.velocity, b.velocity);
    }

    #[test]
    fn spin_is_capped() {
        let controls = ControlConfig::default();
        let max = 15.0;
        let spin = spin_from_curve(-Vec3::Z, Vec2::new(1e6, 1e6), &controls, max);
        assert!(spin.length() <= max * 1.2 + 1e-4);
    }
}
