// Immutable tuning tables for the free kick: ball physics, pitch geometry, controls,
// defenders and session timing. Loaded once from RON and validated before use.
use bevy::prelude::*;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ball mass must be positive (got {0})")]
    NonPositiveMass(f32),
    #[error("ball radius must be positive (got {0})")]
    NonPositiveRadius(f32),
    #[error("{name} must be within [0, 1] (got {value})")]
    RestitutionOutOfRange { name: &'static str, value: f32 },
    #[error("{name} must be positive (got {value})")]
    NonPositive { name: &'static str, value: f32 },
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Vec3Def { pub x: f32, pub y: f32, pub z: f32 }
impl Vec3Def { pub fn to_vec3(self) -> Vec3 { Vec3::new(self.x, self.y, self.z) } }

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: Vec3Def,
    pub air_density: f32,
    pub drag_coefficient: f32,
    /// Kinetic (sliding) friction coefficient between ball and turf.
    pub ground_friction: f32,
    /// Rolling resistance coefficient, applied as `c * g` deceleration.
    pub rolling_resistance: f32,
    pub ground_restitution: f32,
    pub post_restitution: f32,
    pub wall_restitution: f32,
    pub wall_spin_retention: f32,
    /// Slope of the lift coefficient against spin ratio (`Cl = slope * S`).
    pub magnus_lift_slope: f32,
    pub max_spin_rate: f32,
    /// Fractional angular velocity lost per second while airborne.
    pub spin_decay: f32,
    /// Fractional vertical spin lost per second while in ground contact.
    pub ground_spin_decay: f32,
    pub ball_mass: f32,
    pub ball_radius: f32,
    pub max_timestep: f32,
    /// Rebound speeds below this are treated as resting contact.
    pub rest_speed: f32,
    pub speed_epsilon: f32,
    pub spin_epsilon: f32,
    pub slip_epsilon: f32,
    pub settle_speed: f32,
    pub settle_spin: f32,
    /// Random speed added to obstacle deflections (m/s).
    pub deflection_jitter: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3Def { x: 0.0, y: -9.81, z: 0.0 },
            air_density: 1.225,
            drag_coefficient: 0.25,
            ground_friction: 0.4,
            rolling_resistance: 0.06,
            ground_restitution: 0.6,
            post_restitution: 0.5,
            wall_restitution: 0.4,
            wall_spin_retention: 0.3,
            magnus_lift_slope: 1.0,
            max_spin_rate: 15.0 * std::f32::consts::PI,
            spin_decay: 0.1,
            ground_spin_decay: 1.5,
            ball_mass: 0.43,
            ball_radius: 0.11,
            max_timestep: 1.0 / 30.0,
            rest_speed: 0.5,
            speed_epsilon: 0.01,
            spin_epsilon: 0.03,
            slip_epsilon: 0.02,
            settle_speed: 0.05,
            settle_spin: 0.2,
            deflection_jitter: 1.0,
        }
    }
}

impl PhysicsConfig {
    pub fn gravity_vec(&self) -> Vec3 {
        self.gravity.to_vec3()
    }

    pub fn cross_section_area(&self) -> f32 {
        std::f32::consts::PI * self.ball_radius * self.ball_radius
    }

    /// Moment of inertia of a solid sphere, `2/5 m r²`.
    pub fn moment_of_inertia(&self) -> f32 {
        0.4 * self.ball_mass * self.ball_radius * self.ball_radius
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.ball_mass > 0.0) {
            return Err(ConfigError::NonPositiveMass(self.ball_mass));
        }
        if !(self.ball_radius > 0.0) {
            return Err(ConfigError::NonPositiveRadius(self.ball_radius));
        }
        if !(self.max_timestep > 0.0) {
            return Err(ConfigError::NonPositive { name: "max_timestep", value: self.max_timestep });
        }
        for (name, value) in [
            ("ground_restitution", self.ground_restitution),
            ("post_restitution", self.post_restitution),
            ("wall_restitution", self.wall_restitution),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RestitutionOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

// Goal at the far end of the pitch, mouth facing +z.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub length: f32,
    pub width: f32,
    pub goal_width: f32,
    pub goal_height: f32,
    pub goal_depth: f32,
    pub post_radius: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            length: 105.0,
            width: 70.0,
            goal_width: 7.32,
            goal_height: 2.44,
            goal_depth: 2.0,
            post_radius: 0.06,
        }
    }
}

impl FieldConfig {
    pub fn goal_line_z(&self) -> f32 {
        -self.length / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Launch speed at full charge (m/s).
    pub max_power: f32,
    /// Fraction of `max_power` gained (or lost) per second while charging.
    pub charge_speed: f32,
    /// Accumulated curve magnitude giving full spin (mouse pixels).
    pub max_curve: f32,
    /// Curve below this magnitude produces no spin at all.
    pub min_curve_input: f32,
    /// Exponent (≤ 1) shaping spin response to small inputs.
    pub spin_response_exponent: f32,
    pub camera_sensitivity: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            max_power: 32.0,
            charge_speed: 0.6,
            max_curve: 300.0,
            min_curve_input: 3.2,
            spin_response_exponent: 0.8,
            camera_sensitivity: 0.0025,
            min_pitch: -std::f32::consts::FRAC_PI_2 * 0.1,
            max_pitch: std::f32::consts::FRAC_PI_2 * 0.48,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeeperConfig {
    pub height: f32,
    pub torso_radius: f32,
    /// Distance in front of the goal line.
    pub stand_off: f32,
    /// Per-frame interpolation factor toward the ball at 60 Hz.
    pub agility: f32,
    pub track_depth: f32,
    pub catch_speed: f32,
    pub soft_catch_speed: f32,
    pub catch_chance: f32,
    pub parry_restitution: f32,
    pub parry_lift: f32,
    pub idle_frequency: f32,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            height: 1.9,
            torso_radius: 0.25,
            stand_off: 0.8,
            agility: 0.1,
            track_depth: 5.0,
            catch_speed: 22.0,
            soft_catch_speed: 10.0,
            catch_chance: 0.75,
            parry_restitution: 0.4,
            parry_lift: 2.0,
            idle_frequency: 0.5,
        }
    }
}

impl KeeperConfig {
    pub fn reach(&self) -> f32 {
        self.height * 0.5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    pub player_count: usize,
    pub distance: f32,
    pub player_spacing: f32,
    pub player_height: f32,
    pub body_radius: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            player_count: 5,
            distance: 9.15,
            player_spacing: 1.08,
            player_height: 1.8,
            body_radius: 0.25,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
pub enum ShotSpot {
    Left,
    #[default]
    Centre,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed seed for collision perturbations; `None` draws from entropy.
    pub seed: Option<u64>,
    pub reset_delay: f32,
    pub out_of_bounds_grace: f32,
    pub start_spot: ShotSpot,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { seed: None, reset_delay: 1.5, out_of_bounds_grace: 0.5, start_spot: ShotSpot::Centre }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Resource, Default)]
#[serde(default)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub field: FieldConfig,
    pub controls: ControlConfig,
    pub keeper: KeeperConfig,
    pub wall: WallConfig,
    pub session: SessionConfig,
}

impl GameConfig {
    pub fn from_ron_str(data: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = ron::from_str(data)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&data)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        if !(self.controls.max_power > 0.0) {
            return Err(ConfigError::NonPositive { name: "controls.max_power", value: self.controls.max_power });
        }
        if !(self.controls.max_curve > 0.0) {
            return Err(ConfigError::NonPositive { name: "controls.max_curve", value: self.controls.max_curve });
        }
        if !(self.field.goal_width > 0.0 && self.field.goal_height > 0.0) {
            return Err(ConfigError::NonPositive { name: "field.goal_width/goal_height", value: self.field.goal_width.min(self.field.goal_height) });
        }
        Ok(())
    }

    /// Ball spawn for a free-kick spot (x, distance from goal line).
    pub fn spot_position(&self, spot: ShotSpot) -> Vec3 {
        let (x, dist) = match spot {
            ShotSpot::Left => (-self.field.width * 0.2, 22.0),
            ShotSpot::Centre => (0.0, 28.0),
            ShotSpot::Right => (self.field.width * 0.2, 22.0),
        };
        Vec3::new(x, self.physics.ball_radius, self.field.goal_line_z() + dist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_helpers_match_ball_size() {
        let p = PhysicsConfig::default();
        let r = p.ball_radius;
        assert!((p.cross_section_area() - std::f32::consts::PI * r * r).abs() < 1e-7);
        assert!((p.moment_of_inertia() - 0.4 * p.ball_mass * r * r).abs() < 1e-7);
    }

    #[test]
    fn defaults_validate() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_mass_and_radius() {
        let mut cfg = GameConfig::default();
        cfg.physics.ball_mass = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositiveMass(_))));

        let mut cfg = GameConfig::default();
        cfg.physics.ball_radius = -0.1;
        assert!(matches!(cfg.validate(), Err(ConfigError::NonPositiveRadius(_))));
    }

    #[test]
    fn rejects_restitution_above_one() {
        let mut cfg = GameConfig::default();
        cfg.physics.post_restitution = 1.4;
        match cfg.validate() {
            Err(ConfigError::RestitutionOutOfRange { name, .. }) => assert_eq!(name, "post_restitution"),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let cfg = GameConfig::from_ron_str("(physics: (ball_mass: 0.45), session: (seed: Some(7)))").unwrap();
        assert_eq!(cfg.physics.ball_mass, 0.45);
        assert_eq!(cfg.physics.ball_radius, PhysicsConfig::default().ball_radius);
        assert_eq!(cfg.session.seed, Some(7));
        assert_eq!(cfg.field, FieldConfig::default());
    }

    #[test]
    fn spots_sit_on_the_ground_in_front_of_goal() {
        let cfg = GameConfig::default();
        for spot in [ShotSpot::Left, ShotSpot::Centre, ShotSpot::Right] {
            let p = cfg.spot_position(spot);
            assert_eq!(p.y, cfg.physics.ball_radius);
            assert!(p.z > cfg.field.goal_line_z());
        }
    }
}
