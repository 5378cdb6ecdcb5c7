// Shot charge state and scoring resources.

use bevy::prelude::*;

use crate::physics::config::GameConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotMode {
    Idle,
    Charging,
}

#[derive(Resource, Debug)]
pub struct ShotState {
    pub mode: ShotMode,
    pub power: f32,   // 0..1 (oscillating)
    pub rising: bool, // triangle wave direction
    pub curve: Vec2,  // accumulated mouse motion while charging
}
impl Default for ShotState {
    fn default() -> Self {
        Self { mode: ShotMode::Idle, power: 0.0, rising: true, curve: Vec2::ZERO }
    }
}

impl ShotState {
    pub fn begin(&mut self) {
        self.mode = ShotMode::Charging;
        self.power = 0.0;
        self.rising = true;
        self.curve = Vec2::ZERO;
    }

    pub fn cancel(&mut self) {
        *self = Self::default();
    }

    /// Triangle wave between 0 and 1 at `speed` units per second.
    pub fn advance(&mut self, dt: f32, speed: f32) {
        if self.mode != ShotMode::Charging {
            return;
        }
        let delta = speed * dt.max(0.0);
        if self.rising {
            self.power += delta;
            if self.power >= 1.0 {
                self.power = 1.0;
                self.rising = false;
            }
        } else {
            self.power -= delta;
            if self.power <= 0.0 {
                self.power = 0.0;
                self.rising = true;
            }
        }
    }

    /// Accumulate curve input; the total stays inside a disc of radius `max_curve`.
    pub fn add_curve(&mut self, delta: Vec2, max_curve: f32) {
        if self.mode == ShotMode::Charging {
            self.curve = (self.curve + delta).clamp_length_max(max_curve);
        }
    }

    /// End the charge. Returns the power fraction and curve when a charge was running.
    pub fn release(&mut self) -> Option<(f32, Vec2)> {
        if self.mode != ShotMode::Charging {
            return None;
        }
        let shot = (self.power, self.curve);
        self.cancel();
        Some(shot)
    }
}

#[derive(Resource, Debug, Default)]
pub struct Score {
    pub shots: u32,
    pub goals: u32,
    pub last_message: String,
}

impl Score {
    pub fn success_rate(&self) -> f32 {
        if self.shots == 0 { 0.0 } else { self.goals as f32 / self.shots as f32 * 100.0 }
    }
}

pub struct GameStatePlugin;
impl Plugin for GameStatePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ShotState::default())
            .insert_resource(Score::default())
            .add_systems(Update, update_shot_charge);
    }
}

fn update_shot_charge(time: Res<Time>, mut state: ResMut<ShotState>, cfg: Res<GameConfig>) {
    if state.mode != ShotMode::Charging {
        return;
    }
    state.advance(time.delta_seconds(), cfg.controls.charge_speed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn charge_bounces_between_bounds() {
        let mut s = ShotState::default();
        s.begin();
        let mut peaked = false;
        for _ in 0..400 {
            s.advance(1.0 / 60.0, 0.6);
            assert!((0.0..=1.0).contains(&s.power));
            peaked |= s.power == 1.0;
        }
        assert!(peaked);
    }

    #[test]
    fn idle_state_ignores_input() {
        let mut s = ShotState::default();
        s.advance(1.0, 0.6);
        s.add_curve(Vec2::new(50.0, 0.0), 300.0);
        assert_eq!(s.power, 0.0);
        assert_eq!(s.curve, Vec2::ZERO);
        assert!(s.release().is_none());
    }

    #[test]
    fn curve_is_clamped_and_release_resets() {
        let mut s = ShotState::default();
        s.begin();
        for _ in 0..20 {
            s.add_curve(Vec2::new(40.0, 30.0), 300.0);
        }
        assert!(s.curve.length() <= 300.0 + 1e-3);
        s.advance(0.5, 0.6);
        let (power, curve) = s.release().unwrap();
        assert!((power - 0.3).abs() < 1e-5);
        assert!(curve.x > 0.0);
        assert_eq!(s.mode, ShotMode::Idle);
        assert_eq!(s.curve, Vec2::ZERO);
    }

    #[test]
    fn success_rate() {
        let score = Score { shots: 4, goals: 1, last_message: String::new() };
        assert_eq!(score.success_rate(), 25.0);
        assert_eq!(Score::default().success_rate(), 0.0);
    }
}
