// Shot loop: launch, per-step collision resolution and outcome classification.
use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::physics::ball::BallState;
use crate::physics::config::{ConfigError, GameConfig};
use crate::physics::goal::GoalFrame;
use crate::physics::goalkeeper::SaveKind;
use crate::physics::outcome::{is_out_of_bounds, ContactReport, Outcome, OutcomeKind, Surface};
use crate::physics::pitch::Pitch;
use crate::physics::wall::Wall;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShotError {
    #[error("attempt {0} is still in flight")]
    AttemptInFlight(u64),
    #[error("shot direction has no length")]
    DegenerateDirection,
}

/// Handle for one running shot. Steps carrying an older token are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopToken(u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotAttempt {
    pub id: u64,
    pub direction: Vec3,
    pub power: f32,
    pub curve: Vec2,
    pub elapsed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimPhase {
    Idle,
    InFlight(ShotAttempt),
    Finished { outcome: Outcome, reset_in: f32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    pub contact: Option<ContactReport>,
    pub outcome: Option<Outcome>,
}

#[derive(Resource, Debug, Clone)]
pub struct ShotSimulation {
    ball: BallState,
    phase: SimPhase,
    generation: u64,
    attempts: u64,
    last_contact: Option<Surface>,
    // Cleared by a save, set again once the ball has left the keeper's reach.
    keeper_armed: bool,
    rng: ChaCha8Rng,
}

impl ShotSimulation {
    /// Seeds from `session.seed` when set, otherwise from entropy.
    pub fn new(spawn: Vec3, cfg: &GameConfig) -> Result<Self, ConfigError> {
        let rng = match cfg.session.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(spawn, cfg, rng)
    }

    pub fn with_rng(spawn: Vec3, cfg: &GameConfig, rng: ChaCha8Rng) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            ball: BallState::new(spawn, &cfg.physics)?,
            phase: SimPhase::Idle,
            generation: 0,
            attempts: 0,
            last_contact: None,
            keeper_armed: true,
            rng,
        })
    }

    pub fn ball(&self) -> &BallState { &self.ball }
    pub fn phase(&self) -> &SimPhase { &self.phase }
    pub fn attempts(&self) -> u64 { self.attempts }

    pub fn is_in_flight(&self) -> bool {
        matches!(self.phase, SimPhase::InFlight(_))
    }

    /// Token of the shot currently in flight.
    pub fn active_token(&self) -> Option<LoopToken> {
        self.is_in_flight().then_some(LoopToken(self.generation))
    }

    /// Strike the ball from its spawn. A pending result is discarded first.
    pub fn launch(&mut self, direction: Vec3, power: f32, curve: Vec2, cfg: &GameConfig) -> Result<LoopToken, ShotError> {
        if let SimPhase::InFlight(attempt) = self.phase {
            return Err(ShotError::AttemptInFlight(attempt.id));
        }
        let dir = direction.try_normalize().ok_or(ShotError::DegenerateDirection)?;
        let power = power.clamp(0.0, cfg.controls.max_power);

        self.ball.reset();
        self.ball.kick(dir, power, curve, &cfg.controls, &cfg.physics);
        self.generation += 1;
        self.attempts += 1;
        self.last_contact = None;
        self.keeper_armed = true;
        self.phase = SimPhase::InFlight(ShotAttempt { id: self.attempts, direction: dir, power, curve, elapsed: 0.0 });
        info!("shot {} launched: power {:.1} curve ({:.0}, {:.0})", self.attempts, power, curve.x, curve.y);
        Ok(LoopToken(self.generation))
    }

    /// One simulation step: integrate, resolve at most one contact, classify.
    pub fn step(&mut self, token: LoopToken, dt: f32, pitch: &Pitch, cfg: &GameConfig) -> StepReport {
        if token != LoopToken(self.generation) {
            debug!("ignoring step for stale shot token {:?}", token);
            return StepReport::default();
        }
        let SimPhase::InFlight(mut attempt) = self.phase else {
            return StepReport::default();
        };
        if !(dt > 0.0) || !dt.is_finite() {
            return StepReport::default();
        }

        let ball_step = self.ball.update(dt, &cfg.physics);
        attempt.elapsed += dt.min(cfg.physics.max_timestep);
        if let Some(impact) = ball_step.ground_impact {
            debug!("shot {} bounced at {:.1} m/s", attempt.id, impact);
        }

        let (contact, caught) = self.resolve_contact(pitch, cfg);
        if let Some(c) = contact {
            debug!("shot {} hit {} at {:?}", attempt.id, c.surface, c.point);
            self.last_contact = Some(c.surface);
        }

        let r = self.ball.radius();
        let kind = if caught {
            Some(OutcomeKind::Saved)
        } else if pitch.goal.contains(self.ball.position, r) {
            Some(OutcomeKind::Goal)
        } else if attempt.elapsed >= cfg.session.out_of_bounds_grace
            && is_out_of_bounds(self.ball.position, r, &cfg.field)
        {
            Some(self.last_contact.map_or(OutcomeKind::OutOfBounds, OutcomeKind::from))
        } else if self.ball.is_settled() {
            self.ball.settle();
            Some(self.last_contact.map_or(OutcomeKind::NoGoal, OutcomeKind::from))
        } else {
            None
        };

        let outcome = match kind {
            Some(kind) => Some(self.finish(kind, attempt, cfg)),
            None => {
                self.phase = SimPhase::InFlight(attempt);
                None
            }
        };
        StepReport { contact, outcome }
    }

    // Wall, then keeper, then frame; the first hit wins.
    fn resolve_contact(&mut self, pitch: &Pitch, cfg: &GameConfig) -> (Option<ContactReport>, bool) {
        let r = self.ball.radius();
        let keeper = &pitch.keeper;
        if !self.keeper_armed && !keeper.in_reach(self.ball.position) {
            self.keeper_armed = true;
        }

        if let Some(contact) = pitch.wall.check_collision(self.ball.position, r) {
            Wall::deflect(&mut self.ball, &contact, &cfg.physics, &mut self.rng);
            return (Some(self.report(Surface::Wall, contact.point)), false);
        }

        if self.keeper_armed {
            let save = keeper.check_save(self.ball.position, self.ball.velocity, r, cfg.controls.max_power, &mut self.rng);
            if let Some(save) = save {
                self.keeper_armed = false;
                let contact = keeper.apply_save(&mut self.ball, &save, &mut self.rng);
                return (Some(self.report(Surface::Keeper, contact.point)), save.kind == SaveKind::Caught);
            }
        }

        if let Some((surface, contact)) = pitch.goal.check_collision(self.ball.position, r) {
            GoalFrame::deflect(&mut self.ball, &contact, &cfg.physics, &mut self.rng);
            return (Some(self.report(surface.into(), contact.point)), false);
        }
        (None, false)
    }

    fn report(&self, surface: Surface, point: Vec3) -> ContactReport {
        ContactReport { surface, point, velocity: self.ball.velocity }
    }

    fn finish(&mut self, kind: OutcomeKind, attempt: ShotAttempt, cfg: &GameConfig) -> Outcome {
        let outcome = Outcome { kind, ball: self.ball, elapsed: attempt.elapsed, attempt: attempt.id };
        info!("shot {} finished: {:?} after {:.2}s", attempt.id, kind, attempt.elapsed);
        self.phase = SimPhase::Finished { outcome, reset_in: cfg.session.reset_delay };
        outcome
    }

    /// Count down a finished shot. Returns true on the tick the ball goes back to the spot.
    pub fn tick_reset(&mut self, dt: f32) -> bool {
        let SimPhase::Finished { reset_in, .. } = &mut self.phase else {
            return false;
        };
        *reset_in -= dt.max(0.0);
        if *reset_in > 0.0 {
            return false;
        }
        self.reset();
        true
    }

    /// Abandon whatever is running and put the ball back.
    pub fn cancel(&mut self) {
        if self.is_in_flight() {
            debug!("cancelling shot {}", self.attempts);
        }
        self.reset();
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.ball.reset();
        self.phase = SimPhase::Idle;
        self.last_contact = None;
        self.keeper_armed = true;
    }

    /// New free-kick spot; cancels any running shot.
    pub fn relocate(&mut self, spawn: Vec3) {
        self.ball.set_spawn(spawn);
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ball::BallPhase;
    use crate::physics::config::ShotSpot;

    fn setup() -> (ShotSimulation, Pitch, GameConfig) {
        let mut cfg = GameConfig::default();
        cfg.session.seed = Some(42);
        let pitch = Pitch::new(&cfg, ShotSpot::Centre);
        let sim = ShotSimulation::new(cfg.spot_position(ShotSpot::Centre), &cfg).unwrap();
        (sim, pitch, cfg)
    }

    #[test]
    fn launch_refused_while_in_flight() {
        let (mut sim, _, cfg) = setup();
        sim.launch(-Vec3::Z, 20.0, Vec2::ZERO, &cfg).unwrap();
        assert_eq!(sim.launch(-Vec3::Z, 20.0, Vec2::ZERO, &cfg), Err(ShotError::AttemptInFlight(1)));
        assert_eq!(sim.attempts(), 1);
    }

    #[test]
    fn degenerate_direction_is_rejected() {
        let (mut sim, _, cfg) = setup();
        assert_eq!(sim.launch(Vec3::ZERO, 20.0, Vec2::ZERO, &cfg), Err(ShotError::DegenerateDirection));
        assert!(!sim.is_in_flight());
    }

    #[test]
    fn stale_token_does_nothing() {
        let (mut sim, pitch, cfg) = setup();
        let old = sim.launch(-Vec3::Z, 20.0, Vec2::ZERO, &cfg).unwrap();
        sim.cancel();
        let fresh = sim.launch(-Vec3::Z, 20.0, Vec2::ZERO, &cfg).unwrap();
        assert_ne!(old, fresh);
        let before = *sim.ball();
        assert_eq!(sim.step(old, 1.0 / 60.0, &pitch, &cfg), StepReport::default());
        assert_eq!(*sim.ball(), before);
        sim.step(fresh, 1.0 / 60.0, &pitch, &cfg);
        assert_ne!(sim.ball().position, before.position);
    }

    #[test]
    fn launching_over_a_pending_result_resets_first() {
        let (mut sim, pitch, cfg) = setup();
        // A dead ball settles quickly.
        let token = sim.launch(-Vec3::Z, 0.0, Vec2::ZERO, &cfg).unwrap();
        for _ in 0..600 {
            if sim.step(token, 1.0 / 60.0, &pitch, &cfg).outcome.is_some() {
                break;
            }
        }
        assert!(matches!(sim.phase(), SimPhase::Finished { outcome, .. } if outcome.kind == OutcomeKind::NoGoal));
        let next = sim.launch(-Vec3::Z, 10.0, Vec2::ZERO, &cfg).unwrap();
        assert_eq!(sim.active_token(), Some(next));
        assert_eq!(sim.attempts(), 2);
        assert!(!sim.tick_reset(10.0), "old reset timer is gone");
    }

    #[test]
    fn short_dink_ends_with_a_settled_ball() {
        let (mut sim, mut pitch, cfg) = setup();
        pitch.wall = Wall::from_players(Vec::new());
        let token = sim.launch(-Vec3::Z, 3.0, Vec2::ZERO, &cfg).unwrap();
        let outcome = (0..3600)
            .find_map(|_| sim.step(token, 1.0 / 60.0, &pitch, &cfg).outcome)
            .expect("dink should come to rest");
        assert_eq!(outcome.kind, OutcomeKind::NoGoal);
        assert_eq!(outcome.ball.phase, BallPhase::Settled);
        assert_eq!(outcome.ball.velocity, Vec3::ZERO);
        assert_eq!(outcome.ball.angular_velocity, Vec3::ZERO);
        assert_eq!(outcome.ball.position.y, outcome.ball.radius());
    }

    #[test]
    fn reset_timer_fires_once() {
        let (mut sim, pitch, cfg) = setup();
        let token = sim.launch(-Vec3::Z, 0.0, Vec2::ZERO, &cfg).unwrap();
        while sim.step(token, 1.0 / 60.0, &pitch, &cfg).outcome.is_none() {}
        assert!(!sim.tick_reset(cfg.session.reset_delay * 0.5));
        assert!(sim.tick_reset(cfg.session.reset_delay));
        assert!(!sim.tick_reset(cfg.session.reset_delay));
        assert_eq!(*sim.phase(), SimPhase::Idle);
        assert_eq!(sim.ball().position, cfg.spot_position(ShotSpot::Centre));
    }
}
