// Fixed-tick shot loop: keeper tracking, simulation steps, outcome scoring and reset timing.
use bevy::prelude::*;

use crate::physics::config::GameConfig;
use crate::physics::outcome::{OutcomeKind, Surface};
use crate::physics::pitch::Pitch;
use crate::physics::simulation::{LoopToken, ShotSimulation};
use crate::plugins::core_sim::{SimTick, FIXED_HZ};
use crate::plugins::game_state::Score;

const STEP_DT: f32 = 1.0 / FIXED_HZ as f32;

// Events emitted by gameplay code
#[derive(Event, Debug, Clone, Copy)]
pub struct ShotFiredEvent {
    pub pos: Vec3,
    pub power: f32,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct BallContactEvent {
    pub surface: Surface,
    pub point: Vec3,
    pub velocity: Vec3,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct ShotOutcomeEvent {
    pub kind: OutcomeKind,
    pub attempt: u64,
    pub position: Vec3,
    pub elapsed: f32,
}

/// Token of the shot being stepped; cleared when it finishes or is cancelled.
#[derive(Resource, Debug, Default)]
pub struct ActiveShot(pub Option<LoopToken>);

pub struct ShotFlowPlugin;
impl Plugin for ShotFlowPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveShot>()
            .add_event::<ShotFiredEvent>()
            .add_event::<BallContactEvent>()
            .add_event::<ShotOutcomeEvent>()
            .add_systems(
                FixedUpdate,
                (track_goalkeeper, advance_shot, count_down_reset).chain().after(SimTick),
            );
    }
}

fn track_goalkeeper(mut pitch: ResMut<Pitch>, sim: Option<Res<ShotSimulation>>) {
    let Some(sim) = sim else { return; };
    let ball = sim.ball();
    pitch.keeper.track(ball.position, ball.velocity, STEP_DT);
}

fn advance_shot(
    cfg: Res<GameConfig>,
    pitch: Res<Pitch>,
    sim: Option<ResMut<ShotSimulation>>,
    mut active: ResMut<ActiveShot>,
    mut score: ResMut<Score>,
    mut ev_contact: EventWriter<BallContactEvent>,
    mut ev_outcome: EventWriter<ShotOutcomeEvent>,
) {
    let (Some(mut sim), Some(token)) = (sim, active.0) else { return; };

    let report = sim.step(token, STEP_DT, &pitch, &cfg);
    if let Some(c) = report.contact {
        ev_contact.send(BallContactEvent { surface: c.surface, point: c.point, velocity: c.velocity });
    }
    if let Some(outcome) = report.outcome {
        if outcome.kind.is_goal() {
            score.goals += 1;
        }
        score.last_message = outcome.kind.label().to_string();
        ev_outcome.send(ShotOutcomeEvent {
            kind: outcome.kind,
            attempt: outcome.attempt,
            position: outcome.ball.position,
            elapsed: outcome.elapsed,
        });
        active.0 = None;
    } else if sim.active_token() != Some(token) {
        // Cancelled or relocated elsewhere.
        active.0 = None;
    }
}

fn count_down_reset(sim: Option<ResMut<ShotSimulation>>, mut score: ResMut<Score>) {
    let Some(mut sim) = sim else { return; };
    if sim.tick_reset(STEP_DT) {
        debug!("ball back on the spot");
        score.last_message.clear();
    }
}
