use bevy::prelude::*;

use crate::physics::outcome::Surface;
use crate::physics::pitch::Pitch;
use crate::physics::simulation::{ShotSimulation, SimPhase};
use crate::plugins::camera::CursorCapture;
use crate::plugins::game_state::Score;
use crate::plugins::shot_flow::{BallContactEvent, ShotFiredEvent};

// How long a contact callout stays on screen.
const CALLOUT_SECONDS: f32 = 1.2;

#[derive(Component)]
pub struct Hud;

#[derive(Component)]
pub struct Banner;

#[derive(Component)]
pub struct Callout;

/// Short message for the last surface the ball touched, shown while the shot plays out.
#[derive(Resource, Debug, Default)]
pub struct ContactCallout {
    message: &'static str,
    remaining: f32,
}

impl ContactCallout {
    pub fn message(&self) -> &'static str { self.message }

    pub fn show(&mut self, surface: Surface) {
        self.message = surface.callout();
        self.remaining = CALLOUT_SECONDS;
    }

    pub fn clear(&mut self) {
        self.message = "";
        self.remaining = 0.0;
    }

    pub fn tick(&mut self, dt: f32) {
        if self.remaining <= 0.0 {
            return;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.clear();
        }
    }
}

pub struct HudPlugin;
impl Plugin for HudPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ContactCallout>()
            .add_systems(Startup, spawn_hud)
            .add_systems(Update, (update_hud, update_banner, update_callout));
    }
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        TextBundle::from_section("", TextStyle { font_size: 20.0, color: Color::WHITE, ..default() })
            .with_style(Style {
                position_type: PositionType::Absolute,
                left: Val::Px(12.0),
                top: Val::Px(8.0),
                ..default()
            }),
        Hud,
    ));
    commands.spawn((
        TextBundle::from_section("", TextStyle { font_size: 48.0, color: Color::srgb(1.0, 0.9, 0.2), ..default() })
            .with_style(Style {
                position_type: PositionType::Absolute,
                left: Val::Percent(40.0),
                top: Val::Percent(20.0),
                ..default()
            }),
        Banner,
    ));
    commands.spawn((
        TextBundle::from_section("", TextStyle { font_size: 30.0, color: Color::srgb(1.0, 0.55, 0.2), ..default() })
            .with_style(Style {
                position_type: PositionType::Absolute,
                left: Val::Percent(40.0),
                top: Val::Percent(30.0),
                ..default()
            }),
        Callout,
    ));
}

fn update_hud(
    score: Res<Score>,
    sim: Res<ShotSimulation>,
    pitch: Res<Pitch>,
    capture: Res<CursorCapture>,
    mut q_text: Query<&mut Text, With<Hud>>,
) {
    let Ok(mut text) = q_text.get_single_mut() else { return; };
    let hint = if capture.captured {
        "Hold left mouse to charge, move to curve, release to shoot | 1/2/3: change spot | Esc: release cursor"
    } else {
        "Click to aim"
    };
    text.sections[0].value = format!(
        "Shots: {} | Goals: {} | Success: {:.0}% | Spot: {:?} | Speed: {:.1} m/s\n{}",
        score.shots,
        score.goals,
        score.success_rate(),
        pitch.spot(),
        sim.ball().speed(),
        hint,
    );
}

fn update_banner(score: Res<Score>, sim: Res<ShotSimulation>, mut q_text: Query<&mut Text, With<Banner>>) {
    let Ok(mut text) = q_text.get_single_mut() else { return; };
    let shown = match sim.phase() {
        SimPhase::Finished { .. } => score.last_message.as_str(),
        _ => "",
    };
    if text.sections[0].value != shown {
        text.sections[0].value = shown.to_string();
    }
}

fn update_callout(
    time: Res<Time>,
    mut callout: ResMut<ContactCallout>,
    mut ev_shot: EventReader<ShotFiredEvent>,
    mut ev_contact: EventReader<BallContactEvent>,
    mut q_text: Query<&mut Text, With<Callout>>,
) {
    if ev_shot.read().count() > 0 {
        callout.clear();
    }
    if let Some(contact) = ev_contact.read().last() {
        callout.show(contact.surface);
    } else {
        callout.tick(time.delta_seconds());
    }
    let Ok(mut text) = q_text.get_single_mut() else { return; };
    if text.sections[0].value != callout.message() {
        text.sections[0].value = callout.message().to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callout_shows_latest_surface_then_fades() {
        let mut c = ContactCallout::default();
        assert_eq!(c.message(), "");
        c.show(Surface::Wall);
        assert_eq!(c.message(), "Hit the wall!");
        c.show(Surface::Crossbar);
        assert_eq!(c.message(), "Off the crossbar!");
        c.tick(CALLOUT_SECONDS * 0.5);
        assert_eq!(c.message(), "Off the crossbar!");
        c.tick(CALLOUT_SECONDS * 0.6);
        assert_eq!(c.message(), "");
    }

    #[test]
    fn new_shot_clears_callout() {
        let mut c = ContactCallout::default();
        c.show(Surface::Keeper);
        c.clear();
        assert_eq!(c.message(), "");
        // Ticking an empty callout is a no-op.
        c.tick(5.0);
        assert_eq!(c.message(), "");
    }
}
