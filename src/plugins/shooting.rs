// Shooting input and power UI.
// Responsible for: charge/curve/release input, free-kick spot changes, and the power
// gauge + bar. Launching hands the shot to ShotSimulation; the fixed-tick loop in
// shot_flow steps it.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;

use crate::physics::config::{GameConfig, ShotSpot};
use crate::physics::pitch::Pitch;
use crate::physics::simulation::ShotSimulation;
use crate::plugins::camera::{CursorCapture, FreeKickCamera};
use crate::plugins::game_state::{Score, ShotMode, ShotState};
use crate::plugins::shot_flow::{ActiveShot, ShotFiredEvent};

#[derive(Component)]
pub struct PowerGauge;

#[derive(Component)]
pub struct PowerBar;
#[derive(Component)]
pub struct PowerBarFill;

pub struct ShootingPlugin;
impl Plugin for ShootingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_power_ui)
            .add_systems(Update, (
                change_spot,
                handle_shot_input,
                accumulate_curve,
                update_power_gauge,
                update_power_bar,
            ));
    }
}

// ---------------- Spawning ----------------

fn spawn_power_ui(mut commands: Commands) {
    commands.spawn((
        TextBundle::from_section(
            "Power: --",
            TextStyle { font_size: 22.0, color: Color::WHITE, ..default() },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            right: Val::Px(12.0),
            top: Val::Px(8.0),
            ..default()
        }),
        PowerGauge,
    ));

    commands
        .spawn((
            NodeBundle {
                style: Style {
                    position_type: PositionType::Absolute,
                    right: Val::Px(12.0),
                    top: Val::Px(36.0),
                    width: Val::Px(180.0),
                    height: Val::Px(18.0),
                    align_items: AlignItems::Center,
                    padding: UiRect::all(Val::Px(2.0)),
                    ..default()
                },
                background_color: Color::srgb(0.08, 0.08, 0.10).into(),
                ..default()
            },
            PowerBar,
        ))
        .with_children(|parent| {
            parent.spawn((
                NodeBundle {
                    style: Style {
                        width: Val::Percent(0.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    background_color: Color::srgb(0.15, 0.60, 0.25).into(),
                    ..default()
                },
                PowerBarFill,
            ));
        });
}

// ---------------- Systems ----------------

fn change_spot(
    keys: Res<ButtonInput<KeyCode>>,
    cfg: Res<GameConfig>,
    mut pitch: ResMut<Pitch>,
    mut sim: ResMut<ShotSimulation>,
    mut active: ResMut<ActiveShot>,
    mut state: ResMut<ShotState>,
) {
    let spot = if keys.just_pressed(KeyCode::Digit1) {
        ShotSpot::Left
    } else if keys.just_pressed(KeyCode::Digit2) {
        ShotSpot::Centre
    } else if keys.just_pressed(KeyCode::Digit3) {
        ShotSpot::Right
    } else {
        return;
    };
    pitch.relocate(&cfg, spot);
    sim.relocate(cfg.spot_position(spot));
    active.0 = None;
    state.cancel();
    info!("free kick moved to {:?}", spot);
}

fn handle_shot_input(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    capture: Res<CursorCapture>,
    cfg: Res<GameConfig>,
    mut state: ResMut<ShotState>,
    mut sim: ResMut<ShotSimulation>,
    mut active: ResMut<ActiveShot>,
    mut score: ResMut<Score>,
    q_cam: Query<&Transform, With<FreeKickCamera>>,
    mut ev_shot: EventWriter<ShotFiredEvent>,
) {
    if !capture.captured || keys.just_pressed(KeyCode::Escape) {
        if state.mode == ShotMode::Charging {
            state.cancel();
        }
        return;
    }
    // The click that grabbed the cursor does not start a charge.
    if capture.is_changed() {
        return;
    }

    if buttons.just_pressed(MouseButton::Left) && state.mode == ShotMode::Idle && !sim.is_in_flight() {
        state.begin();
    }

    if buttons.just_released(MouseButton::Left) {
        let Some((fraction, curve)) = state.release() else { return; };
        let Ok(cam_t) = q_cam.get_single() else { return; };
        let power = fraction * cfg.controls.max_power;
        match sim.launch(*cam_t.forward(), power, curve, &cfg) {
            Ok(token) => {
                active.0 = Some(token);
                score.shots += 1;
                score.last_message.clear();
                ev_shot.send(ShotFiredEvent { pos: sim.ball().position, power: fraction });
            }
            Err(e) => warn!("shot refused: {e}"),
        }
    }
}

fn accumulate_curve(
    mut state: ResMut<ShotState>,
    cfg: Res<GameConfig>,
    mut ev_motion: EventReader<MouseMotion>,
) {
    if state.mode != ShotMode::Charging {
        return;
    }
    let delta: Vec2 = ev_motion.read().map(|m| m.delta).sum();
    state.add_curve(delta, cfg.controls.max_curve);
}

fn update_power_gauge(state: Res<ShotState>, mut q: Query<&mut Text, With<PowerGauge>>) {
    if !state.is_changed() {
        return;
    }
    if let Ok(mut text) = q.get_single_mut() {
        text.sections[0].value = match state.mode {
            ShotMode::Idle => "Power: --".to_string(),
            ShotMode::Charging => format!("Power: {:>3}%", (state.power * 100.0) as u32),
        };
    }
}

fn update_power_bar(
    state: Res<ShotState>,
    mut q_fill: Query<(&mut Style, &mut BackgroundColor), With<PowerBarFill>>,
) {
    if !state.is_changed() { return; }
    let power = match state.mode {
        ShotMode::Idle => 0.0,
        ShotMode::Charging => state.power,
    };
    if let Ok((mut style, mut color)) = q_fill.get_single_mut() {
        style.width = Val::Percent(power * 100.0);
        // Green -> yellow -> red
        let col = if power < 0.5 {
            let t = power / 0.5;
            Color::srgb(0.15 + 0.55 * t, 0.60 + 0.25 * t, 0.25 - 0.15 * t)
        } else {
            let t = (power - 0.5) / 0.5;
            Color::srgb(0.70 + 0.20 * t, 0.85 - 0.65 * t, 0.10 + 0.05 * t)
        };
        *color = col.into();
    }
}
