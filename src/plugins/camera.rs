use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use crate::physics::config::{GameConfig, ShotSpot};
use crate::physics::pitch::Pitch;
use crate::physics::simulation::ShotSimulation;
use crate::plugins::game_state::{ShotMode, ShotState};

/// Marker component for the single shooter camera.
#[derive(Component)]
pub struct FreeKickCamera;

/// Aim angles controlled by the mouse (radians). Yaw 0 looks down -z at the goal.
#[derive(Resource, Default)]
pub struct CameraAim {
    pub yaw: f32,
    pub pitch: f32,
}

/// Tracks whether the cursor is currently locked for aiming.
#[derive(Resource, Default)]
pub struct CursorCapture {
    pub captured: bool,
}

// Third-person placement relative to the ball, rotated by yaw.
const CAMERA_OFFSET: Vec3 = Vec3::new(0.0, 1.44, 3.96);

pub struct CameraPlugin;
impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CameraAim>()
            .init_resource::<CursorCapture>()
            .add_systems(Startup, spawn_camera)
            .add_systems(Update, (
                cursor_capture,
                aim_input,
                face_goal_on_new_spot,
                camera_apply,
            ).chain());
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera3dBundle {
            projection: PerspectiveProjection { fov: 75f32.to_radians(), near: 0.05, far: 1000.0, ..default() }.into(),
            ..default()
        },
        FreeKickCamera,
    ));
}

fn cursor_capture(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
    mut cap: ResMut<CursorCapture>,
) {
    let Ok(mut win) = windows.get_single_mut() else { return; };
    if !cap.captured && buttons.just_pressed(MouseButton::Left) {
        win.cursor.visible = false;
        win.cursor.grab_mode = CursorGrabMode::Locked;
        cap.captured = true;
    } else if cap.captured && (keys.just_pressed(KeyCode::Escape) || !win.focused) {
        win.cursor.visible = true;
        win.cursor.grab_mode = CursorGrabMode::None;
        cap.captured = false;
    }
}

/// Mouse look, only while captured and not charging (charging motion becomes curve).
fn aim_input(
    mut aim: ResMut<CameraAim>,
    cap: Res<CursorCapture>,
    shot: Res<ShotState>,
    cfg: Res<GameConfig>,
    mut ev_motion: EventReader<MouseMotion>,
) {
    if !cap.captured || shot.mode == ShotMode::Charging {
        return;
    }
    for m in ev_motion.read() {
        aim.yaw -= m.delta.x * cfg.controls.camera_sensitivity;
        aim.pitch -= m.delta.y * cfg.controls.camera_sensitivity;
    }
    aim.pitch = aim.pitch.clamp(cfg.controls.min_pitch, cfg.controls.max_pitch);
}

fn face_goal_on_new_spot(
    pitch: Res<Pitch>,
    sim: Res<ShotSimulation>,
    mut aim: ResMut<CameraAim>,
    mut last: Local<Option<ShotSpot>>,
) {
    if *last == Some(pitch.spot()) {
        return;
    }
    *last = Some(pitch.spot());
    let to_goal = pitch.goal.centre() - sim.ball().spawn();
    aim.yaw = (-to_goal.x).atan2(-to_goal.z);
    aim.pitch = 0.0;
}

fn camera_apply(
    aim: Res<CameraAim>,
    sim: Res<ShotSimulation>,
    mut q_cam: Query<&mut Transform, With<FreeKickCamera>>,
) {
    let Ok(mut cam_t) = q_cam.get_single_mut() else { return; };
    let yaw = Quat::from_rotation_y(aim.yaw);
    // Stay behind the spot, not the flying ball, so the shot can be watched.
    cam_t.translation = sim.ball().spawn() + yaw * CAMERA_OFFSET;
    cam_t.rotation = yaw * Quat::from_rotation_x(aim.pitch);
}
