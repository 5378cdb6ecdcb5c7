// World visuals: pitch, goal, ball, keeper and wall meshes mirrored from the physics state.
use bevy::math::primitives::{Capsule3d, Cuboid, Cylinder, Plane3d, Sphere};
use bevy::prelude::*;

use crate::physics::config::{GameConfig, ShotSpot};
use crate::physics::pitch::Pitch;
use crate::physics::simulation::ShotSimulation;

#[derive(Component)]
pub struct Ball;
#[derive(Component)]
pub struct Keeper;
#[derive(Component)]
pub struct WallPlayer;

#[derive(Resource)]
struct WallVisuals {
    material: Handle<StandardMaterial>,
}

pub struct ScenePlugin;
impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ClearColor(Color::srgb(0.52, 0.80, 0.92)))
            .add_systems(Startup, setup_scene)
            .add_systems(Update, (sync_ball, sync_keeper, rebuild_wall));
    }
}

fn setup_scene(
    mut commands: Commands,
    cfg: Res<GameConfig>,
    pitch: Res<Pitch>,
    sim: Res<ShotSimulation>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut mats: ResMut<Assets<StandardMaterial>>,
) {
    let field = &cfg.field;
    let line_z = pitch.goal.line_z();
    let hw = pitch.goal.half_width();
    let h = pitch.goal.height();

    // Grass with a margin around the touch lines.
    commands.spawn(PbrBundle {
        mesh: meshes.add(Plane3d::default().mesh().size(field.width + 20.0, field.length + 20.0)),
        material: mats.add(StandardMaterial {
            base_color: Color::srgb(0.18, 0.52, 0.20),
            perceptual_roughness: 0.95,
            ..default()
        }),
        ..default()
    });

    // Goal line marking.
    let line_mat = mats.add(StandardMaterial { base_color: Color::WHITE, unlit: true, ..default() });
    commands.spawn(PbrBundle {
        mesh: meshes.add(Cuboid::new(field.width, 0.01, 0.12)),
        material: line_mat.clone(),
        transform: Transform::from_xyz(0.0, 0.005, line_z),
        ..default()
    });

    // Frame.
    let frame_mat = mats.add(StandardMaterial { base_color: Color::srgb(0.95, 0.95, 0.95), ..default() });
    let post = meshes.add(Cylinder::new(field.post_radius, h));
    for x in [-hw, hw] {
        commands.spawn(PbrBundle {
            mesh: post.clone(),
            material: frame_mat.clone(),
            transform: Transform::from_xyz(x, h * 0.5, line_z),
            ..default()
        });
    }
    commands.spawn(PbrBundle {
        mesh: meshes.add(Cylinder::new(field.post_radius, hw * 2.0)),
        material: frame_mat,
        transform: Transform::from_xyz(0.0, h, line_z)
            .with_rotation(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
        ..default()
    });

    // Back net.
    commands.spawn(PbrBundle {
        mesh: meshes.add(Cuboid::new(hw * 2.0, h, 0.02)),
        material: mats.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.35),
            alpha_mode: AlphaMode::Blend,
            ..default()
        }),
        transform: Transform::from_xyz(0.0, h * 0.5, line_z - pitch.goal.depth()),
        ..default()
    });

    let ball = sim.ball();
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Sphere::new(ball.radius()).mesh().uv(32, 18)),
            material: mats.add(StandardMaterial { base_color: Color::WHITE, perceptual_roughness: 0.6, ..default() }),
            transform: Transform::from_translation(ball.position),
            ..default()
        },
        Ball,
    ));

    let keeper = &cfg.keeper;
    commands.spawn((
        PbrBundle {
            mesh: meshes.add(Capsule3d::new(keeper.torso_radius, (keeper.height - 2.0 * keeper.torso_radius).max(0.0))),
            material: mats.add(StandardMaterial { base_color: Color::srgb(0.27, 0.27, 0.93), ..default() }),
            transform: Transform::from_translation(pitch.keeper.position()),
            ..default()
        },
        Keeper,
    ));

    commands.insert_resource(WallVisuals {
        material: mats.add(StandardMaterial { base_color: Color::srgb(0.85, 0.15, 0.15), ..default() }),
    });

    commands.insert_resource(AmbientLight { color: Color::srgb(0.55, 0.55, 0.60), brightness: 800.0 });
    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight { illuminance: 20_000.0, shadows_enabled: true, ..default() },
        transform: Transform::from_xyz(30.0, 60.0, 30.0).looking_at(Vec3::ZERO, Vec3::Y),
        ..default()
    });
}

fn sync_ball(sim: Res<ShotSimulation>, mut q: Query<&mut Transform, With<Ball>>) {
    let Ok(mut t) = q.get_single_mut() else { return; };
    let ball = sim.ball();
    t.translation = ball.position;
    t.rotation = ball.orientation;
}

fn sync_keeper(pitch: Res<Pitch>, mut q: Query<&mut Transform, With<Keeper>>) {
    if let Ok(mut t) = q.get_single_mut() {
        t.translation = pitch.keeper.position();
    }
}

/// Respawn the wall meshes whenever the free kick moves.
fn rebuild_wall(
    mut commands: Commands,
    pitch: Res<Pitch>,
    visuals: Option<Res<WallVisuals>>,
    mut meshes: ResMut<Assets<Mesh>>,
    q_wall: Query<Entity, With<WallPlayer>>,
    mut built_for: Local<Option<ShotSpot>>,
) {
    let Some(visuals) = visuals else { return; };
    if *built_for == Some(pitch.spot()) {
        return;
    }
    *built_for = Some(pitch.spot());

    for e in &q_wall {
        commands.entity(e).despawn_recursive();
    }
    for player in pitch.wall.players() {
        let axis = player.b - player.a;
        let rotation = Quat::from_rotation_arc(Vec3::Y, axis.try_normalize().unwrap_or(Vec3::Y));
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Capsule3d::new(player.radius, player.length())),
                material: visuals.material.clone(),
                transform: Transform::from_translation(player.midpoint()).with_rotation(rotation),
                ..default()
            },
            WallPlayer,
        ));
    }
}
