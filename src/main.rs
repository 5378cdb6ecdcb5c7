use bevy::prelude::*;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;

use free_kick::prelude::*;

fn main() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    App::new()
        .insert_resource(Msaa::Sample4)
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window { title: "Free Kick".into(), ..default() }),
            ..default()
        }))
        .add_plugins(CoreSimPlugin)   // fixed 60 Hz tick
        .add_plugins(LevelPlugin)     // config + pitch + simulation resources
        .add_plugins(GameStatePlugin) // charge + score
        .add_plugins(ShotFlowPlugin)  // fixed-tick shot loop & events
        .add_plugins(CameraPlugin)    // aim camera
        .add_plugins(ShootingPlugin)  // input + power UI
        .add_plugins(ScenePlugin)     // meshes mirrored from physics
        .add_plugins(HudPlugin)
        .add_plugins(FrameTimeDiagnosticsPlugin)
        .run();
}
