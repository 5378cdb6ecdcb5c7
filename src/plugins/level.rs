// Configuration loading and pitch setup (wall, keeper, goal frame, ball spawn).
use bevy::prelude::*;

use crate::physics::config::GameConfig;
use crate::physics::pitch::Pitch;
use crate::physics::simulation::ShotSimulation;

pub const CONFIG_PATH: &str = "assets/config/free_kick.ron";

/// Inserts `GameConfig`, `Pitch` and `ShotSimulation`. A `GameConfig` inserted before the
/// plugin is added takes precedence over the file.
pub struct LevelPlugin;

impl Plugin for LevelPlugin {
    fn build(&self, app: &mut App) {
        let cfg = match app.world().get_resource::<GameConfig>() {
            Some(cfg) => checked(cfg.clone()),
            None => load_config(),
        };

        let spot = cfg.session.start_spot;
        app.insert_resource(Pitch::new(&cfg, spot));
        match ShotSimulation::new(cfg.spot_position(spot), &cfg) {
            Ok(sim) => {
                app.insert_resource(sim);
            }
            Err(e) => error!("Failed to set up shot simulation: {e}"),
        }
        info!("pitch ready: spot {:?}, seed {:?}", spot, cfg.session.seed);
        app.insert_resource(cfg);
    }
}

fn checked(cfg: GameConfig) -> GameConfig {
    match cfg.validate() {
        Ok(()) => cfg,
        Err(e) => {
            error!("Invalid game config, using defaults: {e}");
            GameConfig::default()
        }
    }
}

fn load_config() -> GameConfig {
    #[cfg(target_arch = "wasm32")]
    {
        // No filesystem in the browser; the file is embedded at compile time.
        let data = include_str!("../../assets/config/free_kick.ron");
        return match GameConfig::from_ron_str(data) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Failed to parse embedded config: {e}");
                GameConfig::default()
            }
        };
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        match GameConfig::load_from_file(CONFIG_PATH) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Failed to load {CONFIG_PATH}: {e}");
                GameConfig::default()
            }
        }
    }
}
