//! Convenience re-exports for frequently used types & plugins.
pub use crate::physics::ball::{BallPhase, BallState};
pub use crate::physics::config::{ConfigError, GameConfig, ShotSpot};
pub use crate::physics::outcome::{Outcome, OutcomeKind, Surface};
pub use crate::physics::pitch::Pitch;
pub use crate::physics::simulation::{LoopToken, ShotError, ShotSimulation, SimPhase, StepReport};
pub use crate::plugins::core_sim::{CoreSimPlugin, SimState};
pub use crate::plugins::game_state::{GameStatePlugin, Score, ShotMode, ShotState};
pub use crate::plugins::level::LevelPlugin;
pub use crate::plugins::shot_flow::{
    ActiveShot, BallContactEvent, ShotFiredEvent, ShotFlowPlugin, ShotOutcomeEvent,
};
pub use crate::plugins::shooting::ShootingPlugin;
pub use crate::plugins::hud::{ContactCallout, HudPlugin};
pub use crate::plugins::camera::CameraPlugin;
pub use crate::plugins::scene::ScenePlugin;
