//! Library entry for integration tests & external tooling.
//! Exposes the physics core, the plugin modules and a prelude for common types.

pub mod physics;

pub mod plugins {
    pub mod core_sim;
    pub mod game_state;
    pub mod level;
    pub mod shot_flow;
    pub mod shooting;
    pub mod hud;
    pub mod camera;
    pub mod scene;
}
pub mod prelude;
