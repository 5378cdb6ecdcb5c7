//! Ball flight and contact physics. Plain data and functions; the Bevy plugins only drive it.

pub mod ball;
pub mod collider;
pub mod config;
pub mod goal;
pub mod goalkeeper;
pub mod outcome;
pub mod pitch;
pub mod simulation;
pub mod wall;
