// Terminal shot results and the per-step contact report.
use std::fmt;

use bevy::prelude::*;

use crate::physics::ball::BallState;
use crate::physics::config::FieldConfig;
use crate::physics::goal::FrameSurface;

/// What the ball touched during a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Wall,
    Keeper,
    Post,
    Crossbar,
}

impl From<FrameSurface> for Surface {
    fn from(s: FrameSurface) -> Self {
        match s {
            FrameSurface::LeftPost | FrameSurface::RightPost => Surface::Post,
            FrameSurface::Crossbar => Surface::Crossbar,
        }
    }
}

impl Surface {
    /// Short HUD callout shown the moment the ball touches this surface.
    pub fn callout(self) -> &'static str {
        match self {
            Surface::Wall => "Hit the wall!",
            Surface::Keeper => "Keeper save!",
            Surface::Post => "Off the post!",
            Surface::Crossbar => "Off the crossbar!",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Surface::Wall => "wall",
            Surface::Keeper => "keeper",
            Surface::Post => "post",
            Surface::Crossbar => "crossbar",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Goal,
    Saved,
    HitPost,
    HitCrossbar,
    HitWall,
    OutOfBounds,
    NoGoal,
}

impl OutcomeKind {
    pub fn label(self) -> &'static str {
        match self {
            OutcomeKind::Goal => "GOAL!",
            OutcomeKind::Saved => "Saved!",
            OutcomeKind::HitPost => "Off the post!",
            OutcomeKind::HitCrossbar => "Off the bar!",
            OutcomeKind::HitWall => "Blocked by the wall",
            OutcomeKind::OutOfBounds => "Wide",
            OutcomeKind::NoGoal => "No goal",
        }
    }

    pub fn is_goal(self) -> bool {
        self == OutcomeKind::Goal
    }
}

impl From<Surface> for OutcomeKind {
    fn from(s: Surface) -> Self {
        match s {
            Surface::Wall => OutcomeKind::HitWall,
            Surface::Keeper => OutcomeKind::Saved,
            Surface::Post => OutcomeKind::HitPost,
            Surface::Crossbar => OutcomeKind::HitCrossbar,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactReport {
    pub surface: Surface,
    pub point: Vec3,
    /// Ball velocity after the response.
    pub velocity: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub kind: OutcomeKind,
    /// Ball at the moment of classification.
    pub ball: BallState,
    pub elapsed: f32,
    pub attempt: u64,
}

/// Past the net, over the touch lines, beyond the far end line, or sailing high over the goal.
pub fn is_out_of_bounds(position: Vec3, radius: f32, field: &FieldConfig) -> bool {
    let line_z = field.goal_line_z();
    position.z < line_z - field.goal_depth - radius
        || position.z > -line_z + radius
        || position.x.abs() > field.width * 0.5 + radius
        || (position.y > field.goal_height + 5.0 && position.z < line_z)
}
