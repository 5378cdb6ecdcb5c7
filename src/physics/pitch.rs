// Obstacles around the shot: wall, keeper and goal frame for the active spot.
use bevy::prelude::*;

use crate::physics::config::{GameConfig, ShotSpot};
use crate::physics::goal::GoalFrame;
use crate::physics::goalkeeper::Goalkeeper;
use crate::physics::wall::Wall;

#[derive(Resource, Debug, Clone)]
pub struct Pitch {
    pub wall: Wall,
    pub keeper: Goalkeeper,
    pub goal: GoalFrame,
    spot: ShotSpot,
}

impl Pitch {
    pub fn new(cfg: &GameConfig, spot: ShotSpot) -> Self {
        let goal = GoalFrame::new(&cfg.field);
        let wall = Wall::line_up(cfg.spot_position(spot), goal.centre(), &cfg.wall);
        Self { wall, keeper: Goalkeeper::new(&cfg.field, &cfg.keeper), goal, spot }
    }

    pub fn spot(&self) -> ShotSpot {
        self.spot
    }

    /// Move the free kick: the wall re-forms in front of the new spot, the keeper recentres.
    pub fn relocate(&mut self, cfg: &GameConfig, spot: ShotSpot) {
        self.spot = spot;
        self.wall = Wall::line_up(cfg.spot_position(spot), self.goal.centre(), &cfg.wall);
        self.keeper.reset();
    }
}
