use bevy::prelude::*;
use bevy::time::Fixed;

// Fixed-tick timing shared by the gameplay systems.
#[derive(Resource, Default, Debug)]
pub struct SimState {
    pub tick: u64,
    pub elapsed_seconds: f32,
}
impl SimState {
    pub fn advance_fixed(&mut self) {
        self.tick += 1;
        self.elapsed_seconds = self.tick as f32 / FIXED_HZ as f32;
    }
}

pub const FIXED_HZ: f64 = 60.0;

/// Runs in `FixedUpdate` before anything that moves the ball.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimTick;

pub struct CoreSimPlugin;
impl Plugin for CoreSimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SimState::default())
            .insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
            .add_systems(FixedUpdate, tick_state.in_set(SimTick));
    }
}

fn tick_state(mut sim: ResMut<SimState>) {
    sim.advance_fixed();
}
