//! Idle Acres library crate — the idle-progression core of the farm game.
//!
//! Crop growth, weeds, bank interest and skill levels are all reconciled
//! from stored timestamps on demand, so closing the game for hours and
//! reopening it gives the same result as leaving it running.
//!
//! The binary crate (`main.rs`) is a headless runner. This library crate
//! exposes every module so that `tests/` integration tests can import game
//! types, systems, and resources without needing a window or GPU.

pub mod shared;
pub mod clock;
pub mod config;
pub mod rounding;
pub mod skills;
pub mod farming;
pub mod economy;
pub mod save;
pub mod data;

use bevy::prelude::*;

/// Every domain plugin plus the game state. Needs `StatesPlugin` (or
/// `DefaultPlugins`) to be added first.
pub struct IdleCorePlugin;

impl Plugin for IdleCorePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<shared::GameState>()
            .add_plugins((
                clock::ClockPlugin,
                data::DataPlugin,
                skills::SkillsPlugin,
                farming::FarmingPlugin,
                economy::EconomyPlugin,
                save::SavePlugin,
            ));
    }
}
