//! Skills domain — the XP curve and the per-skill ledger.
//!
//! Other domains grant XP by calling `SkillLedger::add_xp` directly with
//! the same event sink they were handed, so a harvest that levels farming
//! emits its level-up in order right after the harvest itself.

use bevy::prelude::*;
use crate::shared::*;

pub mod curve;
pub mod ledger;

pub use curve::{level_from_xp, level_progress, xp_for_level, xp_to_next_level};
pub use ledger::XpGain;

pub struct SkillsPlugin;

impl Plugin for SkillsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SkillLedger>()
            // Saves written by older builds may carry stale levels.
            .add_systems(OnEnter(GameState::Playing), normalize_skills);
    }
}

fn normalize_skills(mut ledger: ResMut<SkillLedger>) {
    ledger.normalize();
}
