//! Skill ledger — XP gains, level-ups, and the level-up side effect.

use bevy::prelude::*;

use super::curve::level_from_xp;
use crate::config::BalanceConfig;
use crate::shared::*;

/// Result of one `add_xp` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpGain {
    pub old_level: u32,
    pub new_level: u32,
    pub leveled_up: bool,
}

impl XpGain {
    pub fn levels_gained(&self) -> u32 {
        self.new_level - self.old_level
    }
}

impl SkillLedger {
    pub fn record(&self, skill: &str) -> Result<&SkillRecord, IdleError> {
        self.skills
            .get(skill)
            .ok_or_else(|| IdleError::UnknownSkill(skill.to_string()))
    }

    pub fn level(&self, skill: &str) -> Result<u32, IdleError> {
        self.record(skill).map(|r| r.level)
    }

    pub fn xp(&self, skill: &str) -> Result<u64, IdleError> {
        self.record(skill).map(|r| r.xp)
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &SkillRecord)> {
        self.skills.iter().map(|(name, record)| (name.as_str(), record))
    }

    /// Gate used by planting and crafting.
    pub fn meets_requirement(&self, skill: &str, level: u32) -> Result<bool, IdleError> {
        Ok(self.level(skill)? >= level)
    }

    /// Add XP to `skill`. Non-positive amounts are ignored.
    ///
    /// Every whole level crossed raises `max_energy` by
    /// `config.energy_per_level` once; energy is then refilled to the new
    /// maximum. One `SkillLeveledUp` event covers the whole call.
    pub fn add_xp(
        &mut self,
        skill: &str,
        amount: i64,
        player: &mut PlayerState,
        config: &BalanceConfig,
        events: &mut impl EventSink,
    ) -> Result<XpGain, IdleError> {
        let record = self
            .skills
            .get_mut(skill)
            .ok_or_else(|| IdleError::UnknownSkill(skill.to_string()))?;

        let old_level = record.level;
        if amount <= 0 {
            return Ok(XpGain {
                old_level,
                new_level: old_level,
                leveled_up: false,
            });
        }

        record.xp = record.xp.saturating_add(amount as u64);
        record.level = level_from_xp(record.xp);
        let new_level = record.level;

        let gain = XpGain {
            old_level,
            new_level,
            leveled_up: new_level > old_level,
        };

        if gain.leveled_up {
            for _ in 0..gain.levels_gained() {
                apply_level_up(player, config.energy_per_level);
            }
            player.refill_energy();
            info!(
                "[Skills] {} {} → {} (max energy {})",
                skill, old_level, new_level, player.max_energy
            );
            events.emit(IdleEvent::SkillLeveledUp {
                skill: skill.to_string(),
                old_level,
                new_level,
                max_energy: player.max_energy,
            });
        }

        Ok(gain)
    }

    /// Re-derive every level from its XP. Used after loading a save.
    pub fn normalize(&mut self) {
        for record in self.skills.values_mut() {
            record.level = level_from_xp(record.xp);
        }
    }
}

/// One level's worth of capacity.
fn apply_level_up(player: &mut PlayerState, energy_per_level: u32) {
    player.max_energy = player.max_energy.saturating_add(energy_per_level);
}
