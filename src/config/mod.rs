//! Balance configuration — every tunable number the idle clocks read.
//!
//! Defaults are the shipped balance. A RON document may override any
//! subset of fields; missing fields keep their defaults.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::shared::*;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    // Farm
    pub plot_count: usize,
    pub tick_interval_ms: u64,
    pub weed_growth_threshold_ms: u64,
    pub weed_clear_energy: u32,
    pub weed_byproduct: ItemId,
    pub fertilizer_item: ItemId,
    pub harvest_bonus_cap_percent: u32,
    pub farming_skill: SkillId,

    // Skills
    pub energy_per_level: u32,

    // Bank
    /// Interest per cycle in basis points (300 = 3%).
    pub interest_rate_bps: u64,
    pub interest_cycle_ms: u64,
    pub min_deposit: u64,
    pub max_balance: u64,
    pub transaction_log_cap: usize,

    // Persistence
    pub autosave_interval_ms: u64,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            plot_count: PLOT_COUNT,
            tick_interval_ms: MS_PER_SECOND,
            weed_growth_threshold_ms: 10 * 60 * MS_PER_SECOND,
            weed_clear_energy: 1,
            weed_byproduct: "fiber".into(),
            fertilizer_item: "fertilizer".into(),
            harvest_bonus_cap_percent: 25,
            farming_skill: FARMING.into(),
            energy_per_level: 5,
            interest_rate_bps: 300,
            interest_cycle_ms: 4 * 60 * 60 * MS_PER_SECOND,
            min_deposit: 10,
            max_balance: 10_000_000,
            transaction_log_cap: 50,
            autosave_interval_ms: 30 * MS_PER_SECOND,
        }
    }
}

impl BalanceConfig {
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: BalanceConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_ron(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.plot_count == 0 {
            return Err(ConfigError::Invalid("plot_count must be at least 1"));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid("tick_interval_ms must be positive"));
        }
        if self.interest_cycle_ms == 0 {
            return Err(ConfigError::Invalid("interest_cycle_ms must be positive"));
        }
        if self.transaction_log_cap == 0 {
            return Err(ConfigError::Invalid("transaction_log_cap must be at least 1"));
        }
        Ok(())
    }
}
