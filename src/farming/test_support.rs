//! Fixture shared by the farming unit tests.

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::crops::{fertilize, plant};
use super::harvest::{harvest, HarvestYield};
use crate::config::BalanceConfig;
use crate::shared::*;

pub fn crop(id: &str, growth_time_seconds: u64, required_level: u32) -> CropDef {
    CropDef {
        id: id.into(),
        name: id.into(),
        seed_id: format!("{}_seeds", id),
        growth_time_seconds,
        harvest_amount: 2,
        xp_gain: 10,
        required_level,
        sell_price: 5,
        energy_cost: 2,
    }
}

pub struct TestFarm {
    pub farm: Farm,
    pub crops: CropRegistry,
    pub skills: SkillLedger,
    pub player: PlayerState,
    pub inventory: Inventory,
    pub config: BalanceConfig,
    pub rng: StdRng,
    pub events: Vec<IdleEvent>,
}

impl TestFarm {
    pub fn new() -> Self {
        let mut crops = CropRegistry::default();
        for def in [crop("wheat", 100, 1), crop("pumpkin", 1_800, 20)] {
            crops.crops.insert(def.id.clone(), def);
        }
        let mut inventory = Inventory::default();
        inventory.add("wheat_seeds", 5);
        inventory.add("fertilizer", 1);
        Self {
            farm: Farm::new(PLOT_COUNT, 0),
            crops,
            skills: SkillLedger::default(),
            player: PlayerState::default(),
            inventory,
            config: BalanceConfig::default(),
            rng: StdRng::seed_from_u64(42),
            events: Vec::new(),
        }
    }

    pub fn plant(&mut self, index: usize, crop_id: &str, now: Timestamp) -> Result<Timestamp, IdleError> {
        plant(
            &mut self.farm,
            index,
            crop_id,
            now,
            &self.crops,
            &self.skills,
            &mut self.player,
            &mut self.inventory,
            &self.config,
            &mut self.events,
        )
    }

    pub fn fertilize(&mut self, index: usize, now: Timestamp) -> Result<Timestamp, IdleError> {
        fertilize(
            &mut self.farm,
            index,
            now,
            &self.crops,
            &mut self.inventory,
            &self.config,
            &mut self.events,
        )
    }

    pub fn harvest(&mut self, index: usize, now: Timestamp) -> Result<HarvestYield, IdleError> {
        harvest(
            &mut self.farm,
            index,
            now,
            &self.crops,
            &mut self.skills,
            &mut self.player,
            &mut self.inventory,
            &self.config,
            &mut self.rng,
            &mut self.events,
        )
    }
}
