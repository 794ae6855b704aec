//! Harvest — yield, bonus roll, farming XP, and clearing the plot.

use bevy::prelude::*;
use rand::Rng;

use super::crops::is_ready;
use crate::config::BalanceConfig;
use crate::rounding::{percent_chance, roll_percent};
use crate::shared::*;
use crate::skills::XpGain;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestYield {
    pub crop_id: CropId,
    pub quantity: u32,
    pub bonus: bool,
    pub xp: XpGain,
}

/// Harvest a ready crop.
///
/// Yield is the crop's `harvest_amount` plus one extra with a chance of
/// `min(farming level, cap)` percent. The harvest event is emitted before
/// any level-up it causes.
#[allow(clippy::too_many_arguments)]
pub fn harvest<R: Rng + ?Sized>(
    farm: &mut Farm,
    index: usize,
    now: Timestamp,
    crops: &CropRegistry,
    skills: &mut SkillLedger,
    player: &mut PlayerState,
    inventory: &mut Inventory,
    config: &BalanceConfig,
    rng: &mut R,
    events: &mut impl EventSink,
) -> Result<HarvestYield, IdleError> {
    let plot = farm.plot(index)?;
    let Some(crop_id) = plot.crop_id.as_deref() else {
        return Err(IdleError::PlotEmpty);
    };
    let def = crops.require(crop_id)?;
    if !is_ready(plot, def, now) {
        return Err(IdleError::NotReady);
    }

    // Validates the skill before anything is mutated.
    let level = skills.level(&config.farming_skill)?;
    let bonus = roll_percent(rng, percent_chance(level, config.harvest_bonus_cap_percent));
    let quantity = def.harvest_amount.saturating_add(u32::from(bonus));

    inventory.add(&def.id, quantity);
    farm.plot_mut(index)?.clear(now);

    info!(
        "[Farming] Harvested {} × {} from plot {}{}",
        quantity,
        def.id,
        index,
        if bonus { " (bonus)" } else { "" }
    );
    events.emit(IdleEvent::CropHarvested {
        plot: index,
        crop_id: def.id.clone(),
        quantity,
        bonus,
        xp: def.xp_gain,
    });

    let xp_gain = i64::try_from(def.xp_gain).unwrap_or(i64::MAX);
    let xp = skills.add_xp(&config.farming_skill, xp_gain, player, config, events)?;

    Ok(HarvestYield {
        crop_id: def.id.clone(),
        quantity,
        bonus,
        xp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farming::test_support::*;
    use crate::skills::xp_for_level;

    #[test]
    fn harvest_empty_plot_fails() {
        let mut world = TestFarm::new();
        assert_eq!(world.harvest(0, 0).unwrap_err(), IdleError::PlotEmpty);
    }

    #[test]
    fn harvest_before_ready_changes_nothing() {
        let mut world = TestFarm::new();
        world.plant(0, "wheat", 0).unwrap();
        let before = world.farm.clone();
        assert_eq!(world.harvest(0, 99_999).unwrap_err(), IdleError::NotReady);
        assert_eq!(world.farm, before);
        assert_eq!(world.inventory.count("wheat"), 0);
    }

    #[test]
    fn harvest_yields_grants_xp_and_clears() {
        let mut world = TestFarm::new();
        world.plant(3, "wheat", 0).unwrap();
        world.events.clear();
        let got = world.harvest(3, 150_000).unwrap();
        assert!(got.quantity == 2 || got.quantity == 3);
        assert_eq!(got.quantity, 2 + u32::from(got.bonus));
        assert_eq!(world.inventory.count("wheat"), got.quantity);
        assert_eq!(world.skills.xp(FARMING).unwrap(), 10);

        let plot = &world.farm.plots[3];
        assert!(plot.is_empty());
        assert_eq!(plot.last_cleared_at, 150_000);
        assert!(!plot.fertilized);

        assert_eq!(
            world.events,
            vec![IdleEvent::CropHarvested {
                plot: 3,
                crop_id: "wheat".into(),
                quantity: got.quantity,
                bonus: got.bonus,
                xp: 10,
            }]
        );
    }

    #[test]
    fn harvest_level_up_follows_harvest_event() {
        let mut world = TestFarm::new();
        world.skills.skills.get_mut(FARMING).unwrap().xp = xp_for_level(2) - 1;
        world.skills.normalize();
        world.plant(0, "wheat", 0).unwrap();
        world.events.clear();
        let got = world.harvest(0, 100_000).unwrap();
        assert!(got.xp.leveled_up);
        assert_eq!(world.events.len(), 2);
        assert!(matches!(world.events[0], IdleEvent::CropHarvested { .. }));
        assert!(matches!(
            world.events[1],
            IdleEvent::SkillLeveledUp { new_level: 2, .. }
        ));
    }

    #[test]
    fn oversized_yield_saturates_instead_of_overflowing() {
        let mut world = TestFarm::new();
        world.crops.crops.get_mut("wheat").unwrap().harvest_amount = u32::MAX;
        world.skills.skills.get_mut(FARMING).unwrap().xp = xp_for_level(40);
        world.skills.normalize();
        for round in 0..4u64 {
            let t = round * 200_000;
            world.plant(0, "wheat", t).unwrap();
            let got = world.harvest(0, t + 100_000).unwrap();
            assert_eq!(got.quantity, u32::MAX);
        }
        assert_eq!(world.inventory.count("wheat"), u32::MAX);
    }

    #[test]
    fn bonus_chance_is_capped_at_twenty_five_percent() {
        let mut world = TestFarm::new();
        world.skills.skills.get_mut(FARMING).unwrap().xp = xp_for_level(40);
        world.skills.normalize();
        world.inventory.add("wheat_seeds", 4_000);
        world.player.energy = u32::MAX;
        world.player.max_energy = u32::MAX;

        let rounds = 4_000;
        let mut bonuses = 0;
        for round in 0..rounds {
            let t = round as u64 * 200_000;
            world.plant(0, "wheat", t).unwrap();
            if world.harvest(0, t + 100_000).unwrap().bonus {
                bonuses += 1;
            }
        }
        // 25% of 4000 is 1000; 40% would be 1600.
        assert!((850..1_150).contains(&bonuses), "bonuses = {}", bonuses);
    }

    #[test]
    fn fertilized_crop_is_harvestable_at_half_time() {
        let mut world = TestFarm::new();
        world.plant(0, "wheat", 0).unwrap();
        world.fertilize(0, 10_000).unwrap();
        assert_eq!(world.harvest(0, 49_999).unwrap_err(), IdleError::NotReady);
        assert!(world.harvest(0, 50_000).is_ok());
    }
}
