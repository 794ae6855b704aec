//! Crop growth — derived plot phase, planting, fertilizing, destroying.
//!
//! Nothing about growth is stored except `planted_at` and `fertilized`.
//! Phase, progress and the ready time are recomputed from those two fields
//! and the caller's `now` on every read, so a plot left alone for a week
//! reads exactly as it would had the game ticked the whole time.

use bevy::prelude::*;

use crate::config::BalanceConfig;
use crate::shared::*;

/// Growth-time multiplier applied by fertilizer, as a divisor.
const FERTILIZER_DIVISOR: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlotPhase {
    Empty,
    Growing,
    Ready,
}

/// Everything a renderer needs for one plot at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotView {
    pub phase: PlotPhase,
    pub crop_id: Option<CropId>,
    pub progress_percent: f32,
    pub remaining_ms: u64,
    pub ready_at: Option<Timestamp>,
    pub fertilized: bool,
    pub has_weeds: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Derived growth state
// ─────────────────────────────────────────────────────────────────────────────

pub fn effective_growth_ms(def: &CropDef, fertilized: bool) -> u64 {
    let full = def.growth_time_seconds.saturating_mul(MS_PER_SECOND);
    if fertilized {
        full / FERTILIZER_DIVISOR
    } else {
        full
    }
}

/// Measured from the original plant time, fertilized or not.
pub fn ready_at(plot: &Plot, def: &CropDef) -> Option<Timestamp> {
    plot.planted_at
        .map(|planted| planted.saturating_add(effective_growth_ms(def, plot.fertilized)))
}

pub fn is_ready(plot: &Plot, def: &CropDef, now: Timestamp) -> bool {
    ready_at(plot, def).is_some_and(|ready| now >= ready)
}

pub fn progress_percent(plot: &Plot, def: &CropDef, now: Timestamp) -> f32 {
    let Some(planted) = plot.planted_at else {
        return 0.0;
    };
    let total = effective_growth_ms(def, plot.fertilized);
    if total == 0 {
        return 100.0;
    }
    let elapsed = now.saturating_sub(planted);
    (elapsed as f64 / total as f64 * 100.0).clamp(0.0, 100.0) as f32
}

pub fn remaining_ms(plot: &Plot, def: &CropDef, now: Timestamp) -> u64 {
    ready_at(plot, def).map_or(0, |ready| ready.saturating_sub(now))
}

pub fn phase(plot: &Plot, crops: &CropRegistry, now: Timestamp) -> Result<PlotPhase, IdleError> {
    let Some(crop_id) = plot.crop_id.as_deref() else {
        return Ok(PlotPhase::Empty);
    };
    let def = crops.require(crop_id)?;
    Ok(if is_ready(plot, def, now) {
        PlotPhase::Ready
    } else {
        PlotPhase::Growing
    })
}

pub fn plot_view(plot: &Plot, crops: &CropRegistry, now: Timestamp) -> Result<PlotView, IdleError> {
    let mut view = PlotView {
        phase: PlotPhase::Empty,
        crop_id: plot.crop_id.clone(),
        progress_percent: 0.0,
        remaining_ms: 0,
        ready_at: None,
        fertilized: plot.fertilized,
        has_weeds: plot.has_weeds,
    };
    if let Some(crop_id) = plot.crop_id.as_deref() {
        let def = crops.require(crop_id)?;
        view.phase = if is_ready(plot, def, now) {
            PlotPhase::Ready
        } else {
            PlotPhase::Growing
        };
        view.progress_percent = progress_percent(plot, def, now);
        view.remaining_ms = remaining_ms(plot, def, now);
        view.ready_at = ready_at(plot, def);
    }
    Ok(view)
}

// ─────────────────────────────────────────────────────────────────────────────
// Transitions
// ─────────────────────────────────────────────────────────────────────────────

/// Plant `crop_id` in an empty plot. Consumes one seed and the crop's energy
/// cost together, or neither. Returns the ready time.
#[allow(clippy::too_many_arguments)]
pub fn plant(
    farm: &mut Farm,
    index: usize,
    crop_id: &str,
    now: Timestamp,
    crops: &CropRegistry,
    skills: &SkillLedger,
    player: &mut PlayerState,
    inventory: &mut Inventory,
    config: &BalanceConfig,
    events: &mut impl EventSink,
) -> Result<Timestamp, IdleError> {
    let plot = farm.plot(index)?;
    let def = crops.require(crop_id)?;

    if !plot.is_empty() {
        return Err(IdleError::PlotOccupied);
    }

    let level = skills.level(&config.farming_skill)?;
    if level < def.required_level {
        return Err(IdleError::LevelTooLow {
            required: def.required_level,
            current: level,
        });
    }

    if !inventory.has(&def.seed_id, 1) {
        return Err(IdleError::MissingSeed(def.seed_id.clone()));
    }

    if !player.has_energy(def.energy_cost) {
        return Err(IdleError::InsufficientEnergy {
            required: def.energy_cost,
            current: player.energy,
        });
    }

    // Both checked above; neither can fail now.
    inventory.remove(&def.seed_id, 1);
    player.spend_energy(def.energy_cost);

    let plot = farm.plot_mut(index)?;
    plot.crop_id = Some(def.id.clone());
    plot.planted_at = Some(now);
    plot.fertilized = false;
    plot.has_weeds = false;

    let ready = now.saturating_add(effective_growth_ms(def, false));
    debug!("[Farming] Planted {} in plot {} (ready at {})", def.id, index, ready);
    events.emit(IdleEvent::CropPlanted {
        plot: index,
        crop_id: def.id.clone(),
        ready_at: ready,
    });
    Ok(ready)
}

/// Halve a growing crop's effective growth time. The ready time is
/// recomputed from the original plant time, so a late fertilize can make the
/// crop ready immediately. Returns the new ready time.
pub fn fertilize(
    farm: &mut Farm,
    index: usize,
    now: Timestamp,
    crops: &CropRegistry,
    inventory: &mut Inventory,
    config: &BalanceConfig,
    events: &mut impl EventSink,
) -> Result<Timestamp, IdleError> {
    let plot = farm.plot(index)?;
    let Some(crop_id) = plot.crop_id.as_deref() else {
        return Err(IdleError::PlotEmpty);
    };
    let def = crops.require(crop_id)?;

    if plot.fertilized {
        return Err(IdleError::AlreadyFertilized);
    }
    if is_ready(plot, def, now) {
        return Err(IdleError::CropAlreadyReady);
    }
    if !inventory.remove(&config.fertilizer_item, 1) {
        return Err(IdleError::MissingFertilizer(config.fertilizer_item.clone()));
    }

    let plot = farm.plot_mut(index)?;
    plot.fertilized = true;
    let ready = ready_at(plot, def).unwrap_or(now);

    debug!("[Farming] Fertilized plot {} (ready at {})", index, ready);
    events.emit(IdleEvent::CropFertilized {
        plot: index,
        ready_at: ready,
    });
    Ok(ready)
}

/// Remove a crop without yield or XP. Returns the crop that was removed.
pub fn destroy(
    farm: &mut Farm,
    index: usize,
    now: Timestamp,
    events: &mut impl EventSink,
) -> Result<CropId, IdleError> {
    let plot = farm.plot_mut(index)?;
    let Some(crop_id) = plot.crop_id.clone() else {
        return Err(IdleError::PlotEmpty);
    };
    plot.clear(now);

    events.emit(IdleEvent::CropDestroyed {
        plot: index,
        crop_id: crop_id.clone(),
    });
    Ok(crop_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::farming::test_support::*;

    #[test]
    fn growth_time_halves_when_fertilized() {
        let def = crop("wheat", 100, 1);
        assert_eq!(effective_growth_ms(&def, false), 100_000);
        assert_eq!(effective_growth_ms(&def, true), 50_000);
    }

    #[test]
    fn phase_is_derived_from_time() {
        let mut world = TestFarm::new();
        world.plant(0, "wheat", 0).unwrap();
        let plot = &world.farm.plots[0];
        assert_eq!(phase(plot, &world.crops, 99_999).unwrap(), PlotPhase::Growing);
        assert_eq!(phase(plot, &world.crops, 100_000).unwrap(), PlotPhase::Ready);
        assert_eq!(phase(&world.farm.plots[1], &world.crops, 0).unwrap(), PlotPhase::Empty);
    }

    #[test]
    fn progress_is_clamped() {
        let mut world = TestFarm::new();
        world.plant(0, "wheat", 10_000).unwrap();
        let plot = &world.farm.plots[0];
        let def = world.crops.get("wheat").unwrap();
        assert_eq!(progress_percent(plot, def, 0), 0.0);
        assert_eq!(progress_percent(plot, def, 60_000), 50.0);
        assert_eq!(progress_percent(plot, def, 1_000_000), 100.0);
        assert_eq!(remaining_ms(plot, def, 60_000), 50_000);
        assert_eq!(remaining_ms(plot, def, 1_000_000), 0);
    }

    #[test]
    fn plant_consumes_seed_and_energy_and_emits_once() {
        let mut world = TestFarm::new();
        let energy = world.player.energy;
        let ready = world.plant(4, "wheat", 5_000).unwrap();
        assert_eq!(ready, 105_000);
        assert_eq!(world.inventory.count("wheat_seeds"), 4);
        assert_eq!(world.player.energy, energy - 2);
        let plot = &world.farm.plots[4];
        assert_eq!(plot.crop_id.as_deref(), Some("wheat"));
        assert_eq!(plot.planted_at, Some(5_000));
        assert_eq!(
            world.events,
            vec![IdleEvent::CropPlanted {
                plot: 4,
                crop_id: "wheat".into(),
                ready_at: 105_000
            }]
        );
    }

    #[test]
    fn plant_clears_weeds() {
        let mut world = TestFarm::new();
        world.farm.plots[0].has_weeds = true;
        world.plant(0, "wheat", 0).unwrap();
        assert!(!world.farm.plots[0].has_weeds);
    }

    #[test]
    fn plant_on_occupied_plot_fails() {
        let mut world = TestFarm::new();
        world.plant(0, "wheat", 0).unwrap();
        assert_eq!(world.plant(0, "wheat", 1).unwrap_err(), IdleError::PlotOccupied);
        assert_eq!(world.inventory.count("wheat_seeds"), 4);
    }

    #[test]
    fn plant_checks_level_before_seed() {
        let mut world = TestFarm::new();
        world.inventory.items.clear();
        let err = world.plant(0, "pumpkin", 0).unwrap_err();
        assert_eq!(
            err,
            IdleError::LevelTooLow {
                required: 20,
                current: 1
            }
        );
    }

    #[test]
    fn plant_without_seed_fails() {
        let mut world = TestFarm::new();
        world.inventory.items.clear();
        let err = world.plant(0, "wheat", 0).unwrap_err();
        assert_eq!(err, IdleError::MissingSeed("wheat_seeds".into()));
        assert!(world.events.is_empty());
    }

    #[test]
    fn plant_without_energy_keeps_seed() {
        let mut world = TestFarm::new();
        world.player.energy = 1;
        let err = world.plant(0, "wheat", 0).unwrap_err();
        assert_eq!(
            err,
            IdleError::InsufficientEnergy {
                required: 2,
                current: 1
            }
        );
        assert_eq!(world.inventory.count("wheat_seeds"), 5);
        assert_eq!(world.player.energy, 1);
        assert!(world.farm.plots[0].is_empty());
        assert!(world.events.is_empty());
    }

    #[test]
    fn plant_bad_index_and_unknown_crop_are_data_errors() {
        let mut world = TestFarm::new();
        assert!(world.plant(9, "wheat", 0).unwrap_err().is_data_error());
        assert!(world.plant(0, "mandrake", 0).unwrap_err().is_data_error());
    }

    #[test]
    fn late_fertilize_measures_from_plant_time() {
        let mut world = TestFarm::new();
        world.plant(0, "wheat", 0).unwrap();
        let ready = world.fertilize(0, 80_000).unwrap();
        assert_eq!(ready, 50_000);
        let plot = &world.farm.plots[0];
        let def = world.crops.get("wheat").unwrap();
        assert!(is_ready(plot, def, 50_000));
        assert!(is_ready(plot, def, 80_000));
        assert!(!is_ready(plot, def, 49_999));
        assert_eq!(world.inventory.count("fertilizer"), 0);
    }

    #[test]
    fn fertilize_preconditions() {
        let mut world = TestFarm::new();
        assert_eq!(world.fertilize(0, 0).unwrap_err(), IdleError::PlotEmpty);

        world.plant(0, "wheat", 0).unwrap();
        world.fertilize(0, 10_000).unwrap();
        assert_eq!(world.fertilize(0, 20_000).unwrap_err(), IdleError::AlreadyFertilized);

        world.plant(1, "wheat", 0).unwrap();
        assert_eq!(
            world.fertilize(1, 100_000).unwrap_err(),
            IdleError::CropAlreadyReady
        );

        assert_eq!(
            world.fertilize(1, 10_000).unwrap_err(),
            IdleError::MissingFertilizer("fertilizer".into())
        );
        assert!(!world.farm.plots[1].fertilized);
    }

    #[test]
    fn destroy_clears_without_yield() {
        let mut world = TestFarm::new();
        world.plant(2, "wheat", 0).unwrap();
        world.events.clear();
        let removed = destroy(&mut world.farm, 2, 7_000, &mut world.events).unwrap();
        assert_eq!(removed, "wheat");
        let plot = &world.farm.plots[2];
        assert!(plot.is_empty());
        assert_eq!(plot.planted_at, None);
        assert_eq!(plot.last_cleared_at, 7_000);
        assert_eq!(world.inventory.count("wheat"), 0);
        assert_eq!(
            world.events,
            vec![IdleEvent::CropDestroyed {
                plot: 2,
                crop_id: "wheat".into()
            }]
        );
        assert_eq!(
            destroy(&mut world.farm, 2, 8_000, &mut world.events).unwrap_err(),
            IdleError::PlotEmpty
        );
    }

    #[test]
    fn view_reports_derived_values() {
        let mut world = TestFarm::new();
        world.plant(0, "wheat", 0).unwrap();
        let view = plot_view(&world.farm.plots[0], &world.crops, 25_000).unwrap();
        assert_eq!(view.phase, PlotPhase::Growing);
        assert_eq!(view.progress_percent, 25.0);
        assert_eq!(view.remaining_ms, 75_000);
        assert_eq!(view.ready_at, Some(100_000));
        let empty = plot_view(&world.farm.plots[1], &world.crops, 25_000).unwrap();
        assert_eq!(empty.phase, PlotPhase::Empty);
        assert_eq!(empty.ready_at, None);
    }

    #[test]
    fn fertilized_progress_runs_against_the_halved_time() {
        let mut world = TestFarm::new();
        world.plant(0, "wheat", 0).unwrap();
        world.plant(1, "wheat", 0).unwrap();
        world.inventory.add("fertilizer", 1);

        // Fertilized at 80%: already past the halved 50s, so clamped and ready.
        world.fertilize(0, 80_000).unwrap();
        let late = plot_view(&world.farm.plots[0], &world.crops, 80_000).unwrap();
        assert_eq!(late.progress_percent, 100.0);
        assert_eq!(late.phase, PlotPhase::Ready);
        assert_eq!(late.remaining_ms, 0);
        assert_eq!(late.ready_at, Some(50_000));

        // Fertilized at 20%: the same elapsed time now counts double.
        world.fertilize(1, 20_000).unwrap();
        let def = world.crops.get("wheat").unwrap();
        assert_eq!(progress_percent(&world.farm.plots[1], def, 20_000), 40.0);
        let early = plot_view(&world.farm.plots[1], &world.crops, 20_000).unwrap();
        assert_eq!(early.phase, PlotPhase::Growing);
        assert_eq!(early.remaining_ms, 30_000);
    }
}
