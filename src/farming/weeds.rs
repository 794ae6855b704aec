//! Weed growth and removal.
//!
//! An empty plot left untouched for `weed_growth_threshold_ms` sprouts
//! weeds. Weeds only appear on the external tick so that they show up while
//! the player is watching; the check itself is still a pure function of the
//! stored `last_cleared_at`, so a long absence produces the same result.
//! Clearing weeds costs energy and drops one byproduct item.

use bevy::prelude::*;

use crate::config::BalanceConfig;
use crate::shared::*;

/// Mark every overdue empty plot as weedy. Returns the plots that changed.
pub fn check_weeds(
    farm: &mut Farm,
    now: Timestamp,
    config: &BalanceConfig,
    events: &mut impl EventSink,
) -> Vec<usize> {
    let mut grown = Vec::new();
    for (index, plot) in farm.plots.iter_mut().enumerate() {
        if !plot.is_empty() || plot.has_weeds {
            continue;
        }
        if now.saturating_sub(plot.last_cleared_at) < config.weed_growth_threshold_ms {
            continue;
        }
        plot.has_weeds = true;
        events.emit(IdleEvent::WeedsGrown { plot: index });
        grown.push(index);
    }
    if !grown.is_empty() {
        debug!("[Farming] Weeds sprouted on plots {:?}", grown);
    }
    grown
}

pub fn clear_weeds(
    farm: &mut Farm,
    index: usize,
    now: Timestamp,
    player: &mut PlayerState,
    inventory: &mut Inventory,
    config: &BalanceConfig,
    events: &mut impl EventSink,
) -> Result<(), IdleError> {
    let plot = farm.plot_mut(index)?;
    if !plot.has_weeds {
        return Err(IdleError::NoWeeds);
    }
    if !player.spend_energy(config.weed_clear_energy) {
        return Err(IdleError::InsufficientEnergy {
            required: config.weed_clear_energy,
            current: player.energy,
        });
    }

    inventory.add(&config.weed_byproduct, 1);
    plot.has_weeds = false;
    plot.last_cleared_at = now;

    events.emit(IdleEvent::WeedsCleared {
        plot: index,
        byproduct: config.weed_byproduct.clone(),
        energy: player.energy,
    });
    Ok(())
}
