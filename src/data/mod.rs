//! Data layer — populates all registries at game startup.
//!
//! This plugin runs in OnEnter(GameState::Loading), fills the CropRegistry
//! and ItemRegistry from the hard-coded game-design data defined in
//! submodules, then transitions the game into GameState::Playing.
//!
//! No other domain needs to seed these resources. All domain plugins can
//! safely read them once GameState has advanced past Loading.

mod crops;
mod items;

use bevy::prelude::*;
use crate::config::BalanceConfig;
use crate::shared::*;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CropRegistry>()
            .init_resource::<ItemRegistry>()
            .add_systems(OnEnter(GameState::Loading), load_all_data);
    }
}

/// Fill both registries. Tests that pre-populate a registry keep it.
pub fn populate_registries(crops: &mut CropRegistry, items: &mut ItemRegistry) {
    if crops.crops.is_empty() {
        crops::populate_crops(crops);
    }
    if items.items.is_empty() {
        items::populate_items(items, crops);
    }
}

/// References that would otherwise surface later as data-integrity errors.
pub fn missing_references(
    crops: &CropRegistry,
    items: &ItemRegistry,
    config: &BalanceConfig,
) -> Vec<ItemId> {
    let mut missing: Vec<ItemId> = crops
        .crops
        .values()
        .flat_map(|c| [&c.seed_id, &c.id])
        .chain([&config.fertilizer_item, &config.weed_byproduct])
        .filter(|id| items.get(id).is_none())
        .cloned()
        .collect();
    missing.sort();
    missing.dedup();
    missing
}

/// Single system that populates every registry and then transitions to Playing.
fn load_all_data(
    config: Res<BalanceConfig>,
    mut item_registry: ResMut<ItemRegistry>,
    mut crop_registry: ResMut<CropRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    info!("DataPlugin: populating registries…");

    populate_registries(&mut crop_registry, &mut item_registry);
    info!("  Crops loaded: {}", crop_registry.crops.len());
    info!("  Items loaded: {}", item_registry.items.len());

    for id in missing_references(&crop_registry, &item_registry, &config) {
        error!("DataPlugin: item '{}' is referenced but not defined", id);
    }

    info!("DataPlugin: all registries populated. Transitioning to Playing.");
    next_state.set(GameState::Playing);
}
