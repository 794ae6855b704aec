//! Bevy systems that connect the farming functions to the event bus.
//!
//! Request handlers read the wall clock once per frame and forward each
//! request to the pure functions in `crops`, `harvest` and `weeds`. A
//! rejected request changes nothing and is reported as `ActionFailedEvent`.
//! The tick systems only run on frames that carry an external tick.

use bevy::prelude::*;

use super::crops::{destroy, fertilize, plant};
use super::harvest::harvest;
use super::ready::ReadyWatch;
use super::weeds::{check_weeds, clear_weeds};
use crate::clock::WallClock;
use crate::config::BalanceConfig;
use crate::shared::*;

// ─────────────────────────────────────────────────────────────────────────────
// Startup
// ─────────────────────────────────────────────────────────────────────────────

/// Make sure the farm has exactly the configured number of plots and that
/// every weed timer has started. A fresh game starts its timers here.
pub fn settle_farm(
    clock: Res<WallClock>,
    config: Res<BalanceConfig>,
    mut farm: ResMut<Farm>,
) {
    let changed = farm.settle(config.plot_count, clock.now());
    if changed > 0 {
        info!("[Farming] Settled {} plot(s) for {} slots", changed, config.plot_count);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Requests
// ─────────────────────────────────────────────────────────────────────────────

#[allow(clippy::too_many_arguments)]
pub fn handle_plant_requests(
    mut requests: EventReader<PlantRequest>,
    clock: Res<WallClock>,
    config: Res<BalanceConfig>,
    crops: Res<CropRegistry>,
    skills: Res<SkillLedger>,
    mut farm: ResMut<Farm>,
    mut player: ResMut<PlayerState>,
    mut inventory: ResMut<Inventory>,
    mut events: EventWriter<IdleEvent>,
    mut failures: EventWriter<ActionFailedEvent>,
) {
    let now = clock.now();
    for request in requests.read() {
        if let Err(err) = plant(
            &mut farm,
            request.plot,
            &request.crop_id,
            now,
            &crops,
            &skills,
            &mut player,
            &mut inventory,
            &config,
            &mut events,
        ) {
            report_failure(ActionKind::Plant, err, &mut failures);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_fertilize_requests(
    mut requests: EventReader<FertilizeRequest>,
    clock: Res<WallClock>,
    config: Res<BalanceConfig>,
    crops: Res<CropRegistry>,
    mut farm: ResMut<Farm>,
    mut inventory: ResMut<Inventory>,
    mut events: EventWriter<IdleEvent>,
    mut failures: EventWriter<ActionFailedEvent>,
) {
    let now = clock.now();
    for request in requests.read() {
        if let Err(err) = fertilize(
            &mut farm,
            request.plot,
            now,
            &crops,
            &mut inventory,
            &config,
            &mut events,
        ) {
            report_failure(ActionKind::Fertilize, err, &mut failures);
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_harvest_requests(
    mut requests: EventReader<HarvestRequest>,
    clock: Res<WallClock>,
    config: Res<BalanceConfig>,
    crops: Res<CropRegistry>,
    mut rng: ResMut<IdleRng>,
    mut farm: ResMut<Farm>,
    mut skills: ResMut<SkillLedger>,
    mut player: ResMut<PlayerState>,
    mut inventory: ResMut<Inventory>,
    mut events: EventWriter<IdleEvent>,
    mut failures: EventWriter<ActionFailedEvent>,
) {
    let now = clock.now();
    for request in requests.read() {
        if let Err(err) = harvest(
            &mut farm,
            request.plot,
            now,
            &crops,
            &mut skills,
            &mut player,
            &mut inventory,
            &config,
            &mut rng.0,
            &mut events,
        ) {
            report_failure(ActionKind::Harvest, err, &mut failures);
        }
    }
}

pub fn handle_destroy_requests(
    mut requests: EventReader<DestroyRequest>,
    clock: Res<WallClock>,
    mut farm: ResMut<Farm>,
    mut events: EventWriter<IdleEvent>,
    mut failures: EventWriter<ActionFailedEvent>,
) {
    let now = clock.now();
    for request in requests.read() {
        match destroy(&mut farm, request.plot, now, &mut events) {
            Ok(crop_id) => info!("[Farming] Destroyed {} in plot {}", crop_id, request.plot),
            Err(err) => report_failure(ActionKind::Destroy, err, &mut failures),
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_clear_weeds_requests(
    mut requests: EventReader<ClearWeedsRequest>,
    clock: Res<WallClock>,
    config: Res<BalanceConfig>,
    mut farm: ResMut<Farm>,
    mut player: ResMut<PlayerState>,
    mut inventory: ResMut<Inventory>,
    mut events: EventWriter<IdleEvent>,
    mut failures: EventWriter<ActionFailedEvent>,
) {
    let now = clock.now();
    for request in requests.read() {
        if let Err(err) = clear_weeds(
            &mut farm,
            request.plot,
            now,
            &mut player,
            &mut inventory,
            &config,
            &mut events,
        ) {
            report_failure(ActionKind::ClearWeeds, err, &mut failures);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tick
// ─────────────────────────────────────────────────────────────────────────────

pub fn grow_weeds(
    clock: Res<WallClock>,
    config: Res<BalanceConfig>,
    mut farm: ResMut<Farm>,
    mut events: EventWriter<IdleEvent>,
) {
    check_weeds(&mut farm, clock.now(), &config, &mut events);
}

pub fn watch_ready_crops(
    clock: Res<WallClock>,
    crops: Res<CropRegistry>,
    farm: Res<Farm>,
    mut watch: ResMut<ReadyWatch>,
    mut events: EventWriter<IdleEvent>,
) {
    let ready = watch.observe(&farm, &crops, clock.now(), &mut events);
    if !ready.is_empty() {
        info!("[Farming] Ready to harvest: plots {:?}", ready);
    }
}
