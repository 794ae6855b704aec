//! Farming domain — planting, fertilizing, harvest, weeds, ready notices.
//!
//! Plot growth is never simulated. Every read derives the phase from
//! `planted_at`, the crop's growth time and the current wall-clock time, so
//! an absence of any length resolves on the next read.
//!
//! Communicates with other domains exclusively through crate::shared events/resources.

use bevy::prelude::*;
use crate::clock::idle_tick_due;
use crate::shared::*;

pub mod crops;
pub mod harvest;
pub mod ready;
pub mod weeds;
mod events_handler;

#[cfg(test)]
mod test_support;

pub use crops::{
    effective_growth_ms, is_ready, phase, plot_view, progress_percent, ready_at, remaining_ms,
    PlotPhase, PlotView,
};
pub use harvest::HarvestYield;
pub use ready::ReadyWatch;

pub struct FarmingPlugin;

impl Plugin for FarmingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Farm>()
            .init_resource::<CropRegistry>()
            .init_resource::<SkillLedger>()
            .init_resource::<ReadyWatch>()
            .init_resource::<PlayerState>()
            .init_resource::<Inventory>()
            .init_resource::<IdleRng>()
            .add_event::<IdleEvent>()
            .add_event::<ActionFailedEvent>()
            .add_event::<PlantRequest>()
            .add_event::<FertilizeRequest>()
            .add_event::<HarvestRequest>()
            .add_event::<DestroyRequest>()
            .add_event::<ClearWeedsRequest>()
            .add_systems(OnEnter(GameState::Playing), events_handler::settle_farm)
            // ------------------------------------------------------------------
            // Player requests
            // ------------------------------------------------------------------
            .add_systems(
                Update,
                (
                    events_handler::handle_plant_requests,
                    events_handler::handle_fertilize_requests,
                    events_handler::handle_harvest_requests,
                    events_handler::handle_destroy_requests,
                    events_handler::handle_clear_weeds_requests,
                )
                    .chain()
                    .run_if(in_state(GameState::Playing)),
            )
            // ------------------------------------------------------------------
            // External tick: runs after requests so a same-frame harvest is seen
            // ------------------------------------------------------------------
            .add_systems(
                Update,
                (events_handler::grow_weeds, events_handler::watch_ready_crops)
                    .chain()
                    .after(events_handler::handle_clear_weeds_requests)
                    .run_if(in_state(GameState::Playing))
                    .run_if(idle_tick_due),
            );
    }
}
