//! Ready notifications.
//!
//! Readiness is derived, never stored on the plot. To announce a crop
//! exactly once, the watcher remembers which planting it already announced
//! (by its plant time) and compares that to the freshly derived phase on
//! every tick. The snapshot lives outside the save data.

use bevy::prelude::*;

use super::crops::is_ready;
use crate::shared::*;

#[derive(Resource, Debug, Clone, Default)]
pub struct ReadyWatch {
    /// Per plot: plant time of the crop already announced as ready.
    announced: Vec<Option<Timestamp>>,
}

impl ReadyWatch {
    /// Emit `CropReady` for every crop that became ready since the last
    /// observation. Returns the plots announced this call.
    pub fn observe(
        &mut self,
        farm: &Farm,
        crops: &CropRegistry,
        now: Timestamp,
        events: &mut impl EventSink,
    ) -> Vec<usize> {
        self.announced.resize(farm.plots.len(), None);

        let mut newly_ready = Vec::new();
        for (index, plot) in farm.plots.iter().enumerate() {
            let (Some(crop_id), Some(planted_at)) = (plot.crop_id.as_deref(), plot.planted_at) else {
                self.announced[index] = None;
                continue;
            };
            let def = match crops.require(crop_id) {
                Ok(def) => def,
                Err(err) => {
                    error!("[Farming] Plot {}: {}", index, err);
                    continue;
                }
            };
            if !is_ready(plot, def, now) || self.announced[index] == Some(planted_at) {
                continue;
            }
            self.announced[index] = Some(planted_at);
            events.emit(IdleEvent::CropReady {
                plot: index,
                crop_id: crop_id.to_string(),
            });
            newly_ready.push(index);
        }
        newly_ready
    }
}
