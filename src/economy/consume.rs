//! Eating food to restore energy.

use bevy::prelude::*;

use crate::shared::*;

/// Eat one `item_id`. Returns the energy actually gained, which is less than
/// the item's value when energy is close to the cap.
pub fn consume(
    item_id: &str,
    items: &ItemRegistry,
    player: &mut PlayerState,
    inventory: &mut Inventory,
    events: &mut impl EventSink,
) -> Result<u32, IdleError> {
    let def = items
        .get(item_id)
        .ok_or_else(|| IdleError::UnknownItem(item_id.to_string()))?;
    if def.energy_restore == 0 {
        return Err(IdleError::NotConsumable(def.id.clone()));
    }
    if !inventory.remove(&def.id, 1) {
        return Err(IdleError::MissingItem(def.id.clone()));
    }

    let gained = player.restore_energy(def.energy_restore);
    info!(
        "[Economy] Ate '{}': energy {}/{} (+{})",
        def.id, player.energy, player.max_energy, gained
    );
    events.emit(IdleEvent::EnergyRestored {
        item_id: def.id.clone(),
        energy: player.energy,
        max_energy: player.max_energy,
    });
    Ok(gained)
}
