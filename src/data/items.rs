use crate::shared::*;

/// Seeds for every crop, the crops themselves, and the farm sundries.
///
/// Seeds sell for a fifth of the crop's price. Raw produce restores a little
/// energy when eaten; anything with `energy_restore: 0` is not food.
pub fn populate_items(registry: &mut ItemRegistry, crops: &CropRegistry) {
    let mut items: Vec<ItemDef> = Vec::new();

    for crop in crops.crops.values() {
        items.push(ItemDef {
            id: crop.seed_id.clone(),
            name: format!("{} Seeds", crop.name),
            stackable: true,
            energy_restore: 0,
            sell_price: (crop.sell_price / 5).max(1),
        });
        items.push(ItemDef {
            id: crop.id.clone(),
            name: crop.name.clone(),
            stackable: true,
            energy_restore: produce_energy(&crop.id),
            sell_price: crop.sell_price,
        });
    }

    items.extend([
        ItemDef {
            id: "fertilizer".into(),
            name: "Fertilizer".into(),
            stackable: true,
            energy_restore: 0,
            sell_price: 10,
        },
        ItemDef {
            id: "fiber".into(),
            name: "Fiber".into(),
            stackable: true,
            energy_restore: 0,
            sell_price: 1,
        },
        ItemDef {
            id: "bread".into(),
            name: "Bread".into(),
            stackable: true,
            energy_restore: 25,
            sell_price: 20,
        },
        ItemDef {
            id: "vegetable_stew".into(),
            name: "Vegetable Stew".into(),
            stackable: true,
            energy_restore: 60,
            sell_price: 90,
        },
    ]);

    for item in items {
        registry.items.insert(item.id.clone(), item);
    }
}

fn produce_energy(crop_id: &str) -> u32 {
    match crop_id {
        "carrot" | "tomato" => 5,
        "strawberry" | "blueberry" => 8,
        "melon" => 15,
        "ancient_fruit" => 30,
        _ => 0,
    }
}
