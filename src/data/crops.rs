use crate::shared::*;

/// Populate the CropRegistry with all crop definitions.
///
/// Growth times are real seconds. Each crop's harvest item shares its id,
/// and every crop needs its own `<id>_seeds` item to plant.
///
///   Level 1:  wheat (1m), carrot (3m), potato (5m)
///   Level 5:  tomato (10m), corn (15m)
///   Level 10: strawberry (30m), cabbage (45m)
///   Level 20: pumpkin (1h), melon (2h)
///   Level 35: blueberry (4h)
///   Level 50: ancient_fruit (8h)
pub fn populate_crops(registry: &mut CropRegistry) {
    let crops: Vec<CropDef> = vec![
        // ── Starter crops ───────────────────────────────────────────────────────

        CropDef {
            id: "wheat".into(),
            name: "Wheat".into(),
            seed_id: "wheat_seeds".into(),
            growth_time_seconds: 60,
            harvest_amount: 2,
            xp_gain: 8,
            required_level: 1,
            sell_price: 5,
            energy_cost: 2,
        },

        CropDef {
            id: "carrot".into(),
            name: "Carrot".into(),
            seed_id: "carrot_seeds".into(),
            growth_time_seconds: 180,
            harvest_amount: 2,
            xp_gain: 15,
            required_level: 1,
            sell_price: 12,
            energy_cost: 2,
        },

        CropDef {
            id: "potato".into(),
            name: "Potato".into(),
            seed_id: "potato_seeds".into(),
            growth_time_seconds: 300,
            harvest_amount: 3,
            xp_gain: 22,
            required_level: 1,
            sell_price: 15,
            energy_cost: 3,
        },

        // ── Mid-game crops ──────────────────────────────────────────────────────

        CropDef {
            id: "tomato".into(),
            name: "Tomato".into(),
            seed_id: "tomato_seeds".into(),
            growth_time_seconds: 600,
            harvest_amount: 3,
            xp_gain: 40,
            required_level: 5,
            sell_price: 30,
            energy_cost: 3,
        },

        CropDef {
            id: "corn".into(),
            name: "Corn".into(),
            seed_id: "corn_seeds".into(),
            growth_time_seconds: 900,
            harvest_amount: 4,
            xp_gain: 55,
            required_level: 5,
            sell_price: 35,
            energy_cost: 4,
        },

        CropDef {
            id: "strawberry".into(),
            name: "Strawberry".into(),
            seed_id: "strawberry_seeds".into(),
            growth_time_seconds: 1_800,
            harvest_amount: 4,
            xp_gain: 90,
            required_level: 10,
            sell_price: 60,
            energy_cost: 4,
        },

        CropDef {
            id: "cabbage".into(),
            name: "Cabbage".into(),
            seed_id: "cabbage_seeds".into(),
            growth_time_seconds: 2_700,
            harvest_amount: 2,
            xp_gain: 120,
            required_level: 10,
            sell_price: 110,
            energy_cost: 5,
        },

        // ── Late crops ──────────────────────────────────────────────────────────

        CropDef {
            id: "pumpkin".into(),
            name: "Pumpkin".into(),
            seed_id: "pumpkin_seeds".into(),
            growth_time_seconds: 3_600,
            harvest_amount: 2,
            xp_gain: 200,
            required_level: 20,
            sell_price: 220,
            energy_cost: 6,
        },

        CropDef {
            id: "melon".into(),
            name: "Melon".into(),
            seed_id: "melon_seeds".into(),
            growth_time_seconds: 7_200,
            harvest_amount: 2,
            xp_gain: 380,
            required_level: 20,
            sell_price: 400,
            energy_cost: 6,
        },

        CropDef {
            id: "blueberry".into(),
            name: "Blueberry".into(),
            seed_id: "blueberry_seeds".into(),
            growth_time_seconds: 14_400,
            harvest_amount: 6,
            xp_gain: 700,
            required_level: 35,
            sell_price: 150,
            energy_cost: 8,
        },

        CropDef {
            id: "ancient_fruit".into(),
            name: "Ancient Fruit".into(),
            seed_id: "ancient_fruit_seeds".into(),
            growth_time_seconds: 28_800,
            harvest_amount: 3,
            xp_gain: 1_500,
            required_level: 50,
            sell_price: 900,
            energy_cost: 10,
        },
    ];

    for crop in crops {
        registry.crops.insert(crop.id.clone(), crop);
    }
}
