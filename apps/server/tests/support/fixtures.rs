use serde_json::{json, Value};

/// A spawn rule document in the shape the loader ingests.
pub fn spawn(
    id: &str,
    name: &str,
    generation: Option<i64>,
    bucket: &str,
    level_min: Option<i64>,
    features: &[&str],
) -> Value {
    let mut species = json!({ "name": name });
    if let Some(generation) = generation {
        species["generation"] = json!(generation);
    }

    let mut doc = json!({
        "id": id,
        "pokemon": name,
        "species": species,
        "features": features,
        "bucket": bucket,
        "biomes": ["#cobblemon:is_overworld"],
        "weight": 9.4,
    });
    if let Some(level_min) = level_min {
        doc["level_min"] = json!(level_min);
        doc["level_max"] = json!(level_min + 10);
    }
    doc
}

/// A small mixed collection covering every filterable field.
pub fn sample_spawns() -> Vec<Value> {
    vec![
        spawn("bulbasaur-1", "Bulbasaur", Some(1), "common", Some(5), &["type_grass", "type_poison"]),
        spawn("charmander-1", "Charmander", Some(1), "common", Some(10), &["type_fire"]),
        spawn("rowlet-1", "Rowlet", Some(7), "uncommon", Some(8), &["type_grass", "type_flying"]),
        spawn("fuecoco-1", "Fuecoco", Some(9), "rare", Some(15), &["type_fire"]),
        spawn("sprigatito-1", "Sprigatito", Some(9), "rare", Some(15), &["type_grass"]),
        spawn("ditto-1", "Ditto", None, "ultra-rare", None, &[]),
        spawn("mr-mime-1", "Mr. Mime", Some(1), "rare", Some(20), &["type_psychic", "type_fairy"]),
    ]
}

/// `count` near-identical documents, all matching `type=type_water`.
pub fn many_water_spawns(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            spawn(
                &format!("magikarp-{i}"),
                "Magikarp",
                Some(1),
                "common",
                Some((i % 50) as i64),
                &["type_water"],
            )
        })
        .collect()
}
