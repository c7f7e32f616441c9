//! Rendering of the final center map as key-sorted JSON.

use std::collections::BTreeMap;

use cowin_core::model::CenterMap;
use serde_json::{Map, Value};

/// Pretty JSON of the centers, ordered by center id, with every object's keys sorted.
pub(crate) fn render_centers(centers: &CenterMap) -> Result<String, serde_json::Error> {
    let sorted = centers
        .iter()
        .map(|(center_id, center)| Ok((*center_id, sort_keys(serde_json::to_value(center)?))))
        .collect::<Result<BTreeMap<i64, Value>, serde_json::Error>>()?;

    serde_json::to_string_pretty(&sorted)
}

// Rebuilds objects in key order so the output does not depend on the map backing `Value`.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(object) => {
            let ordered: BTreeMap<String, Value> = object
                .into_iter()
                .map(|(key, nested)| (key, sort_keys(nested)))
                .collect();
            Value::Object(ordered.into_iter().collect::<Map<String, Value>>())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
