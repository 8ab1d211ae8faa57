//! Test-only helpers for building models and model files.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::core::linker::link;
use crate::document::ModelDocument;
use crate::model::Model;

/// Link a model from an inline JSON document, panicking on any linking error.
pub fn link_json(value: Value) -> Model {
    let doc: ModelDocument = serde_json::from_value(value).expect("model document");
    match link(&doc) {
        Ok(model) => model,
        Err(errors) => panic!("link failed:\n- {}", errors.join("\n- ")),
    }
}

/// Write `value` as pretty JSON to `dir/name` and return the path.
pub fn write_model(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    let mut payload = serde_json::to_string_pretty(value).expect("serialize model");
    payload.push('\n');
    fs::write(&path, payload).expect("write model");
    path
}

/// Two tasks competing under an OR root, each with one satisfying effect.
pub fn or_choice() -> Value {
    serde_json::json!({
        "name": "or_choice",
        "actors": [{
            "name": "agent",
            "predicates": ["pA", "pB"],
            "goals": [{ "name": "G", "or": ["A", "B"] }],
            "tasks": [
                { "name": "A", "effects": [
                    { "name": "eA", "probability": 1.0, "satisfying": true, "turnsTrue": ["pA"] }
                ]},
                { "name": "B", "effects": [
                    { "name": "eB", "probability": 1.0, "satisfying": true, "turnsTrue": ["pB"] }
                ]}
            ]
        }]
    })
}
