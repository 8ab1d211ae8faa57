//! Model load helpers with schema, linking and invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::Draft;
use serde_json::Value;
use tracing::debug;

use crate::core::invariants::validate_invariants;
use crate::core::linker::link;
use crate::document::ModelDocument;
use crate::model::Model;

/// Embedded model schema (JSON Schema Draft 2020-12).
pub const MODEL_SCHEMA: &str = include_str!("../../../schemas/model/v1.schema.json");

/// Load a model file and link it.
///
/// Schema validation runs first when `validate_schema` is set. Linking and
/// invariant errors are reported together, one per line.
pub fn load_model(model_path: &Path, validate_schema: bool) -> Result<Model> {
    let contents = fs::read_to_string(model_path)
        .with_context(|| format!("read model {}", model_path.display()))?;
    parse_model(&contents, validate_schema)
        .with_context(|| format!("load model {}", model_path.display()))
}

/// Parse, validate and link model JSON held in memory.
pub fn parse_model(contents: &str, validate_schema: bool) -> Result<Model> {
    let value: Value = serde_json::from_str(contents).context("parse model json")?;
    if validate_schema {
        check_schema(&value)?;
    }
    let doc: ModelDocument =
        serde_json::from_value(value).context("deserialize model document")?;
    debug!(actors = doc.actors.len(), "linking model");

    let model = link(&doc).map_err(|errors| violations("link errors", &errors))?;
    let errors = validate_invariants(&model);
    if !errors.is_empty() {
        return Err(violations("invariant violations", &errors));
    }
    debug!(elements = model.elements.len(), "model linked");
    Ok(model)
}

/// Validate a JSON instance against [`MODEL_SCHEMA`].
pub fn check_schema(instance: &Value) -> Result<()> {
    let schema: Value = serde_json::from_str(MODEL_SCHEMA).context("parse model schema")?;
    let compiled = jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(&schema)
        .map_err(|err| anyhow!("invalid schema: {}", err))?;
    let messages: Vec<String> = compiled
        .iter_errors(instance)
        .map(|err| err.to_string())
        .collect();
    if !messages.is_empty() {
        bail!("schema validation failed:\n- {}", messages.join("\n- "));
    }
    Ok(())
}

fn violations(label: &str, errors: &[String]) -> anyhow::Error {
    anyhow!("{label}:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{or_choice, write_model};
    use serde_json::json;

    #[test]
    fn load_links_a_valid_model() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = write_model(temp.path(), "or_choice.json", &or_choice());

        let model = load_model(&path, true).expect("load");
        assert_eq!(model.name, "or_choice");
        assert_eq!(model.tasks().count(), 2);
    }

    #[test]
    fn schema_rejects_unknown_fields() {
        let mut doc = or_choice();
        doc["actors"][0]["owner"] = json!("nobody");
        let err = parse_model(&doc.to_string(), true).expect_err("unknown field");
        assert!(format!("{err:#}").contains("schema validation failed"));
    }

    #[test]
    fn schema_rejects_mixed_goal_refinement() {
        let doc = json!({
            "actors": [{
                "name": "agent",
                "goals": [{ "name": "G", "and": ["A"], "or": ["B"] }],
                "tasks": [{ "name": "A" }, { "name": "B" }]
            }]
        });
        assert!(check_schema(&doc).is_err());
    }

    #[test]
    fn schema_accepts_nested_formulas() {
        let doc = json!({
            "actors": [{
                "name": "agent",
                "variables": ["budget"],
                "qualities": [{
                    "name": "cost",
                    "formula": { "plus": [
                        { "previous": { "atom": "cost" } },
                        { "negate": { "atom": "budget" } }
                    ]}
                }]
            }]
        });
        check_schema(&doc).expect("valid");
    }

    #[test]
    fn schema_rejects_reserved_suffixes() {
        let doc = json!({
            "actors": [{ "name": "agent", "predicates": ["p"], "variables": ["p_fl"] }]
        });
        assert!(check_schema(&doc).is_err());
        let err = parse_model(&doc.to_string(), false).expect_err("reserved suffix");
        assert!(format!("{err:#}").contains("suffix '_fl' is reserved"));
    }

    #[test]
    fn link_errors_are_reported_without_schema_check() {
        let doc = json!({
            "actors": [{
                "name": "agent",
                "goals": [{ "name": "G", "or": ["A", "Missing"] }],
                "tasks": [{ "name": "A" }]
            }]
        });
        let err = parse_model(&doc.to_string(), false).expect_err("unresolved");
        let message = format!("{err:#}");
        assert!(message.contains("link errors"));
        assert!(message.contains("goal 'G': unresolved reference 'Missing'"));
    }

    #[test]
    fn invariant_errors_are_reported() {
        let doc = json!({
            "actors": [{ "name": "agent", "goals": [{ "name": "G" }, { "name": "H" }] }]
        });
        let err = parse_model(&doc.to_string(), true).expect_err("two roots");
        assert!(format!("{err:#}").contains("model has more than one root goal: G, H"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = load_model(&temp.path().join("absent.json"), true).expect_err("missing");
        assert!(format!("{err:#}").contains("absent.json"));
    }
}
