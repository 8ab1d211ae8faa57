//! Orchestration for `gm2golog translate` and `gm2golog validate`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::core::assembler::assemble;
use crate::core::diagnostics::Diagnostic;
use crate::exit_codes;
use crate::io::config::TranslatorConfig;
use crate::io::model_store::load_model;
use crate::io::spec_writer::{default_output_path, write_translation};

/// Result of a successful translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateOutcome {
    pub output: PathBuf,
    pub diagnostics: Vec<Diagnostic>,
    /// Whether diagnostics should fail the command.
    pub deny_diagnostics: bool,
}

impl TranslateOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.deny_diagnostics && !self.diagnostics.is_empty() {
            exit_codes::DEGRADED
        } else {
            exit_codes::OK
        }
    }
}

/// Summary of a model that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOutcome {
    pub model: String,
    pub elements: usize,
}

/// Load `model_path`, translate it and write the program.
///
/// The output goes to `output`, or next to the model with the configured
/// extension. Diagnostics never stop the write.
pub fn translate_file(
    model_path: &Path,
    output: Option<&Path>,
    config: &TranslatorConfig,
) -> Result<TranslateOutcome> {
    let model = load_model(model_path, config.validate_schema)?;
    let translation =
        assemble(&model).with_context(|| format!("translate {}", model_path.display()))?;

    let output = match output {
        Some(path) => path.to_path_buf(),
        None => default_output_path(model_path, &config.output_extension),
    };
    write_translation(&output, &translation)?;
    info!(
        model = %model.name,
        output = %output.display(),
        diagnostics = translation.diagnostics.len(),
        "translated model"
    );

    Ok(TranslateOutcome {
        output,
        diagnostics: translation.diagnostics,
        deny_diagnostics: config.deny_diagnostics,
    })
}

/// Check `model_path` against the schema, the linker and the model invariants.
pub fn validate_file(model_path: &Path, config: &TranslatorConfig) -> Result<ValidateOutcome> {
    let model = load_model(model_path, config.validate_schema)?;
    Ok(ValidateOutcome {
        model: model.name.clone(),
        elements: model.elements.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{or_choice, write_model};
    use serde_json::json;
    use std::fs;

    #[test]
    fn translate_writes_next_to_model_by_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let model = write_model(temp.path(), "or_choice.json", &or_choice());

        let outcome =
            translate_file(&model, None, &TranslatorConfig::default()).expect("translate");

        assert_eq!(outcome.output, temp.path().join("or_choice.pl"));
        assert!(outcome.diagnostics.is_empty());
        assert_eq!(outcome.exit_code(), exit_codes::OK);
        let text = fs::read_to_string(&outcome.output).expect("read output");
        assert!(text.contains("proc(G, (A # B))."));
    }

    #[test]
    fn translate_honours_explicit_output_and_extension() {
        let temp = tempfile::tempdir().expect("tempdir");
        let model = write_model(temp.path(), "or_choice.json", &or_choice());
        let config = TranslatorConfig {
            output_extension: "golog".to_string(),
            ..TranslatorConfig::default()
        };

        let outcome = translate_file(&model, None, &config).expect("translate");
        assert_eq!(outcome.output, temp.path().join("or_choice.golog"));

        let explicit = temp.path().join("nested/out.pl");
        let outcome =
            translate_file(&model, Some(explicit.as_path()), &config).expect("translate");
        assert_eq!(outcome.output, explicit);
        assert!(explicit.exists());
    }

    #[test]
    fn denied_diagnostics_degrade_exit_code() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut doc = or_choice();
        doc["actors"][0]["conditions"] = json!([
            { "name": "odd", "formula": { "plus": [{ "number": 1.0 }, { "number": 2.0 }] } }
        ]);
        let model = write_model(temp.path(), "degraded.json", &doc);
        let config = TranslatorConfig {
            deny_diagnostics: true,
            ..TranslatorConfig::default()
        };

        let outcome = translate_file(&model, None, &config).expect("translate");
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].element, "odd");
        assert_eq!(outcome.exit_code(), exit_codes::DEGRADED);
        assert!(outcome.output.exists());
    }

    #[test]
    fn validate_reports_element_count() {
        let temp = tempfile::tempdir().expect("tempdir");
        let model = write_model(temp.path(), "or_choice.json", &or_choice());
        let outcome = validate_file(&model, &TranslatorConfig::default()).expect("validate");
        assert_eq!(
            outcome,
            ValidateOutcome {
                model: "or_choice".to_string(),
                elements: 7,
            }
        );
    }
}
