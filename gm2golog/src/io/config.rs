//! Translator configuration stored in `gm2golog.toml`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "gm2golog.toml";

/// Translator configuration (TOML).
///
/// Missing fields take their defaults, so an empty file is valid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Check model files against the embedded JSON schema before linking.
    pub validate_schema: bool,

    /// Exit with `DEGRADED` when rendering recorded any diagnostic.
    pub deny_diagnostics: bool,

    /// Extension of the generated program when no output path is given.
    pub output_extension: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            validate_schema: true,
            deny_diagnostics: false,
            output_extension: "pl".to_string(),
        }
    }
}

impl TranslatorConfig {
    pub fn validate(&self) -> Result<()> {
        let ext = self.output_extension.trim();
        if ext.is_empty() {
            return Err(anyhow!("output_extension must be non-empty"));
        }
        if ext.contains(['.', '/', '\\']) {
            return Err(anyhow!(
                "output_extension must not contain '.' or path separators: '{}'",
                self.output_extension
            ));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TranslatorConfig::default()`.
pub fn load_config(path: &Path) -> Result<TranslatorConfig> {
    if !path.exists() {
        let cfg = TranslatorConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TranslatorConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate().with_context(|| format!("validate {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_returns_default() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cfg = load_config(&temp.path().join("missing.toml")).expect("load");
        assert_eq!(cfg, TranslatorConfig::default());
    }

    #[test]
    fn serialized_config_loads_back() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        let cfg = TranslatorConfig {
            deny_diagnostics: true,
            output_extension: "golog".to_string(),
            ..TranslatorConfig::default()
        };
        fs::write(&path, toml::to_string_pretty(&cfg).expect("serialize")).expect("write");
        let loaded = load_config(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "validate_schema = false\n").expect("write");
        let cfg = load_config(&path).expect("load");
        assert!(!cfg.validate_schema);
        assert_eq!(cfg.output_extension, "pl");
    }

    #[test]
    fn rejects_bad_extension() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join(CONFIG_FILE);
        fs::write(&path, "output_extension = \".pl\"\n").expect("write");
        let err = load_config(&path).expect_err("dotted extension");
        assert!(format!("{err:#}").contains("output_extension"));

        let empty = TranslatorConfig {
            output_extension: " ".to_string(),
            ..TranslatorConfig::default()
        };
        assert!(empty.validate().is_err());
    }
}
