//! Writes generated programs to disk.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::core::assembler::Translation;

/// Output path for `model_path` when none is given: same directory and stem,
/// with `extension`.
pub fn default_output_path(model_path: &Path, extension: &str) -> PathBuf {
    model_path.with_extension(extension)
}

/// Render `translation` and write it atomically to `path`.
pub fn write_translation(path: &Path, translation: &Translation) -> Result<()> {
    let text = translation.render();
    write_atomic(path, &text)?;
    info!(path = %path.display(), bytes = text.len(), "wrote program");
    Ok(())
}

/// Write `contents` to a sibling temp file, then rename it over `path`.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("output path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("output path missing file name {}", path.display()))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp file {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::assembler::assemble;
    use crate::test_support::{link_json, or_choice};

    #[test]
    fn default_output_replaces_extension() {
        assert_eq!(
            default_output_path(Path::new("models/travel.json"), "pl"),
            PathBuf::from("models/travel.pl")
        );
    }

    #[test]
    fn write_translation_creates_parents_and_leaves_no_temp_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("out/or_choice.pl");
        let translation = assemble(&link_json(or_choice())).expect("assemble");

        write_translation(&path, &translation).expect("write");

        let written = fs::read_to_string(&path).expect("read");
        assert_eq!(written, translation.render());
        assert!(!temp.path().join("out/or_choice.pl.tmp").exists());
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("program.pl");
        fs::write(&path, "stale").expect("seed");
        write_atomic(&path, "fresh\n").expect("write");
        assert_eq!(fs::read_to_string(&path).expect("read"), "fresh\n");
    }
}
