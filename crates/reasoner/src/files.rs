use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use symbol_parser::Language;
use tracing::{debug, warn};

/// Expands `paths` into the sorted, de-duplicated set of supported source
/// files they name. Directories are walked honouring `.gitignore` and hidden
/// files are skipped. Explicitly named files are kept only when their
/// language is supported.
pub fn collect_source_files(paths: &[PathBuf]) -> Result<Vec<String>> {
    let mut files = BTreeSet::new();

    for path in paths {
        let path = path
            .canonicalize()
            .with_context(|| format!("Cannot access {}", path.display()))?;

        if path.is_dir() {
            walk(&path, &mut files);
        } else if let Some(file) = supported(&path) {
            files.insert(file);
        } else {
            warn!("Skipping unsupported file {}", path.display());
        }
    }

    debug!("Collected {} source files", files.len());
    Ok(files.into_iter().collect())
}

fn walk(dir: &Path, files: &mut BTreeSet<String>) {
    for result in WalkBuilder::new(dir).build() {
        match result {
            Ok(entry) if entry.file_type().is_some_and(|ft| ft.is_file()) => {
                if let Some(file) = supported(entry.path()) {
                    files.insert(file);
                }
            }
            Ok(_) => {}
            Err(e) => warn!("Error walking {}: {}", dir.display(), e),
        }
    }
}

fn supported(path: &Path) -> Option<String> {
    let path = path.to_str()?;
    Language::is_supported(path).then(|| path.to_string())
}
