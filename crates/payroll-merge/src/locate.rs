use crate::Result;
use crate::error::PayrollError;
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Most recently modified file in `dir` whose name contains `keyword` and
/// ends with `extension`.
///
/// Exports are downloaded again every pay period, so older copies with the
/// same name pattern are expected to be lying around.
pub fn latest_file(dir: &Path, keyword: &str, extension: &str) -> Result<PathBuf> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to list folder {}", dir.display()))?;

    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let file_name = file_name.to_string_lossy();
        if !file_name.ends_with(extension) || !file_name.contains(keyword) {
            continue;
        }
        let metadata = entry.metadata()?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified()?;
        if latest.as_ref().is_none_or(|(newest, _)| modified >= *newest) {
            latest = Some((modified, entry.path()));
        }
    }

    match latest {
        Some((_, path)) => {
            tracing::debug!(path = %path.display(), "found latest file");
            Ok(path)
        }
        None => Err(PayrollError::NoMatchingFile {
            keyword: keyword.to_owned(),
            extension: extension.to_owned(),
            dir: dir.to_owned(),
        }
        .into()),
    }
}
