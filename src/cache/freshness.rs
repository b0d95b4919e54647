//! Modification-time checks for the template source tree

use crate::{CatalogError, Result};
use chrono::{DateTime, Utc};
use std::path::Path;
use tracing::trace;
use walkdir::WalkDir;

/// Latest modification time of any regular file under `dir`
///
/// Fails with `EmptyTemplateDirectory` when the tree holds no files, since
/// there is no maximum to report.
pub fn latest_modification(dir: &Path) -> Result<DateTime<Utc>> {
    if !dir.is_dir() {
        return Err(CatalogError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Template directory does not exist: {}", dir.display()),
        )));
    }

    let mut latest: Option<DateTime<Utc>> = None;

    for entry in WalkDir::new(dir).min_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let modified: DateTime<Utc> = entry.metadata()?.modified()?.into();
        trace!("{} modified at {}", entry.path().display(), modified);

        if latest.map_or(true, |current| modified > current) {
            latest = Some(modified);
        }
    }

    latest.ok_or_else(|| CatalogError::EmptyTemplateDirectory(dir.to_path_buf()))
}

/// Whether the catalog needs a reload given the last reload time
pub fn templates_modified_since(dir: &Path, last_reload: Option<DateTime<Utc>>) -> Result<bool> {
    let Some(last_reload) = last_reload else {
        return Ok(true);
    };

    Ok(latest_modification(dir)? > last_reload)
}
