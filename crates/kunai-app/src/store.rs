//! Directory-backed calendar collection.

use std::path::Path;

use chrono::{DateTime, Utc};
use kunai_core::config::StoreConfig;
use kunai_core::error::CoreError;
use kunai_rfc::rfc::dav::core::CalendarObject;

use crate::error::{AppError, AppResult};

/// ## Summary
/// Loads every calendar object resource in `dir`, sorted by file name.
///
/// Files without the configured extension and subdirectories are ignored.
/// Files that are not valid UTF-8 iCalendar are kept without data.
///
/// ## Errors
/// Returns an error if `dir` is not a directory or a file cannot be read.
#[tracing::instrument(skip(store))]
pub fn load_objects(dir: &Path, store: &StoreConfig) -> AppResult<Vec<CalendarObject>> {
    if !dir.is_dir() {
        return Err(CoreError::InvalidInput(format!("{} is not a directory", dir.display())).into());
    }

    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| AppError::io(dir, e))? {
        let path = entry.map_err(|e| AppError::io(dir, e))?.path();
        let accepted = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| store.accepts(name));
        if accepted && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut objects = Vec::with_capacity(paths.len());
    for path in paths {
        objects.push(load_object(dir, &path)?);
    }

    tracing::debug!(count = objects.len(), "Loaded calendar objects");
    Ok(objects)
}

fn load_object(dir: &Path, path: &Path) -> AppResult<CalendarObject> {
    let bytes = std::fs::read(path).map_err(|e| AppError::io(path, e))?;
    let modified = std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .map_err(|e| AppError::io(path, e))?;

    let name = path.strip_prefix(dir).unwrap_or(path).to_string_lossy();
    Ok(CalendarObject::from_bytes(name, &bytes).with_mod_time(DateTime::<Utc>::from(modified)))
}
