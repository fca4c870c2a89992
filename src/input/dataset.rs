use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::foundation::error::{VelomapError, VelomapResult};

/// Field count required of velocity datasets (horizontal and vertical).
pub const VELOCITY_FIELDS: usize = 10;

/// Field count required of strain-rate datasets.
pub const STRAIN_FIELDS: usize = 7;

/// A validated tabular input file.
///
/// Produced only by [`validate`]; never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetFile {
    /// Path the file was validated at.
    pub path: PathBuf,
    /// Field count shared by every data row.
    pub fields: usize,
    /// Number of data rows (blank and `#` comment lines excluded).
    pub rows: usize,
}

/// Validate one tabular input against the expected per-row field count.
///
/// Checks run in order: the path must be a readable regular file, every data
/// row must share one common whitespace-delimited field count, and that count
/// must equal `expected_fields`. Blank lines and GMT-style `#` comment lines
/// are ignored. An empty table reports a found count of zero.
#[tracing::instrument(level = "debug")]
pub fn validate(path: &Path, expected_fields: usize) -> VelomapResult<DatasetFile> {
    if !path.is_file() {
        return Err(VelomapError::MissingFile(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)
        .map_err(|_| VelomapError::MissingFile(path.to_path_buf()))?;

    let mut counts: BTreeSet<usize> = BTreeSet::new();
    let mut rows = 0usize;
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        counts.insert(line.split_whitespace().count());
        rows += 1;
    }

    if counts.len() > 1 {
        return Err(VelomapError::InconsistentFields {
            path: path.to_path_buf(),
            counts: counts.into_iter().collect(),
        });
    }
    let found = counts.into_iter().next().unwrap_or(0);
    if found != expected_fields {
        return Err(VelomapError::WrongFieldCount {
            path: path.to_path_buf(),
            expected: expected_fields,
            found,
        });
    }

    Ok(DatasetFile {
        path: path.to_path_buf(),
        fields: found,
        rows,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/input/dataset.rs"]
mod tests;
