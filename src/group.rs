//! Grouping of parsed test files by the group token in their filename.
//!
//! `Bogus_Compile_KeyManagement.tsc` belongs to group `Compile` of component
//! `Bogus`. Buckets iterate in ascending key order and hold their records
//! sorted by full path; every later stage relies on this order and never
//! re-sorts.

use crate::diagnostics::{Diagnostic, Severity};
use crate::model::{FileRecord, ParsedHeader};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GroupTokenError {
    #[error("No valid group token in filename")]
    MissingPrefix,
    #[error("No valid group token in filename")]
    MissingSegment,
}

/// Derive the group token from a test file path.
pub fn group_token(component: &str, path: &Path) -> Result<String, GroupTokenError> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or(GroupTokenError::MissingPrefix)?;
    let rest = stem
        .strip_prefix(component)
        .and_then(|r| r.strip_prefix('_'))
        .ok_or(GroupTokenError::MissingPrefix)?;
    match rest.split_once('_') {
        Some((group, _)) if !group.is_empty() => Ok(group.to_string()),
        _ => Err(GroupTokenError::MissingSegment),
    }
}

/// Result of grouping: the buckets plus one error per excluded file.
#[derive(Debug, Default)]
pub struct Grouping {
    pub buckets: BTreeMap<String, Vec<FileRecord>>,
    pub errors: Vec<Diagnostic>,
}

/// Bucket parsed files by group token.
pub fn group(component: &str, files: Vec<(PathBuf, ParsedHeader)>) -> Grouping {
    let mut grouping = Grouping::default();

    for (path, header) in files {
        match group_token(component, &path) {
            Ok(token) => grouping
                .buckets
                .entry(token)
                .or_default()
                .push(FileRecord { path, header }),
            Err(e) => grouping.errors.push(Diagnostic {
                path,
                line: 1,
                severity: Severity::Error,
                message: e.to_string(),
            }),
        }
    }

    for records in grouping.buckets.values_mut() {
        records.sort_by(|a, b| a.path.to_string_lossy().cmp(&b.path.to_string_lossy()));
    }

    grouping
}

/// Deduplicated, sorted union of the records' requirement tags.
pub fn aggregate_tags(records: &[FileRecord]) -> BTreeSet<String> {
    records
        .iter()
        .flat_map(|r| r.header.requirement_tags.iter().cloned())
        .collect()
}

/// Map a group token to its display name. Mapping keys are lowercase.
pub fn display_name(group: &str, mappings: &HashMap<String, String>) -> String {
    mappings
        .get(&group.to_lowercase())
        .cloned()
        .unwrap_or_else(|| group.to_string())
}
