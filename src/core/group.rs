//! Entry-point grouping by effective compiler config.
//!
//! A root tsconfig that owns files applies to every entry point directly.
//! A "solution"-style root that owns nothing delegates to its project
//! references: the first reference whose owned-file set contains the entry
//! wins, with the root as fallback. Entries under the same config are
//! grouped so one semantic-analysis context can be reused across them.

use std::path::{Path, PathBuf};

use crate::core::source_model::SourceModel;
use crate::core::tsconfig;

/// Partition `entry_points` by the config that actually applies to each.
/// Group order follows first occurrence, keeping downstream processing
/// deterministic.
pub fn group_by_config(
    model: &dyn SourceModel,
    root_config: &Path,
    entry_points: &[PathBuf],
) -> Vec<(PathBuf, Vec<PathBuf>)> {
    // An unparseable root config falls back to itself, same as one that
    // directly owns files.
    let root_applies = match tsconfig::owned_files(root_config) {
        Err(_) => true,
        Ok(owned) => !owned.is_empty(),
    };

    let references = if root_applies {
        Vec::new()
    } else {
        tsconfig::project_references(root_config).unwrap_or_default()
    };

    let mut groups: Vec<(PathBuf, Vec<PathBuf>)> = Vec::new();

    for entry in entry_points {
        let config = if root_applies {
            root_config.to_path_buf()
        } else {
            references
                .iter()
                .find(|reference| model.owned_files(reference).contains(entry))
                .cloned()
                .unwrap_or_else(|| root_config.to_path_buf())
        };

        match groups.iter_mut().find(|(path, _)| path == &config) {
            Some((_, entries)) => entries.push(entry.clone()),
            None => groups.push((config, vec![entry.clone()])),
        }
    }

    groups
}
