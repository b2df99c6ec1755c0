//! Output assembly.
//!
//! The per-project records the CLI prints: project name, root path, and the
//! per-chunk translation lists, with optional domain filtering as the
//! original `make-pot` flags allowed.

use serde::Serialize;

use crate::core::ChunkTranslation;

/// One project's extraction result in the output document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectTranslations {
    pub project: String,
    pub path: String,
    pub files: Vec<ChunkTranslation>,
}

/// Apply `--domains` / `--ignore-domains` filtering to every chunk. A chunk
/// left without entries is dropped; project records always remain.
pub fn filter_domains(
    results: &mut [ProjectTranslations],
    domains: &[String],
    ignore_domains: &[String],
) {
    if domains.is_empty() && ignore_domains.is_empty() {
        return;
    }

    for project in results.iter_mut() {
        for chunk in project.files.iter_mut() {
            chunk.translation_entries.retain(|entry| {
                let domain = entry.domain();
                let included = domains.is_empty() || domains.iter().any(|d| d == domain);
                let ignored = ignore_domains.iter().any(|d| d == domain);
                included && !ignored
            });
        }
        project.files.retain(|chunk| !chunk.translation_entries.is_empty());
    }
}
