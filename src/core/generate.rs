//! Per-project translation generation.
//!
//! For each discovered project: group entry points by effective tsconfig,
//! walk each entry's dependency graph, extract translation call-sites from
//! every collected file, and join the result to the output chunk the build
//! manifest records for that entry.

use std::path::Path;

use serde::Serialize;

use crate::core::collect::DependencyCollector;
use crate::core::discovery::ProjectContext;
use crate::core::extract::{Extractor, TranslationEntry};
use crate::core::group::group_by_config;
use crate::core::resolver::ModuleResolver;
use crate::core::source_model::{SourceModel, SwcSourceModel};
use crate::utils::{forward_slashes, normalize_path, relative_path};

/// Extracted translations for one output chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkTranslation {
    pub chunk_path: String,
    pub translation_entries: Vec<TranslationEntry>,
}

pub struct Generator;

impl Generator {
    pub fn new() -> Self {
        Self
    }

    /// Generate chunk translations for every qualifying entry point. An
    /// entry with no reachable files, no extracted translations, or no
    /// manifest match contributes nothing.
    pub fn generate(&self, context: &ProjectContext) -> Vec<ChunkTranslation> {
        let grouping_model = self.source_model(context, &context.ts_config_path);
        let groups = group_by_config(&grouping_model, &context.ts_config_path, &context.entry_points);

        let mut results = Vec::new();

        for (config_path, entry_points) in groups {
            // One semantic-analysis context per config group; its parse
            // cache is shared by every entry in the group.
            let model = self.source_model(context, &config_path);
            let collector = DependencyCollector::new(&model);
            let extractor = Extractor::new(&model);

            for entry_point in entry_points {
                let files = collector.collect(&entry_point);
                if files.is_empty() {
                    continue;
                }

                let mut translation_entries = Vec::new();
                for file in &files {
                    if let Some(module) = model.parse(file) {
                        translation_entries.extend(extractor.extract(&module));
                    }
                }
                if translation_entries.is_empty() {
                    continue;
                }

                let Some(chunk_path) = self.chunk_path(context, &entry_point) else {
                    continue;
                };

                results.push(ChunkTranslation {
                    chunk_path,
                    translation_entries,
                });
            }
        }

        results
    }

    fn source_model(&self, context: &ProjectContext, config_path: &Path) -> SwcSourceModel {
        SwcSourceModel::new(ModuleResolver::new(
            &context.root_path,
            &context.build_settings,
            Some(config_path),
        ))
    }

    /// Join an entry point to its manifest chunk: the lookup key is the
    /// entry's root-relative path, and the chunk path is the root-relative
    /// output directory joined with the recorded file.
    fn chunk_path(&self, context: &ProjectContext, entry_point: &Path) -> Option<String> {
        let manifest_key = forward_slashes(&relative_path(&context.root_path, entry_point));
        let chunk = context.manifest.get(&manifest_key)?;

        let absolute_out_dir =
            normalize_path(&context.root_path.join(&context.build_settings.out_dir));
        let relative_out_dir = relative_path(&context.root_path, &absolute_out_dir);

        Some(forward_slashes(&relative_out_dir.join(&chunk.file)))
    }
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}
