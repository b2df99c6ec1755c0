//! Core extraction pipeline.
//!
//! Discovery resolves projects and their build configuration; generation
//! runs grouping, dependency collection, extraction, and the manifest join
//! per project. Everything semantic sits behind the [`SourceModel`]
//! capability so the algorithms stay independent of the swc backend.
//!
//! [`SourceModel`]: source_model::SourceModel

pub mod collect;
pub mod discovery;
pub mod extract;
pub mod generate;
pub mod group;
pub mod manifest;
pub mod parse;
pub mod resolver;
pub mod source_model;
pub mod tsconfig;
pub mod vite;

pub use collect::DependencyCollector;
pub use discovery::{ProjectContext, ProjectDiscovery};
pub use extract::{Extractor, TranslationEntry};
pub use generate::{ChunkTranslation, Generator};
pub use manifest::{Manifest, ManifestChunk};
pub use source_model::{SourceModel, SwcSourceModel};
pub use vite::ViteBuildSettings;
