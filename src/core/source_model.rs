//! The semantic-analysis capability behind extraction.
//!
//! Everything the pipeline needs from a compiler front end sits behind
//! [`SourceModel`]: parsing files, resolving import specifiers, and computing
//! a config's owned-file set. The production implementation is swc-backed;
//! the trait keeps the core algorithms independent of any specific engine.

use std::{
    cell::RefCell,
    collections::{BTreeSet, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use swc_common::{FilePathMapping, SourceMap};

use crate::core::parse::{ParsedModule, parse_module_source};
use crate::core::resolver::ModuleResolver;
use crate::core::tsconfig;

pub trait SourceModel {
    /// Parse a file to its syntax tree. `None` when the file is missing or
    /// unparseable.
    fn parse(&self, path: &Path) -> Option<Arc<ParsedModule>>;

    /// Resolve an import specifier as written in `from_file`.
    fn resolve_import(&self, specifier: &str, from_file: &Path) -> Option<PathBuf>;

    /// The set of files a compiler config directly owns. Empty for an
    /// unreadable config.
    fn owned_files(&self, config_path: &Path) -> Arc<BTreeSet<PathBuf>>;
}

/// swc-backed [`SourceModel`] with per-instance caches.
///
/// One instance per config group amortizes parsing across the group's entry
/// points; nothing is shared between groups or projects.
pub struct SwcSourceModel {
    resolver: ModuleResolver,
    modules: RefCell<HashMap<PathBuf, Option<Arc<ParsedModule>>>>,
    owned: RefCell<HashMap<PathBuf, Arc<BTreeSet<PathBuf>>>>,
}

impl SwcSourceModel {
    pub fn new(resolver: ModuleResolver) -> Self {
        Self {
            resolver,
            modules: RefCell::new(HashMap::new()),
            owned: RefCell::new(HashMap::new()),
        }
    }
}

impl SourceModel for SwcSourceModel {
    fn parse(&self, path: &Path) -> Option<Arc<ParsedModule>> {
        let canonical = path.canonicalize().ok()?;

        if let Some(cached) = self.modules.borrow().get(&canonical) {
            return cached.clone();
        }

        let parsed = fs::read_to_string(&canonical).ok().and_then(|code| {
            let source_map = Arc::new(SourceMap::new(FilePathMapping::empty()));
            parse_module_source(code, &canonical, source_map)
                .ok()
                .map(Arc::new)
        });

        self.modules
            .borrow_mut()
            .insert(canonical, parsed.clone());
        parsed
    }

    fn resolve_import(&self, specifier: &str, from_file: &Path) -> Option<PathBuf> {
        let from_dir = from_file.parent()?;
        self.resolver.resolve(specifier, from_dir)
    }

    fn owned_files(&self, config_path: &Path) -> Arc<BTreeSet<PathBuf>> {
        if let Some(cached) = self.owned.borrow().get(config_path) {
            return cached.clone();
        }

        let owned = Arc::new(tsconfig::owned_files(config_path).unwrap_or_default());
        self.owned
            .borrow_mut()
            .insert(config_path.to_path_buf(), owned.clone());
        owned
    }
}
