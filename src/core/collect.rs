//! Transitive dependency collection.
//!
//! Depth-first traversal from an entry file over statically imported files.
//! Files reached through a package boundary (`node_modules`) and pure
//! type-declaration files are excluded from the returned set but their own
//! import edges are still followed, since they can re-export constants the
//! extractor needs to chase.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use swc_ecma_ast::{Module, ModuleDecl, ModuleItem};

use crate::core::parse::ParsedModule;
use crate::core::source_model::SourceModel;
use crate::utils::{is_declaration_file, is_in_node_modules};

pub struct DependencyCollector<'a> {
    model: &'a dyn SourceModel,
}

impl<'a> DependencyCollector<'a> {
    pub fn new(model: &'a dyn SourceModel) -> Self {
        Self { model }
    }

    /// Ordered, deduplicated set of project-owned files reachable from
    /// `entry`. An entry file that cannot be loaded yields an empty list;
    /// the caller treats that as nothing to extract.
    pub fn collect(&self, entry: &Path) -> Vec<PathBuf> {
        let Some(entry_module) = self.model.parse(entry) else {
            return Vec::new();
        };

        let mut visited = HashSet::new();
        let mut result = Vec::new();
        self.traverse(&entry_module, &mut visited, &mut result);
        result
    }

    fn traverse(
        &self,
        module: &ParsedModule,
        visited: &mut HashSet<PathBuf>,
        result: &mut Vec<PathBuf>,
    ) {
        if !visited.insert(module.path.clone()) {
            return;
        }

        if !is_in_node_modules(&module.path) && !is_declaration_file(&module.path) {
            result.push(module.path.clone());
        }

        for specifier in static_import_specifiers(&module.module) {
            if let Some(target) = self.model.resolve_import(&specifier, &module.path)
                && let Some(target_module) = self.model.parse(&target)
            {
                self.traverse(&target_module, visited, result);
            }
        }
    }
}

/// Module specifiers of every static import edge: import declarations,
/// `export ... from`, and `export * from`. Dynamic `import()` is not a
/// static edge.
fn static_import_specifiers(module: &Module) -> Vec<String> {
    let mut specifiers = Vec::new();

    for item in &module.body {
        let src = match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => Some(&import.src),
            ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named)) => named.src.as_ref(),
            ModuleItem::ModuleDecl(ModuleDecl::ExportAll(all)) => Some(&all.src),
            _ => None,
        };
        if let Some(src) = src
            && let Some(specifier) = src.value.as_str()
        {
            specifiers.push(specifier.to_string());
        }
    }

    specifiers
}
