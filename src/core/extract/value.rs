//! Best-effort constant resolution for call arguments.
//!
//! Resolves an argument expression to a literal string or number by
//! following declarations: a local variable's initializer, or a named import
//! chased into the defining module's exported variable. Anything else is
//! unresolved; concatenation, ternaries, and calls are deliberately never
//! folded.

use std::collections::HashSet;
use std::path::PathBuf;

use swc_ecma_ast::{
    Decl, ExportSpecifier, Expr, ImportDecl, ImportSpecifier, Lit, Module, ModuleDecl,
    ModuleExportName, ModuleItem, Pat, VarDecl,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::parse::{ParsedModule, unwrap_ts_expr};
use crate::core::source_model::SourceModel;

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    Str(String),
    Num(f64),
}

/// Pairs of (module path, binding key) already visited during one resolution,
/// guarding against circular re-export chains.
type Visited = HashSet<(PathBuf, String)>;

pub struct ValueResolver<'a> {
    model: &'a dyn SourceModel,
}

impl<'a> ValueResolver<'a> {
    pub fn new(model: &'a dyn SourceModel) -> Self {
        Self { model }
    }

    pub fn resolve(&self, expr: &Expr, module: &ParsedModule) -> Option<ResolvedValue> {
        let mut visited = Visited::new();
        self.resolve_expr(expr, module, &mut visited)
    }

    fn resolve_expr(
        &self,
        expr: &Expr,
        module: &ParsedModule,
        visited: &mut Visited,
    ) -> Option<ResolvedValue> {
        match unwrap_ts_expr(expr) {
            Expr::Lit(Lit::Str(s)) => s
                .value
                .as_str()
                .map(|v| ResolvedValue::Str(v.to_string())),
            Expr::Lit(Lit::Num(n)) => Some(ResolvedValue::Num(n.value)),
            Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
                .quasis
                .first()
                .and_then(|q| q.cooked.as_ref())
                .and_then(|c| c.as_str().map(|v| ResolvedValue::Str(v.to_string()))),
            Expr::Ident(ident) => self.resolve_ident(ident.sym.as_str(), module, visited),
            _ => None,
        }
    }

    fn resolve_ident(
        &self,
        name: &str,
        module: &ParsedModule,
        visited: &mut Visited,
    ) -> Option<ResolvedValue> {
        if !visited.insert((module.path.clone(), format!("local:{name}"))) {
            return None;
        }

        let bindings = ModuleBindings::collect(&module.module);

        if let Some(init) = bindings.variable(name) {
            return self.resolve_expr(init, module, visited);
        }

        if let Some(import) = bindings.import(name) {
            let target_path = self.model.resolve_import(&import.source, &module.path)?;
            let target = self.model.parse(&target_path)?;
            return self.resolve_exported(&import.imported, &target, visited);
        }

        None
    }

    /// Find an exported variable named `name` in `module` and resolve its
    /// initializer, following re-export chains.
    fn resolve_exported(
        &self,
        name: &str,
        module: &ParsedModule,
        visited: &mut Visited,
    ) -> Option<ResolvedValue> {
        if !visited.insert((module.path.clone(), format!("export:{name}"))) {
            return None;
        }

        for item in &module.module.body {
            match item {
                // export const NAME = init
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                    if let Decl::Var(var) = &export.decl
                        && let Some(init) = declarator_init(var, name)
                    {
                        return self.resolve_expr(init, module, visited);
                    }
                }
                // export { orig as NAME } / export { orig as NAME } from './m'
                ModuleItem::ModuleDecl(ModuleDecl::ExportNamed(named)) => {
                    for specifier in &named.specifiers {
                        let ExportSpecifier::Named(named_spec) = specifier else {
                            continue;
                        };
                        let exported = named_spec.exported.as_ref().unwrap_or(&named_spec.orig);
                        if export_name(exported).as_deref() != Some(name) {
                            continue;
                        }
                        let orig = export_name(&named_spec.orig)?;
                        return match &named.src {
                            Some(src) => {
                                let specifier = src.value.as_str()?;
                                let target_path =
                                    self.model.resolve_import(specifier, &module.path)?;
                                let target = self.model.parse(&target_path)?;
                                self.resolve_exported(&orig, &target, visited)
                            }
                            None => self.resolve_ident(&orig, module, visited),
                        };
                    }
                }
                // export * from './m'
                ModuleItem::ModuleDecl(ModuleDecl::ExportAll(all)) => {
                    if let Some(specifier) = all.src.value.as_str()
                        && let Some(target_path) =
                            self.model.resolve_import(specifier, &module.path)
                        && let Some(target) = self.model.parse(&target_path)
                        && let Some(value) = self.resolve_exported(name, &target, visited)
                    {
                        return Some(value);
                    }
                }
                _ => {}
            }
        }

        None
    }
}

fn declarator_init<'m>(var: &'m VarDecl, name: &str) -> Option<&'m Expr> {
    var.decls.iter().find_map(|decl| match &decl.name {
        Pat::Ident(ident) if ident.id.sym.as_str() == name => decl.init.as_deref(),
        _ => None,
    })
}

fn export_name(name: &ModuleExportName) -> Option<String> {
    match name {
        ModuleExportName::Ident(ident) => Some(ident.sym.to_string()),
        ModuleExportName::Str(s) => s.value.as_str().map(str::to_string),
    }
}

/// A named import binding: `import { imported as local } from source`.
struct ImportBinding {
    local: String,
    imported: String,
    source: String,
}

/// Variable and import bindings of one module, keyed by local name.
///
/// Declarations are collected from every scope; the first declaration of a
/// name wins, which favors module-level constants over shadowing inner
/// bindings.
struct ModuleBindings {
    vars: Vec<(String, Expr)>,
    imports: Vec<ImportBinding>,
}

impl ModuleBindings {
    fn collect(module: &Module) -> Self {
        let mut collector = BindingCollector {
            bindings: ModuleBindings {
                vars: Vec::new(),
                imports: Vec::new(),
            },
        };
        module.visit_with(&mut collector);
        collector.bindings
    }

    fn variable(&self, name: &str) -> Option<&Expr> {
        self.vars
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, init)| init)
    }

    fn import(&self, name: &str) -> Option<&ImportBinding> {
        self.imports.iter().find(|i| i.local == name)
    }
}

struct BindingCollector {
    bindings: ModuleBindings,
}

impl Visit for BindingCollector {
    fn visit_var_decl(&mut self, node: &VarDecl) {
        for decl in &node.decls {
            if let Pat::Ident(ident) = &decl.name
                && let Some(init) = &decl.init
            {
                let name = ident.id.sym.to_string();
                if self.bindings.variable(&name).is_none() {
                    self.bindings.vars.push((name, (**init).clone()));
                }
            }
        }
        node.visit_children_with(self);
    }

    fn visit_import_decl(&mut self, node: &ImportDecl) {
        if let Some(source) = node.src.value.as_str() {
            for specifier in &node.specifiers {
                // Only named imports can point at an exported variable
                if let ImportSpecifier::Named(named) = specifier {
                    let local = named.local.sym.to_string();
                    let imported = named
                        .imported
                        .as_ref()
                        .and_then(export_name)
                        .unwrap_or_else(|| local.clone());

                    self.bindings.imports.push(ImportBinding {
                        local,
                        imported,
                        source: source.to_string(),
                    });
                }
            }
        }
    }
}
