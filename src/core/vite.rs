//! Static resolution of vite build settings.
//!
//! The build tool evaluates `vite.config.*` as a module; here the config is
//! parsed and the default-exported object is constant-folded instead. Only
//! the settings the extraction pipeline needs are read: output directory,
//! manifest filename, resolve aliases/extensions/conditions, and the declared
//! rollup inputs. Anything that cannot be folded to a string is dropped
//! silently, mirroring the best-effort policy of call-site extraction.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use swc_common::{FilePathMapping, SourceMap};
use swc_ecma_ast::{
    BlockStmt, BlockStmtOrExpr, CallExpr, Callee, Decl, Expr, Lit, MemberProp, Module, ModuleDecl,
    ModuleItem, ObjectLit, Pat, Prop, PropName, PropOrSpread, Stmt,
};

use crate::core::parse::{parse_module_source, unwrap_ts_expr};
use crate::utils::normalize_path;

/// Conventional config filenames searched in a project root, in priority
/// order, when no custom path is configured.
pub const VITE_CONFIG_CANDIDATES: &[&str] = &[
    "vite.config.ts",
    "vite.config.js",
    "vite.config.mts",
    "vite.config.mjs",
];

pub const DEFAULT_OUT_DIR: &str = "dist";
pub const DEFAULT_MANIFEST_FILE: &str = ".vite/manifest.json";

/// Vite's default resolver extensions.
pub const DEFAULT_EXTENSIONS: &[&str] =
    &[".mjs", ".js", ".mts", ".ts", ".jsx", ".tsx", ".json"];

#[derive(Debug, Clone, PartialEq)]
pub struct AliasEntry {
    pub find: String,
    pub replacement: String,
}

/// Effective build settings for a project, as a "build"-mode config
/// resolution would produce them.
#[derive(Debug, Clone)]
pub struct ViteBuildSettings {
    /// Output directory as written in the config; may be relative to the
    /// project root and may point outside it.
    pub out_dir: String,
    /// Manifest filename relative to the output directory.
    pub manifest_file: String,
    pub aliases: Vec<AliasEntry>,
    pub extensions: Vec<String>,
    pub conditions: Vec<String>,
    /// Declared rollup inputs, normalized to a flat list but not yet
    /// resolved to files.
    pub raw_inputs: Vec<String>,
}

impl Default for ViteBuildSettings {
    fn default() -> Self {
        Self {
            out_dir: DEFAULT_OUT_DIR.to_string(),
            manifest_file: DEFAULT_MANIFEST_FILE.to_string(),
            aliases: Vec::new(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            conditions: Vec::new(),
            raw_inputs: Vec::new(),
        }
    }
}

/// Locate the vite config for a project root: an explicit custom path wins,
/// otherwise the conventional filenames are probed in order.
pub fn find_vite_config(root: &Path, custom_path: Option<&str>) -> Option<PathBuf> {
    if let Some(custom) = custom_path {
        let path = normalize_path(&root.join(custom));
        return path.is_file().then_some(path);
    }

    VITE_CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
}

/// Parse the config file and statically fold the settings out of its
/// default export. An unreadable or unparseable config is an error (the
/// caller skips the project); a config whose shape cannot be understood
/// falls back to defaults.
pub fn resolve_build_settings(config_path: &Path) -> Result<ViteBuildSettings> {
    let code = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read vite config: {}", config_path.display()))?;
    let source_map = Arc::new(SourceMap::new(FilePathMapping::empty()));
    let parsed = parse_module_source(code, config_path, source_map)?;

    let ctx = ConfigContext {
        dir: config_path.parent().map(Path::to_path_buf).unwrap_or_default(),
        consts: top_level_consts(&parsed.module),
    };

    let mut settings = ViteBuildSettings::default();
    let Some(config) = default_export(&parsed.module).and_then(|e| config_object(e, &ctx))
    else {
        return Ok(settings);
    };

    if let Some(build) = object_prop(config, "build").and_then(as_object) {
        if let Some(out_dir) = object_prop(build, "outDir").and_then(|e| ctx.fold_string(e)) {
            settings.out_dir = out_dir;
        }
        if let Some(manifest) = object_prop(build, "manifest")
            && let Expr::Lit(Lit::Str(s)) = unwrap_ts_expr(manifest)
            && let Some(name) = s.value.as_str()
        {
            settings.manifest_file = name.to_string();
        }
        if let Some(input) = object_prop(build, "rollupOptions")
            .and_then(as_object)
            .and_then(|o| object_prop(o, "input"))
        {
            settings.raw_inputs = ctx.fold_inputs(input);
        }
    }

    if let Some(resolve) = object_prop(config, "resolve").and_then(as_object) {
        if let Some(alias) = object_prop(resolve, "alias") {
            settings.aliases = ctx.fold_aliases(alias);
        }
        if let Some(extensions) =
            object_prop(resolve, "extensions").and_then(|e| ctx.fold_string_array(e))
        {
            settings.extensions = extensions;
        }
        if let Some(conditions) =
            object_prop(resolve, "conditions").and_then(|e| ctx.fold_string_array(e))
        {
            settings.conditions = conditions;
        }
    }

    Ok(settings)
}

struct ConfigContext<'a> {
    dir: PathBuf,
    consts: HashMap<String, &'a Expr>,
}

const MAX_FOLD_DEPTH: usize = 16;

impl ConfigContext<'_> {
    fn fold_string(&self, expr: &Expr) -> Option<String> {
        self.fold_string_at(expr, 0)
    }

    fn fold_string_at(&self, expr: &Expr, depth: usize) -> Option<String> {
        if depth > MAX_FOLD_DEPTH {
            return None;
        }
        match unwrap_ts_expr(expr) {
            Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
            Expr::Tpl(tpl) if tpl.exprs.is_empty() => tpl
                .quasis
                .first()
                .and_then(|q| q.cooked.as_ref())
                .and_then(|c| c.as_str().map(str::to_string)),
            Expr::Ident(ident) if ident.sym.as_str() == "__dirname" => {
                Some(self.dir.to_string_lossy().to_string())
            }
            Expr::Ident(ident) => self
                .consts
                .get(ident.sym.as_str())
                .copied()
                .and_then(|init| self.fold_string_at(init, depth + 1)),
            Expr::Call(call) => self.fold_path_call(call, depth),
            _ => None,
        }
    }

    /// Fold `join(...)` / `resolve(...)` / `path.join(...)` / `path.resolve(...)`
    /// over foldable arguments.
    fn fold_path_call(&self, call: &CallExpr, depth: usize) -> Option<String> {
        let name = path_helper_name(call)?;

        let mut parts = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            if arg.spread.is_some() {
                return None;
            }
            parts.push(self.fold_string_at(&arg.expr, depth + 1)?);
        }
        let first = parts.first()?;

        let mut joined = PathBuf::from(first);
        for part in &parts[1..] {
            joined.push(part);
        }
        if name == "resolve" && joined.is_relative() {
            joined = self.dir.join(joined);
        }

        Some(normalize_path(&joined).to_string_lossy().to_string())
    }

    fn fold_inputs(&self, expr: &Expr) -> Vec<String> {
        match unwrap_ts_expr(expr) {
            Expr::Array(arr) => arr
                .elems
                .iter()
                .flatten()
                .filter(|e| e.spread.is_none())
                .filter_map(|e| self.fold_string(&e.expr))
                .collect(),
            Expr::Object(obj) => obj
                .props
                .iter()
                .filter_map(|prop| match prop {
                    PropOrSpread::Prop(prop) => match &**prop {
                        Prop::KeyValue(kv) => self.fold_string(&kv.value),
                        _ => None,
                    },
                    PropOrSpread::Spread(_) => None,
                })
                .collect(),
            other => self.fold_string(other).into_iter().collect(),
        }
    }

    fn fold_aliases(&self, expr: &Expr) -> Vec<AliasEntry> {
        match unwrap_ts_expr(expr) {
            Expr::Array(arr) => arr
                .elems
                .iter()
                .flatten()
                .filter(|e| e.spread.is_none())
                .filter_map(|e| {
                    let obj = as_object(unwrap_ts_expr(&e.expr))?;
                    let find = object_prop(obj, "find").and_then(|e| self.fold_string(e))?;
                    let replacement =
                        object_prop(obj, "replacement").and_then(|e| self.fold_string(e))?;
                    Some(AliasEntry { find, replacement })
                })
                .collect(),
            Expr::Object(obj) => obj
                .props
                .iter()
                .filter_map(|prop| match prop {
                    PropOrSpread::Prop(prop) => match &**prop {
                        Prop::KeyValue(kv) => Some(AliasEntry {
                            find: prop_name(&kv.key)?,
                            replacement: self.fold_string(&kv.value)?,
                        }),
                        _ => None,
                    },
                    PropOrSpread::Spread(_) => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    fn fold_string_array(&self, expr: &Expr) -> Option<Vec<String>> {
        match unwrap_ts_expr(expr) {
            Expr::Array(arr) => Some(
                arr.elems
                    .iter()
                    .flatten()
                    .filter(|e| e.spread.is_none())
                    .filter_map(|e| self.fold_string(&e.expr))
                    .collect(),
            ),
            _ => None,
        }
    }
}

fn path_helper_name(call: &CallExpr) -> Option<&'static str> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };

    let name = match unwrap_ts_expr(callee) {
        Expr::Ident(ident) => ident.sym.as_str().to_string(),
        Expr::Member(member) => match &member.prop {
            MemberProp::Ident(prop) => prop.sym.as_str().to_string(),
            _ => return None,
        },
        _ => return None,
    };

    match name.as_str() {
        "join" => Some("join"),
        "resolve" => Some("resolve"),
        _ => None,
    }
}

fn default_export(module: &Module) -> Option<&Expr> {
    module.body.iter().find_map(|item| match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(e)) => Some(&*e.expr),
        _ => None,
    })
}

/// Unwrap the default export down to the config object literal: through
/// `defineConfig(...)` calls, factory arrows/functions, and local consts.
fn config_object<'a>(expr: &'a Expr, ctx: &ConfigContext<'a>) -> Option<&'a ObjectLit> {
    match unwrap_ts_expr(expr) {
        Expr::Object(obj) => Some(obj),
        Expr::Call(call) => call
            .args
            .first()
            .filter(|arg| arg.spread.is_none())
            .and_then(|arg| config_object(&arg.expr, ctx)),
        Expr::Arrow(arrow) => match &*arrow.body {
            BlockStmtOrExpr::Expr(e) => config_object(e, ctx),
            BlockStmtOrExpr::BlockStmt(block) => returned_object(block, ctx),
        },
        Expr::Fn(f) => f
            .function
            .body
            .as_ref()
            .and_then(|block| returned_object(block, ctx)),
        Expr::Ident(ident) => ctx
            .consts
            .get(ident.sym.as_str())
            .copied()
            .and_then(|e| config_object(e, ctx)),
        _ => None,
    }
}

fn returned_object<'a>(block: &'a BlockStmt, ctx: &ConfigContext<'a>) -> Option<&'a ObjectLit> {
    block.stmts.iter().find_map(|stmt| match stmt {
        Stmt::Return(ret) => ret.arg.as_deref().and_then(|e| config_object(e, ctx)),
        _ => None,
    })
}

fn top_level_consts(module: &Module) -> HashMap<String, &Expr> {
    let mut consts = HashMap::new();
    for item in &module.body {
        let var = match item {
            ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) => var,
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                Decl::Var(var) => var,
                _ => continue,
            },
            _ => continue,
        };
        for decl in &var.decls {
            if let Pat::Ident(ident) = &decl.name
                && let Some(init) = &decl.init
            {
                consts.insert(ident.id.sym.to_string(), &**init);
            }
        }
    }
    consts
}

fn object_prop<'a>(obj: &'a ObjectLit, name: &str) -> Option<&'a Expr> {
    obj.props.iter().find_map(|prop| match prop {
        PropOrSpread::Prop(prop) => match &**prop {
            Prop::KeyValue(kv) if prop_name(&kv.key).as_deref() == Some(name) => Some(&*kv.value),
            _ => None,
        },
        PropOrSpread::Spread(_) => None,
    })
}

fn as_object(expr: &Expr) -> Option<&ObjectLit> {
    match unwrap_ts_expr(expr) {
        Expr::Object(obj) => Some(obj),
        _ => None,
    }
}

fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        _ => None,
    }
}
