use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, anyhow};
use swc_common::{FileName, GLOBALS, Globals, SourceMap};
use swc_ecma_ast::Module;
use swc_ecma_parser::{Parser, StringInput, Syntax, TsSyntax};

/// A parsed source file together with the path it was loaded from.
pub struct ParsedModule {
    pub path: PathBuf,
    pub module: Module,
    pub source_map: Arc<SourceMap>,
}

/// Parse TypeScript/JavaScript source into an AST.
///
/// JSX is enabled based on the file extension so that `<T>expr` type
/// assertions in plain `.ts` files still parse.
pub fn parse_module_source(
    code: String,
    file_path: &Path,
    source_map: Arc<SourceMap>,
) -> Result<ParsedModule> {
    // Wrap in GLOBALS.set() for thread safety
    GLOBALS.set(&Globals::new(), || {
        let source_file =
            source_map.new_source_file(FileName::Real(file_path.to_path_buf()).into(), code);

        let syntax = Syntax::Typescript(TsSyntax {
            tsx: uses_jsx(file_path),
            ..Default::default()
        });

        let mut parser = Parser::new(syntax, StringInput::from(&*source_file), None);

        let module = parser
            .parse_module()
            .map_err(|e| anyhow!("Failed to parse {}: {:?}", file_path.display(), e))?;

        Ok(ParsedModule {
            path: file_path.to_path_buf(),
            module,
            source_map,
        })
    })
}

fn uses_jsx(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsx" | "jsx")
    )
}

/// Unwrap TypeScript-specific expression wrappers to get the inner expression.
pub fn unwrap_ts_expr(expr: &swc_ecma_ast::Expr) -> &swc_ecma_ast::Expr {
    use swc_ecma_ast::Expr;

    match expr {
        Expr::TsAs(ts_as) => unwrap_ts_expr(&ts_as.expr),
        Expr::TsConstAssertion(ts_const) => unwrap_ts_expr(&ts_const.expr),
        Expr::TsSatisfies(ts_sat) => unwrap_ts_expr(&ts_sat.expr),
        Expr::Paren(paren) => unwrap_ts_expr(&paren.expr),
        _ => expr,
    }
}
