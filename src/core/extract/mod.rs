//! Translation call-site extraction.
//!
//! Walks a file's syntax tree for the four translation call shapes and
//! resolves every required argument to a literal through best-effort constant
//! folding. A call whose arguments do not fully resolve to well-typed
//! literals yields nothing; there are no partial entries and no diagnostics.

pub mod entry;
pub mod value;

pub use entry::TranslationEntry;
pub use value::{ResolvedValue, ValueResolver};

use swc_ecma_ast::{CallExpr, Callee, Expr};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::parse::ParsedModule;
use crate::core::source_model::SourceModel;

/// The closed set of recognized call shapes, keyed by callee name and arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CallShape {
    /// `__(text, domain)`
    Basic,
    /// `_x(text, context, domain)`
    Context,
    /// `_n(single, plural, number, domain)`
    Plural,
    /// `_nx(single, plural, number, context, domain)`
    ContextPlural,
}

impl CallShape {
    fn from_callee(name: &str) -> Option<Self> {
        match name {
            "__" => Some(CallShape::Basic),
            "_x" => Some(CallShape::Context),
            "_n" => Some(CallShape::Plural),
            "_nx" => Some(CallShape::ContextPlural),
            _ => None,
        }
    }

    fn arity(self) -> usize {
        match self {
            CallShape::Basic => 2,
            CallShape::Context => 3,
            CallShape::Plural => 4,
            CallShape::ContextPlural => 5,
        }
    }
}

pub struct Extractor<'a> {
    model: &'a dyn SourceModel,
}

impl<'a> Extractor<'a> {
    pub fn new(model: &'a dyn SourceModel) -> Self {
        Self { model }
    }

    /// Extract every resolvable translation call in the file, in source
    /// order. Pure: identical input yields identical output.
    pub fn extract(&self, module: &ParsedModule) -> Vec<TranslationEntry> {
        let mut visitor = TranslationCallVisitor {
            extractor: self,
            module,
            entries: Vec::new(),
        };
        module.module.visit_with(&mut visitor);
        visitor.entries
    }

    fn extract_call(
        &self,
        shape: CallShape,
        call: &CallExpr,
        module: &ParsedModule,
    ) -> Option<TranslationEntry> {
        // The dispatch key is (name, arity); a call with a different argument
        // count is not one of the recognized shapes.
        if call.args.len() != shape.arity() {
            return None;
        }

        match shape {
            CallShape::Basic => Some(TranslationEntry::Basic {
                text: self.string_arg(call, 0, module)?,
                domain: self.string_arg(call, 1, module)?,
            }),
            CallShape::Context => Some(TranslationEntry::Context {
                text: self.string_arg(call, 0, module)?,
                context: self.string_arg(call, 1, module)?,
                domain: self.string_arg(call, 2, module)?,
            }),
            CallShape::Plural => Some(TranslationEntry::Plural {
                single: self.string_arg(call, 0, module)?,
                plural: self.string_arg(call, 1, module)?,
                number: self.number_arg(call, 2, module)?,
                domain: self.string_arg(call, 3, module)?,
            }),
            CallShape::ContextPlural => Some(TranslationEntry::ContextPlural {
                single: self.string_arg(call, 0, module)?,
                plural: self.string_arg(call, 1, module)?,
                number: self.number_arg(call, 2, module)?,
                context: self.string_arg(call, 3, module)?,
                domain: self.string_arg(call, 4, module)?,
            }),
        }
    }

    fn string_arg(&self, call: &CallExpr, index: usize, module: &ParsedModule) -> Option<String> {
        match self.resolve_arg(call, index, module)? {
            ResolvedValue::Str(value) => Some(value),
            ResolvedValue::Num(_) => None,
        }
    }

    fn number_arg(&self, call: &CallExpr, index: usize, module: &ParsedModule) -> Option<f64> {
        match self.resolve_arg(call, index, module)? {
            ResolvedValue::Num(value) => Some(value),
            ResolvedValue::Str(_) => None,
        }
    }

    fn resolve_arg(
        &self,
        call: &CallExpr,
        index: usize,
        module: &ParsedModule,
    ) -> Option<ResolvedValue> {
        let arg = call.args.get(index)?;
        if arg.spread.is_some() {
            return None;
        }
        ValueResolver::new(self.model).resolve(&arg.expr, module)
    }
}

struct TranslationCallVisitor<'a> {
    extractor: &'a Extractor<'a>,
    module: &'a ParsedModule,
    entries: Vec<TranslationEntry>,
}

impl Visit for TranslationCallVisitor<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Callee::Expr(callee) = &node.callee
            && let Expr::Ident(ident) = &**callee
            && let Some(shape) = CallShape::from_callee(ident.sym.as_str())
            && let Some(entry) = self.extractor.extract_call(shape, node, self.module)
        {
            self.entries.push(entry);
        }
        node.visit_children_with(self);
    }
}
