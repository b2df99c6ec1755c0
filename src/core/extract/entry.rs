//! Extracted translation entries.
//!
//! One variant per call shape; an entry is only ever constructed with every
//! field of its shape resolved, so no partially-filled values exist.

use serde::{Serialize, Serializer};

/// A single extracted translation call-site.
///
/// The variant is selected by the call pattern that produced it (`__`, `_x`,
/// `_n`, `_nx`), never inferred from field presence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TranslationEntry {
    /// `__(text, domain)`
    Basic { text: String, domain: String },

    /// `_x(text, context, domain)`
    Context {
        text: String,
        context: String,
        domain: String,
    },

    /// `_n(single, plural, number, domain)`
    Plural {
        single: String,
        plural: String,
        #[serde(serialize_with = "serialize_count")]
        number: f64,
        domain: String,
    },

    /// `_nx(single, plural, number, context, domain)`
    ContextPlural {
        single: String,
        plural: String,
        #[serde(serialize_with = "serialize_count")]
        number: f64,
        context: String,
        domain: String,
    },
}

impl TranslationEntry {
    pub fn domain(&self) -> &str {
        match self {
            TranslationEntry::Basic { domain, .. }
            | TranslationEntry::Context { domain, .. }
            | TranslationEntry::Plural { domain, .. }
            | TranslationEntry::ContextPlural { domain, .. } => domain,
        }
    }
}

/// Whole counts serialize as integers, the way the source literal was
/// written; fractional values fall back to floats.
fn serialize_count<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}
