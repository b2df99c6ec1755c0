//! Build manifest produced by the bundler, consumed read-only.

use std::{collections::BTreeMap, fs, path::Path};

use serde::{Deserialize, Serialize};

/// One output chunk recorded in the manifest. Unknown fields are ignored,
/// matching the stripping behavior of the original schema; a missing `file`
/// or a wrong-typed field invalidates the whole manifest.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ManifestChunk {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_entry: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dynamic_entry: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imports: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dynamic_imports: Option<Vec<String>>,
}

/// Module-path key (as recorded by the bundler) to chunk descriptor.
pub type Manifest = BTreeMap<String, ManifestChunk>;

/// Load and validate a manifest. Returns `None` for a missing, unreadable,
/// or schema-invalid file; the caller skips the whole project rather than
/// working from a partial manifest.
pub fn load_manifest(path: &Path) -> Option<Manifest> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}
