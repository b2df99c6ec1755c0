use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tempfile::TempDir;

mod discovery;
mod generator;
mod make_pot;

/// A throwaway workspace for building fixture projects on disk.
pub struct Workspace {
    _temp_dir: TempDir,
    pub root: PathBuf,
}

impl Workspace {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            root,
        })
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.root.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;
        Ok(())
    }

    pub fn path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }
}

/// Write a complete, valid project under `prefix` whose single entry point
/// contains one `__()` call for `domain`.
pub fn write_project(workspace: &Workspace, prefix: &str, domain: &str) -> Result<()> {
    let join = |rest: &str| {
        if prefix.is_empty() {
            rest.to_string()
        } else {
            format!("{prefix}/{rest}")
        }
    };

    workspace.write_file(
        &join("chunkpot.config.json"),
        r#"{ "i18n": { "inputs": ["src/index.tsx"] } }"#,
    )?;
    workspace.write_file(&join("tsconfig.json"), r#"{ "include": ["src"] }"#)?;
    workspace.write_file(
        &join("vite.config.ts"),
        "export default { build: { manifest: true } }",
    )?;
    workspace.write_file(
        &join("src/index.tsx"),
        &format!("__('Hello', '{domain}');"),
    )?;
    workspace.write_file(
        &join("dist/.vite/manifest.json"),
        r#"{ "src/index.tsx": { "file": "assets/index.abc123.js" } }"#,
    )?;
    Ok(())
}

pub fn assert_exists(path: &Path) {
    assert!(path.exists(), "expected {} to exist", path.display());
}
