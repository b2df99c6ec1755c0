//! Sub-project discovery.
//!
//! Recursively finds `chunkpot.config.json` files under a root path and
//! resolves each into a [`ProjectContext`]: declarative config, nearest
//! tsconfig, vite build settings, resolved entry points, and the build
//! manifest. A project that fails any of these steps is skipped; discovery
//! never aborts because one sub-project is misconfigured.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use colored::Colorize;
use walkdir::WalkDir;

use crate::config::{CONFIG_FILE_NAME, SKIPPED_SCAN_DIRS, load_project_config};
use crate::core::manifest::{Manifest, load_manifest};
use crate::core::resolver::ModuleResolver;
use crate::core::tsconfig::find_nearest_ts_config;
use crate::core::vite::{ViteBuildSettings, find_vite_config, resolve_build_settings};
use crate::utils::normalize_path;

/// One discovered sub-project, immutable after discovery.
#[derive(Debug)]
pub struct ProjectContext {
    pub name: String,
    /// Unique key within a discovery pass.
    pub root_path: PathBuf,
    pub ts_config_path: PathBuf,
    pub vite_config_path: PathBuf,
    pub vite_manifest_path: PathBuf,
    pub build_settings: ViteBuildSettings,
    /// Absolute, deduplicated entry-point files.
    pub entry_points: Vec<PathBuf>,
    pub manifest: Manifest,
}

pub struct ProjectDiscovery {
    verbose: bool,
}

impl ProjectDiscovery {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Find all projects under `source`. Results are ordered by config file
    /// path so repeated scans over the same tree are reproducible.
    pub fn scan(&self, source: &Path) -> Vec<ProjectContext> {
        let mut config_files: Vec<PathBuf> = WalkDir::new(source)
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e.path()))
            .flatten()
            .filter(|e| e.file_type().is_file() && e.file_name() == CONFIG_FILE_NAME)
            .map(|e| e.into_path())
            .collect();
        config_files.sort();

        config_files
            .into_iter()
            .filter_map(|config_path| {
                let root = config_path.parent()?.to_path_buf();
                match self.resolve_context(&root, &config_path) {
                    Ok(context) => Some(context),
                    Err(err) => {
                        if self.verbose {
                            eprintln!(
                                "{} Skipping project {}: {}",
                                "warning:".bold().yellow(),
                                root.display(),
                                err
                            );
                        }
                        None
                    }
                }
            })
            .collect()
    }

    fn resolve_context(&self, root: &Path, config_path: &Path) -> Result<ProjectContext> {
        // Canonical root keeps manifest keys consistent with the canonical
        // entry paths the resolver produces.
        let root = &root
            .canonicalize()
            .with_context(|| format!("Failed to resolve project root: {}", root.display()))?;
        let project_config = load_project_config(config_path)?;

        let ts_config_path = find_nearest_ts_config(root)
            .with_context(|| format!("No tsconfig.json found above {}", root.display()))?;

        let vite_config_path =
            find_vite_config(root, project_config.vite_config_path.as_deref())
                .with_context(|| format!("No vite config found in {}", root.display()))?;

        let build_settings = resolve_build_settings(&vite_config_path)?;

        let entry_points = resolve_entry_points(
            root,
            project_config.inputs(),
            &build_settings,
            &ts_config_path,
        );

        let vite_manifest_path = normalize_path(
            &root
                .join(&build_settings.out_dir)
                .join(&build_settings.manifest_file),
        );
        let Some(manifest) = load_manifest(&vite_manifest_path) else {
            bail!(
                "Missing or invalid build manifest: {}",
                vite_manifest_path.display()
            );
        };

        Ok(ProjectContext {
            name: root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default(),
            root_path: root.to_path_buf(),
            ts_config_path,
            vite_config_path,
            vite_manifest_path,
            build_settings,
            entry_points,
            manifest,
        })
    }
}

/// Normalize declared inputs (project config first, then the vite config's
/// rollup inputs) and resolve each through module resolution. Entries that
/// fail to resolve are dropped silently; duplicates keep their first
/// position.
fn resolve_entry_points(
    root: &Path,
    config_inputs: &[String],
    settings: &ViteBuildSettings,
    ts_config_path: &Path,
) -> Vec<PathBuf> {
    let resolver = ModuleResolver::new(root, settings, Some(ts_config_path));

    let mut entry_points = Vec::new();
    for input in config_inputs.iter().chain(settings.raw_inputs.iter()) {
        if let Some(resolved) = resolver.resolve(input, root)
            && !entry_points.contains(&resolved)
        {
            entry_points.push(resolved);
        }
    }
    entry_points
}

fn is_skipped_dir(path: &Path) -> bool {
    path.is_dir()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| SKIPPED_SCAN_DIRS.contains(&name))
}
