//! Compiler project configuration (`tsconfig.json`).
//!
//! Handles nearest-ancestor discovery, JSONC-tolerant parsing, the owned-file
//! set used by entry-point grouping, project references, and the `paths`
//! mappings consumed by module resolution.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::Pattern;
use serde::Deserialize;
use walkdir::WalkDir;

use crate::utils::normalize_path;

pub const TS_CONFIG_FILE_NAME: &str = "tsconfig.json";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfig {
    #[serde(default)]
    pub files: Option<Vec<String>>,
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub references: Vec<TsProjectReference>,
    #[serde(default)]
    pub compiler_options: CompilerOptions,
}

#[derive(Debug, Deserialize)]
pub struct TsProjectReference {
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub paths: std::collections::BTreeMap<String, Vec<String>>,
}

/// Walk up from `start_dir` looking for the nearest `tsconfig.json`.
pub fn find_nearest_ts_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(TS_CONFIG_FILE_NAME);
        if config_path.is_file() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

pub fn load_ts_config(path: &Path) -> Result<TsConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tsconfig: {}", path.display()))?;
    let config: TsConfig = serde_json::from_str(&strip_jsonc(&content))
        .with_context(|| format!("Failed to parse tsconfig: {}", path.display()))?;
    Ok(config)
}

/// Paths of referenced project configs, in declaration order. A reference
/// pointing at a directory resolves to `<dir>/tsconfig.json`.
pub fn project_references(config_path: &Path) -> Result<Vec<PathBuf>> {
    let config = load_ts_config(config_path)?;
    let dir = config_dir(config_path);

    Ok(config
        .references
        .iter()
        .map(|r| {
            let target = normalize_path(&dir.join(&r.path));
            if target.extension().is_some_and(|e| e == "json") {
                target
            } else {
                target.join(TS_CONFIG_FILE_NAME)
            }
        })
        .collect())
}

/// The set of source files a config directly owns: explicit `files` plus
/// expanded `include` globs minus `exclude` globs. With neither `files` nor
/// `include`, every source file under the config directory is owned.
/// `node_modules` is always excluded.
pub fn owned_files(config_path: &Path) -> Result<BTreeSet<PathBuf>> {
    let config = load_ts_config(config_path)?;
    let dir = config_dir(config_path);

    let exclude: Vec<Pattern> = config
        .exclude
        .as_deref()
        .unwrap_or(&[])
        .iter()
        .filter_map(|p| Pattern::new(p).ok())
        .collect();

    let mut owned = BTreeSet::new();

    if let Some(files) = &config.files {
        for file in files {
            let path = normalize_path(&dir.join(file));
            if path.is_file()
                && let Ok(canonical) = path.canonicalize()
            {
                owned.insert(canonical);
            }
        }
    }

    match &config.include {
        Some(include) => {
            for pattern in include {
                collect_include(&dir, pattern, &exclude, &mut owned);
            }
        }
        None if config.files.is_none() => {
            collect_dir(&dir, &dir, &exclude, &mut owned);
        }
        None => {}
    }

    Ok(owned)
}

fn collect_include(dir: &Path, pattern: &str, exclude: &[Pattern], owned: &mut BTreeSet<PathBuf>) {
    let target = dir.join(pattern);
    if target.is_dir() {
        // A bare directory include means everything beneath it
        collect_dir(dir, &target, exclude, owned);
        return;
    }

    let Ok(entries) = glob::glob(&target.to_string_lossy()) else {
        return;
    };
    for entry in entries.flatten() {
        if entry.is_dir() {
            collect_dir(dir, &entry, exclude, owned);
        } else if is_source_file(&entry) && !is_excluded(dir, &entry, exclude) {
            if let Ok(canonical) = entry.canonicalize() {
                owned.insert(canonical);
            }
        }
    }
}

fn collect_dir(base: &Path, dir: &Path, exclude: &[Pattern], owned: &mut BTreeSet<PathBuf>) {
    for entry in WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.file_name() != "node_modules")
        .flatten()
    {
        let path = entry.path();
        if path.is_file() && is_source_file(path) && !is_excluded(base, path, exclude) {
            if let Ok(canonical) = path.canonicalize() {
                owned.insert(canonical);
            }
        }
    }
}

fn is_excluded(base: &Path, path: &Path, exclude: &[Pattern]) -> bool {
    let relative = path.strip_prefix(base).unwrap_or(path);
    let relative_str = relative.to_string_lossy();
    exclude
        .iter()
        .any(|p| p.matches(&relative_str) || p.matches(&path.to_string_lossy()))
}

fn is_source_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsx" | "ts" | "jsx" | "js" | "mts" | "cts")
    )
}

fn config_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Strip `//` and `/* */` comments and trailing commas, which tsconfig files
/// routinely contain even though they are nominally JSON.
fn strip_jsonc(source: &str) -> String {
    let chars: Vec<char> = source.chars().collect();
    let mut out = String::with_capacity(source.len());
    let mut i = 0;
    let mut in_string = false;

    while i < chars.len() {
        let c = chars[i];
        if in_string {
            out.push(c);
            if c == '\\' && i + 1 < chars.len() {
                out.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if c == '"' {
                in_string = false;
            }
            i += 1;
        } else if c == '"' {
            in_string = true;
            out.push(c);
            i += 1;
        } else if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            i += 2;
            while i + 1 < chars.len() && !(chars[i] == '*' && chars[i + 1] == '/') {
                i += 1;
            }
            i = (i + 2).min(chars.len());
        } else if c == ',' {
            let mut j = i + 1;
            // Look ahead past whitespace and comments for a closing brace
            loop {
                while j < chars.len() && chars[j].is_whitespace() {
                    j += 1;
                }
                if chars.get(j) == Some(&'/') && chars.get(j + 1) == Some(&'/') {
                    while j < chars.len() && chars[j] != '\n' {
                        j += 1;
                    }
                    continue;
                }
                if chars.get(j) == Some(&'/') && chars.get(j + 1) == Some(&'*') {
                    j += 2;
                    while j + 1 < chars.len() && !(chars[j] == '*' && chars[j + 1] == '/') {
                        j += 1;
                    }
                    j = (j + 2).min(chars.len());
                    continue;
                }
                break;
            }
            if matches!(chars.get(j), Some(&'}') | Some(&']')) {
                i += 1;
                continue;
            }
            out.push(c);
            i += 1;
        } else {
            out.push(c);
            i += 1;
        }
    }

    out
}
