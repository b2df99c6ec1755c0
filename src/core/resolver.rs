//! Import-specifier resolution.
//!
//! Mirrors the resolution the build tool applies: tsconfig `paths` mappings,
//! vite aliases, relative and root-relative paths, extension and index-file
//! probing, and bare specifiers through `node_modules` honoring package
//! `exports` conditions.

use std::path::{Path, PathBuf};

use crate::core::tsconfig::load_ts_config;
use crate::core::vite::{AliasEntry, ViteBuildSettings};
use crate::utils::normalize_path;

/// tsconfig `compilerOptions.paths` mappings, pre-resolved against `baseUrl`.
#[derive(Debug)]
pub struct TsPaths {
    base: PathBuf,
    patterns: Vec<(String, Vec<String>)>,
}

impl TsPaths {
    /// Read the mappings from a tsconfig. `None` when the config has no
    /// `paths` or cannot be parsed.
    pub fn from_config(config_path: &Path) -> Option<Self> {
        let config = load_ts_config(config_path).ok()?;
        if config.compiler_options.paths.is_empty() {
            return None;
        }

        let dir = config_path.parent().map(Path::to_path_buf).unwrap_or_default();
        let base = match &config.compiler_options.base_url {
            Some(base_url) => normalize_path(&dir.join(base_url)),
            None => dir,
        };

        // Longest prefixes first so the most specific pattern wins
        let mut patterns: Vec<(String, Vec<String>)> =
            config.compiler_options.paths.into_iter().collect();
        patterns.sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));

        Some(Self { base, patterns })
    }

    /// Candidate paths for a specifier, in match order.
    fn candidates(&self, specifier: &str) -> Vec<PathBuf> {
        let mut candidates = Vec::new();

        for (pattern, targets) in &self.patterns {
            match pattern.split_once('*') {
                None => {
                    if pattern == specifier {
                        for target in targets {
                            candidates.push(normalize_path(&self.base.join(target)));
                        }
                    }
                }
                Some((prefix, suffix)) => {
                    if specifier.len() >= prefix.len() + suffix.len()
                        && specifier.starts_with(prefix)
                        && specifier.ends_with(suffix)
                    {
                        let captured = &specifier[prefix.len()..specifier.len() - suffix.len()];
                        for target in targets {
                            let resolved = target.replacen('*', captured, 1);
                            candidates.push(normalize_path(&self.base.join(resolved)));
                        }
                    }
                }
            }
        }

        candidates
    }
}

/// Resolves import specifiers to canonical absolute file paths.
pub struct ModuleResolver {
    root: PathBuf,
    aliases: Vec<AliasEntry>,
    extensions: Vec<String>,
    conditions: Vec<String>,
    ts_paths: Option<TsPaths>,
}

impl ModuleResolver {
    pub fn new(
        root: &Path,
        settings: &ViteBuildSettings,
        ts_config_path: Option<&Path>,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            aliases: settings.aliases.clone(),
            extensions: settings.extensions.clone(),
            conditions: settings.conditions.clone(),
            ts_paths: ts_config_path.and_then(TsPaths::from_config),
        }
    }

    /// Resolve `specifier` as imported from `from_dir`. Returns `None` for
    /// anything that does not land on an existing file.
    pub fn resolve(&self, specifier: &str, from_dir: &Path) -> Option<PathBuf> {
        if let Some(ts_paths) = &self.ts_paths {
            for candidate in ts_paths.candidates(specifier) {
                if let Some(hit) = self.probe(&candidate) {
                    return Some(hit);
                }
            }
        }

        if let Some(replaced) = self.apply_alias(specifier) {
            return self.resolve_path_like(&replaced, from_dir);
        }

        self.resolve_path_like(specifier, from_dir)
    }

    fn apply_alias(&self, specifier: &str) -> Option<String> {
        for alias in &self.aliases {
            if specifier == alias.find {
                return Some(alias.replacement.clone());
            }
            if let Some(rest) = specifier.strip_prefix(&alias.find)
                && rest.starts_with('/')
            {
                return Some(format!("{}{}", alias.replacement, rest));
            }
        }
        None
    }

    fn resolve_path_like(&self, specifier: &str, from_dir: &Path) -> Option<PathBuf> {
        let path = Path::new(specifier);

        if specifier.starts_with("./") || specifier.starts_with("../") {
            return self.probe(&normalize_path(&from_dir.join(path)));
        }
        if path.is_absolute() {
            return self.probe(&normalize_path(path));
        }
        // Rollup-style plain inputs resolve against the project root
        if let Some(hit) = self.probe(&normalize_path(&self.root.join(path))) {
            return Some(hit);
        }
        self.resolve_bare(specifier, from_dir)
    }

    fn probe(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return path.canonicalize().ok();
        }

        for ext in &self.extensions {
            let candidate = append_extension(path, ext);
            if candidate.is_file() {
                return candidate.canonicalize().ok();
            }
        }

        // TypeScript convention: `./x.js` may actually be `x.ts` on disk
        for candidate in swap_js_extension(path) {
            if candidate.is_file() {
                return candidate.canonicalize().ok();
            }
        }

        if path.is_dir() {
            for ext in &self.extensions {
                let candidate = path.join(format!("index{ext}"));
                if candidate.is_file() {
                    return candidate.canonicalize().ok();
                }
            }
        }

        None
    }

    fn resolve_bare(&self, specifier: &str, from_dir: &Path) -> Option<PathBuf> {
        let (package, subpath) = split_package_specifier(specifier)?;

        let mut dir = Some(from_dir);
        while let Some(current) = dir {
            let pkg_dir = current.join("node_modules").join(&package);
            if pkg_dir.is_dir() {
                return self.resolve_package(&pkg_dir, subpath.as_deref());
            }
            dir = current.parent();
        }
        None
    }

    fn resolve_package(&self, pkg_dir: &Path, subpath: Option<&str>) -> Option<PathBuf> {
        if let Some(sub) = subpath {
            return self.probe(&pkg_dir.join(sub));
        }

        let manifest: Option<serde_json::Value> = std::fs::read_to_string(pkg_dir.join("package.json"))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok());

        if let Some(manifest) = &manifest {
            if let Some(target) = manifest.get("exports").and_then(|e| self.export_target(e)) {
                return self.probe(&pkg_dir.join(target.trim_start_matches("./")));
            }
            for key in ["module", "main"] {
                if let Some(entry) = manifest.get(key).and_then(|v| v.as_str())
                    && let Some(hit) = self.probe(&pkg_dir.join(entry))
                {
                    return Some(hit);
                }
            }
        }

        self.probe(&pkg_dir.join("index"))
    }

    /// Resolve a package `exports` value to a relative target, honoring the
    /// configured condition names plus the standard fallbacks.
    fn export_target(&self, exports: &serde_json::Value) -> Option<String> {
        match exports {
            serde_json::Value::String(target) => Some(target.clone()),
            serde_json::Value::Object(map) => {
                if map.keys().any(|k| k.starts_with('.')) {
                    return map.get(".").and_then(|v| self.export_target(v));
                }
                for (condition, value) in map {
                    if self.condition_enabled(condition)
                        && let Some(target) = self.export_target(value)
                    {
                        return Some(target);
                    }
                }
                None
            }
            _ => None,
        }
    }

    fn condition_enabled(&self, condition: &str) -> bool {
        matches!(condition, "import" | "module" | "default")
            || self.conditions.iter().any(|c| c == condition)
    }
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(ext);
    PathBuf::from(name)
}

fn swap_js_extension(path: &Path) -> Vec<PathBuf> {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return Vec::new();
    };

    let swaps: &[(&str, &[&str])] = &[
        (".js", &[".ts", ".tsx"]),
        (".jsx", &[".tsx"]),
        (".mjs", &[".mts"]),
    ];

    for (from, to_list) in swaps {
        if let Some(stem) = name.strip_suffix(from) {
            return to_list
                .iter()
                .map(|to| path.with_file_name(format!("{stem}{to}")))
                .collect();
        }
    }
    Vec::new()
}

fn split_package_specifier(specifier: &str) -> Option<(String, Option<String>)> {
    if specifier.is_empty() || specifier.starts_with('.') || specifier.starts_with('/') {
        return None;
    }

    let mut segments = specifier.splitn(3, '/');
    let package = if specifier.starts_with('@') {
        let scope = segments.next()?;
        let name = segments.next()?;
        format!("{scope}/{name}")
    } else {
        segments.next()?.to_string()
    };

    let subpath = segments.next().map(str::to_string);
    Some((package, subpath))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::{TempDir, tempdir};

    use super::*;

    fn write(dir: &TempDir, path: &str, content: &str) -> PathBuf {
        let full = dir.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(&full, content).unwrap();
        full
    }

    fn resolver(dir: &TempDir) -> ModuleResolver {
        ModuleResolver::new(dir.path(), &ViteBuildSettings::default(), None)
    }

    #[test]
    fn test_resolve_relative_with_extension_probe() {
        let dir = tempdir().unwrap();
        write(&dir, "src/util.ts", "export {};");
        let from = dir.path().join("src");

        let hit = resolver(&dir).resolve("./util", &from).unwrap();
        assert!(hit.ends_with("src/util.ts"));
    }

    #[test]
    fn test_resolve_index_file() {
        let dir = tempdir().unwrap();
        write(&dir, "src/components/index.tsx", "export {};");
        let from = dir.path().join("src");

        let hit = resolver(&dir).resolve("./components", &from).unwrap();
        assert!(hit.ends_with("src/components/index.tsx"));
    }

    #[test]
    fn test_resolve_js_specifier_to_ts_file() {
        let dir = tempdir().unwrap();
        write(&dir, "src/helper.ts", "export {};");
        let from = dir.path().join("src");

        let hit = resolver(&dir).resolve("./helper.js", &from).unwrap();
        assert!(hit.ends_with("src/helper.ts"));
    }

    #[test]
    fn test_resolve_root_relative_plain_input() {
        let dir = tempdir().unwrap();
        write(&dir, "src/index.tsx", "export {};");

        let hit = resolver(&dir)
            .resolve("src/index.tsx", dir.path())
            .unwrap();
        assert!(hit.ends_with("src/index.tsx"));
    }

    #[test]
    fn test_resolve_vite_alias_prefix() {
        let dir = tempdir().unwrap();
        write(&dir, "src/modules/Notice/index.tsx", "export {};");

        let mut settings = ViteBuildSettings::default();
        settings.aliases.push(AliasEntry {
            find: "@module".to_string(),
            replacement: dir.path().join("src/modules").to_string_lossy().to_string(),
        });
        let resolver = ModuleResolver::new(dir.path(), &settings, None);

        let hit = resolver.resolve("@module/Notice/index.tsx", dir.path()).unwrap();
        assert!(hit.ends_with("src/modules/Notice/index.tsx"));
    }

    #[test]
    fn test_alias_requires_boundary() {
        let dir = tempdir().unwrap();
        write(&dir, "src/modules/index.tsx", "export {};");

        let mut settings = ViteBuildSettings::default();
        settings.aliases.push(AliasEntry {
            find: "@module".to_string(),
            replacement: dir.path().join("src/modules").to_string_lossy().to_string(),
        });
        let resolver = ModuleResolver::new(dir.path(), &settings, None);

        // "@modules" must not match the "@module" alias
        assert!(resolver.resolve("@modules", dir.path()).is_none());
    }

    #[test]
    fn test_resolve_tsconfig_paths() {
        let dir = tempdir().unwrap();
        write(&dir, "src/shared/api.ts", "export {};");
        let config = write(
            &dir,
            "tsconfig.json",
            r#"{ "compilerOptions": { "paths": { "@shared/*": ["./src/shared/*"] } } }"#,
        );

        let resolver =
            ModuleResolver::new(dir.path(), &ViteBuildSettings::default(), Some(&config));

        let hit = resolver.resolve("@shared/api", dir.path()).unwrap();
        assert!(hit.ends_with("src/shared/api.ts"));
    }

    #[test]
    fn test_resolve_tsconfig_paths_with_base_url() {
        let dir = tempdir().unwrap();
        write(&dir, "src/lib/math.ts", "export {};");
        let config = write(
            &dir,
            "tsconfig.json",
            r#"{ "compilerOptions": { "baseUrl": "./src", "paths": { "lib/*": ["lib/*"] } } }"#,
        );

        let resolver =
            ModuleResolver::new(dir.path(), &ViteBuildSettings::default(), Some(&config));

        let hit = resolver.resolve("lib/math", dir.path()).unwrap();
        assert!(hit.ends_with("src/lib/math.ts"));
    }

    #[test]
    fn test_resolve_node_module_main() {
        let dir = tempdir().unwrap();
        write(
            &dir,
            "node_modules/some-lib/package.json",
            r#"{ "name": "some-lib", "main": "lib/index.js" }"#,
        );
        write(&dir, "node_modules/some-lib/lib/index.js", "module.exports = {};");
        let from = dir.path().join("src");
        fs::create_dir_all(&from).unwrap();

        let hit = resolver(&dir).resolve("some-lib", &from).unwrap();
        assert!(hit.ends_with("node_modules/some-lib/lib/index.js"));
    }

    #[test]
    fn test_resolve_node_module_exports_conditions() {
        let dir = tempdir().unwrap();
        write(
            &dir,
            "node_modules/@wordpress/i18n/package.json",
            r#"{
                "name": "@wordpress/i18n",
                "exports": {
                    ".": {
                        "import": "./build-module/index.js",
                        "default": "./build/index.js"
                    }
                }
            }"#,
        );
        write(
            &dir,
            "node_modules/@wordpress/i18n/build-module/index.js",
            "export const __ = () => {};",
        );

        let hit = resolver(&dir).resolve("@wordpress/i18n", dir.path()).unwrap();
        assert!(hit.ends_with("build-module/index.js"));
    }

    #[test]
    fn test_resolve_scoped_subpath() {
        let dir = tempdir().unwrap();
        write(&dir, "node_modules/@scope/pkg/utils.js", "export {};");

        let hit = resolver(&dir)
            .resolve("@scope/pkg/utils", dir.path())
            .unwrap();
        assert!(hit.ends_with("node_modules/@scope/pkg/utils.js"));
    }

    #[test]
    fn test_unresolvable_specifier() {
        let dir = tempdir().unwrap();
        assert!(resolver(&dir).resolve("missing-pkg", dir.path()).is_none());
        assert!(resolver(&dir).resolve("./missing", dir.path()).is_none());
    }

    #[test]
    fn test_split_package_specifier() {
        assert_eq!(
            split_package_specifier("react"),
            Some(("react".to_string(), None))
        );
        assert_eq!(
            split_package_specifier("@scope/pkg/sub/path"),
            Some(("@scope/pkg".to_string(), Some("sub/path".to_string())))
        );
        assert_eq!(split_package_specifier("./relative"), None);
    }
}
