use anyhow::Result;
use chunkpot::core::ProjectDiscovery;
use pretty_assertions::assert_eq;

use crate::{Workspace, assert_exists, write_project};

#[test]
fn scan_over_empty_tree_is_empty_not_an_error() -> Result<()> {
    let workspace = Workspace::new()?;
    workspace.write_file("src/unrelated.ts", "export {};")?;

    let projects = ProjectDiscovery::new(false).scan(&workspace.root);
    assert!(projects.is_empty());
    Ok(())
}

#[test]
fn scan_discovers_multiple_projects_in_path_order() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "plugins/beta", "beta-domain")?;
    write_project(&workspace, "plugins/alpha", "alpha-domain")?;
    write_project(&workspace, "theme", "theme-domain")?;

    let projects = ProjectDiscovery::new(false).scan(&workspace.root);
    let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["alpha", "beta", "theme"]);
    Ok(())
}

#[test]
fn scan_resolves_full_context() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "plugin", "my-domain")?;

    let projects = ProjectDiscovery::new(false).scan(&workspace.root);
    assert_eq!(projects.len(), 1);

    let project = &projects[0];
    assert_eq!(project.root_path, workspace.path("plugin"));
    assert_eq!(project.ts_config_path, workspace.path("plugin/tsconfig.json"));
    assert_eq!(
        project.vite_config_path,
        workspace.path("plugin/vite.config.ts")
    );
    assert_eq!(
        project.vite_manifest_path,
        workspace.path("plugin/dist/.vite/manifest.json")
    );
    assert_exists(&project.vite_manifest_path);
    assert_eq!(project.entry_points, vec![workspace.path("plugin/src/index.tsx")]);
    Ok(())
}

#[test]
fn misconfigured_project_is_skipped_without_failing_neighbors() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "good", "d")?;
    // config present but invalid: parse failure must skip, not abort
    workspace.write_file("bad/chunkpot.config.json", "{ broken")?;

    let projects = ProjectDiscovery::new(false).scan(&workspace.root);
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "good");
    Ok(())
}

#[test]
fn projects_inside_dependency_dirs_are_ignored() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "node_modules/dep", "d")?;
    write_project(&workspace, "vendor/dep", "d")?;
    write_project(&workspace, ".pnpm-store/dep", "d")?;

    assert!(ProjectDiscovery::new(false).scan(&workspace.root).is_empty());
    Ok(())
}
