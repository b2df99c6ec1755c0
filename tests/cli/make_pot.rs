use std::process::Command;

use anyhow::Result;
use insta_cmd::get_cargo_bin;
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::{Workspace, write_project};

fn run_make_pot(workspace: &Workspace, extra_args: &[&str]) -> Result<(Value, bool)> {
    let output = Command::new(get_cargo_bin("chunkpot"))
        .arg("make-pot")
        .arg(&workspace.root)
        .args(extra_args)
        .output()?;

    let stdout = String::from_utf8(output.stdout)?;
    Ok((serde_json::from_str(&stdout)?, output.status.success()))
}

#[test]
fn make_pot_prints_project_records() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "plugin", "my-domain")?;

    let (json, success) = run_make_pot(&workspace, &[])?;
    assert!(success);

    assert_eq!(json[0]["project"], "plugin");
    assert_eq!(
        json[0]["path"],
        workspace.path("plugin").to_string_lossy().to_string()
    );
    assert_eq!(
        json[0]["files"][0]["chunkPath"],
        "dist/assets/index.abc123.js"
    );
    assert_eq!(
        json[0]["files"][0]["translationEntries"][0]["text"],
        "Hello"
    );
    Ok(())
}

#[test]
fn make_pot_on_empty_tree_prints_empty_array() -> Result<()> {
    let workspace = Workspace::new()?;

    let (json, success) = run_make_pot(&workspace, &[])?;
    assert!(success);
    assert_eq!(json, serde_json::json!([]));
    Ok(())
}

#[test]
fn make_pot_orders_projects_deterministically() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "zeta", "z")?;
    write_project(&workspace, "alpha", "a")?;

    let (json, _) = run_make_pot(&workspace, &[])?;
    assert_eq!(json[0]["project"], "alpha");
    assert_eq!(json[1]["project"], "zeta");
    Ok(())
}

#[test]
fn make_pot_filters_domains() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "plugin", "keep-me")?;
    workspace.write_file(
        "plugin/src/index.tsx",
        "__('Kept', 'keep-me');\n__('Dropped', 'drop-me');",
    )?;

    let (json, _) = run_make_pot(&workspace, &["--domains", "keep-me"])?;
    let entries = json[0]["files"][0]["translationEntries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["text"], "Kept");

    let (json, _) = run_make_pot(&workspace, &["--ignore-domains", "keep-me,drop-me"])?;
    assert!(json[0]["files"].as_array().unwrap().is_empty());
    Ok(())
}

#[test]
fn make_pot_pretty_output_parses() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "plugin", "my-domain")?;

    let (json, success) = run_make_pot(&workspace, &["--pretty"])?;
    assert!(success);
    assert_eq!(json[0]["project"], "plugin");
    Ok(())
}

#[test]
fn make_pot_missing_source_dir_fails() -> Result<()> {
    let workspace = Workspace::new()?;
    let output = Command::new(get_cargo_bin("chunkpot"))
        .arg("make-pot")
        .arg(workspace.path("does-not-exist"))
        .output()?;

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(2));
    Ok(())
}

#[test]
fn init_writes_starter_config() -> Result<()> {
    let workspace = Workspace::new()?;

    let output = Command::new(get_cargo_bin("chunkpot"))
        .arg("init")
        .current_dir(&workspace.root)
        .output()?;
    assert!(output.status.success());
    assert!(workspace.path("chunkpot.config.json").is_file());

    // Refuses to overwrite
    let output = Command::new(get_cargo_bin("chunkpot"))
        .arg("init")
        .current_dir(&workspace.root)
        .output()?;
    assert!(!output.status.success());
    Ok(())
}
