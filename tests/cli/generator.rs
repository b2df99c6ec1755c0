use anyhow::Result;
use chunkpot::core::{Generator, ProjectDiscovery};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::{Workspace, write_project};

fn generate_json(workspace: &Workspace) -> Result<serde_json::Value> {
    let projects = ProjectDiscovery::new(false).scan(&workspace.root);
    assert_eq!(projects.len(), 1);

    let result = Generator::new().generate(&projects[0]);
    Ok(serde_json::to_value(result)?)
}

#[test]
fn basic_call_maps_to_chunk() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "", "my-domain")?;

    assert_eq!(
        generate_json(&workspace)?,
        json!([{
            "chunkPath": "dist/assets/index.abc123.js",
            "translationEntries": [{ "text": "Hello", "domain": "my-domain" }],
        }])
    );
    Ok(())
}

#[test]
fn plural_call_shape() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "", "my-domain")?;
    workspace.write_file(
        "src/index.tsx",
        "_n('one item', '%d items', 5, 'my-domain');",
    )?;

    assert_eq!(
        generate_json(&workspace)?,
        json!([{
            "chunkPath": "dist/assets/index.abc123.js",
            "translationEntries": [{
                "single": "one item",
                "plural": "%d items",
                "number": 5,
                "domain": "my-domain",
            }],
        }])
    );
    Ok(())
}

#[test]
fn context_call_shape() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "", "my-domain")?;
    workspace.write_file("src/index.tsx", "_x('text', 'ctx', 'my-domain');")?;

    assert_eq!(
        generate_json(&workspace)?,
        json!([{
            "chunkPath": "dist/assets/index.abc123.js",
            "translationEntries": [{ "text": "text", "context": "ctx", "domain": "my-domain" }],
        }])
    );
    Ok(())
}

#[test]
fn imported_domain_constant_matches_literal() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "", "my-domain")?;
    workspace.write_file("src/const.ts", "export const DOMAIN = 'my-domain';")?;
    workspace.write_file(
        "src/index.tsx",
        "import { DOMAIN } from './const';\n__('Hello', DOMAIN);",
    )?;

    assert_eq!(
        generate_json(&workspace)?,
        json!([{
            "chunkPath": "dist/assets/index.abc123.js",
            "translationEntries": [{ "text": "Hello", "domain": "my-domain" }],
        }])
    );
    Ok(())
}

#[test]
fn all_four_shapes_in_one_component() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "", "my-domain")?;
    workspace.write_file("src/const.ts", "export const DOMAIN = 'my-domain';")?;
    workspace.write_file(
        "src/index.tsx",
        r#"
        import { DOMAIN } from './const';

        const TEXT = 'text';

        __(TEXT, DOMAIN);

        export const Notice = () => {
            _x('text with context', 'context', DOMAIN);

            return (
                <>
                    <div className="">{_n('single', 'plural', 3, DOMAIN)}</div>
                </>
            );
        };

        _nx('single2', 'plural2', 4, 'context2', DOMAIN);
        "#,
    )?;

    assert_eq!(
        generate_json(&workspace)?,
        json!([{
            "chunkPath": "dist/assets/index.abc123.js",
            "translationEntries": [
                { "text": "text", "domain": "my-domain" },
                { "text": "text with context", "context": "context", "domain": "my-domain" },
                { "single": "single", "plural": "plural", "number": 3, "domain": "my-domain" },
                { "single": "single2", "plural": "plural2", "number": 4, "context": "context2", "domain": "my-domain" },
            ],
        }])
    );
    Ok(())
}

#[test]
fn manifest_miss_yields_zero_chunk_records() -> Result<()> {
    let workspace = Workspace::new()?;
    write_project(&workspace, "", "my-domain")?;
    workspace.write_file(
        "dist/.vite/manifest.json",
        r#"{ "src/unrelated.tsx": { "file": "assets/unrelated.js" } }"#,
    )?;

    assert_eq!(generate_json(&workspace)?, json!([]));
    Ok(())
}
