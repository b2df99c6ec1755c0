//! The `make-pot` command: scan, generate, filter, print.

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::cli::ExitStatus;
use crate::cli::args::MakePotCommand;
use crate::core::{Generator, ProjectDiscovery};
use crate::report::{ProjectTranslations, filter_domains};

pub fn make_pot(cmd: MakePotCommand) -> Result<ExitStatus> {
    let source = cmd
        .source
        .canonicalize()
        .with_context(|| format!("Source directory not found: {}", cmd.source.display()))?;

    let discovery = ProjectDiscovery::new(cmd.verbose);
    let projects = discovery.scan(&source);

    let generator = Generator::new();
    let mut results: Vec<ProjectTranslations> = projects
        .par_iter()
        .map(|context| ProjectTranslations {
            project: context.name.clone(),
            path: context.root_path.display().to_string(),
            files: generator.generate(context),
        })
        .collect();

    // Discovery order is an artifact of the scan; re-impose a deterministic
    // aggregate ordering after the parallel pass.
    results.sort_by(|a, b| a.path.cmp(&b.path));

    filter_domains(&mut results, &cmd.domains, &cmd.ignore_domains);

    let json = if cmd.pretty {
        serde_json::to_string_pretty(&results)?
    } else {
        serde_json::to_string(&results)?
    };
    println!("{}", json);

    Ok(ExitStatus::Success)
}
