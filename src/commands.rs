// src/commands.rs
//! Command handlers for the portdeps CLI

use crate::cli::CorpusArgs;
use anyhow::{Context, Result};
use portdeps::config::ResolverConfig;
use portdeps::diagnostics::{Diagnostics, Severity};
use portdeps::index::build_index;
use portdeps::recipe::{parse_recipe_file, RecipeLocator, Section};
use portdeps::resolver::resolve_build_dependencies;
use serde_json::json;
use std::path::Path;
use tracing::info;

/// Build the effective configuration: defaults, then the config file, then flags
pub fn load_config(corpus: &CorpusArgs) -> Result<ResolverConfig> {
    let mut config = match &corpus.config {
        Some(path) => ResolverConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ResolverConfig::default(),
    };

    if let Some(root) = &corpus.root {
        config.root = root.clone();
    }
    if corpus.directory_fallback {
        config.directory_fallback = true;
    }
    if corpus.unsorted {
        config.sorted_enumeration = false;
    }

    info!("Using recipe tree at {}", config.root.display());
    Ok(config)
}

/// Resolve and print the build dependencies of `packages`
pub fn cmd_resolve(packages: &[String], corpus: &CorpusArgs, json: bool) -> Result<()> {
    let config = load_config(corpus)?;

    let mut requested: Vec<&str> = packages.iter().map(String::as_str).collect();
    requested.sort();
    requested.dedup();

    if !json {
        println!(
            "Resolving build dependencies for: {}",
            requested.join(", ")
        );
    }

    let resolution = resolve_build_dependencies(&config, &requested)
        .context("Dependency resolution failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    if !resolution.dependencies.is_empty() {
        println!();
        println!("Build dependencies (requested packages excluded):");
        for dep in &resolution.dependencies {
            println!("{}", dep);
        }
    } else if resolution.discovered.is_empty() {
        println!();
        println!(
            "No build dependencies found for {}. They may be meta packages, have no build requirements, or have no recipe.",
            requested.join(", ")
        );
    } else {
        println!();
        println!("No build dependencies beyond the requested packages themselves.");
    }

    print_summary(&resolution.diagnostics);
    Ok(())
}

/// Show which recipe provides `name`
pub fn cmd_provides(name: &str, corpus: &CorpusArgs) -> Result<()> {
    let config = load_config(corpus)?;
    let mut diagnostics = Diagnostics::new();
    let index = build_index(&config, &mut diagnostics);
    if index.is_empty() {
        return Err(portdeps::Error::EmptyIndex(config.root.clone()).into());
    }

    if let Some((key, path)) = index.find_requested(name) {
        println!("{} is provided by {}", key, path.display());
        return Ok(());
    }

    if config.directory_fallback {
        if let Some(item) = portdeps::normalize(name) {
            if let Some(path) = RecipeLocator::new(&config, &mut diagnostics).locate(&item, &mut diagnostics) {
                println!("{} has no provider; found {} by package directory", name, path.display());
                return Ok(());
            }
        }
    }

    Err(portdeps::Error::NotFound(format!("No recipe provides '{}'", name)).into())
}

/// Print the parsed sections of one recipe
pub fn cmd_parse(recipe: &Path, json: bool) -> Result<()> {
    let sections = parse_recipe_file(recipe)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "recipe": recipe,
                "sections": sections,
            }))?
        );
        return Ok(());
    }

    for section in Section::ALL {
        let items = sections.section(section);
        println!("{} ({}):", section.variable(), items.len());
        for item in items {
            println!("  {}", item);
        }
    }
    Ok(())
}

fn print_summary(diagnostics: &Diagnostics) {
    let warnings = diagnostics.count(Severity::Warning);
    if warnings > 0 {
        eprintln!("{} warning(s); run with -v for details", warnings);
    }
}
