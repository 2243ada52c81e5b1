// tests/common/mod.rs

//! Shared test utilities and helpers for integration tests.

#![allow(dead_code)]

use portdeps::config::ResolverConfig;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch recipe tree laid out as `<category>/<package>/<file>.recipe`.
///
/// Keep the value alive for as long as the tree is needed.
pub struct RecipeTree {
    dir: TempDir,
}

impl RecipeTree {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn config(&self) -> ResolverConfig {
        ResolverConfig::with_root(self.root())
    }

    /// Write `content` to `<root>/<rel>`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a recipe with the given sections, one item per line.
    pub fn recipe(&self, rel: &str, provides: &[&str], build_requires: &[&str]) -> PathBuf {
        self.write(rel, &recipe_text(provides, build_requires, &[]))
    }
}

/// Render a recipe body in the usual HaikuPorts layout.
pub fn recipe_text(provides: &[&str], build_requires: &[&str], build_prerequires: &[&str]) -> String {
    let mut text = String::from("SUMMARY=\"test recipe\"\nREVISION=\"1\"\n\n");
    for (name, items) in [
        ("PROVIDES", provides),
        ("BUILD_REQUIRES", build_requires),
        ("BUILD_PREREQUIRES", build_prerequires),
    ] {
        if items.is_empty() {
            continue;
        }
        text.push_str(&format!("{}=\"\n", name));
        for item in items {
            text.push_str(&format!("\t{}\n", item));
        }
        text.push_str("\t\"\n");
    }
    text.push_str("\nBUILD()\n{\n\tmake\n}\n");
    text
}

/// Render a set of dependency items as strings.
pub fn rendered<'a, I, T>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a T>,
    T: ToString + 'a,
{
    items.into_iter().map(|i| i.to_string()).collect()
}
