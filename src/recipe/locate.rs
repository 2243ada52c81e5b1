// src/recipe/locate.rs

//! Recipe lookup by package directory
//!
//! An alternative to the provides index for names no recipe declares: map
//! the name onto a package directory (`cmd:python3.10` -> `python`) and look
//! for that directory under every category.

use crate::config::ResolverConfig;
use crate::diagnostics::Diagnostics;
use crate::index::{is_category, list_dir};
use crate::recipe::DependencyItem;
use std::path::PathBuf;
use tracing::debug;

/// What may follow a family prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tail {
    /// Anything, including nothing
    Any,
    /// One or more ASCII digits and nothing else
    Digits,
}

/// Versioned package names that share one recipe directory
const PACKAGE_FAMILIES: &[(&str, Tail, &str)] = &[
    ("python3", Tail::Any, "python"),
    ("python2", Tail::Any, "python"),
    ("openssl3", Tail::Any, "openssl"),
    ("openssl1", Tail::Any, "openssl"),
    ("zlib1", Tail::Any, "zlib"),
    ("icu", Tail::Digits, "icu"),
    ("boost", Tail::Digits, "boost"),
    ("openjdk", Tail::Digits, "openjdk"),
    ("glib2", Tail::Any, "glib"),
];

/// Package directory name for a dependency's base name
pub fn package_directory_name(basename: &str) -> &str {
    for (family, tail, directory) in PACKAGE_FAMILIES {
        let Some(rest) = basename.strip_prefix(family) else {
            continue;
        };
        let matches = match tail {
            Tail::Any => true,
            Tail::Digits => !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()),
        };
        if matches {
            return *directory;
        }
    }
    basename
}

/// Finds recipes by directory layout rather than by `PROVIDES`
///
/// The category directories are listed once, when the locator is built.
#[derive(Debug, Clone)]
pub struct RecipeLocator<'a> {
    config: &'a ResolverConfig,
    categories: Vec<PathBuf>,
}

impl<'a> RecipeLocator<'a> {
    pub fn new(config: &'a ResolverConfig, diagnostics: &mut Diagnostics) -> Self {
        let categories = list_dir(&config.root, config.sorted_enumeration, diagnostics)
            .into_iter()
            .filter(is_category)
            .map(|entry| entry.into_path())
            .collect();
        Self { config, categories }
    }

    /// Recipe file in the first category holding a matching package directory
    ///
    /// Within the package directory a recipe whose file name starts with the
    /// directory name is preferred; otherwise the alphabetically first recipe
    /// is used.
    pub fn locate(&self, item: &DependencyItem, diagnostics: &mut Diagnostics) -> Option<PathBuf> {
        let directory = package_directory_name(item.basename());
        let sorted = self.config.sorted_enumeration;

        for category in &self.categories {
            let package_dir = category.join(directory);
            if !package_dir.is_dir() {
                continue;
            }

            let mut recipes: Vec<PathBuf> = list_dir(&package_dir, sorted, diagnostics)
                .into_iter()
                .filter(|entry| entry.file_type().is_file() && self.config.is_recipe_file(entry.path()))
                .map(|entry| entry.into_path())
                .collect();
            if recipes.is_empty() {
                continue;
            }

            let preferred = recipes.iter().position(|path| {
                path.file_name()
                    .is_some_and(|name| name.to_string_lossy().starts_with(directory))
            });
            let found = match preferred {
                Some(pos) => recipes.swap_remove(pos),
                None => {
                    recipes.sort();
                    recipes.swap_remove(0)
                }
            };
            debug!("Located {} for '{}' by directory", found.display(), item);
            return Some(found);
        }

        None
    }
}
