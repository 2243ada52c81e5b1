// src/resolver/engine.rs

//! Build dependency resolver implementation
//!
//! Walks the requirement graph implied by the recipes. Nodes are recipe
//! files; edges are found by parsing a recipe's `BUILD_REQUIRES` and
//! `BUILD_PREREQUIRES` and looking each item up in the provides index. The
//! walk uses an explicit stack and a visited set keyed by recipe path, so
//! every recipe is parsed at most once per run however many names lead to it,
//! and cycles end the walk instead of the stack.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::index::ProvidesIndex;
use crate::recipe::{normalize, DependencyItem, FsRecipeReader, RecipeLocator, RecipeReader};
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use tracing::{debug, info};

/// Mutable state for one resolver run
#[derive(Debug, Default)]
pub struct ResolutionState {
    /// Recipes already expanded
    visited: HashSet<PathBuf>,
    /// Every requirement seen so far
    discovered: BTreeSet<DependencyItem>,
    /// Names already reported as unresolvable
    unresolved: HashSet<String>,
}

impl ResolutionState {
    pub fn visited(&self) -> &HashSet<PathBuf> {
        &self.visited
    }

    pub fn discovered(&self) -> &BTreeSet<DependencyItem> {
        &self.discovered
    }

    pub fn into_discovered(self) -> BTreeSet<DependencyItem> {
        self.discovered
    }
}

/// Resolves the transitive build requirements of requested packages
pub struct Resolver<'a> {
    index: &'a ProvidesIndex,
    reader: &'a dyn RecipeReader,
    locator: Option<RecipeLocator<'a>>,
}

impl<'a> Resolver<'a> {
    /// Resolver reading recipes from disk, with index lookups only
    pub fn new(index: &'a ProvidesIndex) -> Self {
        Self {
            index,
            reader: &FsRecipeReader,
            locator: None,
        }
    }

    /// Read recipes through a different reader
    pub fn with_reader(mut self, reader: &'a dyn RecipeReader) -> Self {
        self.reader = reader;
        self
    }

    /// Fall back to directory lookup for names the index lacks
    pub fn with_locator(mut self, locator: RecipeLocator<'a>) -> Self {
        self.locator = Some(locator);
        self
    }

    /// Discover every build requirement reachable from `names`
    ///
    /// Names may be bare (`gcc`) or prefixed (`cmd:gcc`). The result holds
    /// every requirement found, including ones that match the requested
    /// names; see [`super::filter_requested`] for removing those.
    pub fn resolve<S: AsRef<str>>(
        &self,
        names: &[S],
        diagnostics: &mut Diagnostics,
    ) -> BTreeSet<DependencyItem> {
        let mut state = ResolutionState::default();
        for name in names {
            self.resolve_one(name.as_ref(), &mut state, diagnostics);
        }
        info!(
            "Expanded {} recipes, found {} build requirements",
            state.visited.len(),
            state.discovered.len()
        );
        state.into_discovered()
    }

    /// Expand one requested name into `state`
    pub fn resolve_one(&self, name: &str, state: &mut ResolutionState, diagnostics: &mut Diagnostics) {
        let Some(recipe) = self.find_requested(name, diagnostics) else {
            if state.unresolved.insert(name.to_string()) {
                diagnostics.push(DiagnosticKind::UnresolvableName {
                    name: name.to_string(),
                });
            }
            return;
        };

        debug!("Resolving '{}' from {}", name, recipe.display());
        let mut stack = vec![recipe.clone()];
        while let Some(path) = stack.pop() {
            if !state.visited.insert(path.clone()) {
                continue;
            }

            let requirements = match self.reader.read_recipe(&path) {
                Ok(sections) => sections.build_dependencies(),
                Err(e) => {
                    diagnostics.push(DiagnosticKind::UnreadableRecipe {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if requirements.is_empty() && path == recipe {
                diagnostics.push(DiagnosticKind::NoBuildRequirements {
                    name: name.to_string(),
                    recipe: path.clone(),
                });
            }

            for requirement in requirements {
                if let Some(next) = self.recipe_for(&requirement, state, diagnostics) {
                    if !state.visited.contains(&next) {
                        stack.push(next);
                    }
                }
                state.discovered.insert(requirement);
            }
        }
    }

    /// Recipe for a name as the user typed it
    fn find_requested(&self, name: &str, diagnostics: &mut Diagnostics) -> Option<PathBuf> {
        if let Some((key, path)) = self.index.find_requested(name) {
            debug!("'{}' matched index key '{}'", name, key);
            return Some(path.to_path_buf());
        }
        let item = normalize(name)?;
        self.locate(&item, diagnostics)
    }

    /// Recipe providing a requirement, reporting it once if there is none
    fn recipe_for(
        &self,
        item: &DependencyItem,
        state: &mut ResolutionState,
        diagnostics: &mut Diagnostics,
    ) -> Option<PathBuf> {
        if let Some(path) = self.index.get(item) {
            return Some(path.to_path_buf());
        }
        if let Some(path) = self.locate(item, diagnostics) {
            return Some(path);
        }

        let name = item.to_string();
        if state.unresolved.insert(name.clone()) {
            diagnostics.push(DiagnosticKind::UnresolvableName { name });
        }
        None
    }

    fn locate(&self, item: &DependencyItem, diagnostics: &mut Diagnostics) -> Option<PathBuf> {
        self.locator
            .as_ref()
            .and_then(|locator| locator.locate(item, diagnostics))
    }
}
