// src/resolver/mod.rs

//! Build dependency resolution
//!
//! Ties the pieces together: index the recipe tree, walk the requirement
//! graph from the requested names, and drop the requested names from the
//! result.
//!
//! ```ignore
//! use portdeps::config::ResolverConfig;
//! use portdeps::resolver::resolve_build_dependencies;
//!
//! let config = ResolverConfig::with_root("/src/haikuports");
//! let resolution = resolve_build_dependencies(&config, &["expat", "cmd:make"])?;
//! for dep in &resolution.dependencies {
//!     println!("{}", dep);
//! }
//! ```

mod engine;
mod plan;

pub use engine::{ResolutionState, Resolver};
pub use plan::{filter_requested, Resolution};

use crate::config::ResolverConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::{Error, Result};
use crate::index::build_index;
use crate::recipe::RecipeLocator;

/// Resolve the build dependencies of `names` in the recipe tree at `config.root`
///
/// Fails only when the tree yields an empty provides index, in which case no
/// name could possibly resolve. Every other problem ends up in
/// [`Resolution::diagnostics`].
pub fn resolve_build_dependencies<S: AsRef<str>>(
    config: &ResolverConfig,
    names: &[S],
) -> Result<Resolution> {
    let mut diagnostics = Diagnostics::new();

    let index = build_index(config, &mut diagnostics);
    if index.is_empty() {
        diagnostics.push(DiagnosticKind::EmptyIndex {
            root: config.root.clone(),
        });
        return Err(Error::EmptyIndex(config.root.clone()));
    }

    let mut resolver = Resolver::new(&index);
    if config.directory_fallback {
        resolver = resolver.with_locator(RecipeLocator::new(config, &mut diagnostics));
    }

    let discovered = resolver.resolve(names, &mut diagnostics);
    let dependencies = filter_requested(&discovered, names);

    Ok(Resolution {
        requested: names.iter().map(|n| n.as_ref().to_string()).collect(),
        discovered,
        dependencies,
        diagnostics,
    })
}
