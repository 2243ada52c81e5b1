// src/lib.rs

//! portdeps: build dependency resolution for recipe trees
//!
//! Given a HaikuPorts-style tree of recipes and a list of package names,
//! works out every package that has to be available to build them.
//!
//! # Architecture
//!
//! - `recipe`: cleans tokens into dependency items and parses the
//!   `PROVIDES`/`BUILD_REQUIRES`/`BUILD_PREREQUIRES` blocks of a recipe
//! - `index`: maps every provided name to the recipe that provides it
//! - `resolver`: walks build requirements through the index, once per recipe
//! - `diagnostics`: problems found along the way, none of them fatal except
//!   an empty index

pub mod config;
pub mod diagnostics;
mod error;
pub mod index;
pub mod recipe;
pub mod resolver;

pub use config::ResolverConfig;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics, Severity};
pub use error::{Error, Result};
pub use index::{build_index, IndexBuilder, ProvidesIndex};
pub use recipe::{normalize, parse_recipe, parse_recipe_file, DependencyItem, PrefixTag, RecipeSections};
pub use resolver::{filter_requested, resolve_build_dependencies, Resolution, Resolver};
