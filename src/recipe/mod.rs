// src/recipe/mod.rs

//! Recipe reading
//!
//! A recipe is a shell fragment describing how to build one package. The
//! resolver only cares about three assignments in it:
//!
//! - `PROVIDES`: names this recipe's packages satisfy
//! - `BUILD_REQUIRES`: names needed to build it
//! - `BUILD_PREREQUIRES`: tools needed on the build host
//!
//! # Example Recipe
//!
//! ```bash
//! SUMMARY="A massively spiffy yet delicately unobtrusive compression library"
//! PROVIDES="
//! 	zlib$secondaryArchSuffix = $portVersion
//! 	lib:libz$secondaryArchSuffix = 1.3 compat >= 1
//! 	"
//! BUILD_REQUIRES="
//! 	haiku${secondaryArchSuffix}_devel
//! 	"
//! BUILD_PREREQUIRES="
//! 	cmd:gcc$secondaryArchSuffix
//! 	cmd:make
//! 	"
//! ```
//!
//! Each whitespace-separated token is cleaned into a [`DependencyItem`] by
//! [`normalize`].

pub mod item;
pub mod locate;
pub mod parser;

pub use item::{normalize, DependencyItem, PrefixTag, LOOKUP_ORDER, RECOGNIZED_PREFIXES};
pub use locate::{package_directory_name, RecipeLocator};
pub use parser::{
    parse_recipe, parse_recipe_file, BlockParser, FsRecipeReader, RecipeReader, RecipeSections,
    Section,
};
