// src/index.rs

//! Provides index
//!
//! Maps every name a recipe declares in `PROVIDES` to the recipe file that
//! declares it. The corpus is laid out as
//!
//! ```text
//! <root>/<category>/<package>/<name>-<version>.recipe
//! ```
//!
//! where a category is any directory directly under the root whose name
//! contains a hyphen (`dev-libs`, `app-text`, ...).
//!
//! When two recipes provide the same name the one indexed last wins and a
//! duplicate-provider diagnostic is recorded. With `sorted_enumeration` on
//! (the default) that is the lexicographically last recipe path; with it off,
//! the winner follows directory listing order and may differ between runs.

use crate::config::ResolverConfig;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::recipe::{normalize, DependencyItem, FsRecipeReader, PrefixTag, RecipeReader, LOOKUP_ORDER};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Provided name -> recipe file
#[derive(Debug, Clone, Default)]
pub struct ProvidesIndex {
    entries: HashMap<DependencyItem, PathBuf>,
}

impl ProvidesIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `recipe` as the provider of `item`, returning the previous provider
    pub fn insert(&mut self, item: DependencyItem, recipe: PathBuf) -> Option<PathBuf> {
        self.entries.insert(item, recipe)
    }

    /// Recipe providing exactly this item
    pub fn get(&self, item: &DependencyItem) -> Option<&Path> {
        self.entries.get(item).map(PathBuf::as_path)
    }

    /// Find the recipe for a name as a user would type it
    ///
    /// A name with a recognized prefix is looked up as written. A bare name
    /// is tried unprefixed first and then under each tag in [`LOOKUP_ORDER`];
    /// the first hit wins. Returns the index key that matched.
    pub fn find_requested(&self, name: &str) -> Option<(DependencyItem, &Path)> {
        let item = normalize(name)?;
        if item.prefix() != PrefixTag::None {
            return self.get(&item).map(|path| (item, path));
        }
        LOOKUP_ORDER.iter().find_map(|tag| {
            let candidate = item.with_prefix(*tag);
            self.get(&candidate).map(|path| (candidate, path))
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DependencyItem, &Path)> {
        self.entries.iter().map(|(item, path)| (item, path.as_path()))
    }
}

/// List the immediate children of `dir`, recording a diagnostic if it cannot be read
pub(crate) fn list_dir(
    dir: &Path,
    sorted: bool,
    diagnostics: &mut Diagnostics,
) -> Vec<walkdir::DirEntry> {
    let mut walker = WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true);
    if sorted {
        walker = walker.sort_by_file_name();
    }

    let mut entries = Vec::new();
    for entry in walker {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(e) => diagnostics.push(DiagnosticKind::UnreadableDirectory {
                path: e.path().unwrap_or(dir).to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }
    entries
}

/// Whether a directory entry directly under the root is a category directory
pub(crate) fn is_category(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_string_lossy().contains('-')
}

/// Walks a recipe tree and builds its [`ProvidesIndex`]
pub struct IndexBuilder<'a> {
    config: &'a ResolverConfig,
    reader: &'a dyn RecipeReader,
}

impl<'a> IndexBuilder<'a> {
    /// Builder reading recipes from disk
    pub fn new(config: &'a ResolverConfig) -> Self {
        Self {
            config,
            reader: &FsRecipeReader,
        }
    }

    /// Read recipes through a different reader
    pub fn with_reader(mut self, reader: &'a dyn RecipeReader) -> Self {
        self.reader = reader;
        self
    }

    /// Every recipe file in the tree, in enumeration order
    pub fn recipe_files(&self, diagnostics: &mut Diagnostics) -> Vec<PathBuf> {
        let sorted = self.config.sorted_enumeration;
        let mut files = Vec::new();

        for category in list_dir(&self.config.root, sorted, diagnostics) {
            if !is_category(&category) {
                continue;
            }
            for package in list_dir(category.path(), sorted, diagnostics) {
                if !package.file_type().is_dir() {
                    continue;
                }
                for file in list_dir(package.path(), sorted, diagnostics) {
                    if file.file_type().is_file() && self.config.is_recipe_file(file.path()) {
                        files.push(file.into_path());
                    }
                }
            }
        }

        files
    }

    /// Parse every recipe's `PROVIDES` block into an index
    ///
    /// Unreadable directories and recipes are recorded in `diagnostics` and
    /// skipped. An empty result means the root is not a recipe tree.
    pub fn build(&self, diagnostics: &mut Diagnostics) -> ProvidesIndex {
        let files = self.recipe_files(diagnostics);
        let mut index = ProvidesIndex::new();

        for path in &files {
            let sections = match self.reader.read_recipe(path) {
                Ok(sections) => sections,
                Err(e) => {
                    diagnostics.push(DiagnosticKind::UnreadableRecipe {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            for item in sections.provides {
                if let Some(previous) = index.insert(item.clone(), path.clone()) {
                    if previous != *path {
                        diagnostics.push(DiagnosticKind::DuplicateProvider {
                            item,
                            previous,
                            replacement: path.clone(),
                        });
                    }
                }
            }
            debug!("Indexed {}", path.display());
        }

        info!(
            "Indexed {} provided names from {} recipes under {}",
            index.len(),
            files.len(),
            self.config.root.display()
        );
        index
    }
}

/// Build the provides index for `config.root`, reading recipes from disk
pub fn build_index(config: &ResolverConfig, diagnostics: &mut Diagnostics) -> ProvidesIndex {
    IndexBuilder::new(config).build(diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use std::fs;

    fn write_recipe(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    fn item(s: &str) -> DependencyItem {
        normalize(s).unwrap()
    }

    #[test]
    fn test_build_simple_index() {
        let dir = tempfile::tempdir().unwrap();
        let zlib = write_recipe(
            dir.path(),
            "sys-libs/zlib/zlib-1.3.recipe",
            "PROVIDES=\"\n\tzlib$secondaryArchSuffix = $portVersion\n\tlib:libz$secondaryArchSuffix\n\t\"\n",
        );
        let make = write_recipe(dir.path(), "dev-build/make/make-4.4.recipe", "PROVIDES=\"make cmd:make\"\n");

        let config = ResolverConfig::with_root(dir.path());
        let mut diagnostics = Diagnostics::new();
        let index = build_index(&config, &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(index.get(&item("zlib")), Some(zlib.as_path()));
        assert_eq!(index.get(&item("lib:libz")), Some(zlib.as_path()));
        assert_eq!(index.get(&item("cmd:make")), Some(make.as_path()));
        assert_eq!(index.get(&item("make")), Some(make.as_path()));
        assert!(index.get(&item("cmd:zlib")).is_none());
    }

    #[test]
    fn test_layout_rules() {
        let dir = tempfile::tempdir().unwrap();
        // No hyphen: not a category
        write_recipe(dir.path(), "misc/foo/foo-1.recipe", "PROVIDES=\"foo\"\n");
        // Recipe directly in a category, not in a package directory
        write_recipe(dir.path(), "dev-libs/bar-1.recipe", "PROVIDES=\"bar\"\n");
        // Wrong extension
        write_recipe(dir.path(), "dev-libs/baz/baz-1.txt", "PROVIDES=\"baz\"\n");
        // Too deep
        write_recipe(dir.path(), "dev-libs/qux/extra/qux-1.recipe", "PROVIDES=\"qux\"\n");
        let good = write_recipe(dir.path(), "dev-libs/good/good-1.recipe", "PROVIDES=\"good\"\n");

        let config = ResolverConfig::with_root(dir.path());
        let mut diagnostics = Diagnostics::new();
        let index = build_index(&config, &mut diagnostics);

        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&item("good")), Some(good.as_path()));
    }

    #[test]
    fn test_duplicate_provider_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        write_recipe(dir.path(), "dev-libs/a/a-1.recipe", "PROVIDES=\"shared\"\n");
        let b = write_recipe(dir.path(), "dev-libs/b/b-1.recipe", "PROVIDES=\"shared\"\n");

        let config = ResolverConfig::with_root(dir.path());
        let mut diagnostics = Diagnostics::new();
        let index = build_index(&config, &mut diagnostics);

        assert_eq!(index.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.count(Severity::Warning), 1);
        // Sorted enumeration: the last recipe path wins
        assert_eq!(index.get(&item("shared")), Some(b.as_path()));
        let reported = diagnostics.iter().next().unwrap();
        assert!(matches!(
            &reported.kind,
            DiagnosticKind::DuplicateProvider { replacement, .. } if *replacement == b
        ));
    }

    #[test]
    fn test_missing_root_yields_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let config = ResolverConfig::with_root(dir.path().join("missing"));
        let mut diagnostics = Diagnostics::new();
        let index = build_index(&config, &mut diagnostics);

        assert!(index.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert!(matches!(
            diagnostics.iter().next().unwrap().kind,
            DiagnosticKind::UnreadableDirectory { .. }
        ));
    }

    #[test]
    fn test_find_requested() {
        let mut index = ProvidesIndex::new();
        index.insert(item("cmd:gcc"), PathBuf::from("sys-devel/gcc/gcc-13.recipe"));
        index.insert(item("lib:libz"), PathBuf::from("sys-libs/zlib/zlib-1.3.recipe"));
        index.insert(item("zlib"), PathBuf::from("sys-libs/zlib/zlib-1.3.recipe"));
        index.insert(item("package:gcc"), PathBuf::from("sys-devel/gcc/gcc-12.recipe"));

        // Bare name: "" first, then package:, then cmd:, ...
        let (key, path) = index.find_requested("gcc").unwrap();
        assert_eq!(key.to_string(), "package:gcc");
        assert_eq!(path, Path::new("sys-devel/gcc/gcc-12.recipe"));

        let (key, _) = index.find_requested("zlib").unwrap();
        assert_eq!(key.to_string(), "zlib");

        let (key, _) = index.find_requested("libz").unwrap();
        assert_eq!(key.to_string(), "lib:libz");

        // Prefixed names are taken literally
        let (key, _) = index.find_requested("cmd:gcc").unwrap();
        assert_eq!(key.to_string(), "cmd:gcc");
        assert!(index.find_requested("devel:gcc").is_none());
        assert!(index.find_requested("haiku").is_none());
    }
}
