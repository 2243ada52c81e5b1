// src/recipe/parser.rs

//! Recipe block parsing
//!
//! Recipes are shell fragments. Only three assignments matter here:
//!
//! ```bash
//! PROVIDES="
//! 	libfoo$secondaryArchSuffix = $portVersion
//! 	lib:libfoo$secondaryArchSuffix
//! 	"
//! BUILD_REQUIRES="haiku${secondaryArchSuffix}_devel devel:libz \
//! 	devel:libpng"
//! BUILD_PREREQUIRES=cmd:make
//! ```
//!
//! The parser is a line-oriented state machine. Outside of a block it looks
//! for one of the recognized assignments; inside a block it accumulates the
//! value until the closing quote (or, for unquoted values, the last
//! continuation line). Everything else in the recipe is ignored, and nothing
//! a recipe contains can make parsing fail.

use crate::error::Result;
use crate::recipe::item::{normalize, DependencyItem};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// An assignment the parser extracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Provides,
    BuildRequires,
    BuildPrerequires,
}

impl Section {
    pub const ALL: [Section; 3] = [Self::Provides, Self::BuildRequires, Self::BuildPrerequires];

    /// Shell variable name of this section
    pub fn variable(&self) -> &'static str {
        match self {
            Self::Provides => "PROVIDES",
            Self::BuildRequires => "BUILD_REQUIRES",
            Self::BuildPrerequires => "BUILD_PREREQUIRES",
        }
    }

    /// Match `NAME=value` against the recognized names, returning the value part
    fn match_assignment(line: &str) -> Option<(Self, &str)> {
        Self::ALL.iter().find_map(|section| {
            line.strip_prefix(section.variable())
                .and_then(|rest| rest.strip_prefix('='))
                .map(|value| (*section, value))
        })
    }
}

/// Cleaned items extracted from one recipe
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecipeSections {
    pub provides: BTreeSet<DependencyItem>,
    pub build_requires: BTreeSet<DependencyItem>,
    pub build_prerequires: BTreeSet<DependencyItem>,
}

impl RecipeSections {
    /// Everything needed to build the recipe: requires and prerequires together
    pub fn build_dependencies(&self) -> BTreeSet<DependencyItem> {
        self.build_requires
            .union(&self.build_prerequires)
            .cloned()
            .collect()
    }

    pub fn section(&self, section: Section) -> &BTreeSet<DependencyItem> {
        match section {
            Section::Provides => &self.provides,
            Section::BuildRequires => &self.build_requires,
            Section::BuildPrerequires => &self.build_prerequires,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut BTreeSet<DependencyItem> {
        match section {
            Section::Provides => &mut self.provides,
            Section::BuildRequires => &mut self.build_requires,
            Section::BuildPrerequires => &mut self.build_prerequires,
        }
    }

    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|s| self.section(*s).is_empty())
    }
}

/// How the value of an open block was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quoting {
    /// `NAME="...` runs until a line ending in an unescaped quote
    Quoted,
    /// `NAME=value \` runs until a line without a trailing backslash
    Unquoted,
}

/// A block whose value spans several lines
#[derive(Debug)]
struct OpenBlock {
    section: Section,
    quoting: Quoting,
    text: String,
}

#[derive(Debug)]
enum ParseState {
    Outside,
    InBlock(OpenBlock),
}

/// Incremental recipe parser, fed one line at a time
#[derive(Debug)]
pub struct BlockParser {
    state: ParseState,
    sections: RecipeSections,
}

impl Default for BlockParser {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockParser {
    pub fn new() -> Self {
        Self {
            state: ParseState::Outside,
            sections: RecipeSections::default(),
        }
    }

    /// Advance the state machine by one line
    pub fn feed_line(&mut self, line: &str) {
        let state = std::mem::replace(&mut self.state, ParseState::Outside);
        self.state = match state {
            ParseState::Outside => self.start_block(line),
            ParseState::InBlock(block) => self.continue_block(block, line),
        };
    }

    /// Flush any unterminated block and return what was collected
    pub fn finish(mut self) -> RecipeSections {
        if let ParseState::InBlock(block) = std::mem::replace(&mut self.state, ParseState::Outside) {
            self.complete(block.section, &block.text);
        }
        self.sections
    }

    fn start_block(&mut self, line: &str) -> ParseState {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return ParseState::Outside;
        }
        let Some((section, value)) = Section::match_assignment(trimmed) else {
            return ParseState::Outside;
        };
        let value = strip_inline_comment(value).trim();

        if let Some(inner) = fully_quoted(value) {
            self.complete(section, &unescape_quotes(inner));
            return ParseState::Outside;
        }

        if let Some(rest) = value.strip_prefix('"') {
            let mut block = OpenBlock {
                section,
                quoting: Quoting::Quoted,
                text: String::new(),
            };
            append_piece(&mut block.text, rest);
            return ParseState::InBlock(block);
        }

        if let Some(rest) = value.strip_suffix('\\') {
            let mut block = OpenBlock {
                section,
                quoting: Quoting::Unquoted,
                text: String::new(),
            };
            append_piece(&mut block.text, rest);
            return ParseState::InBlock(block);
        }

        // Unterminated and unmarked: take the line as the whole value
        self.complete(section, value);
        ParseState::Outside
    }

    fn continue_block(&mut self, mut block: OpenBlock, line: &str) -> ParseState {
        let piece = strip_inline_comment(line).trim();

        if block.quoting == Quoting::Quoted && ends_with_closing_quote(piece) {
            block.text.push_str(&unescape_quotes(&piece[..piece.len() - 1]));
            self.complete(block.section, &block.text);
            return ParseState::Outside;
        }

        if piece.ends_with('\\') || block.quoting == Quoting::Quoted {
            append_piece(&mut block.text, piece);
            return ParseState::InBlock(block);
        }

        block.text.push_str(piece);
        self.complete(block.section, &block.text);
        ParseState::Outside
    }

    /// Split a finished value into tokens and record the ones that survive cleaning
    fn complete(&mut self, section: Section, text: &str) {
        let content = text.trim().trim_matches(is_quote);
        let target = self.sections.section_mut(section);
        for token in content.split_whitespace() {
            let token = token.trim_matches(is_quote);
            if token.is_empty() {
                continue;
            }
            if let Some(item) = normalize(token) {
                target.insert(item);
            }
        }
    }
}

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Append one line's worth of value text, turning a trailing backslash into a separator
fn append_piece(text: &mut String, piece: &str) {
    let piece = piece.strip_suffix('\\').unwrap_or(piece);
    text.push_str(unescape_quotes(piece.trim()).as_str());
    text.push(' ');
}

/// The inside of `"value"` or `'value'` when the whole value is quoted on one line
fn fully_quoted(value: &str) -> Option<&str> {
    if value.len() < 2 {
        return None;
    }
    if value.starts_with('"') && ends_with_closing_quote(value) {
        return Some(&value[1..value.len() - 1]);
    }
    if value.starts_with('\'') && value.ends_with('\'') {
        return Some(&value[1..value.len() - 1]);
    }
    None
}

/// Ends in `"` that is not written as `\"`
fn ends_with_closing_quote(s: &str) -> bool {
    s.ends_with('"') && !s.ends_with("\\\"")
}

fn unescape_quotes(s: &str) -> String {
    s.replace("\\\"", "\"")
}

/// Cut a line at its first `#` that is not escaped
fn strip_inline_comment(line: &str) -> &str {
    let mut prev = None;
    for (pos, c) in line.char_indices() {
        if c == '#' && prev != Some('\\') {
            return &line[..pos];
        }
        prev = Some(c);
    }
    line
}

/// Parse recipe text
pub fn parse_recipe(content: &str) -> RecipeSections {
    let mut parser = BlockParser::new();
    for line in content.lines() {
        parser.feed_line(line);
    }
    parser.finish()
}

/// Parse a recipe file
///
/// Invalid UTF-8 is replaced rather than rejected; only failing to read the
/// file at all is an error.
pub fn parse_recipe_file(path: &Path) -> Result<RecipeSections> {
    let bytes = std::fs::read(path)?;
    Ok(parse_recipe(&String::from_utf8_lossy(&bytes)))
}

/// Source of parsed recipes
///
/// The index builder and the resolver read recipes through this trait so
/// that callers can cache, count or fake recipe reads.
pub trait RecipeReader {
    fn read_recipe(&self, path: &Path) -> Result<RecipeSections>;
}

/// Reads recipes straight from disk
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRecipeReader;

impl RecipeReader for FsRecipeReader {
    fn read_recipe(&self, path: &Path) -> Result<RecipeSections> {
        parse_recipe_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn names(set: &BTreeSet<DependencyItem>) -> Vec<String> {
        set.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn test_single_line_quoted() {
        let sections = parse_recipe(r#"BUILD_REQUIRES="devel:libz cmd:make""#);
        assert_eq!(names(&sections.build_requires), vec!["cmd:make", "devel:libz"]);
        assert!(sections.provides.is_empty());
    }

    #[test]
    fn test_typical_recipe() {
        let content = r#"
SUMMARY="A test library"
PROVIDES="
	libfoo$secondaryArchSuffix
	lib:libfoo$secondaryArchSuffix
	"
REQUIRES="
	haiku$secondaryArchSuffix
	lib:libz$secondaryArchSuffix
	"
BUILD_REQUIRES="
	haiku${secondaryArchSuffix}_devel
	devel:libz$secondaryArchSuffix
	"
BUILD_PREREQUIRES="
	cmd:gcc$secondaryArchSuffix
	cmd:make
	cmd:pkg_config$secondaryArchSuffix
	"

BUILD()
{
	make $jobArgs
}
"#;
        let sections = parse_recipe(content);
        assert_eq!(names(&sections.provides), vec!["lib:libfoo", "libfoo"]);
        assert_eq!(names(&sections.build_requires), vec!["devel:libz"]);
        assert_eq!(
            names(&sections.build_prerequires),
            vec!["cmd:gcc", "cmd:make", "cmd:pkg_config"]
        );
        assert_eq!(
            names(&sections.build_dependencies()),
            vec!["cmd:gcc", "cmd:make", "cmd:pkg_config", "devel:libz"]
        );
    }

    #[test]
    fn test_continuation_matches_single_line() {
        let multi = parse_recipe("BUILD_REQUIRES=\"foo \\\n  bar\"\n");
        let single = parse_recipe("BUILD_REQUIRES=\"foo bar\"\n");
        assert_eq!(multi, single);
        assert_eq!(names(&single.build_requires), vec!["bar", "foo"]);
    }

    #[test]
    fn test_unquoted_continuation() {
        let content = "BUILD_REQUIRES=cmd:make \\\n\tcmd:cmake \\\n\tcmd:ninja\nPROVIDES=foo\n";
        let sections = parse_recipe(content);
        assert_eq!(
            names(&sections.build_requires),
            vec!["cmd:cmake", "cmd:make", "cmd:ninja"]
        );
        assert_eq!(names(&sections.provides), vec!["foo"]);
    }

    #[test]
    fn test_unquoted_single_value() {
        let sections = parse_recipe("BUILD_PREREQUIRES=cmd:make\nPROVIDES='bar'\n");
        assert_eq!(names(&sections.build_prerequires), vec!["cmd:make"]);
        assert_eq!(names(&sections.provides), vec!["bar"]);
    }

    #[test]
    fn test_opening_quote_with_content() {
        let content = "BUILD_REQUIRES=\"devel:libz\n\tdevel:libpng\n\t\"\n";
        let sections = parse_recipe(content);
        assert_eq!(names(&sections.build_requires), vec!["devel:libpng", "devel:libz"]);
    }

    #[test]
    fn test_inline_comments() {
        let content = r#"
# BUILD_REQUIRES="commented:out"
BUILD_REQUIRES="cmd:make # needed for the build
	# devel:ignored
	devel:libz # zlib
	"
PROVIDES="foo" # trailing comment
"#;
        let sections = parse_recipe(content);
        assert_eq!(names(&sections.build_requires), vec!["cmd:make", "devel:libz"]);
        assert_eq!(names(&sections.provides), vec!["foo"]);
    }

    #[test]
    fn test_escaped_quote_does_not_close() {
        let content = "BUILD_REQUIRES=\"cmd:make \\\"\n\tcmd:flex\n\t\"\nPROVIDES=\"foo\"\n";
        let sections = parse_recipe(content);
        assert_eq!(names(&sections.build_requires), vec!["cmd:flex", "cmd:make"]);
        assert_eq!(names(&sections.provides), vec!["foo"]);
    }

    #[test]
    fn test_unterminated_block_is_flushed() {
        let content = "PROVIDES=\"foo\"\nBUILD_REQUIRES=\"\n\tcmd:bison\n\tcmd:m4";
        let sections = parse_recipe(content);
        assert_eq!(names(&sections.build_requires), vec!["cmd:bison", "cmd:m4"]);
    }

    #[test]
    fn test_other_assignments_ignored() {
        let content = r#"
PROVIDES_devel="devel:libfoo"
BUILD_REQUIRES_x86="cmd:nope"
REQUIRES="lib:libz"
PROVIDES="foo"
"#;
        let sections = parse_recipe(content);
        assert_eq!(names(&sections.provides), vec!["foo"]);
        assert!(sections.build_requires.is_empty());
    }

    #[test]
    fn test_repeated_and_indented_assignments_accumulate() {
        let content = r#"
BUILD_REQUIRES="cmd:make"
if [ "$targetArchitecture" = x86_gcc2 ]; then
	BUILD_REQUIRES="$BUILD_REQUIRES cmd:gcc"
fi
"#;
        let sections = parse_recipe(content);
        assert_eq!(names(&sections.build_requires), vec!["cmd:gcc", "cmd:make"]);
    }

    #[test]
    fn test_placeholder_values_dropped() {
        let sections = parse_recipe("BUILD_REQUIRES=\"none\"\nBUILD_PREREQUIRES=\n");
        assert!(sections.is_empty());
    }

    #[test]
    fn test_strip_inline_comment() {
        assert_eq!(strip_inline_comment("a b # c"), "a b ");
        assert_eq!(strip_inline_comment("a \\# b"), "a \\# b");
        assert_eq!(strip_inline_comment("# all"), "");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = FsRecipeReader.read_recipe(&dir.path().join("missing.recipe"));
        assert!(matches!(result, Err(Error::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_read_recipe_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("foo-1.0.recipe");
        std::fs::write(&path, "PROVIDES=\"foo\"\nBUILD_REQUIRES=\"lib:bar\"\n").unwrap();
        let sections = parse_recipe_file(&path).unwrap();
        assert_eq!(names(&sections.provides), vec!["foo"]);
        assert_eq!(names(&sections.build_requires), vec!["lib:bar"]);
    }
}
