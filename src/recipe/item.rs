// src/recipe/item.rs

//! Dependency item cleaning
//!
//! Recipes refer to what they provide and require with loosely written tokens:
//!
//! ```text
//! lib:libssl$secondaryArchSuffix >= 1.1
//! cmd:python3.9_x86
//! devel:libz_devel
//! ```
//!
//! [`normalize`] turns one such token into a [`DependencyItem`], a prefix tag
//! plus a bare name with versions, architecture variables and build suffixes
//! removed. The cleaning rules live in the ordered tables below so they can be
//! audited and tested without touching the filesystem.
//!
//! Package families (`python3.9` vs `python`) are deliberately left alone
//! here; mapping a family member to its recipe directory is the job of
//! [`crate::recipe::locate`].

use crate::error::{Error, Result};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Functional category marker carried in front of a name (`cmd:`, `lib:`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrefixTag {
    /// No prefix: a plain package name
    #[default]
    None,
    /// Command found on the path
    Cmd,
    /// Shared library
    Lib,
    /// Development files (headers, static libraries)
    Devel,
    /// Package by hpkg name
    Hpkg,
    /// Data files
    Data,
    /// Source package
    Source,
    /// Generic capability
    Generic,
    /// Package by name
    Package,
}

/// Tags recognized at the start of a raw token, in matching order
pub const RECOGNIZED_PREFIXES: &[PrefixTag] = &[
    PrefixTag::Cmd,
    PrefixTag::Lib,
    PrefixTag::Devel,
    PrefixTag::Hpkg,
    PrefixTag::Data,
    PrefixTag::Source,
    PrefixTag::Generic,
    PrefixTag::Package,
];

/// Order in which a bare user-supplied name is tried against the provides index
pub const LOOKUP_ORDER: &[PrefixTag] = &[
    PrefixTag::None,
    PrefixTag::Package,
    PrefixTag::Cmd,
    PrefixTag::Lib,
    PrefixTag::Devel,
    PrefixTag::Hpkg,
    PrefixTag::Generic,
    PrefixTag::Source,
];

/// Version comparison operators; the name is cut at the first one found, in this order
pub const VERSION_OPERATORS: &[&str] = &["==", ">=", "<=", ">", "<", "~=", "!=", "=", "%"];

/// Recipe variables that expand to architecture or version text
///
/// Removed as plain substrings. Braced forms come first so that a bare form
/// never eats part of a braced one.
pub const VARIABLE_PLACEHOLDERS: &[&str] = &[
    "${secondaryArchSuffix}",
    "${effectiveTargetArchitecture}",
    "${arch}",
    "${portVersion}",
    "${majorVersion}",
    "${minorVersion}",
    "${patchVersion}",
    "$secondaryArchSuffix",
    "$effectiveTargetArchitecture",
    "$arch",
    "$portVersion",
    "$majorVersion",
    "$minorVersion",
    "$patchVersion",
];

/// Architecture and build-variant suffixes, longest first
pub const ARCH_SUFFIXES: &[&str] = &[
    "_primaryArch",
    "_source_kit",
    "_bootstrap",
    "_x86_gcc2",
    "_x86_64",
    "_source",
    "_devel",
    "_tools",
    "_build",
    "_cross",
    "_host",
    "_gcc2",
    "_x86",
    "_any",
];

/// Values that are switches or placeholders, never package names
pub const PLACEHOLDER_LITERALS: &[&str] = &["none", "any", "set", "yes", "no", "true", "false"];

/// The operating system meta package every recipe implicitly depends on
pub const META_NAME: &str = "haiku";

impl PrefixTag {
    /// The tag as written in recipes, including the trailing colon
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Cmd => "cmd:",
            Self::Lib => "lib:",
            Self::Devel => "devel:",
            Self::Hpkg => "hpkg:",
            Self::Data => "data:",
            Self::Source => "source:",
            Self::Generic => "generic:",
            Self::Package => "package:",
        }
    }

    /// Split a recognized tag off the front of `token`
    ///
    /// Returns `PrefixTag::None` and the token untouched when no tag matches.
    pub fn split(token: &str) -> (Self, &str) {
        for tag in RECOGNIZED_PREFIXES {
            if let Some(rest) = token.strip_prefix(tag.as_str()) {
                return (*tag, rest);
            }
        }
        (Self::None, token)
    }

    /// Whether `token` starts with a recognized tag
    pub fn is_prefixed(token: &str) -> bool {
        !matches!(Self::split(token).0, Self::None)
    }
}

impl fmt::Display for PrefixTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned dependency name such as `lib:openssl` or `cmake`
///
/// Only [`normalize`] builds these, so the name part never holds a version,
/// a leading variable, a build suffix or a placeholder value. Two items are
/// equal exactly when their `prefix + basename` strings are equal, and they
/// sort by that string too.
#[derive(Debug, Clone)]
pub struct DependencyItem {
    prefix: PrefixTag,
    basename: String,
}

impl DependencyItem {
    pub fn prefix(&self) -> PrefixTag {
        self.prefix
    }

    pub fn basename(&self) -> &str {
        &self.basename
    }

    /// The same name under a different prefix tag
    pub fn with_prefix(&self, prefix: PrefixTag) -> Self {
        Self {
            prefix,
            basename: self.basename.clone(),
        }
    }

    fn bytes(&self) -> impl Iterator<Item = u8> + '_ {
        self.prefix.as_str().bytes().chain(self.basename.bytes())
    }
}

impl PartialEq for DependencyItem {
    fn eq(&self, other: &Self) -> bool {
        self.bytes().eq(other.bytes())
    }
}

impl Eq for DependencyItem {}

impl Hash for DependencyItem {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for byte in self.bytes() {
            state.write_u8(byte);
        }
        state.write_u8(0xff);
    }
}

impl Ord for DependencyItem {
    fn cmp(&self, other: &Self) -> Ordering {
        self.bytes().cmp(other.bytes())
    }
}

impl PartialOrd for DependencyItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for DependencyItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, self.basename)
    }
}

impl FromStr for DependencyItem {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        normalize(s).ok_or_else(|| Error::ParseError(format!("'{}' is not a usable dependency name", s)))
    }
}

impl Serialize for DependencyItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Clean a raw recipe token into a dependency item
///
/// Returns `None` for tokens that do not name anything buildable: empty
/// names, the `haiku` meta package, unexpanded variables and switch values
/// such as `none` or `true`. Normalizing the string form of a result gives
/// the same result back.
pub fn normalize(raw: &str) -> Option<DependencyItem> {
    let (prefix, rest) = PrefixTag::split(raw);

    let mut name = rest;
    if let Some(pos) = name.find(char::is_whitespace) {
        name = &name[..pos];
    }
    for op in VERSION_OPERATORS {
        if let Some(pos) = name.find(op) {
            name = &name[..pos];
        }
    }

    let cleaned = remove_placeholders(name);
    let mut name = strip_arch_suffixes(&cleaned);

    // A tag can surface once a leading placeholder is gone ("$archcmd:foo")
    let mut prefix = prefix;
    if prefix == PrefixTag::None {
        (prefix, name) = PrefixTag::split(name);
    }

    if is_rejected(name) {
        return None;
    }

    Some(DependencyItem {
        prefix,
        basename: name.to_string(),
    })
}

/// Remove every known variable placeholder, repeating until nothing changes
fn remove_placeholders(name: &str) -> String {
    let mut current = name.to_string();
    loop {
        let mut next = current.clone();
        for placeholder in VARIABLE_PLACEHOLDERS {
            next = next.replace(placeholder, "");
        }
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Strip build suffixes and the underscores they leave behind
fn strip_arch_suffixes(name: &str) -> &str {
    let mut name = name;
    loop {
        let trimmed = ARCH_SUFFIXES
            .iter()
            .find_map(|suffix| name.strip_suffix(suffix))
            .unwrap_or(name)
            .trim_end_matches('_');
        if trimmed == name {
            return name;
        }
        name = trimmed;
    }
}

fn is_rejected(name: &str) -> bool {
    name.is_empty()
        || name == META_NAME
        || name.starts_with('$')
        || PLACEHOLDER_LITERALS.contains(&name)
}
