// src/diagnostics.rs

//! Diagnostics collected while indexing and resolving
//!
//! Nothing that goes wrong inside a recipe corpus aborts a run. Unreadable
//! directories, unreadable recipes, duplicate providers and names nobody
//! provides are all recorded here and logged through `tracing` as they
//! happen. The caller decides how to present them and which exit code to use.

use crate::recipe::DependencyItem;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    /// Resolution cannot produce a meaningful answer
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// What happened
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No recipe provides this name
    UnresolvableName { name: String },
    /// A corpus directory could not be listed
    UnreadableDirectory { path: PathBuf, reason: String },
    /// A recipe file could not be read
    UnreadableRecipe { path: PathBuf, reason: String },
    /// Two recipes provide the same name; `replacement` won
    DuplicateProvider {
        item: DependencyItem,
        previous: PathBuf,
        replacement: PathBuf,
    },
    /// A requested package's recipe lists no build requirements
    NoBuildRequirements { name: String, recipe: PathBuf },
    /// Indexing found no provided names at all
    EmptyIndex { root: PathBuf },
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            Self::NoBuildRequirements { .. } => Severity::Info,
            Self::EmptyIndex { .. } => Severity::Fatal,
            _ => Severity::Warning,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnresolvableName { name } => {
                write!(f, "No recipe provides '{}', treating it as external", name)
            }
            Self::UnreadableDirectory { path, reason } => {
                write!(f, "Could not read directory {}: {}", path.display(), reason)
            }
            Self::UnreadableRecipe { path, reason } => {
                write!(f, "Could not read recipe {}: {}", path.display(), reason)
            }
            Self::DuplicateProvider {
                item,
                previous,
                replacement,
            } => write!(
                f,
                "'{}' is provided by both {} and {}; using {}",
                item,
                previous.display(),
                replacement.display(),
                replacement.display()
            ),
            Self::NoBuildRequirements { name, recipe } => write!(
                f,
                "No build requirements found for '{}' in {}",
                name,
                recipe.display()
            ),
            Self::EmptyIndex { root } => write!(
                f,
                "No provided names found under {}; is this a recipe tree?",
                root.display()
            ),
        }
    }
}

/// A severity-tagged message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.kind)
    }
}

/// Ordered log of diagnostics for one run
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and log it at the matching level
    pub fn push(&mut self, kind: DiagnosticKind) {
        let severity = kind.severity();
        match severity {
            Severity::Info => info!("{}", kind),
            Severity::Warning => warn!("{}", kind),
            Severity::Fatal => error!("{}", kind),
        }
        self.entries.push(Diagnostic { severity, kind });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of diagnostics at exactly this severity
    pub fn count(&self, severity: Severity) -> usize {
        self.entries.iter().filter(|d| d.severity == severity).count()
    }

    pub fn has_fatal(&self) -> bool {
        self.count(Severity::Fatal) > 0
    }
}
