// src/resolver/plan.rs

//! Resolution result types
//!
//! Contains the outcome of a resolver run and the filter that removes the
//! requested packages themselves from it.

use crate::diagnostics::Diagnostics;
use crate::recipe::DependencyItem;
use serde::Serialize;
use std::collections::BTreeSet;

/// Result of resolving build dependencies
#[derive(Debug, Clone, Serialize)]
pub struct Resolution {
    /// Names as the caller supplied them
    pub requested: Vec<String>,
    /// Every build requirement found, before filtering
    #[serde(skip)]
    pub discovered: BTreeSet<DependencyItem>,
    /// Build requirements other than the requested packages, sorted
    pub dependencies: BTreeSet<DependencyItem>,
    /// Problems met along the way
    pub diagnostics: Diagnostics,
}

/// Drop discovered items that name one of the requested packages
///
/// An item is dropped when either its full form (`cmd:gcc`) or its bare name
/// (`gcc`) equals a requested string, so asking for `gcc` also hides
/// `cmd:gcc` and `lib:gcc`.
pub fn filter_requested<S: AsRef<str>>(
    discovered: &BTreeSet<DependencyItem>,
    requested: &[S],
) -> BTreeSet<DependencyItem> {
    discovered
        .iter()
        .filter(|item| {
            let full = item.to_string();
            !requested
                .iter()
                .any(|name| name.as_ref() == full || name.as_ref() == item.basename())
        })
        .cloned()
        .collect()
}
