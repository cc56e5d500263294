//! Category record.

use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

/// A post belongs to at most one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    /// Derived from `name`; unique across categories.
    pub slug: String,
}

pub type CategoryDraft = super::term::TermDraft;
pub type CategoryChanges = super::term::TermChanges;
