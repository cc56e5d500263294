//! Tag record.

use serde::{Deserialize, Serialize};

pub type TagId = i64;

/// Free-form label attached to any number of posts through `post_tags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub description: String,
    /// Derived from `name`; unique across tags.
    pub slug: String,
}

pub type TagDraft = super::term::TermDraft;
pub type TagChanges = super::term::TermChanges;
