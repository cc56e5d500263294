//! Shared write inputs for the name/description/slug records.
//!
//! Category and Tag have the same shape and rules; they differ only in which
//! table they live in and how posts reference them.

use super::slug::{is_valid_slug, slugify};
use super::validation::{required_text, ValidationError, NAME_MAX_CHARS};
use super::EntityKind;

/// Create input for a category or tag. The slug is always derived from `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermDraft {
    pub name: String,
    pub description: String,
}

impl TermDraft {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Trims the name and derives its slug. The description is kept verbatim.
    pub fn validate(&self, entity: EntityKind) -> Result<TermFields, ValidationError> {
        let name = required_text(entity, "name", &self.name, NAME_MAX_CHARS)?;
        let slug = slugify(&name);
        if slug.is_empty() {
            return Err(ValidationError::Required {
                entity,
                field: "slug",
            });
        }
        if !is_valid_slug(&slug) {
            return Err(ValidationError::InvalidSlug { entity, slug });
        }
        Ok(TermFields {
            name,
            description: self.description.clone(),
            slug,
        })
    }
}

/// Partial update for a category or tag. `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermChanges {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl TermChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Validated column values ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermFields {
    pub name: String,
    pub description: String,
    pub slug: String,
}
