//! Validation failures raised before any content write.

use super::category::CategoryId;
use super::tag::TagId;
use super::EntityKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Post titles longer than this are rejected.
pub const TITLE_MAX_CHARS: usize = 200;
/// Category and tag names longer than this are rejected.
pub const NAME_MAX_CHARS: usize = 50;

/// Field-level validation error for content writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Required field is empty after trimming.
    Required {
        entity: EntityKind,
        field: &'static str,
    },
    TooLong {
        entity: EntityKind,
        field: &'static str,
        max_chars: usize,
    },
    InvalidSlug {
        entity: EntityKind,
        slug: String,
    },
    /// Another record of the same kind already uses this slug.
    SlugTaken {
        entity: EntityKind,
        slug: String,
    },
    /// Another record of the same kind already uses this name.
    NameTaken {
        entity: EntityKind,
        name: String,
    },
    UnknownCategory(CategoryId),
    UnknownTag(TagId),
}

impl ValidationError {
    /// Form field the error belongs to.
    ///
    /// Category and tag slugs are derived from the name, so slug failures
    /// for those kinds are reported on `name`.
    pub fn field(&self) -> &'static str {
        let field = match self {
            Self::Required { field, .. } | Self::TooLong { field, .. } => *field,
            Self::InvalidSlug { .. } | Self::SlugTaken { .. } => "slug",
            Self::NameTaken { .. } => "name",
            Self::UnknownCategory(_) => "category",
            Self::UnknownTag(_) => "tags",
        };
        if field == "slug" && self.entity().derives_slug_from_name() {
            "name"
        } else {
            field
        }
    }

    /// Kind of record that failed validation.
    pub fn entity(&self) -> EntityKind {
        match self {
            Self::Required { entity, .. }
            | Self::TooLong { entity, .. }
            | Self::InvalidSlug { entity, .. }
            | Self::SlugTaken { entity, .. }
            | Self::NameTaken { entity, .. } => *entity,
            Self::UnknownCategory(_) | Self::UnknownTag(_) => EntityKind::Post,
        }
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required { entity, field: "slug" } if entity.derives_slug_from_name() => write!(
                f,
                "{entity} name must contain at least one letter or number"
            ),
            Self::InvalidSlug { entity, slug } if entity.derives_slug_from_name() => write!(
                f,
                "{entity} name produces slug `{slug}`, which may only contain letters, numbers, underscores or hyphens"
            ),
            Self::SlugTaken { entity, slug } if entity.derives_slug_from_name() => write!(
                f,
                "{entity} name produces slug `{slug}`, which another {entity} already uses"
            ),
            Self::Required { entity, field } => write!(f, "{entity} {field} is required"),
            Self::TooLong {
                entity,
                field,
                max_chars,
            } => write!(
                f,
                "{entity} {field} must be at most {max_chars} characters"
            ),
            Self::InvalidSlug { entity, slug } => write!(
                f,
                "{entity} slug `{slug}` may only contain letters, numbers, underscores or hyphens"
            ),
            Self::SlugTaken { entity, slug } => {
                write!(f, "{entity} with slug `{slug}` already exists")
            }
            Self::NameTaken { entity, name } => {
                write!(f, "{entity} with name `{name}` already exists")
            }
            Self::UnknownCategory(id) => write!(f, "category {id} does not exist"),
            Self::UnknownTag(id) => write!(f, "tag {id} does not exist"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and checks it is present and within `max_chars`.
pub(crate) fn required_text(
    entity: EntityKind,
    field: &'static str,
    value: &str,
    max_chars: usize,
) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { entity, field });
    }
    if trimmed.chars().count() > max_chars {
        return Err(ValidationError::TooLong {
            entity,
            field,
            max_chars,
        });
    }
    Ok(trimmed.to_string())
}
