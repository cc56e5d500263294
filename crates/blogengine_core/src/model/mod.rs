//! Blog content model.
//!
//! # Responsibility
//! - Define the Category, Tag and Post records plus their write inputs.
//! - Own field normalization and validation rules shared by every writer.
//!
//! # Invariants
//! - Records are identified by store-assigned integer ids.
//! - Post references categories and tags by id; it owns neither.
//! - Site and author ids are weak references with no ownership.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub mod category;
pub mod post;
pub mod slug;
pub mod tag;
pub mod term;
pub mod validation;

/// Record kinds managed by the content store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    Category,
    Tag,
    Post,
}

impl EntityKind {
    /// All kinds, in admin listing order.
    pub const ALL: [EntityKind; 3] = [Self::Category, Self::Tag, Self::Post];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
            Self::Post => "post",
        }
    }

    /// Category and tag slugs always follow the name; post slugs are edited.
    pub fn derives_slug_from_name(self) -> bool {
        matches!(self, Self::Category | Self::Tag)
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "category" | "categories" => Ok(Self::Category),
            "tag" | "tags" => Ok(Self::Tag),
            "post" | "posts" => Ok(Self::Post),
            other => Err(format!(
                "unknown entity `{other}`; expected category|tag|post"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::EntityKind;

    #[test]
    fn entity_kind_parses_singular_and_plural_names() {
        assert_eq!("Post".parse::<EntityKind>().unwrap(), EntityKind::Post);
        assert_eq!("tags".parse::<EntityKind>().unwrap(), EntityKind::Tag);
        assert!("user".parse::<EntityKind>().is_err());
    }
}
