//! Entity kinds, entity ids and derived row keys.
//!
//! # Design
//! - Keys are derived from the current snapshot and never persisted.
//! - A key carries its kind plus the id path from the outermost parent down to
//!   the entity; the `kind:parent:id` text form is only used for display.
//! - Child keys are scoped to exactly one parent context.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KeyParseError;

const SEGMENT_SEPARATOR: char = ':';

/// Kind of catalog entity a row represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Menu group containing categories.
    Label,
    /// Group of products; a leaf in the menu view.
    Category,
    /// Catalog product.
    Product,
}

impl EntityKind {
    /// Stable identifier used in key text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Category => "category",
            Self::Product => "product",
        }
    }

    /// Lowercase plural used in undo labels.
    #[must_use]
    pub const fn plural_slug(self) -> &'static str {
        match self {
            Self::Label => "labels",
            Self::Category => "categories",
            Self::Product => "products",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = KeyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "label" => Ok(Self::Label),
            "category" => Ok(Self::Category),
            "product" => Ok(Self::Product),
            other => Err(KeyParseError::UnknownKind {
                value: other.to_string(),
            }),
        }
    }
}

/// Stable database identifier of an entity.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntityId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Stable row identifier: entity kind plus ancestry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowKey {
    kind: EntityKind,
    ancestors: Vec<EntityId>,
    id: EntityId,
}

impl RowKey {
    /// Key for a row with no parent context (`kind:id`).
    #[must_use]
    pub const fn flat(kind: EntityKind, id: EntityId) -> Self {
        Self {
            kind,
            ancestors: Vec::new(),
            id,
        }
    }

    /// Key for a row shown under one parent (`kind:parentId:id`).
    #[must_use]
    pub fn nested(kind: EntityKind, parent: EntityId, id: EntityId) -> Self {
        Self {
            kind,
            ancestors: vec![parent],
            id,
        }
    }

    /// Entity kind encoded in the key.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Entity id of the row itself.
    #[must_use]
    pub const fn entity_id(&self) -> &EntityId {
        &self.id
    }

    /// Id of the immediate parent context, if any.
    #[must_use]
    pub fn parent_id(&self) -> Option<&EntityId> {
        self.ancestors.last()
    }

    /// Full id path from the outermost ancestor down to the entity.
    pub fn path(&self) -> impl Iterator<Item = &EntityId> {
        self.ancestors.iter().chain(std::iter::once(&self.id))
    }
}

impl Display for RowKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.kind.as_str())?;
        for segment in self.path() {
            write!(formatter, "{SEGMENT_SEPARATOR}{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for RowKey {
    type Err = KeyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let Some((kind, rest)) = value.split_once(SEGMENT_SEPARATOR) else {
            return Err(KeyParseError::MissingKind {
                value: value.to_string(),
            });
        };
        let kind = kind.parse::<EntityKind>()?;
        let mut segments = rest
            .split(SEGMENT_SEPARATOR)
            .map(|segment| {
                if segment.is_empty() {
                    Err(KeyParseError::EmptySegment {
                        value: value.to_string(),
                    })
                } else {
                    Ok(EntityId::from(segment))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        let Some(id) = segments.pop() else {
            return Err(KeyParseError::EmptySegment {
                value: value.to_string(),
            });
        };
        Ok(Self {
            kind,
            ancestors: segments,
            id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_flat_and_nested_forms() {
        let flat = RowKey::flat(EntityKind::Label, "g1".into());
        let nested = RowKey::nested(EntityKind::Category, "g1".into(), "c7".into());
        assert_eq!(flat.to_string(), "label:g1");
        assert_eq!(nested.to_string(), "category:g1:c7");
        assert_eq!(nested.parent_id().map(EntityId::as_str), Some("g1"));
        assert_eq!(nested.entity_id().as_str(), "c7");
    }

    #[test]
    fn parse_accepts_display_output() {
        let key: RowKey = "category:g1:c7".parse().expect("key should parse");
        assert_eq!(key.kind(), EntityKind::Category);
        assert_eq!(key, RowKey::nested(EntityKind::Category, "g1".into(), "c7".into()));
    }

    #[test]
    fn parse_rejects_malformed_keys() {
        assert!(matches!(
            "g1".parse::<RowKey>(),
            Err(KeyParseError::MissingKind { .. })
        ));
        assert!(matches!(
            "widget:g1".parse::<RowKey>(),
            Err(KeyParseError::UnknownKind { value }) if value == "widget"
        ));
        assert!(matches!(
            "category:g1::c7".parse::<RowKey>(),
            Err(KeyParseError::EmptySegment { .. })
        ));
        assert!(matches!(
            "label:".parse::<RowKey>(),
            Err(KeyParseError::EmptySegment { .. })
        ));
    }

    #[test]
    fn same_child_under_two_parents_yields_distinct_keys() {
        let first = RowKey::nested(EntityKind::Category, "g1".into(), "c1".into());
        let second = RowKey::nested(EntityKind::Category, "g2".into(), "c1".into());
        assert_ne!(first, second);
        assert_eq!(first.entity_id(), second.entity_id());
    }

    #[test]
    fn plural_slugs_name_undo_labels() {
        assert_eq!(EntityKind::Category.plural_slug(), "categories");
        assert_eq!(EntityKind::Label.plural_slug(), "labels");
    }
}
