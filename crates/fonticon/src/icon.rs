//! Icon definitions and the grouped catalog built from them.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::{Error, Result};

/// One icon as published by an icon set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconDefinition {
    /// Stable identifier, e.g. `star`
    pub id: SmolStr,
    /// Human-readable name, e.g. `Star`
    pub name: SmolStr,
    /// Codepoint within the icon font, e.g. `f005`
    pub unicode: SmolStr,
    /// Categories the icon was published under
    #[serde(default)]
    pub categories: BTreeSet<SmolStr>,
}

/// Icons grouped by category.
///
/// Categories iterate in ascending key order. Within a category icons are
/// ordered by name, compared case-insensitively, with ties kept in source
/// order. An icon published under N categories appears once in each.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    groups: BTreeMap<SmolStr, Vec<IconDefinition>>,
}

impl Catalog {
    /// Group definitions by category.
    ///
    /// A definition whose id already exists within a category replaces the
    /// earlier one in place (last write wins, first position kept).
    pub fn from_definitions(definitions: impl IntoIterator<Item = IconDefinition>) -> Self {
        let mut grouped: BTreeMap<SmolStr, IndexMap<SmolStr, IconDefinition>> = BTreeMap::new();

        for icon in definitions {
            for category in &icon.categories {
                grouped
                    .entry(category.clone())
                    .or_default()
                    .insert(icon.id.clone(), icon.clone());
            }
        }

        let groups = grouped
            .into_iter()
            .map(|(category, icons)| {
                let mut icons: Vec<IconDefinition> = icons.into_values().collect();
                // stable: equal names keep source order
                icons.sort_by(|a, b| cmp_ignore_ascii_case(&a.name, &b.name));
                (category, icons)
            })
            .collect();

        Self { groups }
    }

    /// Iterate `(category, icons)` pairs in category order
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[IconDefinition])> {
        self.groups
            .iter()
            .map(|(category, icons)| (category.as_str(), icons.as_slice()))
    }

    /// Icons in a single category
    pub fn category(&self, name: &str) -> Option<&[IconDefinition]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Category names in order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(SmolStr::as_str)
    }

    /// First definition with the given id, in category order
    pub fn find(&self, id: &str) -> Option<&IconDefinition> {
        self.groups.values().flatten().find(|icon| icon.id == id)
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether the catalog has no categories
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Flatten into an id → name index.
    ///
    /// Each id maps to the name from the first category (in category order)
    /// that contains it.
    pub fn flatten(&self) -> FlatIconIndex {
        let mut icons = BTreeMap::new();
        for icon in self.groups.values().flatten() {
            icons
                .entry(icon.id.clone())
                .or_insert_with(|| icon.name.clone());
        }
        FlatIconIndex { icons }
    }
}

/// Case-insensitive ordering matching `strcasecmp`: ASCII letters fold, other bytes compare raw.
pub(crate) fn cmp_ignore_ascii_case(a: &str, b: &str) -> Ordering {
    a.bytes()
        .map(|c| c.to_ascii_lowercase())
        .cmp(b.bytes().map(|c| c.to_ascii_lowercase()))
}

/// Distinct icon ids mapped to their names, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatIconIndex {
    icons: BTreeMap<SmolStr, SmolStr>,
}

impl FlatIconIndex {
    /// Name for an id
    pub fn get(&self, id: &str) -> Option<&str> {
        self.icons.get(id).map(SmolStr::as_str)
    }

    /// Whether the id is known
    pub fn contains(&self, id: &str) -> bool {
        self.icons.contains_key(id)
    }

    /// Iterate `(id, name)` pairs in id order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.icons.iter().map(|(id, name)| (id.as_str(), name.as_str()))
    }

    /// Number of distinct ids
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }
}

/// The icon chosen on a record, persisted as its id.
///
/// Stored in a 64 byte column; surrounding whitespace is dropped and an
/// empty value means no icon was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "SmolStr")]
pub struct FontIcon(SmolStr);

impl FontIcon {
    /// Width of the persisted column in bytes
    pub const MAX_LEN: usize = 64;

    /// Parse a stored value. Returns `Ok(None)` for an empty value.
    pub fn parse(value: &str) -> Result<Option<Self>> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        if value.len() > Self::MAX_LEN {
            return Err(Error::InvalidIconValue {
                value: value.to_string(),
                message: format!("longer than {} bytes", Self::MAX_LEN),
            });
        }
        Ok(Some(Self(SmolStr::new(value))))
    }

    /// The icon id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for FontIcon {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)?.ok_or_else(|| Error::InvalidIconValue {
            value,
            message: "empty".into(),
        })
    }
}

impl From<FontIcon> for SmolStr {
    fn from(icon: FontIcon) -> Self {
        icon.0
    }
}

impl AsRef<str> for FontIcon {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for FontIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
