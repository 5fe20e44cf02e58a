//! Substring search over a catalog, and the picker's JSON response shape.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::icon::Catalog;

/// One matching icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconMatch {
    /// Icon id
    pub id: SmolStr,
    /// Display name
    pub name: SmolStr,
}

/// Matches within one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchGroup {
    /// Category name
    pub category: SmolStr,
    /// Matching icons in catalog order
    pub matches: Vec<IconMatch>,
}

/// Find icons whose id contains `term`, ignoring case.
///
/// Categories without matches are left out and ordering follows the catalog.
/// An empty term matches nothing.
pub fn search(catalog: &Catalog, term: &str) -> Vec<SearchGroup> {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    catalog
        .groups()
        .filter_map(|(category, icons)| {
            let matches: Vec<IconMatch> = icons
                .iter()
                .filter(|icon| icon.id.to_lowercase().contains(&needle))
                .map(|icon| IconMatch {
                    id: icon.id.clone(),
                    name: icon.name.clone(),
                })
                .collect();
            (!matches.is_empty()).then(|| SearchGroup {
                category: SmolStr::new(category),
                matches,
            })
        })
        .collect()
}

/// Body of the picker's search response:
/// `{"results": [{"text": category, "children": [{"id", "text"}]}]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerResults {
    /// One entry per category with matches
    pub results: Vec<PickerGroup>,
}

/// A category heading in the picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerGroup {
    /// Category name
    pub text: SmolStr,
    /// Icons in the category
    pub children: Vec<PickerOption>,
}

/// A selectable icon in the picker, labelled by its id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerOption {
    /// Value stored when selected
    pub id: SmolStr,
    /// Label shown in the picker
    pub text: SmolStr,
}

impl From<Vec<SearchGroup>> for PickerResults {
    fn from(groups: Vec<SearchGroup>) -> Self {
        let results = groups
            .into_iter()
            .map(|group| PickerGroup {
                text: group.category,
                children: group
                    .matches
                    .into_iter()
                    .map(|m| PickerOption {
                        text: m.id.clone(),
                        id: m.id,
                    })
                    .collect(),
            })
            .collect();
        Self { results }
    }
}
