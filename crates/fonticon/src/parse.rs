//! Parsing icon definition documents into a [`Catalog`].
//!
//! The document is a top-level `icons` list; every entry needs `id`, `name`,
//! `unicode` and `categories`. Other keys (`aliases`, `filter`, `created`, ...)
//! are ignored.
//!
//! ```yaml
//! icons:
//!   - name: Star
//!     id: star
//!     unicode: f005
//!     categories:
//!       - Web Application Icons
//! ```

use serde::Deserialize;
use smol_str::SmolStr;

use crate::error::{Error, Result};
use crate::icon::{Catalog, IconDefinition};
use crate::source::SourceFormat;

#[derive(Deserialize)]
struct RawDocument {
    icons: Vec<RawIcon>,
}

#[derive(Deserialize)]
struct RawIcon {
    id: SmolStr,
    name: SmolStr,
    unicode: RawScalar,
    categories: Vec<SmolStr>,
}

/// YAML happily reads `unicode: 2000` as a number
#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(SmolStr),
    Integer(u64),
}

impl From<RawScalar> for SmolStr {
    fn from(value: RawScalar) -> Self {
        match value {
            RawScalar::Text(s) => s,
            RawScalar::Integer(n) => SmolStr::new(n.to_string()),
        }
    }
}

/// Parse a raw document into a grouped, sorted catalog.
///
/// Duplicate ids within one category resolve last-write-wins. Any missing
/// field fails the whole document with [`Error::InvalidCatalogData`].
pub fn parse(raw: &[u8], format: SourceFormat) -> Result<Catalog> {
    let document: RawDocument = match format {
        SourceFormat::Json => serde_json::from_slice(raw)
            .map_err(|e| Error::invalid_catalog_with_source("malformed JSON document", e))?,
        SourceFormat::Yaml => serde_yaml::from_slice(raw)
            .map_err(|e| Error::invalid_catalog_with_source("malformed YAML document", e))?,
    };

    let definitions = document
        .icons
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            if raw.id.trim().is_empty() {
                return Err(Error::invalid_catalog(format!(
                    "icon at index {index} has an empty id"
                )));
            }
            Ok(IconDefinition {
                id: raw.id,
                name: raw.name,
                unicode: raw.unicode.into(),
                categories: raw.categories.into_iter().collect(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let catalog = Catalog::from_definitions(definitions);

    #[cfg(feature = "tracing")]
    tracing::debug!(
        categories = catalog.len(),
        format = ?format,
        "parsed icon catalog"
    );

    Ok(catalog)
}
