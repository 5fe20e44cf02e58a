//! # fonticon
//!
//! Icon catalogs for font icon sets such as Font Awesome: fetch a versioned
//! definition document, group and sort it into categories, cache the result,
//! and answer lookups, searches and class-name queries against it.
//!
//! ```no_run
//! use fonticon::{BackendOptions, CatalogCache, FontAwesomeBackend, FontIconBackend};
//!
//! # async fn run() -> fonticon::Result<()> {
//! let backend = FontAwesomeBackend::new(BackendOptions::default(), CatalogCache::default())?;
//!
//! let icons = backend.icons().await?;
//! println!("{} icons", icons.len());
//!
//! for group in backend.search("star").await? {
//!     println!("{}: {} matches", group.category, group.matches.len());
//! }
//!
//! let class = backend.class_name("icon", &["star"])?;
//! assert_eq!(class.as_deref(), Some("fa fa-star"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Pieces
//!
//! - [`source`]: where definition documents come from (HTTP or disk)
//! - [`parse()`]: document → [`Catalog`]
//! - [`cache`]: get-or-build over a pluggable [`CatalogStore`]
//! - [`FontIconBackend`]: the façade tying them together
//! - [`search()`]: substring search over a catalog
//! - [`Config`]: KDL configuration files

#![warn(missing_docs)]

pub mod backend;
pub mod cache;
pub mod classes;
pub mod config;
pub mod error;
pub mod icon;
pub mod parse;
pub mod render;
pub mod search;
pub mod source;

pub use backend::{BackendOptions, FontAwesomeBackend, FontIconBackend};
pub use cache::{CatalogCache, CatalogStore, FileCatalogStore, MemoryCatalogStore};
pub use classes::{ClassTemplate, ClassTemplates};
pub use config::Config;
pub use error::{Error, Result, SourceError, StoreError};
pub use icon::{Catalog, FlatIconIndex, FontIcon, IconDefinition};
pub use parse::parse;
pub use render::{IconStyle, escape_attr, render_tag};
pub use search::{IconMatch, PickerResults, SearchGroup, search};
pub use source::{CatalogSource, HttpSource, LocalSource, SourceFormat, SourceType};
