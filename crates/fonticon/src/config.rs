//! KDL configuration files.
//!
//! ```kdl
//! icon-set "font-awesome" {
//!     version "4.7.0"
//!     source "https://raw.githubusercontent.com/FortAwesome/Font-Awesome/{version}/src/icons.yml"
//!     format "yaml"
//!     timeout 10
//!     tag "i"
//! }
//! classes {
//!     icon "fa fa-%s"
//!     list-item "fa-li"
//!     fixed-width "fa-fw"
//! }
//! field {
//!     tag "i"
//!     classes "fa fa-fw fa-{value}"
//! }
//! cache {
//!     dir "/var/cache/fonticon"
//! }
//! ```
//!
//! Every node is optional. A `classes` block replaces the default templates
//! as a whole.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::{BackendOptions, FontAwesomeBackend};
use crate::cache::{CatalogCache, FileCatalogStore};
use crate::classes::ClassTemplates;
use crate::error::{Error, Result};

/// Parsed configuration file
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Backend settings
    pub backend: BackendOptions,
    /// Cache settings
    pub cache: CacheConfig,
}

/// Where built catalogs are kept
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// Directory for the file store; in-memory when unset
    pub dir: Option<PathBuf>,
}

impl Config {
    /// Read and parse a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_kdl(&text)
    }

    /// Parse a KDL document
    pub fn from_kdl(text: &str) -> Result<Self> {
        let doc = text
            .parse::<kdl::KdlDocument>()
            .map_err(|e| Error::config(format!("failed to parse KDL: {e}")))?;

        let mut config = Config::default();
        let mut seen_classes = false;

        for node in doc.nodes() {
            match node.name().value() {
                "icon-set" => parse_icon_set(node, &mut config.backend)?,
                "classes" => {
                    if seen_classes {
                        return Err(Error::config("multiple classes blocks found"));
                    }
                    seen_classes = true;
                    config.backend.classes = parse_classes(node)?;
                }
                "field" => parse_field(node, &mut config.backend)?,
                "cache" => config.cache = parse_cache(node)?,
                other => return Err(Error::config(format!("unknown config node: {other}"))),
            }
        }

        Ok(config)
    }

    /// Catalog cache described by the `cache` block
    pub fn catalog_cache(&self) -> CatalogCache {
        match &self.cache.dir {
            Some(dir) => CatalogCache::new(FileCatalogStore::new(dir)),
            None => CatalogCache::default(),
        }
    }

    /// Build the configured backend
    pub fn into_backend(self) -> Result<FontAwesomeBackend> {
        let cache = self.catalog_cache();
        FontAwesomeBackend::new(self.backend, cache)
    }
}

fn string_value<'a>(node: &'a kdl::KdlNode, what: &str) -> Result<&'a str> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .ok_or_else(|| Error::config(format!("{what} expects a string value")))
}

fn children<'a>(node: &'a kdl::KdlNode, what: &str) -> Result<&'a kdl::KdlDocument> {
    node.children()
        .ok_or_else(|| Error::config(format!("{what} block has no children")))
}

fn parse_icon_set(node: &kdl::KdlNode, opts: &mut BackendOptions) -> Result<()> {
    if let Some(name) = node.entries().first().and_then(|e| e.value().as_string()) {
        opts.set_name = name.into();
    }

    for child in children(node, "icon-set")?.nodes() {
        match child.name().value() {
            "version" => opts.version = string_value(child, "version")?.into(),
            "source" => opts.source = string_value(child, "source")?.to_string(),
            "format" => opts.format = Some(string_value(child, "format")?.parse()?),
            "tag" => opts.tag_name = string_value(child, "tag")?.into(),
            "timeout" => {
                let secs = child
                    .entries()
                    .first()
                    .and_then(|e| e.value().as_integer())
                    .filter(|secs| *secs > 0)
                    .and_then(|secs| u64::try_from(secs).ok())
                    .ok_or_else(|| Error::config("timeout expects a positive number of seconds"))?;
                opts.timeout = Duration::from_secs(secs);
            }
            other => return Err(Error::config(format!("unknown icon-set field: {other}"))),
        }
    }
    Ok(())
}

fn parse_classes(node: &kdl::KdlNode) -> Result<ClassTemplates> {
    let mut classes = ClassTemplates::new();
    for child in children(node, "classes")?.nodes() {
        let key = child.name().value();
        classes.insert(key, string_value(child, key)?)?;
    }
    Ok(classes)
}

fn parse_field(node: &kdl::KdlNode, opts: &mut BackendOptions) -> Result<()> {
    for child in children(node, "field")?.nodes() {
        match child.name().value() {
            "tag" => opts.field_tag_name = string_value(child, "tag")?.into(),
            "classes" => opts.field_classes = string_value(child, "classes")?.into(),
            other => return Err(Error::config(format!("unknown field setting: {other}"))),
        }
    }
    Ok(())
}

fn parse_cache(node: &kdl::KdlNode) -> Result<CacheConfig> {
    let mut cache = CacheConfig::default();
    for child in children(node, "cache")?.nodes() {
        match child.name().value() {
            "dir" => cache.dir = Some(PathBuf::from(string_value(child, "dir")?)),
            other => return Err(Error::config(format!("unknown cache field: {other}"))),
        }
    }
    Ok(cache)
}
