//! The icon backend: cached catalog access, class names and markup.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use bon::Builder;
use smol_str::SmolStr;

use crate::cache::CatalogCache;
use crate::classes::ClassTemplates;
use crate::error::Result;
use crate::icon::{Catalog, FlatIconIndex, FontIcon};
use crate::parse::parse;
use crate::render::{IconStyle, escape_attr, render_tag};
use crate::search::{SearchGroup, search};
use crate::source::{CatalogSource, DEFAULT_TIMEOUT, SourceFormat, SourceType, source_tag};

/// Icon set version used when none is configured
pub const DEFAULT_VERSION: &str = "4.7.0";

/// Upstream location of the Font Awesome 4 definitions
pub const FONT_AWESOME_SOURCE: &str =
    "https://raw.githubusercontent.com/FortAwesome/Font-Awesome/{version}/src/icons.yml";

/// Placeholder replaced by the field value in [`BackendOptions::field_classes`]
pub const VALUE_PLACEHOLDER: &str = "{value}";

/// Backend settings.
///
/// - `set_name`/`version`: identify the icon set; together they form the cache key.
/// - `source`: URL or path template containing `{version}`.
/// - `format`: document encoding, detected from `source` when unset.
/// - `classes`: semantic key → class-name template.
/// - `tag_name`: element rendered for a chosen icon.
/// - `field_tag_name`/`field_classes`: element and classes of the admin
///   widget preview; `{value}` in the classes is replaced by the icon id.
#[derive(Debug, Clone, Builder)]
#[builder(start_fn = new)]
pub struct BackendOptions {
    /// Icon set name
    #[builder(into, default = SmolStr::new_static("font-awesome"))]
    pub set_name: SmolStr,
    /// Icon set version
    #[builder(into, default = SmolStr::new_static(DEFAULT_VERSION))]
    pub version: SmolStr,
    /// Location template of the definition document
    #[builder(into, default = FONT_AWESOME_SOURCE.to_string())]
    pub source: String,
    /// Document encoding
    pub format: Option<SourceFormat>,
    /// Fetch timeout
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
    /// Class-name templates
    #[builder(default = ClassTemplates::font_awesome())]
    pub classes: ClassTemplates,
    /// Element rendered for a chosen icon
    #[builder(into, default = SmolStr::new_static("i"))]
    pub tag_name: SmolStr,
    /// Element of the widget preview
    #[builder(into, default = SmolStr::new_static("i"))]
    pub field_tag_name: SmolStr,
    /// Classes of the widget preview
    #[builder(into, default = SmolStr::new_static("fa fa-fw fa-{value}"))]
    pub field_classes: SmolStr,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self::new().build()
    }
}

impl BackendOptions {
    /// Cache key for the configured set and version, e.g. `font-awesome-4.7.0`
    pub fn cache_key(&self) -> String {
        format!("{}-{}", self.set_name, self.version)
    }
}

/// Access to one icon set, for pluggable implementations.
///
/// Only catalog retrieval and flushing need implementing; everything else is
/// derived from [`options`](Self::options) and the catalog.
pub trait FontIconBackend {
    /// Settings driving the derived methods
    fn options(&self) -> &BackendOptions;

    /// Icons grouped by category, built on first use and cached
    fn grouped_icons(&self) -> impl Future<Output = Result<Arc<Catalog>>> + Send
    where
        Self: Sync;

    /// Drop every cached catalog
    fn flush(&self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sync;

    /// Distinct icon ids mapped to names, ordered by id
    fn icons(&self) -> impl Future<Output = Result<FlatIconIndex>> + Send
    where
        Self: Sync,
    {
        async move { Ok(self.grouped_icons().await?.flatten()) }
    }

    /// Search icon ids. An empty term returns nothing without touching the catalog.
    fn search(&self, term: &str) -> impl Future<Output = Result<Vec<SearchGroup>>> + Send
    where
        Self: Sync,
    {
        async move {
            if term.is_empty() {
                return Ok(Vec::new());
            }
            let catalog = self.grouped_icons().await?;
            Ok(search(&catalog, term))
        }
    }

    /// Build the catalog ahead of the first request
    fn warm(&self) -> impl Future<Output = Result<()>> + Send
    where
        Self: Sync,
    {
        async move { self.grouped_icons().await.map(|_| ()) }
    }

    /// Class name for a semantic key, `Ok(None)` when the key is not configured
    fn class_name(&self, key: &str, args: &[&str]) -> Result<Option<String>> {
        self.options().classes.class_name(key, args)
    }

    /// Element wrapping already escaped `class_names`, with an optional color
    fn tag(&self, class_names: &str, color: Option<&str>) -> String {
        render_tag(&self.options().tag_name, class_names, color)
    }

    /// Element name of the widget preview
    fn field_tag_name(&self) -> &str {
        &self.options().field_tag_name
    }

    /// Class template of the widget preview, containing `{value}`
    fn field_classes(&self) -> &str {
        &self.options().field_classes
    }

    /// Classes for a record's icon: list-item, fixed-width, then the icon itself.
    /// Keys that are not configured contribute nothing.
    fn icon_class_names(&self, icon: &FontIcon, style: IconStyle) -> Result<Vec<String>> {
        let mut classes = Vec::with_capacity(3);
        if style.list_item {
            classes.extend(self.class_name("list-item", &[])?);
        }
        if style.fixed_width {
            classes.extend(self.class_name("fixed-width", &[])?);
        }
        classes.extend(self.class_name("icon", &[icon.as_str()])?);
        Ok(classes)
    }

    /// Space-joined, attribute-escaped classes for a record's icon
    fn icon_class(&self, icon: &FontIcon, style: IconStyle) -> Result<String> {
        let classes = self.icon_class_names(icon, style)?;
        Ok(escape_attr(&classes.join(" ")).into_owned())
    }

    /// Markup for a record's icon, `None` when no icon is chosen
    fn icon_tag(
        &self,
        icon: Option<&FontIcon>,
        style: IconStyle,
        color: Option<&str>,
    ) -> Result<Option<String>> {
        let Some(icon) = icon else {
            return Ok(None);
        };
        Ok(Some(self.tag(&self.icon_class(icon, style)?, color)))
    }

    /// Widget preview element for a field value
    fn field_preview(&self, value: &str) -> String {
        let classes = self.field_classes().replace(VALUE_PLACEHOLDER, value);
        render_tag(self.field_tag_name(), &escape_attr(&classes), None)
    }
}

impl<T: FontIconBackend + Sync> FontIconBackend for Arc<T> {
    fn options(&self) -> &BackendOptions {
        self.as_ref().options()
    }

    async fn grouped_icons(&self) -> Result<Arc<Catalog>> {
        self.as_ref().grouped_icons().await
    }

    async fn flush(&self) -> Result<()> {
        self.as_ref().flush().await
    }
}

/// Backend for Font Awesome style icon sets: a single definition document per
/// version, fetched from `S` and cached under `<set-name>-<version>`.
#[derive(Debug, Clone)]
pub struct FontAwesomeBackend<S = SourceType> {
    source: S,
    cache: CatalogCache,
    options: BackendOptions,
}

impl FontAwesomeBackend<SourceType> {
    /// Create a backend fetching from `options.source`
    pub fn new(options: BackendOptions, cache: CatalogCache) -> Result<Self> {
        let source = SourceType::from_location(&options.source, options.format, options.timeout)?;
        Ok(Self::with_source(source, options, cache))
    }
}

impl<S: CatalogSource> FontAwesomeBackend<S> {
    /// Create a backend over an explicit source
    pub fn with_source(source: S, options: BackendOptions, cache: CatalogCache) -> Self {
        #[cfg(feature = "tracing")]
        tracing::info!(
            set = %options.set_name,
            version = %options.version,
            location = %source.location(&options.version),
            "font icon backend ready"
        );
        Self {
            source,
            cache,
            options,
        }
    }

    /// Key the catalog is cached under
    pub fn cache_key(&self) -> String {
        self.options.cache_key()
    }

    /// Version as published upstream, e.g. `v4.7.0`
    pub fn source_version(&self) -> String {
        source_tag(&self.options.version).into_owned()
    }

    /// The catalog source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The catalog cache
    pub fn cache(&self) -> &CatalogCache {
        &self.cache
    }
}

impl<S: CatalogSource + Sync> FontIconBackend for FontAwesomeBackend<S> {
    fn options(&self) -> &BackendOptions {
        &self.options
    }

    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self), fields(key = %self.cache_key())))]
    async fn grouped_icons(&self) -> Result<Arc<Catalog>> {
        let key = self.cache_key();
        self.cache
            .get_or_build(&key, || async {
                let raw = self.source.fetch(&self.options.version).await?;
                parse(&raw, self.source.format())
            })
            .await
    }

    async fn flush(&self) -> Result<()> {
        self.cache.clear().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let opts = BackendOptions::default();
        assert_eq!(opts.cache_key(), "font-awesome-4.7.0");
        assert_eq!(opts.field_tag_name, "i");
        assert_eq!(opts.field_classes, "fa fa-fw fa-{value}");
        assert_eq!(opts.timeout, Duration::from_secs(10));
        assert_eq!(opts.classes, ClassTemplates::font_awesome());
    }

    #[test]
    fn derived_rendering() {
        let backend = FontAwesomeBackend::new(BackendOptions::default(), CatalogCache::default())
            .unwrap();
        assert_eq!(backend.source_version(), "v4.7.0");
        let star = FontIcon::parse("star").unwrap();

        assert_eq!(
            backend.icon_tag(star.as_ref(), IconStyle::default(), None).unwrap().as_deref(),
            Some(r#"<i class="fa fa-star"></i>"#)
        );
        let style = IconStyle::builder().list_item(true).fixed_width(true).build();
        assert_eq!(
            backend.icon_class(star.as_ref().unwrap(), style).unwrap(),
            "fa-li fa-fw fa fa-star"
        );
        assert_eq!(backend.icon_tag(None, style, Some("red")).unwrap(), None);
        assert_eq!(
            backend.field_preview("star"),
            r#"<i class="fa fa-fw fa-star"></i>"#
        );
    }

    #[test]
    fn unconfigured_style_keys_contribute_nothing() {
        let options = BackendOptions::new()
            .classes(ClassTemplates::from_pairs([("icon", "icon-%s")]).unwrap())
            .build();
        let backend = FontAwesomeBackend::new(options, CatalogCache::default()).unwrap();
        let star = FontIcon::parse("star").unwrap().unwrap();
        let style = IconStyle::builder().list_item(true).build();
        assert_eq!(backend.icon_class_names(&star, style).unwrap(), ["icon-star"]);
    }
}
