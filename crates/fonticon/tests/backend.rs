use std::sync::Arc;

use bytes::Bytes;
use fonticon::{
    BackendOptions, CatalogCache, CatalogSource, CatalogStore, Error, FileCatalogStore,
    FontAwesomeBackend, FontIcon, FontIconBackend, IconStyle, MemoryCatalogStore, SourceError,
    SourceFormat,
};
use tokio::sync::RwLock;

const DOCUMENT: &str = r#"{"icons":[
    {"id":"star","name":"Star","unicode":"f005","categories":["Web App"]},
    {"id":"ban","name":"Ban","unicode":"f05e","categories":["Web App"]},
    {"id":"car","name":"car","unicode":"f1b9","categories":["Transportation","Web App"]},
    {"id":"bus","name":"Bus","unicode":"f207","categories":["Transportation"]}
]}"#;

// Mock source that counts fetches and serves a fixed document
#[derive(Clone)]
struct CountingSource {
    body: Arc<RwLock<Result<&'static str, ()>>>,
    fetches: Arc<RwLock<usize>>,
}

impl CountingSource {
    fn new(body: &'static str) -> Self {
        Self {
            body: Arc::new(RwLock::new(Ok(body))),
            fetches: Arc::new(RwLock::new(0)),
        }
    }

    fn failing() -> Self {
        Self {
            body: Arc::new(RwLock::new(Err(()))),
            fetches: Arc::new(RwLock::new(0)),
        }
    }

    async fn fetches(&self) -> usize {
        *self.fetches.read().await
    }
}

impl CatalogSource for CountingSource {
    fn format(&self) -> SourceFormat {
        SourceFormat::Json
    }

    fn location(&self, version: &str) -> String {
        format!("mock://{version}")
    }

    async fn fetch(&self, version: &str) -> fonticon::Result<Bytes> {
        *self.fetches.write().await += 1;
        match *self.body.read().await {
            Ok(body) => Ok(Bytes::from_static(body.as_bytes())),
            Err(()) => Err(Error::source_unavailable(
                self.location(version),
                SourceError::Timeout,
            )),
        }
    }
}

fn backend(source: CountingSource) -> FontAwesomeBackend<CountingSource> {
    FontAwesomeBackend::with_source(source, BackendOptions::default(), CatalogCache::default())
}

#[tokio::test]
async fn grouped_icons_are_sorted() {
    let backend = backend(CountingSource::new(DOCUMENT));
    let catalog = backend.grouped_icons().await.unwrap();

    let categories: Vec<_> = catalog.categories().collect();
    assert_eq!(categories, ["Transportation", "Web App"]);

    let web: Vec<_> = catalog
        .category("Web App")
        .unwrap()
        .iter()
        .map(|i| i.id.as_str())
        .collect();
    assert_eq!(web, ["ban", "car", "star"]);
}

#[tokio::test]
async fn icons_flatten_law() {
    let backend = backend(CountingSource::new(DOCUMENT));
    let grouped = backend.grouped_icons().await.unwrap();
    let flat = backend.icons().await.unwrap();

    let mut distinct: Vec<_> = grouped
        .groups()
        .flat_map(|(_, icons)| icons.iter().map(|i| i.id.as_str()))
        .collect();
    distinct.sort();
    distinct.dedup();

    let ids: Vec<_> = flat.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, distinct);
    assert_eq!(flat.get("car"), Some("car"));
    assert_eq!(flat.get("star"), Some("Star"));
}

#[tokio::test]
async fn catalog_is_built_once_until_flushed() {
    let source = CountingSource::new(DOCUMENT);
    let backend = backend(source.clone());

    let a = backend.grouped_icons().await.unwrap();
    let b = backend.grouped_icons().await.unwrap();
    backend.icons().await.unwrap();
    backend.search("st").await.unwrap();
    assert_eq!(source.fetches().await, 1);
    assert_eq!(a, b);

    backend.flush().await.unwrap();
    backend.grouped_icons().await.unwrap();
    assert_eq!(source.fetches().await, 2);
}

#[tokio::test]
async fn concurrent_requests_share_one_fetch() {
    let source = CountingSource::new(DOCUMENT);
    let backend = Arc::new(backend(source.clone()));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let backend = backend.clone();
            tokio::spawn(async move { backend.icons().await })
        })
        .collect();
    for task in tasks {
        assert_eq!(task.await.unwrap().unwrap().len(), 4);
    }
    assert_eq!(source.fetches().await, 1);
}

#[tokio::test]
async fn failed_fetch_is_surfaced_and_not_cached() {
    let source = CountingSource::failing();
    let backend = backend(source.clone());

    match backend.grouped_icons().await {
        Err(Error::SourceUnavailable { location, source }) => {
            assert_eq!(location, "mock://4.7.0");
            assert!(matches!(source, SourceError::Timeout));
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(backend.cache().store().get(&backend.cache_key()).await.is_none());

    backend.warm().await.unwrap_err();
    assert_eq!(source.fetches().await, 2);
}

#[tokio::test]
async fn malformed_document_is_not_cached() {
    let backend = backend(CountingSource::new(r#"{"icons":[{"id":"star"}]}"#));
    let err = backend.icons().await.unwrap_err();
    assert!(matches!(err, Error::InvalidCatalogData { .. }));
    assert!(backend.cache().store().get("font-awesome-4.7.0").await.is_none());
}

#[tokio::test]
async fn search_scenario() {
    let backend = backend(CountingSource::new(DOCUMENT));
    let groups = backend.search("st").await.unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].category, "Web App");
    assert_eq!(groups[0].matches[0].id, "star");
    assert_eq!(groups[0].matches[0].name, "Star");

    for group in backend.search("A").await.unwrap() {
        for m in group.matches {
            assert!(m.id.to_lowercase().contains('a'));
        }
    }
}

#[tokio::test]
async fn empty_search_does_not_fetch() {
    let source = CountingSource::new(DOCUMENT);
    let backend = backend(source.clone());
    assert!(backend.search("").await.unwrap().is_empty());
    assert_eq!(source.fetches().await, 0);
}

#[tokio::test]
async fn class_names_and_markup() {
    let backend = backend(CountingSource::new(DOCUMENT));
    assert_eq!(
        backend.class_name("icon", &["star"]).unwrap().as_deref(),
        Some("fa fa-star")
    );
    assert_eq!(backend.class_name("unknown-key", &[]).unwrap(), None);
    assert!(matches!(
        backend.class_name("icon", &[]),
        Err(Error::TemplateArity { .. })
    ));

    let star = FontIcon::parse("star").unwrap();
    let style = IconStyle::builder().fixed_width(true).build();
    assert_eq!(
        backend.icon_tag(star.as_ref(), style, Some("#c00")).unwrap().as_deref(),
        Some(r#"<i class="fa-fw fa fa-star" style="color: #c00;"></i>"#)
    );
    assert_eq!(backend.tag("fa fa-ban", None), r#"<i class="fa fa-ban"></i>"#);
    assert_eq!(backend.field_tag_name(), "i");
    assert_eq!(backend.field_classes(), "fa fa-fw fa-{value}");
}

#[tokio::test]
async fn file_store_survives_backend_restart() {
    let dir = tempfile::tempdir().unwrap();
    let source = CountingSource::new(DOCUMENT);

    let first = FontAwesomeBackend::with_source(
        source.clone(),
        BackendOptions::default(),
        CatalogCache::new(FileCatalogStore::new(dir.path())),
    );
    let built = first.grouped_icons().await.unwrap();
    assert!(dir.path().join("font-awesome-4.7.0.json").exists());

    let second = FontAwesomeBackend::with_source(
        source.clone(),
        BackendOptions::default(),
        CatalogCache::new(FileCatalogStore::new(dir.path())),
    );
    assert_eq!(second.grouped_icons().await.unwrap(), built);
    assert_eq!(source.fetches().await, 1);

    // a flush from another process clears the shared directory
    second.flush().await.unwrap();
    first.grouped_icons().await.unwrap();
    assert_eq!(source.fetches().await, 2);
}

#[tokio::test]
async fn versions_are_cached_separately() {
    let source = CountingSource::new(DOCUMENT);
    let store = MemoryCatalogStore::default();
    let v4 = FontAwesomeBackend::with_source(
        source.clone(),
        BackendOptions::default(),
        CatalogCache::new(store.clone()),
    );
    let master = FontAwesomeBackend::with_source(
        source.clone(),
        BackendOptions::new().version("master").build(),
        CatalogCache::new(store.clone()),
    );
    assert_eq!(master.source_version(), "master");
    v4.warm().await.unwrap();
    master.warm().await.unwrap();
    assert_eq!(store.len().await, 2);
    assert_eq!(source.fetches().await, 2);
}
