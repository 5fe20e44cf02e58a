use fonticon::{Config, Error, FontIconBackend, SourceType};

const ICONS_YML: &str = r#"
icons:
  - name: Star
    id: star
    unicode: f005
    categories:
      - Web Application Icons
  - name: Ban
    id: ban
    unicode: f05e
    aliases:
      - prohibited
    categories:
      - Web Application Icons
"#;

fn vendored_config(dir: &std::path::Path) -> String {
    format!(
        r#"
icon-set "font-awesome" {{
    version "4.7.0"
    source "file://{src}/{{version}}/icons.yml"
}}
cache {{
    dir "{cache}"
}}
"#,
        src = dir.join("vendor").display(),
        cache = dir.join("cache").display(),
    )
}

#[tokio::test]
async fn vendored_yaml_through_config() {
    let dir = tempfile::tempdir().unwrap();
    let version_dir = dir.path().join("vendor").join("v4.7.0");
    std::fs::create_dir_all(&version_dir).unwrap();
    std::fs::write(version_dir.join("icons.yml"), ICONS_YML).unwrap();

    let config_path = dir.path().join("fonticon.kdl");
    std::fs::write(&config_path, vendored_config(dir.path())).unwrap();

    let backend = Config::load(&config_path).unwrap().into_backend().unwrap();
    assert!(matches!(backend.source(), SourceType::Local(_)));

    let icons = backend.icons().await.unwrap();
    let ids: Vec<_> = icons.iter().map(|(id, _)| id).collect();
    assert_eq!(ids, ["ban", "star"]);
    assert!(
        dir.path()
            .join("cache")
            .join("font-awesome-4.7.0.json")
            .exists()
    );

    let preview = backend.field_preview("star");
    assert_eq!(preview, r#"<i class="fa fa-fw fa-star"></i>"#);
}

#[tokio::test]
async fn missing_vendored_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Config::from_kdl(&vendored_config(dir.path()))
        .unwrap()
        .into_backend()
        .unwrap();
    let err = backend.grouped_icons().await.unwrap_err();
    assert!(matches!(err, Error::SourceUnavailable { .. }));
}

#[test]
fn missing_config_file_is_a_config_error() {
    let err = Config::load("/nonexistent/fonticon.kdl").unwrap_err();
    assert!(matches!(err, Error::Config { .. }));
}
