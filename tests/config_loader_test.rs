//! Integration tests for loading `suv.config.js` from a project directory.

mod common;

use common::{setup_test_logging, temp_project, write_config};
use serde_json::json;
use suv_config::infrastructure::config::ConfigLoader;
use suv_config::{load_config, ConfigError, LoadOptions, ValidationError};

fn options(dir: &std::path::Path) -> LoadOptions {
    LoadOptions::new(dir).with_env_prefix(None)
}

#[tokio::test]
async fn test_missing_config_file_yields_defaults() {
    setup_test_logging();
    let project = temp_project();

    let config = load_config(options(project.path())).await.unwrap();

    assert_eq!(config.root, "src");
    assert_eq!(config.out_dir, "dist");
    assert_eq!(config.dev.port, 5173);
    assert_eq!(config.cwd, project.path());
    assert_eq!(config.out_dir_path(), project.path().join("dist"));
}

#[tokio::test]
async fn test_config_module_values_are_applied() {
    let project = temp_project();
    write_config(
        project.path(),
        r#"
// suv.config.js
export default {
    root: "app",
    base: "/docs/",
    dev: {
        port: "3000",
        open: true,
    },
    build: { sourcemap: 1 },
};
"#,
    );

    let config = load_config(options(project.path())).await.unwrap();

    assert_eq!(config.root, "app");
    assert_eq!(config.base, "/docs/");
    assert_eq!(config.dev.port, 3000);
    assert!(config.dev.open);
    assert!(config.build.sourcemap);
    assert!(config.build.minify, "untouched defaults survive");
}

#[tokio::test]
async fn test_compact_module_is_loaded() {
    let project = temp_project();
    write_config(project.path(), "export default {out_dir:'build',dev:{port:4000}};");

    let config = load_config(options(project.path())).await.unwrap();

    assert_eq!(config.out_dir, "build");
    assert_eq!(config.dev.port, 4000);
}

#[tokio::test]
async fn test_string_escapes_reach_the_config() {
    let project = temp_project();
    write_config(
        project.path(),
        r"export default { base: '/it\'s/', public_dir: 'a\tb', root: `src` };",
    );

    let config = load_config(options(project.path())).await.unwrap();

    assert_eq!(config.base, "/it's/");
    assert_eq!(config.public_dir, "a\tb");
    assert_eq!(config.root, "src");
}

#[tokio::test]
async fn test_reload_sees_edits_on_disk() {
    let project = temp_project();

    write_config(project.path(), "export default { out_dir: 'first' };");
    let first = load_config(options(project.path())).await.unwrap();

    write_config(project.path(), "export default { out_dir: 'second' };");
    let second = load_config(options(project.path())).await.unwrap();

    assert_eq!(first.out_dir, "first");
    assert_eq!(second.out_dir, "second");
}

#[tokio::test]
async fn test_each_import_gets_a_new_load_id() {
    let project = temp_project();
    write_config(project.path(), "export default {};");

    let first = ConfigLoader::import(project.path()).await.unwrap().unwrap();
    let second = ConfigLoader::import(project.path()).await.unwrap().unwrap();

    assert!(second.load_id > first.load_id);
    assert_eq!(first.default_export, json!({}));
    assert_eq!(first.path, project.path().join("suv.config.js"));
}

#[tokio::test]
async fn test_syntax_error_is_a_load_error() {
    let project = temp_project();
    write_config(project.path(), "export default { root: [ };");

    let err = load_config(options(project.path())).await.unwrap_err();

    match err {
        ConfigError::Load { path, reason } => {
            assert_eq!(path, project.path().join("suv.config.js"));
            assert!(reason.starts_with("syntax error"), "unexpected reason: {reason}");
        }
        other => panic!("Expected Load error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_default_export_is_a_load_error() {
    let project = temp_project();
    write_config(project.path(), "module.exports = { root: 'src' };");

    let err = load_config(options(project.path())).await.unwrap_err();
    assert!(matches!(err, ConfigError::Load { .. }));
    assert!(err.to_string().contains("no default export"));
}

#[tokio::test]
async fn test_non_object_export_is_rejected() {
    let project = temp_project();
    write_config(project.path(), "export default 'src';");

    let err = load_config(options(project.path())).await.unwrap_err();
    assert!(matches!(err, ConfigError::NotAnObject { found: "string" }));
}

#[tokio::test]
async fn test_validation_error_names_nested_keypath() {
    let project = temp_project();
    write_config(project.path(), "export default { dev: { host: 42 } };");

    let err = load_config(options(project.path())).await.unwrap_err();

    assert!(matches!(
        err,
        ConfigError::Validation(ValidationError::TypeMismatch { .. })
    ));
    assert_eq!(err.to_string(), ".dev.host must be a string, found number");
}

#[tokio::test]
async fn test_concurrent_loads_are_independent() {
    let first = temp_project();
    let second = temp_project();
    write_config(first.path(), "export default { out_dir: 'a' };");
    write_config(second.path(), "export default { out_dir: 'b' };");

    let (a, b) = tokio::join!(
        load_config(options(first.path())),
        load_config(options(second.path()))
    );

    assert_eq!(a.unwrap().out_dir, "a");
    assert_eq!(b.unwrap().out_dir, "b");
}

#[tokio::test]
async fn test_load_raw_returns_unvalidated_export() {
    let project = temp_project();
    write_config(project.path(), "export default { dev: { port: 'soon' } };");

    let raw = ConfigLoader::load_raw(project.path()).await.unwrap();
    assert_eq!(raw, json!({ "dev": { "port": "soon" } }));
}
