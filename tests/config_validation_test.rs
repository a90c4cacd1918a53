use std::io::Write;
use std::time::Duration;

use user_registry::config::{
    AppConfig, LogFormat, MongoSection, StoreBackendKind, StoreSection,
};
use user_registry::store::StoreConfig;

#[test]
fn defaults_target_local_mongo() {
    let config = AppConfig::default();
    config.validate().expect("defaults should be valid");

    assert_eq!(config.server.port, 8000);
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.logging.format, LogFormat::Text);

    match config.store.to_runtime() {
        StoreConfig::Mongo(settings) => {
            assert_eq!(settings.uri, "mongodb://localhost:27017");
            assert_eq!(settings.database, "go-mongo-practice");
            assert_eq!(settings.collection, "user");
            assert!(!settings.require_on_startup);
        }
        other => panic!("Unexpected store config: {other:?}"),
    }
}

#[test]
fn mongo_backend_requires_names() {
    let config = AppConfig {
        store: StoreSection {
            mongo: MongoSection {
                collection: "  ".into(),
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    };

    let result = config.validate();
    assert!(
        result.is_err(),
        "Expected empty collection name to fail validation"
    );
}

#[test]
fn memory_backend_ignores_mongo_section() {
    let config = AppConfig {
        store: StoreSection {
            backend: StoreBackendKind::Memory,
            mongo: MongoSection {
                database: String::new(),
                max_pool_size: 0,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    };

    config.validate().expect("memory backend should not need mongo settings");
    assert!(matches!(config.store.to_runtime(), StoreConfig::Memory));
}

#[test]
fn pool_bounds_are_checked() {
    let config = AppConfig {
        store: StoreSection {
            mongo: MongoSection {
                max_pool_size: 2,
                min_pool_size: 5,
                ..Default::default()
            },
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.store.operation_timeout_ms = 0;
    assert!(config.validate().is_err());

    let mut config = AppConfig::default();
    config.server.port = 0;
    assert!(config.validate().is_err());
}

#[test]
fn loads_settings_from_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    writeln!(
        file,
        r#"
[server]
port = 9100
request_timeout_secs = 5

[store]
backend = "mongo"
operation_timeout_ms = 750

[store.mongo]
uri = "mongodb://db.internal:27017"
database = "people"
max_pool_size = 32
require_on_startup = true

[logging]
level = "debug"
format = "json"
"#
    )
    .unwrap();

    let config = AppConfig::load_from(file.path()).expect("file config should load");

    assert_eq!(config.server.port, 9100);
    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.request_timeout(), Duration::from_secs(5));
    assert_eq!(config.store.operation_timeout(), Duration::from_millis(750));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, LogFormat::Json);

    match config.store.to_runtime() {
        StoreConfig::Mongo(settings) => {
            assert_eq!(settings.uri, "mongodb://db.internal:27017");
            assert_eq!(settings.database, "people");
            assert_eq!(settings.collection, "user");
            assert_eq!(settings.max_pool_size, 32);
            assert!(settings.require_on_startup);
        }
        other => panic!("Unexpected store config: {other:?}"),
    }
}

#[test]
fn invalid_file_settings_fail_to_load() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    writeln!(file, "[server]\nport = 0").unwrap();

    assert!(AppConfig::load_from(file.path()).is_err());
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.server.port, 8000);
    assert_eq!(config.store.backend, StoreBackendKind::Mongo);
}
