//! `SyncEngine` against a real Redis, skipped when Docker is not available.

use config::{EngineSettings, RedisConfig};
use std::sync::Arc;
use storage::RedisHashStore;
use sync::{ReloadOutcome, SyncEngine};
use testing::{redis, unique_namespace};
use values::ValueStore;

fn settings_for(url: &str, namespace: String) -> EngineSettings {
    // testcontainers hands out redis://localhost:<port>
    let port = url
        .rsplit(':')
        .next()
        .and_then(|p| p.parse().ok())
        .expect("Fixture URL has a port");
    EngineSettings {
        namespace,
        redis: RedisConfig {
            host: "localhost".to_string(),
            port,
            ..RedisConfig::default()
        },
        ..EngineSettings::default()
    }
}

#[tokio::test]
async fn test_redis_engine_round_trip() {
    let Some(fixture) = redis().await else {
        eprintln!("Skipping Redis test: Docker not available");
        return;
    };
    let namespace = unique_namespace();
    let remote = Arc::new(
        RedisHashStore::new(fixture.url())
            .await
            .expect("Failed to connect to Redis"),
    );

    let defaults = ValueStore::new();
    defaults.set_value("pool_size", 16).unwrap();
    let engine = SyncEngine::with_defaults(remote.clone(), namespace.clone(), defaults)
        .await
        .unwrap();

    engine.set("pool_size", 32).await.unwrap();
    engine.store().set_value("region", "eu-west").unwrap();
    engine.persist().await.unwrap();

    let other = SyncEngine::new(remote, namespace).await.unwrap();
    assert_eq!(other.store().get_int_value("pool_size", 0), 32);
    assert_eq!(other.store().get_value("region", ""), "eu-west");
    assert_eq!(
        other.reload().await.unwrap(),
        ReloadOutcome::Applied { keys: 2 }
    );
}

#[tokio::test]
async fn test_redis_connect_from_settings() {
    let Some(fixture) = redis().await else {
        eprintln!("Skipping Redis test: Docker not available");
        return;
    };
    let mut settings = settings_for(fixture.url(), unique_namespace());
    settings.reload_interval_ms = 50;
    settings.auto_reload = true;

    let defaults = ValueStore::new();
    defaults.set_value("enabled", true).unwrap();
    let engine = SyncEngine::connect(&settings, defaults).await.unwrap();

    assert_eq!(engine.namespace(), settings.namespace);
    assert_eq!(engine.reload_interval(), settings.reload_interval());
    assert!(engine.is_auto_reloading());
    assert!(engine.store().get_bool_value("enabled", false));

    assert!(engine.stop_auto_reload().await);
}
