//! Starboard Configuration Integration Tests
//!
//! Run with: cargo test -p integration-tests --test config_tests

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use integration_tests::{fixtures::*, test_config, FakePlatform, TestHarness};
use starboard_core::traits::{ConfigRecord, ConfigStore, RepoResult};
use starboard_core::{
    Color, ColorSpec, DomainError, DomainEvent, Emoji, PlatformEvent, Snowflake, StarboardConfig,
    StarboardOptions, StarboardOptionsPatch,
};
use starboard_service::{ReconcileOutcome, ServiceContextBuilder, StarboardManager};
use starboard_store::{JsonFileStore, MemoryStore};

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_persists_record() {
    let harness = TestHarness::start().await.unwrap();
    let config = harness.starboard(threshold(2)).await.unwrap();

    assert_eq!(config.channel_id, STARBOARD);
    assert_eq!(config.guild_id, GUILD);
    assert_eq!(config.options.threshold, 2);
    assert_eq!(config.emoji(), &star());

    let persisted = harness.persisted();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0], ConfigRecord::from(&config));
    assert_eq!(harness.manager.starboards(), vec![config]);
}

#[tokio::test]
async fn test_duplicate_channel_and_emoji_rejected() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();

    let err = harness
        .manager
        .create_config(STARBOARD, GUILD, threshold(5))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_CONFIG");
    assert_eq!(harness.persisted().len(), 1);

    // Another emoji in the same channel is fine
    harness
        .manager
        .create_config(STARBOARD, GUILD, StarboardOptionsPatch::with_emoji("🔥"))
        .await
        .unwrap();
    assert_eq!(harness.manager.starboards().len(), 2);
}

#[tokio::test]
async fn test_create_in_unknown_channel() {
    let harness = TestHarness::start().await.unwrap();
    let missing = Snowflake::new(399_999_999_999_999_999);

    let err = harness
        .manager
        .create_config(missing, GUILD, StarboardOptionsPatch::default())
        .await
        .unwrap_err();
    assert_eq!(err.as_domain(), Some(&DomainError::ChannelNotFound(missing)));
    assert!(harness.persisted().is_empty());
}

#[tokio::test]
async fn test_invalid_options_rejected() {
    let harness = TestHarness::start().await.unwrap();

    let err = harness.starboard(threshold(0)).await.unwrap_err();
    assert!(err.to_string().contains("threshold"));
    assert!(harness.manager.starboards().is_empty());
}

// ============================================================================
// Edit
// ============================================================================

#[tokio::test]
async fn test_edit_updates_and_persists() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();

    let edited = harness
        .manager
        .edit_config(
            STARBOARD,
            star(),
            StarboardOptionsPatch {
                threshold: Some(4),
                allow_nsfw: Some(true),
                // The emoji is fixed once created
                emoji: Some(Emoji::parse("🔥")),
                ..StarboardOptionsPatch::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.options.threshold, 4);
    assert!(edited.options.allow_nsfw);
    assert_eq!(edited.emoji(), &star());
    assert_eq!(harness.persisted()[0].options.threshold, 4);
}

#[tokio::test]
async fn test_edit_with_json_options() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();

    let edited = harness
        .manager
        .edit_config_json(
            STARBOARD,
            "⭐",
            json!({ "allowSelfStar": false, "color": "#ff0000", "unknownKey": 1 }),
        )
        .await
        .unwrap();

    assert!(!edited.options.allow_self_star);
    assert_eq!(edited.options.color, ColorSpec::Fixed(Color::parse_hex("#ff0000").unwrap()));
}

#[tokio::test]
async fn test_invalid_edit_leaves_config_untouched() {
    let harness = TestHarness::start().await.unwrap();
    let original = harness.starboard(threshold(3)).await.unwrap();

    let err = harness
        .manager
        .edit_config(STARBOARD, star(), threshold(0))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");
    assert_eq!(harness.manager.starboards(), vec![original]);
    assert_eq!(harness.persisted()[0].options.threshold, 3);
}

#[tokio::test]
async fn test_edit_unknown_starboard() {
    let harness = TestHarness::start().await.unwrap();

    let err = harness
        .manager
        .edit_config(STARBOARD, star(), threshold(2))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn test_delete_removes_and_persists() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    let mut events = harness.manager.subscribe();

    let removed = harness.manager.delete_config(STARBOARD, "⭐").await.unwrap();
    assert_eq!(removed.channel_id, STARBOARD);
    assert!(harness.manager.starboards().is_empty());
    assert!(harness.persisted().is_empty());
    assert_eq!(events.try_recv().unwrap().event_type(), "STARBOARD_DELETED");

    let err = harness
        .manager
        .delete_config(STARBOARD, "⭐")
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "UNKNOWN_STARBOARD");
}

#[tokio::test]
async fn test_channel_delete_drops_its_starboards() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    harness
        .manager
        .create_config(STARBOARD, GUILD, StarboardOptionsPatch::with_emoji("🔥"))
        .await
        .unwrap();
    harness
        .manager
        .create_config(HALL_OF_FAME, GUILD, StarboardOptionsPatch::default())
        .await
        .unwrap();

    harness.platform.drop_channel(STARBOARD);
    let outcomes = harness
        .manager
        .handle(PlatformEvent::ChannelDelete {
            guild_id: GUILD,
            channel_id: STARBOARD,
        })
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .all(|o| matches!(o, ReconcileOutcome::StarboardRemoved { channel_id, .. } if *channel_id == STARBOARD)));

    let remaining = harness.manager.starboards();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].channel_id, HALL_OF_FAME);
    assert_eq!(harness.persisted().len(), 1);
}

#[tokio::test]
async fn test_channel_delete_cancels_pending_deletions() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "short-lived");
    let reactor = user();
    harness.star(&message, &reactor, 1).await.unwrap();
    harness.unstar(&message, &reactor, 0).await.unwrap();

    let scheduler = harness.manager.context().scheduler();
    assert_eq!(scheduler.pending_count(), 1);

    harness
        .manager
        .handle(PlatformEvent::ChannelDelete {
            guild_id: GUILD,
            channel_id: STARBOARD,
        })
        .await
        .unwrap();
    assert_eq!(scheduler.pending_count(), 0);
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_load_from_existing_store() {
    let stored = StarboardConfig::new(
        GUILD,
        HALL_OF_FAME,
        StarboardOptions::from_patch(threshold(7)),
    );
    let store = Arc::new(MemoryStore::with_records(vec![ConfigRecord::from(&stored)]));

    let harness = TestHarness::start_with(test_config(), store, None).await.unwrap();
    assert_eq!(harness.manager.starboards(), vec![stored]);

    // A loaded starboard reconciles like any other
    let message = harness.platform.post(GENERAL, &user(), "loaded");
    let outcome = harness.star(&message, &user(), 7).await.unwrap();
    assert!(matches!(outcome, ReconcileOutcome::Created { channel_id, .. } if channel_id == HALL_OF_FAME));
}

#[tokio::test]
async fn test_json_file_store_survives_restart() {
    let path = std::env::temp_dir().join(format!(
        "starboard-integration-{}-{}.json",
        std::process::id(),
        unique_suffix()
    ));

    {
        let store: Arc<dyn ConfigStore> = Arc::new(JsonFileStore::new(&path));
        let manager = manager_with_store(store).await;
        manager
            .create_config(STARBOARD, GUILD, threshold(4))
            .await
            .unwrap();
    }

    let store: Arc<dyn ConfigStore> = Arc::new(JsonFileStore::new(&path));
    let manager = manager_with_store(store).await;
    let starboards = manager.starboards();
    assert_eq!(starboards.len(), 1);
    assert_eq!(starboards[0].options.threshold, 4);

    let _ = std::fs::remove_file(&path);
}

#[tokio::test]
async fn test_malformed_store_fails_load() {
    let path = std::env::temp_dir().join(format!(
        "starboard-integration-bad-{}-{}.json",
        std::process::id(),
        unique_suffix()
    ));
    std::fs::write(&path, "{\"not\": \"a list\"}").unwrap();

    let platform = Arc::new(FakePlatform::new(starboard_bot()));
    let ctx = ServiceContextBuilder::new()
        .platform(platform)
        .store(Arc::new(JsonFileStore::new(&path)))
        .bot_user_id(BOT_ID)
        .build()
        .unwrap();
    let err = StarboardManager::new(ctx).load().await.unwrap_err();
    assert_eq!(err.error_code(), "MALFORMED_STORE");

    let _ = std::fs::remove_file(&path);
}

/// Store that refuses every write
struct ReadOnlyStore;

#[async_trait]
impl ConfigStore for ReadOnlyStore {
    async fn load_all(&self) -> RepoResult<Vec<ConfigRecord>> {
        Ok(Vec::new())
    }

    async fn save_all(&self, _records: &[ConfigRecord]) -> RepoResult<()> {
        Err(DomainError::StorageError("read-only".to_string()))
    }
}

#[tokio::test]
async fn test_failed_write_rolls_back() {
    let manager = manager_with_store(Arc::new(ReadOnlyStore)).await;
    let mut events = manager.subscribe();

    let err = manager
        .create_config(STARBOARD, GUILD, threshold(1))
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "STORAGE_ERROR");
    assert!(manager.starboards().is_empty());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_lifecycle_events() {
    let harness = TestHarness::start().await.unwrap();
    let mut events = harness.manager.subscribe();

    harness.starboard(threshold(1)).await.unwrap();
    harness
        .manager
        .edit_config(STARBOARD, star(), threshold(2))
        .await
        .unwrap();

    match events.try_recv().unwrap() {
        DomainEvent::StarboardCreated(e) => assert_eq!(e.starboard.channel_id, STARBOARD),
        other => panic!("unexpected event {other:?}"),
    }
    match events.try_recv().unwrap() {
        DomainEvent::StarboardEdited(e) => {
            assert_eq!(e.old.options.threshold, 1);
            assert_eq!(e.new.options.threshold, 2);
        }
        other => panic!("unexpected event {other:?}"),
    }
}

async fn manager_with_store(store: Arc<dyn ConfigStore>) -> StarboardManager {
    let platform = Arc::new(FakePlatform::new(starboard_bot()));
    for channel in channels() {
        platform.add_channel(channel);
    }
    let ctx = ServiceContextBuilder::new()
        .platform(platform)
        .store(store)
        .settings(test_config())
        .bot_user_id(BOT_ID)
        .build()
        .unwrap();
    let manager = StarboardManager::new(ctx);
    manager.load().await.unwrap();
    manager
}
