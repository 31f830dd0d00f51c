//! Reconciliation Integration Tests
//!
//! Drive platform events through the manager and check the star posts the
//! fake platform ends up with.
//!
//! Run with: cargo test -p integration-tests --test reconcile_tests

use std::collections::BTreeSet;
use std::sync::Arc;

use integration_tests::{
    fixtures::*, payload, test_config, FakeLinkResolver, TestHarness,
};
use starboard_core::traits::LinkPreviewFetcher;
use starboard_core::{Emoji, Message, PlatformEvent, SourceDeletePolicy, StarboardOptionsPatch};
use starboard_service::{ReconcileOutcome, Rejection};
use starboard_store::MemoryStore;

// ============================================================================
// Threshold and creation
// ============================================================================

#[tokio::test]
async fn test_post_created_once_threshold_reached() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(3)).await.unwrap();

    let author = user();
    let message = harness.platform.post(GENERAL, &author, "hello");

    let outcome = harness.star(&message, &user(), 2).await.unwrap();
    assert_eq!(
        outcome,
        ReconcileOutcome::BelowThreshold {
            count: Some(2),
            threshold: 3
        }
    );
    assert!(harness.posts(STARBOARD, &star()).is_empty());

    let outcome = harness.star(&message, &user(), 3).await.unwrap();
    assert!(matches!(outcome, ReconcileOutcome::Created { count: 3, .. }));

    let posts = harness.platform.bot_posts(STARBOARD);
    assert_eq!(posts.len(), 1);
    let embed = &posts[0].embeds[0];
    assert_eq!(
        embed.footer_text(),
        Some(format!("⭐ 3 | {}", message.id).as_str())
    );
    assert_eq!(embed.description.as_deref(), Some("hello"));
    assert_eq!(
        embed.author.as_ref().map(|a| a.name.as_str()),
        Some(author.tag.as_str())
    );
}

#[tokio::test]
async fn test_single_star_posts_immediately() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "hello");

    harness.star(&message, &user(), 1).await.unwrap();

    let posts = harness.platform.bot_posts(STARBOARD);
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].embeds[0].footer_text(),
        Some(format!("⭐ 1 | {}", message.id).as_str())
    );
    assert_eq!(posts[0].embeds[0].description.as_deref(), Some("hello"));
}

#[tokio::test]
async fn test_further_stars_edit_the_same_post() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "again and again");

    let created = harness.star(&message, &user(), 1).await.unwrap();
    let updated = harness.star(&message, &user(), 2).await.unwrap();

    assert!(matches!(created, ReconcileOutcome::Created { count: 1, .. }));
    assert!(matches!(updated, ReconcileOutcome::Updated { count: 2, .. }));
    assert_eq!(created.post_id(), updated.post_id());

    let posts = harness.posts(STARBOARD, &star());
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].stars(), 2);
    assert_eq!(posts[0].source_id(), message.id);
}

#[tokio::test]
async fn test_long_content_is_truncated() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), &"a".repeat(2100));

    harness.star(&message, &user(), 1).await.unwrap();

    let posts = harness.posts(STARBOARD, &star());
    let description = posts[0].embed.description.clone().unwrap();
    assert!(description.ends_with("\n..."));
    assert_eq!(description.chars().count(), 2004);
}

#[tokio::test]
async fn test_attachment_only_message_is_starrable() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();

    let mut message = Message::new(harness.platform.next_id(), GENERAL, user(), String::new());
    message.guild_id = Some(GUILD);
    message.attachments.push(image_attachment("cat.png"));
    harness.platform.insert_message(message.clone());

    let outcome = harness.star(&message, &user(), 1).await.unwrap();
    assert!(matches!(outcome, ReconcileOutcome::Created { .. }));

    let posts = harness.posts(STARBOARD, &star());
    assert_eq!(
        posts[0].embed.image.as_deref(),
        Some("https://cdn.example.com/attachments/cat.png")
    );
    assert_eq!(posts[0].embed.description, None);
}

#[tokio::test]
async fn test_link_preview_supplies_image() {
    let link = "https://tenor.com/view/dancing-cat-12345";
    let gif = "https://media.tenor.com/abc/dancing-cat.gif";
    let fetcher: Arc<dyn LinkPreviewFetcher> = Arc::new(FakeLinkResolver::with(link, gif));
    let harness = TestHarness::start_with(test_config(), Arc::new(MemoryStore::new()), Some(fetcher))
        .await
        .unwrap();
    harness
        .starboard(StarboardOptionsPatch {
            resolve_link_preview_images: Some(true),
            ..StarboardOptionsPatch::default()
        })
        .await
        .unwrap();

    let message = harness
        .platform
        .post(GENERAL, &user(), &format!("look at this {link}"));
    harness.star(&message, &user(), 1).await.unwrap();

    let posts = harness.posts(STARBOARD, &star());
    assert_eq!(posts[0].embed.image.as_deref(), Some(gif));
}

// ============================================================================
// Rejections
// ============================================================================

#[tokio::test]
async fn test_self_star_rejected_with_notice() {
    let harness = TestHarness::start().await.unwrap();
    harness
        .starboard(StarboardOptionsPatch {
            allow_self_star: Some(false),
            ..StarboardOptionsPatch::default()
        })
        .await
        .unwrap();

    let author = user();
    let message = harness.platform.post(GENERAL, &author, "me me me");
    let outcome = harness.star(&message, &author, 1).await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Rejected {
            reason: Rejection::SelfStar
        }
    );
    assert_eq!(
        harness.platform.notices(),
        vec![(GENERAL, "You cannot star your own messages.".to_string())]
    );
    assert_eq!(harness.platform.retracted(), vec![(message.id, author.id)]);
    assert!(harness.platform.bot_posts(STARBOARD).is_empty());
}

#[tokio::test]
async fn test_nsfw_source_rejected_without_notice() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();

    let reactor = user();
    let message = harness.platform.post(LATE_NIGHT, &user(), "after hours");
    let outcome = harness.star(&message, &reactor, 1).await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Rejected {
            reason: Rejection::Nsfw
        }
    );
    assert!(harness.platform.notices().is_empty());
    assert_eq!(harness.platform.retracted(), vec![(message.id, reactor.id)]);
}

#[tokio::test]
async fn test_bot_author_rejected_when_disallowed() {
    let harness = TestHarness::start().await.unwrap();
    harness
        .starboard(StarboardOptionsPatch {
            star_bot_messages: Some(false),
            ..StarboardOptionsPatch::default()
        })
        .await
        .unwrap();

    let message = harness.platform.post(GENERAL, &other_bot(), "beep");
    let outcome = harness.star(&message, &user(), 1).await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Rejected {
            reason: Rejection::BotAuthor
        }
    );
    assert_eq!(harness.platform.notices()[0].1, "You cannot star bot messages.");
}

#[tokio::test]
async fn test_bot_reactions_are_ignored() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();

    // A bot reacting in an nsfw channel is dropped before the nsfw check
    let message = harness.platform.post(LATE_NIGHT, &user(), "hi");
    let mut events = harness.manager.subscribe();
    let outcome = harness.star(&message, &other_bot(), 1).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Ignored);
    assert!(harness.platform.retracted().is_empty());
    assert!(harness.platform.notices().is_empty());
    assert!(events.try_recv().is_err());
}

#[tokio::test]
async fn test_empty_message_rejected_but_reaction_kept() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();

    let message = harness.platform.post(GENERAL, &user(), "   ");
    let outcome = harness.star(&message, &user(), 1).await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Rejected {
            reason: Rejection::EmptyContent
        }
    );
    assert_eq!(harness.platform.notices()[0].1, "You cannot star an empty message.");
    assert!(harness.platform.retracted().is_empty());
}

#[tokio::test]
async fn test_starring_a_star_post_is_rejected() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();

    let message = harness.platform.post(GENERAL, &user(), "original");
    harness.star(&message, &user(), 1).await.unwrap();

    let star_post = harness.platform.bot_posts(STARBOARD).remove(0);
    let mut events = harness.manager.subscribe();
    let outcome = harness.star(&star_post, &user(), 1).await.unwrap();

    assert_eq!(
        outcome,
        ReconcileOutcome::Rejected {
            reason: Rejection::AlreadyStarred
        }
    );
    assert_eq!(harness.platform.bot_posts(STARBOARD).len(), 1);
    assert_eq!(
        events.try_recv().unwrap().event_type(),
        "REACTION_REJECTED_ALREADY_STARRED"
    );
}

#[tokio::test]
async fn test_ignored_channel_is_skipped() {
    let harness = TestHarness::start().await.unwrap();
    harness
        .starboard(StarboardOptionsPatch {
            ignored_channel_ids: Some(BTreeSet::from([GENERAL])),
            ..StarboardOptionsPatch::default()
        })
        .await
        .unwrap();

    let message = harness.platform.post(GENERAL, &user(), "quiet please");
    let outcome = harness.star(&message, &user(), 5).await.unwrap();

    assert_eq!(outcome, ReconcileOutcome::Ignored);
    assert!(harness.platform.notices().is_empty());
}

#[tokio::test]
async fn test_notices_can_be_disabled() {
    let mut config = test_config();
    config.notices.enabled = false;
    let harness = TestHarness::start_with_config(config).await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();

    let message = harness.platform.post(GENERAL, &user(), "");
    let outcome = harness.star(&message, &user(), 1).await.unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Rejected { .. }));
    assert!(harness.platform.notices().is_empty());
}

// ============================================================================
// Removal and deletion
// ============================================================================

#[tokio::test]
async fn test_unstar_to_zero_deletes_after_debounce() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "fleeting");
    let reactor = user();

    let created = harness.star(&message, &reactor, 1).await.unwrap();
    let post_id = created.post_id().unwrap();

    let outcome = harness.unstar(&message, &reactor, 0).await.unwrap();
    assert!(matches!(outcome, ReconcileOutcome::DeletionScheduled { .. }));

    // Zeroed but not gone yet
    let posts = harness.posts(STARBOARD, &star());
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].stars(), 0);

    harness.settle().await;
    assert!(harness.posts(STARBOARD, &star()).is_empty());
    assert_eq!(harness.platform.deleted(), vec![post_id]);
}

#[tokio::test]
async fn test_restar_cancels_pending_deletion() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "flicker");
    let reactor = user();

    harness.star(&message, &reactor, 1).await.unwrap();
    harness.unstar(&message, &reactor, 0).await.unwrap();
    let outcome = harness.star(&message, &reactor, 1).await.unwrap();
    assert!(matches!(outcome, ReconcileOutcome::Updated { count: 1, .. }));

    harness.settle().await;
    let posts = harness.posts(STARBOARD, &star());
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].stars(), 1);
    assert!(harness.platform.deleted().is_empty());
}

#[tokio::test]
async fn test_failed_restar_keeps_pending_deletion() {
    let mut config = test_config();
    config.reconcile.delete_delay_ms = 100;
    let harness = TestHarness::start_with_config(config).await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "flaky");
    let reactor = user();

    let post_id = harness.star(&message, &reactor, 1).await.unwrap().post_id().unwrap();
    harness.unstar(&message, &reactor, 0).await.unwrap();

    harness.platform.fail_history(true);
    assert!(harness.star(&message, &reactor, 1).await.is_err());
    assert!(harness
        .manager
        .context()
        .scheduler()
        .is_pending(STARBOARD, post_id));
    harness.platform.fail_history(false);

    harness.settle().await;
    assert!(harness.posts(STARBOARD, &star()).is_empty());
    assert_eq!(harness.platform.deleted(), vec![post_id]);
}

#[tokio::test]
async fn test_unstar_above_threshold_keeps_post() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(2)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "popular");

    harness.star(&message, &user(), 3).await.unwrap();
    let outcome = harness.unstar(&message, &user(), 2).await.unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Updated { count: 2, .. }));
    harness.settle().await;
    assert_eq!(harness.posts(STARBOARD, &star())[0].stars(), 2);
}

#[tokio::test]
async fn test_unstar_below_threshold_removes_post() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(3)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "borderline");

    harness.star(&message, &user(), 3).await.unwrap();
    let outcome = harness.unstar(&message, &user(), 2).await.unwrap();

    assert!(matches!(outcome, ReconcileOutcome::DeletionScheduled { .. }));
    harness.settle().await;
    assert!(harness.posts(STARBOARD, &star()).is_empty());
}

#[tokio::test]
async fn test_unstar_without_post() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(5)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "never made it");

    let outcome = harness.unstar(&message, &user(), 0).await.unwrap();
    assert_eq!(outcome, ReconcileOutcome::NoPost);
}

#[tokio::test]
async fn test_remove_all_zeroes_and_deletes() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "cleared");
    harness.star(&message, &user(), 4).await.unwrap();

    let outcomes = harness
        .manager
        .handle(PlatformEvent::ReactionRemoveAll {
            guild_id: GUILD,
            channel_id: GENERAL,
            message_id: message.id,
        })
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 1);
    assert!(matches!(outcomes[0], ReconcileOutcome::DeletionScheduled { .. }));
    assert_eq!(harness.posts(STARBOARD, &star())[0].stars(), 0);

    harness.settle().await;
    assert!(harness.posts(STARBOARD, &star()).is_empty());
}

#[tokio::test]
async fn test_message_delete_follows_policy() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    harness
        .manager
        .create_config(
            HALL_OF_FAME,
            GUILD,
            StarboardOptionsPatch {
                emoji: Some(Emoji::parse("🏆")),
                on_source_delete: Some(SourceDeletePolicy::ZeroAndRemove),
                ..StarboardOptionsPatch::default()
            },
        )
        .await
        .unwrap();

    let message = harness.platform.post(GENERAL, &user(), "doomed");
    harness.star(&message, &user(), 1).await.unwrap();
    harness
        .react(&message, &user(), &Emoji::parse("🏆"), 1)
        .await
        .unwrap();

    let outcomes = harness
        .manager
        .handle(PlatformEvent::MessageDelete {
            guild_id: GUILD,
            channel_id: GENERAL,
            message_id: message.id,
        })
        .await
        .unwrap();

    // Only the starboard set to remove reacts
    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
        outcomes[0],
        ReconcileOutcome::DeletionScheduled { channel_id, .. } if channel_id == HALL_OF_FAME
    ));

    harness.settle().await;
    assert_eq!(harness.posts(STARBOARD, &star()).len(), 1);
    assert!(harness.posts(HALL_OF_FAME, &Emoji::parse("🏆")).is_empty());
}

// ============================================================================
// Platform trouble
// ============================================================================

#[tokio::test]
async fn test_edit_failure_is_swallowed() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "stubborn");
    harness.star(&message, &user(), 1).await.unwrap();

    harness.platform.fail_edits(true);
    let outcome = harness.star(&message, &user(), 2).await.unwrap();

    assert!(matches!(outcome, ReconcileOutcome::Updated { count: 2, .. }));
    assert_eq!(harness.posts(STARBOARD, &star())[0].stars(), 1);
    assert_eq!(harness.platform.edit_count(), 0);
}

#[tokio::test]
async fn test_unknown_live_count_does_not_block() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(3)).await.unwrap();
    let message = harness.platform.post(GENERAL, &user(), "mystery");

    harness.platform.fail_counts(true);
    let created = harness.star(&message, &user(), 0).await.unwrap();
    let updated = harness.star(&message, &user(), 0).await.unwrap();

    assert!(matches!(created, ReconcileOutcome::Created { count: 1, .. }));
    assert!(matches!(updated, ReconcileOutcome::Updated { count: 2, .. }));
}

#[tokio::test]
async fn test_missing_source_message_is_ignored() {
    let harness = TestHarness::start().await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();

    // Never reaches the channel history
    let mut ghost = Message::new(harness.platform.next_id(), GENERAL, user(), "gone".to_string());
    ghost.guild_id = Some(GUILD);

    let outcomes = harness
        .manager
        .handle(PlatformEvent::ReactionAdd(payload(&ghost, &user(), &star())))
        .await
        .unwrap();
    assert_eq!(outcomes, vec![ReconcileOutcome::Ignored]);
}

// ============================================================================
// Emoji, post index, events
// ============================================================================

#[tokio::test]
async fn test_custom_emoji_starboard() {
    let harness = TestHarness::start().await.unwrap();
    let upvote = Emoji::parse("<:upvote:123456789012345678>");
    harness
        .starboard(StarboardOptionsPatch::with_emoji(upvote.clone()))
        .await
        .unwrap();

    let message = harness.platform.post(GENERAL, &user(), "custom");
    let unrelated = harness.star(&message, &user(), 1).await.unwrap();
    assert_eq!(unrelated, ReconcileOutcome::Ignored);

    let outcome = harness.react(&message, &user(), &upvote, 1).await.unwrap();
    assert!(matches!(outcome, ReconcileOutcome::Created { .. }));

    let posts = harness.posts(STARBOARD, &upvote);
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].embed.footer_icon(),
        Some("https://cdn.discordapp.com/emojis/123456789012345678.png")
    );
}

#[tokio::test]
async fn test_post_index_finds_posts_beyond_history() {
    let mut config = test_config();
    config.reconcile.history_limit = 3;
    config.reconcile.post_index = true;
    let harness = TestHarness::start_with_config(config).await.unwrap();
    harness.starboard(threshold(1)).await.unwrap();

    let message = harness.platform.post(GENERAL, &user(), "buried");
    harness.star(&message, &user(), 1).await.unwrap();

    // Push the post out of the scanned window
    for i in 0..5 {
        harness.platform.post(STARBOARD, &user(), &format!("chatter {i}"));
    }

    let outcome = harness.star(&message, &user(), 2).await.unwrap();
    assert!(matches!(outcome, ReconcileOutcome::Updated { count: 2, .. }));
    assert_eq!(harness.platform.bot_posts(STARBOARD).len(), 1);
}

#[tokio::test]
async fn test_domain_events_published() {
    let harness = TestHarness::start().await.unwrap();
    harness
        .starboard(StarboardOptionsPatch {
            allow_self_star: Some(false),
            ..StarboardOptionsPatch::default()
        })
        .await
        .unwrap();
    let mut events = harness.manager.subscribe();

    let author = user();
    let message = harness.platform.post(GENERAL, &author, "watched");
    harness.star(&message, &user(), 1).await.unwrap();
    harness.star(&message, &author, 2).await.unwrap();

    let added = events.try_recv().unwrap();
    assert_eq!(added.event_type(), "REACTION_ADDED");
    let rejected = events.try_recv().unwrap();
    assert_eq!(rejected.event_type(), "REACTION_REJECTED_SELF_STAR");
    assert!(rejected.is_rejection());
}
