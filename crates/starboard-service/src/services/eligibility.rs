//! Eligibility filter
//!
//! Decides whether a reaction may touch a starboard at all. Checks run in a
//! fixed order and the first one that fires decides the outcome.

use serde::Serialize;

use starboard_common::NoticeConfig;
use starboard_core::events::StarReactionEvent;
use starboard_core::{Channel, DomainError, DomainEvent, Emoji, Snowflake, StarboardConfig, User};

/// Why a star was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rejection {
    Nsfw,
    SelfStar,
    BotAuthor,
    EmptyContent,
    AlreadyStarred,
}

impl Rejection {
    /// Domain event reporting this rejection
    pub fn event(self, reaction: StarReactionEvent) -> DomainEvent {
        match self {
            Self::Nsfw => DomainEvent::ReactionRejectedNsfw(reaction),
            Self::SelfStar => DomainEvent::ReactionRejectedSelfStar(reaction),
            Self::BotAuthor => DomainEvent::ReactionRejectedBotAuthor(reaction),
            Self::EmptyContent => DomainEvent::ReactionRejectedEmptyContent(reaction),
            Self::AlreadyStarred => DomainEvent::ReactionRejectedAlreadyStarred(reaction),
        }
    }

    /// Policy rejections take the offending reaction back off the message
    pub fn retracts_reaction(self) -> bool {
        matches!(self, Self::Nsfw | Self::SelfStar | Self::BotAuthor)
    }

    /// Text posted to the source channel, if any
    pub fn notice(self, notices: &NoticeConfig) -> Option<&str> {
        if !notices.enabled {
            return None;
        }
        match self {
            Self::Nsfw => None,
            Self::SelfStar => Some(&notices.self_star),
            Self::BotAuthor => Some(&notices.bot_author),
            Self::EmptyContent => Some(&notices.empty_content),
            Self::AlreadyStarred => Some(&notices.already_starred),
        }
    }

    /// Map a content resolution error onto a rejection
    pub fn from_content_error(err: &DomainError) -> Option<Self> {
        match err {
            DomainError::EmptyContent => Some(Self::EmptyContent),
            DomainError::AlreadyStarredElsewhere => Some(Self::AlreadyStarred),
            _ => None,
        }
    }
}

/// Outcome of the eligibility checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Reconcile the star post
    Proceed,
    /// Not this starboard's business; nothing is reported
    Ignore,
    /// Refused; reported through a domain event
    Reject(Rejection),
    /// Not enough stars yet
    BelowThreshold,
}

/// Everything the filter looks at for a reaction add
#[derive(Debug, Clone, Copy)]
pub struct StarAttempt<'a> {
    pub reactor: &'a User,
    pub emoji: &'a Emoji,
    pub author: &'a User,
    /// Channel the starred message lives in
    pub channel: &'a Channel,
    /// Live reaction count, `None` when the platform could not say
    pub live_count: Option<u32>,
}

pub struct EligibilityFilter;

impl EligibilityFilter {
    /// Judge a reaction add
    pub fn check_add(config: &StarboardConfig, attempt: &StarAttempt<'_>) -> Verdict {
        let options = &config.options;

        if attempt.reactor.bot {
            return Verdict::Ignore;
        }
        if attempt.emoji != config.emoji() {
            return Verdict::Ignore;
        }
        if !options.allow_nsfw && attempt.channel.nsfw {
            return Verdict::Reject(Rejection::Nsfw);
        }
        if !options.allow_self_star && attempt.author.id == attempt.reactor.id {
            return Verdict::Reject(Rejection::SelfStar);
        }
        if !options.star_bot_messages && attempt.author.bot {
            return Verdict::Reject(Rejection::BotAuthor);
        }
        if config.ignores(attempt.channel.id) {
            return Verdict::Ignore;
        }
        if attempt
            .live_count
            .is_some_and(|count| count < options.threshold)
        {
            return Verdict::BelowThreshold;
        }
        Verdict::Proceed
    }

    /// Judge a reaction removal: only the reactor, emoji and ignore list matter
    pub fn check_removal(
        config: &StarboardConfig,
        reactor: &User,
        emoji: &Emoji,
        channel_id: Snowflake,
    ) -> Verdict {
        if reactor.bot || emoji != config.emoji() || config.ignores(channel_id) {
            Verdict::Ignore
        } else {
            Verdict::Proceed
        }
    }
}
