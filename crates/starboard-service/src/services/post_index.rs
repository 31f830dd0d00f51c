//! Optional star post index
//!
//! Maps (starboard channel, source message) to the star post id so a hit can
//! skip the history scan. Entries are hints: callers verify a hit against
//! the real message and fall back to scanning on any miss.

use dashmap::DashMap;

use starboard_core::Snowflake;

#[derive(Debug, Default)]
pub struct PostIndex {
    posts: DashMap<(Snowflake, Snowflake), Snowflake>,
}

impl PostIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, channel_id: Snowflake, source_id: Snowflake) -> Option<Snowflake> {
        self.posts.get(&(channel_id, source_id)).map(|entry| *entry)
    }

    pub fn insert(&self, channel_id: Snowflake, source_id: Snowflake, post_id: Snowflake) {
        self.posts.insert((channel_id, source_id), post_id);
    }

    pub fn evict(&self, channel_id: Snowflake, source_id: Snowflake) {
        self.posts.remove(&(channel_id, source_id));
    }

    /// Drop whichever entry points at `post_id`
    pub fn evict_post(&self, channel_id: Snowflake, post_id: Snowflake) {
        self.posts
            .retain(|(channel, _), post| !(*channel == channel_id && *post == post_id));
    }

    pub fn evict_channel(&self, channel_id: Snowflake) {
        self.posts.retain(|(channel, _), _| *channel != channel_id);
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
