//! Domain entities - core business objects

mod channel;
mod message;
mod star_post;
mod starboard;
mod user;

pub use channel::Channel;
pub use message::{Attachment, Embed, EmbedAuthor, EmbedFooter, Message};
pub use star_post::{compose, footer_for, StarPost};
pub use starboard::{SourceDeletePolicy, StarboardConfig, StarboardOptions, StarboardOptionsPatch};
pub use user::User;
