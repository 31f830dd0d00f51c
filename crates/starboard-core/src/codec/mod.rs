//! Codecs for text the starboard embeds in platform messages

mod footer;

pub use footer::FooterMarker;
