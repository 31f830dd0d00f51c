//! Domain events (outbound) and platform events (inbound)

mod domain_event;
mod platform_event;

pub use domain_event::{
    DomainEvent, ReactionsRemovedAllEvent, StarReactionEvent, StarboardChangedEvent,
    StarboardEditedEvent,
};
pub use platform_event::{PlatformEvent, ReactionPayload};
