//! Topic-based event bus for battle events.
//!
//! Engine events are stamped with the tick they happened on and published to
//! a topic, so consumers can subscribe only to what they render or react to.

mod bus;
mod types;

pub use bus::{EventBus, Topic};
pub use types::Event;
