//! Direct-message relay over the chat rooms.

pub mod relay;

pub use relay::{ChatDelivery, ChatRelay};
