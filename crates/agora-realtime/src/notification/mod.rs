//! Notification dispatch: recipient resolution, durable write, push fan-out.

pub mod dispatcher;
pub mod outcome;
pub mod persistence;

pub use dispatcher::NotificationDispatcher;
pub use outcome::{DeliveryOutcome, RecipientOutcome, RecipientStatus};
