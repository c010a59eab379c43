//! Route handlers organized by domain.

pub mod chat;
pub mod events;
pub mod health;
pub mod notification;
pub mod ws;
