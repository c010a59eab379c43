//! # agora-core
//!
//! Core crate for Agora. Contains configuration schemas, typed
//! identifiers, the denormalized models the fan-out layer renders,
//! the closed set of domain events, the collaborator traits implemented
//! by the persistence layer, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Agora crates.

pub mod config;
pub mod error;
pub mod events;
pub mod models;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
