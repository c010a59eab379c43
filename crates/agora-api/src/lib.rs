//! # agora-api
//!
//! HTTP API layer for Agora built on Axum.
//!
//! Provides the notification and chat WebSocket endpoints, the REST
//! endpoints that read and acknowledge durable notifications and
//! messages, the event intake used by producers, health checks, JWT
//! identity resolution, extractors, DTOs, and error mapping.

pub mod app;
pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::ApiError;
pub use auth::JwtIdentityResolver;
pub use state::AppState;
