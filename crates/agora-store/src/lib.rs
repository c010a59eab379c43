//! # agora-store
//!
//! In-memory backend for every collaborator trait in
//! [`agora_core::traits`]. Used by the development server and by tests;
//! a production deployment plugs its own database-backed implementation
//! into the same traits.

pub mod memory;

pub use memory::MemoryStore;
