//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **media**: uploaded image storage on the local filesystem
//!
//! Adapters convert between domain types and infrastructure representations
//! and contain no business logic.

pub mod media;
pub mod persistence;
