//! # Bookshelf Shared Library
//!
//! This crate contains the domain types, persistence layer and business logic
//! behind the Bookshelf API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their SQL operations
//! - `repositories`: Repository traits, Postgres and in-memory backends, unit of work
//! - `services`: Book, review and user services (validation + mapping)
//! - `auth`: Password hashing, JWT issuance and the authentication service
//! - `db`: Connection pool, migrations and seed data
//! - `validation`: Field-level validation error helpers

pub mod auth;
pub mod db;
pub mod models;
pub mod repositories;
pub mod services;
pub mod validation;

/// Current version of the Bookshelf shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
