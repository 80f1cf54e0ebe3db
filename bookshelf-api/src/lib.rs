//! # Bookshelf API Server Library
//!
//! HTTP surface of the Bookshelf service: routing, configuration and the
//! mapping from domain errors to JSON responses.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: JSON and path extractors with JSON rejections
//! - `middleware`: Security headers and request logging
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
