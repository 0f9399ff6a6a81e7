//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into query/mutation level APIs.
//! - Keep the GraphQL layer decoupled from storage details.

pub mod catalog_service;
