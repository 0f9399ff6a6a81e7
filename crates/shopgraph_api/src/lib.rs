//! GraphQL transport for the shopgraph catalog.
//!
//! # Responsibility
//! - Map GraphQL operations onto `CatalogService` calls through the `Store`.
//! - Translate catalog errors into GraphQL errors with a stable `code`
//!   extension.
//! - Serve the schema over HTTP.
//!
//! # Invariants
//! - Every mutation runs in its own unit of work.
//! - Wire ids that do not parse as integers behave like unknown ids.

mod error;
mod schema;
mod server;
mod types;

pub use schema::{build_schema, CatalogSchema, MutationRoot, QueryRoot};
pub use server::{router, run_server, ServerConfig};
pub use types::{CategoryInputObject, ProductInputObject, UserInputObject};
