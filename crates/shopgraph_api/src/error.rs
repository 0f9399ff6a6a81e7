//! Catalog error to GraphQL error mapping.

use async_graphql::{Error, ErrorExtensions};
use log::error;
use shopgraph_core::{CatalogError, EntityKind};

pub(crate) const NOT_FOUND: &str = "NOT_FOUND";
pub(crate) const INTERNAL: &str = "INTERNAL";

/// Converts a catalog failure into a GraphQL error.
///
/// Not-found keeps its message; storage failures are logged and reported
/// with a generic message.
pub(crate) fn graphql_error(err: impl Into<CatalogError>) -> Error {
    match err.into() {
        CatalogError::NotFound { entity, id } => not_found(entity, id),
        CatalogError::Repo(err) => {
            error!("event=graphql_error module=api status=error error_code=internal error={err}");
            Error::new("internal storage error").extend_with(|_, ext| ext.set("code", INTERNAL))
        }
    }
}

pub(crate) fn not_found(entity: EntityKind, id: impl std::fmt::Display) -> Error {
    Error::new(format!("{entity} not found: {id}")).extend_with(|_, ext| ext.set("code", NOT_FOUND))
}
