// Helper functions shared across GraphQL query/mutation modules.

use async_graphql::ErrorExtensions;

pub(crate) const BOOK_ALREADY_SAVED: &str = "BOOK_ALREADY_SAVED";
pub(crate) const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
pub(crate) const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

/// Build a GraphQL error carrying an extension `code`
pub(crate) fn coded_error(message: impl Into<String>, code: &'static str) -> async_graphql::Error {
    async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
}

/// Log an unexpected failure and hide its detail from the client
pub(crate) fn internal_error(context: &str, err: impl std::fmt::Display) -> async_graphql::Error {
    tracing::error!(error = %err, "{}", context);
    coded_error(context, INTERNAL_SERVER_ERROR)
}
