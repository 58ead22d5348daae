//! GraphQL authentication
//!
//! Token checks never reject a request. The HTTP handler resolves an
//! [Identity] for every request, anonymous when the token is missing or
//! invalid, and resolvers that need a user ask for one through [AuthExt].

use async_graphql::{Context, ErrorExtensions, Result};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::services::{AuthService, TokenData};

/// Extension code attached to authentication errors
pub const UNAUTHENTICATED: &str = "UNAUTHENTICATED";

/// User context extracted from JWT, available in GraphQL resolvers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

impl From<TokenData> for AuthUser {
    fn from(data: TokenData) -> Self {
        Self {
            user_id: data.id,
            username: data.username,
            email: data.email,
        }
    }
}

/// The caller's identity for one request; `None` means anonymous
#[derive(Debug, Clone, Default)]
pub struct Identity(pub Option<AuthUser>);

/// Pick the raw token for a request.
///
/// The `Authorization` header wins when present and is split on whitespace so
/// `Bearer <token>` and a bare token both work. Otherwise a `token` field in the
/// JSON body, then a `token` query parameter.
pub fn extract_token(
    headers: &HeaderMap,
    body_token: Option<&str>,
    query_token: Option<&str>,
) -> Option<String> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty());

    if let Some(header) = header {
        return header
            .split_whitespace()
            .last()
            .map(|t| t.trim().to_string());
    }

    body_token
        .or(query_token)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// Verify `token` if there is one. Any failure yields an anonymous identity.
pub fn resolve_identity(auth: &AuthService, token: Option<&str>) -> Identity {
    let Some(token) = token else {
        tracing::debug!("No auth token in request");
        return Identity(None);
    };

    match auth.verify_token(token) {
        Ok(data) => {
            tracing::debug!(user_id = %data.id, "Auth successful");
            Identity(Some(data.into()))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Token verification failed, continuing anonymously");
            Identity(None)
        }
    }
}

/// Build an error tagged `UNAUTHENTICATED`
pub fn unauthenticated(message: impl Into<String>) -> async_graphql::Error {
    async_graphql::Error::new(message).extend_with(|_, e| e.set("code", UNAUTHENTICATED))
}

/// Extension trait to get the caller's identity from GraphQL context
pub trait AuthExt {
    /// The authenticated user, if any
    fn identity(&self) -> Option<&AuthUser>;

    /// The authenticated user, or an `UNAUTHENTICATED` error carrying `message`
    fn require_user(&self, message: &str) -> Result<&AuthUser>;
}

impl<'a> AuthExt for Context<'a> {
    fn identity(&self) -> Option<&AuthUser> {
        self.data_opt::<Identity>().and_then(|i| i.0.as_ref())
    }

    fn require_user(&self, message: &str) -> Result<&AuthUser> {
        self.identity().ok_or_else(|| unauthenticated(message))
    }
}
