//! GraphQL authentication mutations
//!
//! Signup and login. Neither requires an existing session.

use async_graphql::{Context, ID, Object, Result};

use crate::graphql::auth::unauthenticated;
use crate::graphql::helpers::internal_error;
use crate::graphql::types::{Auth, UserInput};
use crate::services::{AuthError, AuthPayload, AuthService, RegisterInput};

impl From<AuthPayload> for Auth {
    fn from(payload: AuthPayload) -> Self {
        Self {
            token: ID(payload.token),
            user: payload.user.into(),
        }
    }
}

#[derive(Default)]
pub struct AuthMutations;

#[Object]
impl AuthMutations {
    /// Register a new user account and sign them in
    async fn add_user(&self, ctx: &Context<'_>, input: UserInput) -> Result<Auth> {
        let auth_service = ctx.data_unchecked::<AuthService>();

        let result = auth_service
            .register(RegisterInput {
                username: input.username,
                email: input.email,
                password: input.password,
            })
            .await;

        match result {
            Ok(payload) => Ok(payload.into()),
            Err(e) => Err(async_graphql::Error::new(e.to_string())),
        }
    }

    /// Authenticate with email and password
    async fn login(&self, ctx: &Context<'_>, email: String, password: String) -> Result<Auth> {
        let auth_service = ctx.data_unchecked::<AuthService>();

        match auth_service.login(&email, &password).await {
            Ok(payload) => {
                tracing::info!(
                    user_id = %payload.user.id,
                    username = %payload.user.username,
                    "User logged in successfully"
                );
                Ok(payload.into())
            }
            Err(AuthError::InvalidCredentials) => {
                tracing::warn!(email = %email, "Login failed");
                Err(unauthenticated(AuthError::InvalidCredentials.to_string()))
            }
            Err(e) => Err(internal_error("Login failed", e)),
        }
    }
}
