//! GraphQL API
//!
//! The single API surface: queries and mutations over `POST /graphql`,
//! with a GraphiQL explorer on `GET /graphql`.
//!
//! Resolvers are grouped per domain (`queries/user.rs`, `mutations/books.rs`, ...)
//! and combined with `#[derive(MergedObject)]` in `schema.rs`.

pub mod auth;
pub(crate) mod helpers;
pub mod mutations;
pub mod queries;
mod schema;
pub mod service;
pub mod types;

pub use auth::{AuthUser, Identity, extract_token, resolve_identity};
pub use schema::{BookshelfSchema, MutationRoot, QueryRoot, build_schema};
pub use service::GraphqlService;
