//! Application services and external integrations

pub mod auth;
pub mod google_books;

pub use auth::{AuthConfig, AuthError, AuthPayload, AuthService, RegisterInput, TokenData};
pub use google_books::{GoogleBooksClient, NO_AUTHOR_PLACEHOLDER};
