pub mod books;
pub mod user;

pub use books::BookQueries;
pub use user::UserQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, Object, Result};

    pub(crate) use crate::db::Database;
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::GoogleBooksClient;
}
