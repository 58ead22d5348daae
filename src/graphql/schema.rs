//! GraphQL schema definition
//!
//! Query and mutation roots are merged from the per-domain resolver structs.

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;
use crate::services::{AuthService, GoogleBooksClient};

use super::mutations::{AuthMutations, BookMutations};
use super::queries::{BookQueries, UserQueries};

/// The GraphQL schema type
pub type BookshelfSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(UserQueries, BookQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutations, BookMutations);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database, auth: AuthService, catalog: GoogleBooksClient) -> BookshelfSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(db)
        .data(auth)
        .data(catalog)
        .finish()
}
