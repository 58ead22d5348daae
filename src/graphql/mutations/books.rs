//! Saved-book mutations. Both require an authenticated user and return the
//! user's full record so the client can rewrite its cache without a refetch.

use async_graphql::{Context, Object, Result};

use crate::db::{AddBookOutcome, BookRecord, Database};
use crate::graphql::auth::{AuthExt, unauthenticated};
use crate::graphql::helpers::{BOOK_ALREADY_SAVED, coded_error, internal_error};
use crate::graphql::types::{BookInput, User};

#[derive(Default)]
pub struct BookMutations;

#[Object]
impl BookMutations {
    /// Add a book to the current user's list
    async fn save_book(&self, ctx: &Context<'_>, book: BookInput) -> Result<User> {
        let user = ctx.require_user("You need to be logged in to save a book.")?;
        let db = ctx.data_unchecked::<Database>();

        let record = BookRecord::from(book);
        let book_id = record.book_id.clone();

        let outcome = db
            .users()
            .add_book(&user.user_id, record)
            .await
            .map_err(|e| internal_error("Failed to save book", e))?;

        match outcome {
            AddBookOutcome::Added(updated) => {
                tracing::info!(user_id = %user.user_id, book_id = %book_id, "Book saved");
                Ok(updated.into())
            }
            AddBookOutcome::AlreadySaved => {
                tracing::debug!(user_id = %user.user_id, book_id = %book_id, "Book already saved");
                Err(coded_error("Book already saved.", BOOK_ALREADY_SAVED))
            }
            AddBookOutcome::UserNotFound => Err(unauthenticated("Could not authenticate user.")),
        }
    }

    /// Remove a book from the current user's list; unknown ids leave it unchanged
    async fn remove_book(&self, ctx: &Context<'_>, book_id: String) -> Result<User> {
        let user = ctx.require_user("You need to be logged in to remove a book.")?;
        let db = ctx.data_unchecked::<Database>();

        let updated = db
            .users()
            .remove_book(&user.user_id, &book_id)
            .await
            .map_err(|e| internal_error("Failed to remove book", e))?
            .ok_or_else(|| unauthenticated("Could not authenticate user."))?;

        tracing::info!(user_id = %user.user_id, book_id = %book_id, "Book removed");
        Ok(updated.into())
    }
}
