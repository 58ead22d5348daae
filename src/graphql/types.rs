//! GraphQL object and input types
//!
//! Field names follow the client's queries (`_id`, `savedBooks`, `bookCount`).

use async_graphql::{ID, InputObject, SimpleObject};

use crate::db::{BookRecord, UserRecord};

// ============================================================================
// Output Types
// ============================================================================

/// A registered user and their saved books
#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    #[graphql(name = "_id")]
    pub id: ID,
    pub username: String,
    pub email: String,
    pub saved_books: Vec<Book>,
    /// Number of saved books
    pub book_count: i32,
}

impl From<UserRecord> for User {
    fn from(r: UserRecord) -> Self {
        let book_count = r.book_count() as i32;
        Self {
            id: ID(r.id),
            username: r.username,
            email: r.email,
            saved_books: r.saved_books.into_iter().map(Book::from).collect(),
            book_count,
        }
    }
}

/// A book from the catalog or from a user's saved list
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct Book {
    /// Google Books volume id
    pub book_id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub description: Option<String>,
    /// Cover thumbnail URL
    pub image: Option<String>,
    /// Catalog info page URL
    pub link: Option<String>,
}

impl From<BookRecord> for Book {
    fn from(r: BookRecord) -> Self {
        Self {
            book_id: r.book_id,
            title: r.title,
            authors: r.authors,
            description: r.description,
            image: r.image,
            link: r.link,
        }
    }
}

/// Result of signup or login
#[derive(Debug, Clone, SimpleObject)]
pub struct Auth {
    pub token: ID,
    pub user: User,
}

// ============================================================================
// Input Types
// ============================================================================

/// Input for user signup
#[derive(Debug, Clone, InputObject)]
pub struct UserInput {
    pub username: String,
    pub email: String,
    /// Plaintext; hashed before it is stored
    pub password: String,
}

/// Input for saving a book, usually a search result passed back unchanged
#[derive(Debug, Clone, InputObject)]
pub struct BookInput {
    pub book_id: String,
    pub title: String,
    pub authors: Option<Vec<String>>,
    pub description: String,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl From<BookInput> for BookRecord {
    fn from(input: BookInput) -> Self {
        Self {
            book_id: input.book_id,
            title: input.title,
            authors: input.authors.unwrap_or_default(),
            description: Some(input.description),
            image: input.image,
            link: input.link,
        }
    }
}
