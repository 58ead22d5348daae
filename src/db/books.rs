//! Books embedded in a user document
//!
//! A saved book has no identity of its own: it lives inside the owning user's
//! `saved_books` JSON column and is unique there by its catalog id. The
//! serialized field names (`bookId`, ...) are what the users repository
//! matches on inside that column.

use serde::{Deserialize, Serialize};

/// One book, either a catalog search result or an entry in a user's saved list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    /// External catalog identifier (Google Books volume id)
    pub book_id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Cover thumbnail URL
    #[serde(default)]
    pub image: Option<String>,
    /// Catalog info page URL
    #[serde(default)]
    pub link: Option<String>,
}
