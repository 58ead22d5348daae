//! Google Books API client for catalog search
//!
//! Base URL: https://www.googleapis.com/books/v1
//!
//! Search results are reshaped into [BookRecord] so they can be saved as-is.
//! One request per search; no retries or paging.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::db::BookRecord;

/// Shown in place of an author list when the catalog has none
pub const NO_AUTHOR_PLACEHOLDER: &str = "No author to display";

/// Response body of `GET /volumes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumesResponse {
    #[serde(default)]
    pub items: Vec<Volume>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Volume {
    pub id: Option<String>,
    #[serde(rename = "volumeInfo", default)]
    pub volume_info: VolumeInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VolumeInfo {
    pub title: Option<String>,
    pub authors: Option<Vec<String>>,
    pub description: Option<String>,
    #[serde(rename = "imageLinks")]
    pub image_links: Option<ImageLinks>,
    #[serde(rename = "infoLink")]
    pub info_link: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageLinks {
    pub thumbnail: Option<String>,
}

impl VolumesResponse {
    /// Reshape into local books, dropping volumes without an id or title
    pub fn into_books(self) -> Vec<BookRecord> {
        self.items.into_iter().filter_map(Volume::into_book).collect()
    }
}

impl Volume {
    fn into_book(self) -> Option<BookRecord> {
        let book_id = self.id.filter(|id| !id.trim().is_empty())?;
        let info = self.volume_info;
        let title = info.title.filter(|t| !t.trim().is_empty())?;

        let authors = match info.authors {
            Some(authors) if !authors.is_empty() => authors,
            _ => vec![NO_AUTHOR_PLACEHOLDER.to_string()],
        };

        Some(BookRecord {
            book_id,
            title,
            authors,
            description: Some(info.description.unwrap_or_default()),
            image: info.image_links.and_then(|links| links.thumbnail),
            link: info.info_link,
        })
    }
}

/// Google Books catalog client
#[derive(Clone)]
pub struct GoogleBooksClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.google_books_api_url, config.google_books_api_key.clone())
    }

    /// Search volumes by free-text term
    pub async fn search(&self, term: &str) -> Result<Vec<BookRecord>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        info!("Searching Google Books for '{}'", term);

        let url = format!("{}/volumes", self.base_url);
        let mut query: Vec<(&str, &str)> = vec![("q", term)];
        if let Some(key) = self.api_key.as_deref() {
            query.push(("key", key));
        }

        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context("Failed to reach Google Books")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Google Books search failed with status {}",
                response.status().as_u16()
            );
        }

        let body: VolumesResponse = response
            .json()
            .await
            .context("Failed to parse Google Books response")?;

        let books = body.into_books();
        debug!(count = books.len(), "Google Books search returned results");
        Ok(books)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Vec<BookRecord> {
        serde_json::from_str::<VolumesResponse>(json).unwrap().into_books()
    }

    #[test]
    fn test_reshape_full_volume() {
        let books = parse(
            r#"{
                "kind": "books#volumes",
                "items": [{
                    "id": "B1gX",
                    "volumeInfo": {
                        "title": "Dune",
                        "authors": ["Frank Herbert"],
                        "description": "Spice.",
                        "imageLinks": {"smallThumbnail": "s.jpg", "thumbnail": "t.jpg"},
                        "infoLink": "https://books.google.com/books?id=B1gX"
                    }
                }]
            }"#,
        );

        assert_eq!(
            books,
            vec![BookRecord {
                book_id: "B1gX".to_string(),
                title: "Dune".to_string(),
                authors: vec!["Frank Herbert".to_string()],
                description: Some("Spice.".to_string()),
                image: Some("t.jpg".to_string()),
                link: Some("https://books.google.com/books?id=B1gX".to_string()),
            }]
        );
    }

    #[test]
    fn test_missing_authors_get_placeholder() {
        let books = parse(
            r#"{"items": [
                {"id": "a", "volumeInfo": {"title": "No authors field"}},
                {"id": "b", "volumeInfo": {"title": "Empty authors", "authors": []}}
            ]}"#,
        );
        for book in &books {
            assert_eq!(book.authors, vec![NO_AUTHOR_PLACEHOLDER.to_string()]);
            assert_eq!(book.description.as_deref(), Some(""));
            assert_eq!(book.image, None);
        }
        assert_eq!(books.len(), 2);
    }

    #[test]
    fn test_volumes_without_id_or_title_dropped() {
        let books = parse(
            r#"{"items": [
                {"volumeInfo": {"title": "No id"}},
                {"id": "x", "volumeInfo": {}},
                {"id": "", "volumeInfo": {"title": "Blank id"}},
                {"id": "ok", "volumeInfo": {"title": "Kept"}}
            ]}"#,
        );
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].book_id, "ok");
    }

    #[test]
    fn test_no_items_is_empty() {
        assert!(parse(r#"{"kind": "books#volumes", "totalItems": 0}"#).is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_skips_request() {
        // Unroutable base URL: any request would fail
        let client = GoogleBooksClient::new("http://127.0.0.1:9", None).unwrap();
        assert!(client.search("   ").await.unwrap().is_empty());
    }
}
