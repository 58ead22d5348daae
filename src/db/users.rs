//! Users repository
//!
//! Each user row carries its saved books as an embedded JSON list. Passwords
//! are hashed here, on the write path, and only when the caller says the value
//! is plaintext.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool as Pool;
use thiserror::Error;
use uuid::Uuid;

use super::books::BookRecord;
use super::sqlite_helpers::{json_to_vec, now_iso8601, to_json, unique_violation_column};

/// Email shape accepted on signup
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r".+@.+\..+").expect("valid email regex"));

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum DbError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Must use a valid email address")]
    InvalidEmail,

    #[error("{field} is already taken")]
    Duplicate { field: String },

    #[error("Failed to hash password: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DbResult<T> = std::result::Result<T, DbError>;

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub saved_books: Vec<BookRecord>,
    pub created_at: String,
    pub updated_at: String,
}

impl UserRecord {
    /// Derived count of the embedded book list
    pub fn book_count(&self) -> usize {
        self.saved_books.len()
    }

    /// Compare a login attempt against the stored hash
    pub async fn is_correct_password(&self, password: &str) -> DbResult<bool> {
        let password = password.to_string();
        let hash = self.password_hash.clone();
        let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(anyhow::Error::from)??;
        Ok(matched)
    }
}

/// A password value together with its state.
///
/// `Plaintext` is hashed exactly once by the repository; `Hashed` is stored
/// as given. The string content is never inspected to tell them apart.
#[derive(Clone)]
pub enum Password {
    Plaintext(String),
    Hashed(String),
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Password::Plaintext(_) => f.write_str("Password::Plaintext(..)"),
            Password::Hashed(_) => f.write_str("Password::Hashed(..)"),
        }
    }
}

impl Password {
    async fn into_hash(self, cost: u32) -> DbResult<String> {
        match self {
            Password::Hashed(hash) => Ok(hash),
            Password::Plaintext(plain) => {
                if plain.is_empty() {
                    return Err(DbError::MissingField("password"));
                }
                let hash = tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
                    .await
                    .map_err(anyhow::Error::from)??;
                Ok(hash)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: Password,
}

/// Result of appending a book to a user's list
#[derive(Debug)]
pub enum AddBookOutcome {
    Added(UserRecord),
    AlreadySaved,
    UserNotFound,
}

type UserRow = (String, String, String, String, String, String, String);

const USER_COLUMNS: &str =
    "id, username, email, password_hash, saved_books, created_at, updated_at";

fn row_to_record(r: UserRow) -> DbResult<UserRecord> {
    Ok(UserRecord {
        id: r.0,
        username: r.1,
        email: r.2,
        password_hash: r.3,
        saved_books: json_to_vec(&r.4)?,
        created_at: r.5,
        updated_at: r.6,
    })
}

fn map_write_error(err: sqlx::Error) -> DbError {
    match unique_violation_column(&err) {
        Some(field) => DbError::Duplicate { field },
        None => DbError::Sqlx(err),
    }
}

// ============================================================================
// Repository
// ============================================================================

pub struct UsersRepository {
    pool: Pool,
    bcrypt_cost: u32,
}

impl UsersRepository {
    pub fn new(pool: Pool, bcrypt_cost: u32) -> Self {
        Self { pool, bcrypt_cost }
    }

    /// Create a new user with an empty saved-books list
    pub async fn create(&self, user: CreateUser) -> DbResult<UserRecord> {
        let username = user.username.trim().to_string();
        let email = user.email.trim().to_string();

        if username.is_empty() {
            return Err(DbError::MissingField("username"));
        }
        if email.is_empty() {
            return Err(DbError::MissingField("email"));
        }
        if !EMAIL_RE.is_match(&email) {
            return Err(DbError::InvalidEmail);
        }

        let password_hash = user.password.into_hash(self.bcrypt_cost).await?;
        let id = Uuid::new_v4().to_string();
        let now = now_iso8601();

        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, saved_books, created_at, updated_at)
            VALUES (?, ?, ?, ?, '[]', ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&username)
        .bind(&email)
        .bind(&password_hash)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(UserRecord {
            id,
            username,
            email,
            password_hash,
            saved_books: Vec::new(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<UserRecord>> {
        self.fetch_one_where("id", id).await
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> DbResult<Option<UserRecord>> {
        self.fetch_one_where("username", username).await
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        self.fetch_one_where("email", email).await
    }

    /// List all users, oldest first
    pub async fn list_all(&self) -> DbResult<Vec<UserRecord>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY created_at, rowid",
            USER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(row_to_record).collect()
    }

    /// Replace a user's password. Plaintext is hashed once; hashes are stored as-is.
    pub async fn update_password(&self, id: &str, password: Password) -> DbResult<Option<UserRecord>> {
        let password_hash = password.into_hash(self.bcrypt_cost).await?;

        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(&password_hash)
            .bind(now_iso8601())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Append a book to the user's list unless one with the same id is already there.
    ///
    /// The duplicate check and the append are one `UPDATE`, so concurrent saves
    /// wait on the write lock instead of failing and never both append.
    pub async fn add_book(&self, user_id: &str, book: BookRecord) -> DbResult<AddBookOutcome> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET saved_books = json_insert(saved_books, '$[#]', json(?)), updated_at = ?
            WHERE id = ?
              AND NOT EXISTS (
                  SELECT 1 FROM json_each(users.saved_books)
                  WHERE json_extract(value, '$.bookId') = ?
              )
            "#,
        )
        .bind(to_json(&book)?)
        .bind(now_iso8601())
        .bind(user_id)
        .bind(&book.book_id)
        .execute(&self.pool)
        .await?;

        let user = self.get_by_id(user_id).await?;
        Ok(match user {
            None => AddBookOutcome::UserNotFound,
            Some(_) if result.rows_affected() == 0 => AddBookOutcome::AlreadySaved,
            Some(user) => AddBookOutcome::Added(user),
        })
    }

    /// Pull every book with `book_id` from the user's list in one `UPDATE`.
    ///
    /// Absent ids are not an error; the unchanged user is returned.
    pub async fn remove_book(&self, user_id: &str, book_id: &str) -> DbResult<Option<UserRecord>> {
        sqlx::query(
            r#"
            UPDATE users
            SET saved_books = (
                    SELECT json_group_array(json(value)) FROM json_each(users.saved_books)
                    WHERE json_extract(value, '$.bookId') IS NOT ?
                ),
                updated_at = ?
            WHERE id = ?
              AND EXISTS (
                  SELECT 1 FROM json_each(users.saved_books)
                  WHERE json_extract(value, '$.bookId') = ?
              )
            "#,
        )
        .bind(book_id)
        .bind(now_iso8601())
        .bind(user_id)
        .bind(book_id)
        .execute(&self.pool)
        .await?;

        self.get_by_id(user_id).await
    }

    /// Delete a user and everything embedded in it
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn fetch_one_where(&self, column: &'static str, value: &str) -> DbResult<Option<UserRecord>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE {} = ?",
            USER_COLUMNS, column
        ))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        row.map(row_to_record).transpose()
    }
}
