pub mod auth;
pub mod books;

pub use auth::AuthMutations;
pub use books::BookMutations;
