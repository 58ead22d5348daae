//! Plain HTTP endpoints that sit beside the GraphQL API

pub mod health;
