//! Shared fixtures for the integration tests: a throwaway database, a stub
//! catalog server and helpers for driving `/graphql` through the router.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::Query;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use bookshelf::app_mode::RunMode;
use bookshelf::config::{Config, DEFAULT_TOKEN_LIFETIME_SECS};
use bookshelf::db::Database;
use bookshelf::{AppState, build_app};

pub const TEST_SECRET: &str = "integration-test-secret";

pub const INDEX_HTML: &str = "<!doctype html><html><body><div id=\"root\"></div></body></html>";
pub const APP_JS: &str = "console.log('bookshelf');";

pub struct TestApp {
    _dir: TempDir,
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_catalog("http://127.0.0.1:9".to_string()).await
    }

    /// App whose catalog client points at `catalog_url`
    pub async fn with_catalog(catalog_url: String) -> Self {
        Self::build(TempDir::new().unwrap(), catalog_url, RunMode::Development).await
    }

    /// Production-mode app serving a small client bundle from `<tmp>/dist`
    pub async fn production() -> Self {
        let dir = TempDir::new().unwrap();
        let dist = dir.path().join("dist");
        std::fs::create_dir_all(dist.join("assets")).unwrap();
        std::fs::write(dist.join("index.html"), INDEX_HTML).unwrap();
        std::fs::write(dist.join("assets").join("app.js"), APP_JS).unwrap();

        Self::build(dir, "http://127.0.0.1:9".to_string(), RunMode::Production).await
    }

    /// Development-mode app with the same bundle on disk, which must not be served
    pub async fn development_with_bundle() -> Self {
        let dir = TempDir::new().unwrap();
        let dist = dir.path().join("dist");
        std::fs::create_dir_all(&dist).unwrap();
        std::fs::write(dist.join("index.html"), INDEX_HTML).unwrap();

        Self::build(dir, "http://127.0.0.1:9".to_string(), RunMode::Development).await
    }

    async fn build(dir: TempDir, catalog_url: String, run_mode: RunMode) -> Self {
        let db_path = dir.path().join("bookshelf.db");

        let config = Config {
            port: 0,
            database_url: db_path.to_string_lossy().into_owned(),
            jwt_secret: TEST_SECRET.to_string(),
            token_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
            bcrypt_cost: 4,
            google_books_api_url: catalog_url,
            google_books_api_key: None,
            static_dir: dir.path().join("dist").to_string_lossy().into_owned(),
            run_mode,
        };

        let db = Database::connect(&config.database_url)
            .await
            .unwrap()
            .with_bcrypt_cost(config.bcrypt_cost);
        db.migrate().await.unwrap();

        let state = AppState::new(Arc::new(config), db).unwrap();
        let router = build_app(state.clone());

        Self {
            _dir: dir,
            state,
            router,
        }
    }

    /// POST a GraphQL operation, optionally with an `Authorization` header
    pub async fn graphql(&self, body: Value, authorization: Option<&str>) -> Value {
        self.graphql_at("/graphql", body, authorization).await
    }

    pub async fn graphql_at(&self, uri: &str, body: Value, authorization: Option<&str>) -> Value {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(value) = authorization {
            request = request.header("authorization", value);
        }
        let request = request.body(Body::from(body.to_string())).unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        read_json(response).await
    }

    /// Register a user through `addUser` and return (token, user id)
    pub async fn sign_up(&self, username: &str, email: &str, password: &str) -> (String, String) {
        let body = self
            .graphql(
                json!({
                    "query": "mutation($input: UserInput!) { addUser(input: $input) { token user { _id } } }",
                    "variables": { "input": { "username": username, "email": email, "password": password } }
                }),
                None,
            )
            .await;

        assert!(body.get("errors").is_none(), "signup failed: {}", body);
        let auth = &body["data"]["addUser"];
        (
            auth["token"].as_str().unwrap().to_string(),
            auth["user"]["_id"].as_str().unwrap().to_string(),
        )
    }
}

pub async fn read_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// First error's extension code, if any
pub fn error_code(body: &Value) -> Option<&str> {
    body["errors"][0]["extensions"]["code"].as_str()
}

pub fn error_message(body: &Value) -> Option<&str> {
    body["errors"][0]["message"].as_str()
}

async fn stub_volumes(Query(params): Query<HashMap<String, String>>) -> Response {
    match params.get("q").map(String::as_str) {
        Some("dune") => axum::Json(json!({
            "kind": "books#volumes",
            "totalItems": 3,
            "items": [
                {
                    "id": "gb1",
                    "volumeInfo": {
                        "title": "Dune",
                        "authors": ["Frank Herbert"],
                        "description": "Desert planet.",
                        "imageLinks": { "thumbnail": "http://img/dune.jpg" },
                        "infoLink": "http://books/gb1"
                    }
                },
                {
                    "id": "gb2",
                    "volumeInfo": { "title": "Dune Messiah" }
                },
                {
                    "volumeInfo": { "title": "No id here" }
                }
            ]
        }))
        .into_response(),
        Some("outage") => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        _ => axum::Json(json!({ "kind": "books#volumes", "totalItems": 0 })).into_response(),
    }
}

/// Serve a fake Google Books `/volumes` endpoint on a random local port
pub async fn spawn_catalog_stub() -> String {
    let app = Router::new().route("/volumes", get(stub_volumes));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
