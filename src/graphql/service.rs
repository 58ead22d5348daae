//! HTTP handlers for `/graphql`: POST executes operations, GET serves the explorer.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::GraphQLResponse;
use axum::Json;
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header::ACCEPT};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;

use crate::app::AppState;

use super::auth::{extract_token, resolve_identity};

/// `token` as it may appear in the query string or request body
#[derive(Debug, Default, Deserialize)]
struct TokenField {
    token: Option<String>,
}

pub struct GraphqlService;

impl GraphqlService {
    pub fn router() -> Router<AppState> {
        Router::new().route("/graphql", get(graphiql).post(graphql_handler))
    }
}

async fn graphiql(headers: HeaderMap) -> impl IntoResponse {
    let accepts_html = headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("text/html"))
        .unwrap_or(false);

    if accepts_html {
        Html(GraphiQLSource::build().endpoint("/graphql").finish()).into_response()
    } else {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(serde_json::json!({
                "error": "GET requests are not supported for GraphQL queries. Use POST with Content-Type: application/json"
            })),
        )
            .into_response()
    }
}

async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<TokenField>,
    body: Bytes,
) -> Response {
    let request: async_graphql::Request = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected malformed GraphQL request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": format!("Invalid GraphQL request: {}", e) })),
            )
                .into_response();
        }
    };

    let body_token = serde_json::from_slice::<TokenField>(&body)
        .ok()
        .and_then(|b| b.token);

    let token = extract_token(&headers, body_token.as_deref(), params.token.as_deref());
    let identity = resolve_identity(&state.auth, token.as_deref());

    GraphQLResponse::from(state.schema.execute(request.data(identity)).await).into_response()
}
