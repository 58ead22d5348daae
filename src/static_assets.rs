//! Embedded client bundle, served when built with `embed-frontend`.
//!
//! Unknown paths without a file extension get `index.html` so client-side
//! routes such as `/saved` load the app.

use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use rust_embed::RustEmbed;

#[derive(RustEmbed)]
#[folder = "client/dist"]
struct ClientAssets;

/// Vite fingerprints everything under `assets/`, so those never change
fn cache_control_for(path: &str) -> &'static str {
    if path.starts_with("assets/") {
        "public, max-age=31536000, immutable"
    } else {
        "no-cache"
    }
}

fn serve(path: &str) -> Option<Response> {
    let file = ClientAssets::get(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Some(
        (
            [
                (header::CONTENT_TYPE, mime.to_string()),
                (header::CACHE_CONTROL, cache_control_for(path).to_string()),
            ],
            file.data.into_owned(),
        )
            .into_response(),
    )
}

pub async fn embedded_fallback(uri: Uri) -> Response {
    let path = match uri.path().trim_start_matches('/') {
        "" => "index.html",
        other => other,
    };

    if let Some(response) = serve(path) {
        return response;
    }

    let looks_like_file = path.rsplit('/').next().is_some_and(|last| last.contains('.'));
    if !looks_like_file && let Some(response) = serve("index.html") {
        return response;
    }

    StatusCode::NOT_FOUND.into_response()
}
