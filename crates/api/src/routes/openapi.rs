//! OpenAPI documentation and Swagger UI routes.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
};
use rust_embed::Embed;

use crate::app::AppState;

/// Embedded Swagger UI assets from the assets/swagger-ui directory.
#[derive(Embed)]
#[folder = "assets/swagger-ui/"]
struct SwaggerAssets;

/// Embedded OpenAPI specification from docs/api/openapi.yaml.
///
/// The document carries no `servers` block; it is added per request.
const OPENAPI_SPEC: &str = include_str!("../../../../docs/api/openapi.yaml");

/// Redirect `/api/docs` to `/api/docs/` (trailing slash).
pub async fn swagger_ui_redirect() -> Redirect {
    Redirect::permanent("/api/docs/")
}

/// Serve Swagger UI index page or static assets.
///
/// Handles requests to `/api/docs/` and `/api/docs/*path` by serving
/// the appropriate static file from the embedded Swagger UI assets.
pub async fn swagger_ui(uri: Uri) -> Response {
    let path = asset_path(uri.path());

    match SwaggerAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime.as_ref())
                .header(header::CACHE_CONTROL, "public, max-age=3600")
                .body(Body::from(content.data.into_owned()))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve the OpenAPI YAML specification.
///
/// The advertised server is `docs.api_url` when configured, otherwise the
/// host the request was addressed to.
pub async fn openapi_spec(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    let server_url = state
        .config
        .docs
        .api_url
        .clone()
        .or_else(|| request_base_url(&headers));

    let body = match server_url {
        Some(url) => with_server(OPENAPI_SPEC, &url),
        None => OPENAPI_SPEC.to_string(),
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/yaml; charset=utf-8")],
        body,
    )
}

fn asset_path(request_path: &str) -> &str {
    let path = request_path.trim_start_matches("/api/docs/");
    if path.is_empty() || path == "/api/docs" {
        "index.html"
    } else {
        path
    }
}

/// Base URL the client used, from `Host` and `X-Forwarded-Proto`.
fn request_base_url(headers: &HeaderMap) -> Option<String> {
    let host = headers.get(header::HOST)?.to_str().ok()?;
    let scheme = headers
        .get("X-Forwarded-Proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    Some(format!("{}://{}", scheme, host))
}

/// Inserts a top-level `servers` entry ahead of `paths`.
fn with_server(spec: &str, url: &str) -> String {
    let servers = format!("servers:\n  - url: {}\n", url.trim_end_matches('/'));
    match spec.find("\npaths:") {
        Some(idx) => {
            let (head, tail) = spec.split_at(idx + 1);
            format!("{}{}{}", head, servers, tail)
        }
        None => format!("{}\n{}", spec.trim_end(), servers),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_openapi_spec_structure() {
        assert!(OPENAPI_SPEC.contains("openapi:"));
        assert!(OPENAPI_SPEC.contains("info:"));
        assert!(OPENAPI_SPEC.contains("paths:"));
        assert!(OPENAPI_SPEC.contains("components:"));
        assert!(OPENAPI_SPEC.contains("securitySchemes:"));
        assert!(
            OPENAPI_SPEC.len() > 1000,
            "OpenAPI spec should be substantial, got {} bytes",
            OPENAPI_SPEC.len()
        );
    }

    #[test]
    fn test_openapi_spec_has_no_static_servers() {
        assert!(!OPENAPI_SPEC.contains("\nservers:"));
    }

    #[test]
    fn test_openapi_spec_has_api_endpoints() {
        let endpoints = [
            "/api/v1/entries:",
            "/api/v1/entries/{id}:",
            "/api/v1/entries/{id}/confirm:",
            "/api/v1/auth/register:",
            "/api/v1/auth/login:",
            "/api/v1/auth/refresh:",
        ];

        for endpoint in endpoints {
            assert!(
                OPENAPI_SPEC.contains(endpoint),
                "OpenAPI spec should document {} endpoint",
                endpoint
            );
        }
    }

    #[test]
    fn test_swagger_assets_index_exists() {
        assert!(SwaggerAssets::get("index.html").is_some());
    }

    #[test]
    fn test_asset_path() {
        let paths = [
            ("/api/docs/", "index.html"),
            ("/api/docs/index.html", "index.html"),
            ("/api/docs/swagger-ui.css", "swagger-ui.css"),
        ];

        for (input, expected) in paths {
            assert_eq!(asset_path(input), expected);
        }
    }

    #[test]
    fn test_mime_types() {
        let html = mime_guess::from_path("index.html").first_or_octet_stream();
        assert_eq!(html.subtype(), "html");

        let unknown = mime_guess::from_path("file.unknownext").first_or_octet_stream();
        assert_eq!(unknown.subtype(), "octet-stream");
    }

    #[test]
    fn test_with_server_inserts_before_paths() {
        let spec = "openapi: 3.1.0\ninfo:\n  title: x\npaths:\n  /a: {}\n";
        let out = with_server(spec, "https://todo.example.com/");

        assert_eq!(
            out,
            "openapi: 3.1.0\ninfo:\n  title: x\nservers:\n  - url: https://todo.example.com\npaths:\n  /a: {}\n"
        );
    }

    #[test]
    fn test_with_server_on_embedded_spec() {
        let out = with_server(OPENAPI_SPEC, "http://localhost:8080");
        let servers = out.find("servers:").unwrap();
        let paths = out.find("\npaths:").unwrap();
        assert!(servers < paths);
    }

    #[test]
    fn test_request_base_url() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_base_url(&headers), None);

        headers.insert(header::HOST, HeaderValue::from_static("todo.local:8080"));
        assert_eq!(
            request_base_url(&headers).as_deref(),
            Some("http://todo.local:8080")
        );

        headers.insert("X-Forwarded-Proto", HeaderValue::from_static("https"));
        assert_eq!(
            request_base_url(&headers).as_deref(),
            Some("https://todo.local:8080")
        );
    }
}
