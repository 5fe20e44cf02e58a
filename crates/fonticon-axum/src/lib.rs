//! HTTP endpoints backing the icon picker widget.
//!
//! | Route          | Response                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | `GET /search`  | `{"results": [{"text", "children": [{"id", "text"}]}]}` or 204   |
//! | `GET /icons`   | id → name map                                                   |
//! | `GET /field`   | `{"tag", "classes"}` for the widget preview                     |
//! | `POST /flush`  | 204 after clearing every cached catalog                         |

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use fonticon::{Error, FontIconBackend, PickerResults};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Header set by the widget's asynchronous requests
pub const REQUESTED_WITH: &str = "x-requested-with";

/// Query string of `GET /search`
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Substring to look for in icon ids
    pub term: Option<String>,
    /// Marks the request as interactive when the header is unavailable
    pub ajax: Option<String>,
}

/// Body of `GET /field`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSettings {
    /// Element name of the preview
    pub tag: String,
    /// Class template of the preview, containing `{value}`
    pub classes: String,
}

/// Router serving the picker endpoints for `backend`
pub fn picker_router<B>(backend: Arc<B>) -> Router
where
    B: FontIconBackend + Send + Sync + 'static,
{
    Router::new()
        .route("/search", get(search::<B>))
        .route("/icons", get(icons::<B>))
        .route("/field", get(field::<B>))
        .route("/flush", post(flush::<B>))
        .with_state(backend)
}

fn is_interactive(headers: &HeaderMap, params: &SearchParams) -> bool {
    let header = headers
        .get(REQUESTED_WITH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("XMLHttpRequest"));
    let flag = params
        .ajax
        .as_deref()
        .is_some_and(|v| matches!(v, "1" | "true"));
    header || flag
}

fn error_kind(err: &Error) -> &'static str {
    match err {
        Error::SourceUnavailable { .. } => "SourceUnavailable",
        Error::InvalidCatalogData { .. } => "InvalidCatalogData",
        Error::TemplateArity { .. } => "TemplateArity",
        Error::InvalidTemplate { .. } => "InvalidTemplate",
        Error::InvalidIconValue { .. } => "InvalidIconValue",
        Error::Store(_) => "Store",
        Error::Config { .. } => "Config",
    }
}

fn error_response(status: StatusCode, err: &Error) -> Response {
    (
        status,
        Json(json!({
            "error": error_kind(err),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

async fn search<B>(
    State(backend): State<Arc<B>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response
where
    B: FontIconBackend + Send + Sync + 'static,
{
    let params: SearchParams = match query.as_deref() {
        Some(query) => match serde_html_form::from_str(query) {
            Ok(params) => params,
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "InvalidRequest",
                        "message": format!("failed to decode query: {e}"),
                    })),
                )
                    .into_response();
            }
        },
        None => SearchParams::default(),
    };

    let term = match params.term.as_deref() {
        Some(term) if !term.is_empty() && is_interactive(&headers, &params) => term,
        _ => return StatusCode::NO_CONTENT.into_response(),
    };

    match backend.search(term).await {
        Ok(groups) => Json(PickerResults::from(groups)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, term, "icon search failed, answering with no results");
            Json(PickerResults::default()).into_response()
        }
    }
}

async fn icons<B>(State(backend): State<Arc<B>>) -> Response
where
    B: FontIconBackend + Send + Sync + 'static,
{
    match backend.icons().await {
        Ok(icons) => Json(icons).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "icon listing failed");
            error_response(StatusCode::SERVICE_UNAVAILABLE, &e)
        }
    }
}

async fn field<B>(State(backend): State<Arc<B>>) -> Json<FieldSettings>
where
    B: FontIconBackend + Send + Sync + 'static,
{
    Json(FieldSettings {
        tag: backend.field_tag_name().to_string(),
        classes: backend.field_classes().to_string(),
    })
}

async fn flush<B>(State(backend): State<Arc<B>>) -> Response
where
    B: FontIconBackend + Send + Sync + 'static,
{
    match backend.flush().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "catalog flush failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e)
        }
    }
}
