//! HTTP request handlers for the mock server.
//!
//! Shared pieces live here: request admission (auth, throttling), query
//! parameter lookup and the two pagination envelopes.

pub mod search;
pub mod tickets;
pub mod users;

pub use search::*;
pub use tickets::*;
pub use users::*;

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::mock_server::state::MockState;

/// Zendesk caps both `per_page` and `page[size]` at 100.
const MAX_PAGE_SIZE: usize = 100;

pub(crate) type Params = Vec<(String, String)>;

/// Last value of `key` in the query string.
pub(crate) fn param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Every value of a repeated key such as `role[]`.
pub(crate) fn params_all(params: &Params, key: &str) -> Vec<String> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
        .collect()
}

/// Count the request, then reject it if throttled or unauthenticated.
pub(crate) fn admit(state: &mut MockState, headers: &HeaderMap) -> Option<Response> {
    state.requests += 1;

    if let Some(seconds) = state.retry_after {
        return Some(
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, seconds.to_string())],
                "Rate limit exceeded",
            )
                .into_response(),
        );
    }

    if let Some(ref required) = state.required_auth {
        let given = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if given != Some(required.as_str()) {
            return Some(
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"error": "Couldn't authenticate you"})),
                )
                    .into_response(),
            );
        }
    }

    None
}

pub(crate) fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "RecordNotFound",
            "description": "Not found"
        })),
    )
        .into_response()
}

pub(crate) fn invalid(error: &str, description: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": error, "description": description})),
    )
        .into_response()
}

/// Parse `"123.json"` path segments.
pub(crate) fn json_id(segment: &str) -> Option<i64> {
    segment.strip_suffix(".json")?.parse().ok()
}

/// Absolute URL of the collection for pagination links.
pub(crate) fn link_base(headers: &HeaderMap, path: &str) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("http://{host}{path}")
}

/// Requested pagination style, decided like Zendesk does: any `page[...]`
/// key selects cursor pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Paging {
    Offset { page: usize, per_page: usize },
    Cursor { size: usize, start: usize },
}

impl Paging {
    pub(crate) fn from_params(params: &Params) -> Result<Self, Response> {
        let size = param(params, "page[size]");
        let after = param(params, "page[after]");

        if size.is_some() || after.is_some() {
            let size = parse_size(size)?;
            let start = match after {
                Some(cursor) => decode_cursor(cursor).ok_or_else(|| {
                    invalid("InvalidPaginationParameter", "page[after] is not a valid cursor")
                })?,
                None => 0,
            };
            return Ok(Self::Cursor { size, start });
        }

        let per_page = parse_size(param(params, "per_page"))?;
        let page = match param(params, "page") {
            Some(p) => p
                .parse::<usize>()
                .ok()
                .filter(|p| *p > 0)
                .ok_or_else(|| invalid("InvalidPaginationParameter", "page must be positive"))?,
            None => 1,
        };
        Ok(Self::Offset { page, per_page })
    }
}

fn parse_size(raw: Option<&str>) -> Result<usize, Response> {
    match raw {
        None => Ok(MAX_PAGE_SIZE),
        Some(s) => s
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .map(|n| n.min(MAX_PAGE_SIZE))
            .ok_or_else(|| invalid("InvalidPaginationParameter", "page size must be positive")),
    }
}

fn encode_cursor(index: usize) -> String {
    URL_SAFE_NO_PAD.encode(format!("idx:{index}"))
}

fn decode_cursor(cursor: &str) -> Option<usize> {
    let raw = URL_SAFE_NO_PAD.decode(cursor).ok()?;
    String::from_utf8(raw).ok()?.strip_prefix("idx:")?.parse().ok()
}

/// Slice `items` into one page and wrap it in the matching envelope.
pub(crate) fn page_response<T: Serialize>(
    key: &str,
    items: &[T],
    paging: &Paging,
    base: &str,
) -> Response {
    let total = items.len();
    let mut body = Map::new();

    match *paging {
        Paging::Offset { page, per_page } => {
            let start = (page - 1).saturating_mul(per_page).min(total);
            let end = (start + per_page).min(total);

            let next = (end < total).then(|| format!("{base}?page={}&per_page={per_page}", page + 1));
            let prev = (page > 1).then(|| format!("{base}?page={}&per_page={per_page}", page - 1));

            body.insert(key.to_string(), json!(&items[start..end]));
            body.insert("next_page".to_string(), json!(next));
            body.insert("previous_page".to_string(), json!(prev));
            body.insert("count".to_string(), json!(total));
        }
        Paging::Cursor { size, start } => {
            let start = start.min(total);
            let end = (start + size).min(total);
            let has_more = end < total;

            let after = (end > start).then(|| encode_cursor(end));
            let before = (end > start).then(|| encode_cursor(start));
            let next = has_more
                .then(|| after.as_ref().map(|c| format!("{base}?page[size]={size}&page[after]={c}")))
                .flatten();

            body.insert(key.to_string(), json!(&items[start..end]));
            body.insert(
                "meta".to_string(),
                json!({
                    "has_more": has_more,
                    "after_cursor": after,
                    "before_cursor": before,
                }),
            );
            body.insert("links".to_string(), json!({"next": next, "prev": Value::Null}));
        }
    }

    (StatusCode::OK, Json(Value::Object(body))).into_response()
}
