//! Search endpoint handler.
//!
//! Understands a small slice of the Zendesk query language: `type:` and
//! `status:` filters plus free-text words matched case-insensitively.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{admit, invalid, link_base, page_response, param, Paging, Params};
use crate::mock_server::state::MockState;

#[derive(Debug, Default)]
struct SearchQuery {
    result_type: Option<String>,
    status: Option<String>,
    words: Vec<String>,
}

impl SearchQuery {
    fn parse(raw: &str) -> Self {
        let mut query = Self::default();
        for term in raw.split_whitespace() {
            match term.split_once(':') {
                Some(("type", v)) => query.result_type = Some(v.to_lowercase()),
                Some(("status", v)) => query.status = Some(v.to_lowercase()),
                _ => query.words.push(term.to_lowercase()),
            }
        }
        query
    }

    fn wants(&self, result_type: &str) -> bool {
        self.result_type.as_deref().map_or(true, |t| t == result_type)
            && (self.status.is_none() || result_type == "ticket")
    }

    fn matches_text(&self, fields: &[&str]) -> bool {
        self.words.iter().all(|word| {
            fields
                .iter()
                .any(|field| field.to_lowercase().contains(word.as_str()))
        })
    }
}

/// Serialize `item` with its `result_type` tag added.
fn tagged<T: Serialize>(item: &T, result_type: &str) -> Option<Value> {
    let mut value = serde_json::to_value(item).ok()?;
    value
        .as_object_mut()?
        .insert("result_type".to_string(), Value::from(result_type));
    Some(value)
}

/// GET /api/v2/search.json?query=...
pub async fn search(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejected) = admit(&mut state, &headers) {
        return rejected;
    }

    let Some(raw) = param(&params, "query").filter(|q| !q.trim().is_empty()) else {
        return invalid("InvalidSearch", "Search query is required");
    };
    let paging = match Paging::from_params(&params) {
        Ok(paging @ Paging::Offset { .. }) => paging,
        Ok(Paging::Cursor { .. }) => {
            return invalid("InvalidPaginationParameter", "search only supports offset pagination")
        }
        Err(rejected) => return rejected,
    };

    let query = SearchQuery::parse(raw);
    let mut results = Vec::new();

    if query.wants("ticket") {
        results.extend(
            state
                .tickets
                .values()
                .filter(|t| query.status.as_deref().map_or(true, |s| t.status == s))
                .filter(|t| query.matches_text(&[t.subject.as_str(), t.description.as_str()]))
                .filter_map(|t| tagged(t, "ticket")),
        );
    }
    if query.wants("user") {
        results.extend(
            state
                .users
                .values()
                .filter(|u| query.matches_text(&[u.name.as_str(), u.email.as_str()]))
                .filter_map(|u| tagged(u, "user")),
        );
    }
    if query.wants("organization") {
        results.extend(
            state
                .organizations
                .values()
                .filter(|o| query.matches_text(&[o.name.as_str()]))
                .filter_map(|o| tagged(o, "organization")),
        );
    }

    page_response(
        "results",
        &results,
        &paging,
        &link_base(&headers, "/api/v2/search.json"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let q = SearchQuery::parse("type:ticket status:Open printer fire");
        assert_eq!(q.result_type.as_deref(), Some("ticket"));
        assert_eq!(q.status.as_deref(), Some("open"));
        assert_eq!(q.words, vec!["printer", "fire"]);
    }

    #[test]
    fn test_status_filter_limits_to_tickets() {
        let q = SearchQuery::parse("status:open");
        assert!(q.wants("ticket"));
        assert!(!q.wants("user"));
    }

    #[test]
    fn test_text_match_needs_every_word() {
        let q = SearchQuery::parse("printer fire");
        assert!(q.matches_text(&["Help, my printer is on FIRE!"]));
        assert!(!q.matches_text(&["printer jam"]));
    }
}
