//! User endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tokio::sync::RwLock;

use super::{admit, json_id, link_base, not_found, page_response, param, params_all, Paging, Params};
use crate::mock_server::state::MockState;

/// GET /api/v2/users/{id}.json
pub async fn get_user(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(segment): Path<String>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejected) = admit(&mut state, &headers) {
        return rejected;
    }

    match json_id(&segment).and_then(|id| state.get_user(id)) {
        Some(user) => (StatusCode::OK, Json(json!({ "user": user }))).into_response(),
        None => not_found(),
    }
}

/// GET /api/v2/users.json
///
/// Filters by `role` or repeated `role[]` keys.
pub async fn list_users(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> Response {
    list(state, headers, params, None).await
}

/// GET /api/v2/organizations/{id}/users.json
pub async fn list_organization_users(
    State(state): State<Arc<RwLock<MockState>>>,
    headers: HeaderMap,
    Path(organization_id): Path<i64>,
    Query(params): Query<Params>,
) -> Response {
    list(state, headers, params, Some(organization_id)).await
}

async fn list(
    state: Arc<RwLock<MockState>>,
    headers: HeaderMap,
    params: Params,
    organization_id: Option<i64>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejected) = admit(&mut state, &headers) {
        return rejected;
    }

    let paging = match Paging::from_params(&params) {
        Ok(p) => p,
        Err(rejected) => return rejected,
    };

    let mut roles = params_all(&params, "role[]");
    if let Some(role) = param(&params, "role") {
        roles.push(role.to_string());
    }

    let path = match organization_id {
        Some(id) => format!("/api/v2/organizations/{id}/users.json"),
        None => "/api/v2/users.json".to_string(),
    };

    let users = state.list_users(&roles, organization_id);
    page_response("users", &users, &paging, &link_base(&headers, &path))
}
