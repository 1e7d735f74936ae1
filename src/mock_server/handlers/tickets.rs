//! Ticket endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use super::{admit, invalid, json_id, link_base, not_found, page_response, param, Paging, Params};
use crate::mock_server::state::MockState;
use crate::Ticket;

type Shared = State<Arc<RwLock<MockState>>>;

/// GET /api/v2/tickets/{id}.json
///
/// Honors `include=dates` by embedding the ticket's dates at `ticket.dates`.
pub async fn get_ticket(
    State(state): Shared,
    headers: HeaderMap,
    Path(segment): Path<String>,
    Query(params): Query<Params>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejected) = admit(&mut state, &headers) {
        return rejected;
    }

    let Some(ticket) = json_id(&segment).and_then(|id| state.get_ticket(id)) else {
        return not_found();
    };

    let mut body = json!({ "ticket": ticket });
    let includes_dates = param(&params, "include")
        .is_some_and(|inc| inc.split(',').any(|s| s.trim() == "dates"));
    if includes_dates {
        let dates = state.ticket_dates.get(&ticket.id).cloned().unwrap_or_default();
        body["ticket"]["dates"] = json!(dates);
    }

    (StatusCode::OK, Json(body)).into_response()
}

/// GET /api/v2/tickets/show_many.json?ids=1,2,3
pub async fn show_many_tickets(
    State(state): Shared,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejected) = admit(&mut state, &headers) {
        return rejected;
    }

    let tickets: Vec<&Ticket> = param(&params, "ids")
        .unwrap_or_default()
        .split(',')
        .filter_map(|id| id.trim().parse().ok())
        .filter_map(|id| state.get_ticket(id))
        .collect();

    (StatusCode::OK, Json(json!({ "tickets": tickets }))).into_response()
}

/// GET /api/v2/tickets.json
pub async fn list_tickets(
    State(state): Shared,
    headers: HeaderMap,
    Query(params): Query<Params>,
) -> Response {
    list(state, headers, params, None).await
}

/// GET /api/v2/organizations/{id}/tickets.json
pub async fn list_organization_tickets(
    State(state): Shared,
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

    if let Some(id) = organization_id {
        if !state.organizations.contains_key(&id) {
            return not_found();
        }
    }

    let paging = match Paging::from_params(&params) {
        Ok(p) => p,
        Err(rejected) => return rejected,
    };

    let path = match organization_id {
        Some(id) => format!("/api/v2/organizations/{id}/tickets.json"),
        None => "/api/v2/tickets.json".to_string(),
    };

    let mut tickets = state.list_tickets(organization_id);
    if param(&params, "sort").is_some_and(|s| s.starts_with('-'))
        || param(&params, "sort_order") == Some("desc")
    {
        tickets.reverse();
    }

    page_response("tickets", &tickets, &paging, &link_base(&headers, &path))
}

/// POST /api/v2/tickets.json
pub async fn create_ticket(
    State(state): Shared,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejected) = admit(&mut state, &headers) {
        return rejected;
    }

    let Some(mut ticket) = body
        .get("ticket")
        .and_then(|t| serde_json::from_value::<Ticket>(t.clone()).ok())
    else {
        return invalid("InvalidRequest", "Body must be a ticket envelope");
    };

    let Some(comment) = ticket.comment.take().filter(|c| !c.body.is_empty()) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "error": "RecordInvalid",
                "description": "Record validation errors",
                "details": {"base": [{"description": "Comment: cannot be blank"}]}
            })),
        )
            .into_response();
    };

    let now = chrono::Utc::now();
    ticket.description = comment.body;
    ticket.raw_subject = ticket.subject.clone();
    if ticket.status.is_empty() {
        ticket.status = "new".to_string();
    }
    ticket.collaborators = None;
    ticket.requester = None;
    ticket.created_at = Some(now);
    ticket.updated_at = Some(now);

    let created = state.insert_ticket(ticket);
    (StatusCode::CREATED, Json(json!({ "ticket": created }))).into_response()
}

/// PUT /api/v2/tickets/{id}.json
pub async fn update_ticket(
    State(state): Shared,
    headers: HeaderMap,
    Path(segment): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejected) = admit(&mut state, &headers) {
        return rejected;
    }

    let Some(id) = json_id(&segment) else {
        return not_found();
    };
    let Some(changes) = body
        .get("ticket")
        .and_then(|t| serde_json::from_value::<Ticket>(t.clone()).ok())
    else {
        return invalid("InvalidRequest", "Body must be a ticket envelope");
    };

    match state.update_ticket(id, changes) {
        Some(ticket) => (StatusCode::OK, Json(json!({ "ticket": ticket }))).into_response(),
        None => not_found(),
    }
}

/// DELETE /api/v2/tickets/{id}.json
pub async fn delete_ticket(
    State(state): Shared,
    headers: HeaderMap,
    Path(segment): Path<String>,
) -> Response {
    let mut state = state.write().await;
    if let Some(rejected) = admit(&mut state, &headers) {
        return rejected;
    }

    match json_id(&segment) {
        Some(id) if state.delete_ticket(id) => StatusCode::NO_CONTENT.into_response(),
        _ => not_found(),
    }
}
