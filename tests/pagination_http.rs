//! Page iterator tests against a mocked Zendesk API.
//!
//! Each mock carries an exact `expect(n)` so wiremock verifies that the
//! iterator makes no request beyond the last page.

use futures::StreamExt;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zendesk::{
    Context, Credential, List, PaginationOptions, SortOrder, Ticket, User, ZendeskClient,
    ZendeskError,
};

fn client(server: &MockServer) -> ZendeskClient {
    ZendeskClient::with_endpoint(&format!("{}/api/v2", server.uri()), Credential::bearer("t"))
        .unwrap()
}

fn users(ids: &[i64]) -> serde_json::Value {
    ids.iter()
        .map(|id| serde_json::json!({"id": id, "name": format!("User {id}"), "role": "end-user"}))
        .collect()
}

#[tokio::test]
async fn test_cursor_pages_follow_after_cursor() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users.json"))
        .and(query_param("page[size]", "2"))
        .and(query_param_is_missing("page[after]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": users(&[1, 2]),
            "meta": {"has_more": true, "after_cursor": "xxx", "before_cursor": "aaa"},
            "links": {"next": "https://acme.zendesk.com/api/v2/users.json?page[after]=xxx"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users.json"))
        .and(query_param("page[size]", "2"))
        .and(query_param("page[after]", "xxx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": users(&[3]),
            "meta": {"has_more": false, "after_cursor": null, "before_cursor": "bbb"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut iter = User::iter(&client, &Context::background(), PaginationOptions::new().page_size(2));

    let first = iter.get_next().await.unwrap();
    assert_eq!(first.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2]);
    assert!(iter.has_more());

    let second = iter.get_next().await.unwrap();
    assert_eq!(second.iter().map(|u| u.id).collect::<Vec<_>>(), vec![3]);
    assert!(!iter.has_more());

    // Exhausted: no third request reaches the server.
    assert!(iter.get_next().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_offset_pages_until_next_page_is_null() {
    let mock_server = MockServer::start().await;

    for page in 1..=3 {
        let next_page = (page < 3).then(|| {
            format!("https://acme.zendesk.com/api/v2/tickets.json?page={}", page + 1)
        });
        Mock::given(method("GET"))
            .and(path("/api/v2/tickets.json"))
            .and(query_param("page", page.to_string()))
            .and(query_param("per_page", "1"))
            .and(query_param("sort_by", "created_at"))
            .and(query_param("sort_order", "desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "tickets": [{"id": page, "subject": format!("Ticket {page}")}],
                "next_page": next_page,
                "previous_page": null,
                "count": 3
            })))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client(&mock_server);
    let opts = PaginationOptions::new()
        .page_size(1)
        .offset()
        .sort_by("created_at")
        .sort_order(SortOrder::Desc);

    let tickets = Ticket::list_all(&client, &Context::background(), opts)
        .await
        .unwrap();

    assert_eq!(tickets.iter().map(|t| t.id).collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_role_filter_sent_on_every_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users.json"))
        .and(query_param("role[]", "agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": users(&[5]),
            "meta": {"has_more": false}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let opts = User::with_roles(PaginationOptions::new(), ["agent", "admin"]);
    let found = User::list_all(&client, &Context::background(), opts).await.unwrap();

    assert_eq!(found.len(), 1);
}

#[tokio::test]
async fn test_organization_scope_changes_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/organizations/42/tickets.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "tickets": [{"id": 9, "organization_id": 42}],
            "meta": {"has_more": false}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let opts = PaginationOptions::new().parent_id(42);
    let tickets = Ticket::list_all(&client, &Context::background(), opts)
        .await
        .unwrap();

    assert_eq!(tickets[0].organization_id, Some(42));
}

#[tokio::test]
async fn test_failed_page_stops_iteration() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut iter = User::iter(&client, &Context::background(), PaginationOptions::new());

    let err = iter.get_next().await.unwrap_err();
    assert_eq!(err.status_code(), Some(500));
    assert!(!iter.has_more());
    assert!(iter.get_next().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_zero_page_size_never_fetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut iter = Ticket::iter(&client, &Context::background(), PaginationOptions::new().page_size(0));

    assert!(matches!(iter.get_next().await, Err(ZendeskError::Options(_))));
    assert!(!iter.has_more());
}

#[tokio::test]
async fn test_stream_yields_each_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users.json"))
        .and(query_param_is_missing("page[after]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": users(&[1]),
            "meta": {"has_more": true, "after_cursor": "c2"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v2/users.json"))
        .and(query_param("page[after]", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "users": users(&[2]),
            "meta": {"has_more": false}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let batches: Vec<_> = User::iter(&client, &Context::background(), PaginationOptions::new())
        .into_stream()
        .collect()
        .await;

    assert_eq!(batches.len(), 2);
    assert!(batches.iter().all(|b| b.as_ref().is_ok_and(|users| users.len() == 1)));
}
