//! File upload tests against a mocked Zendesk API.

use std::time::Duration;

use wiremock::matchers::{body_bytes, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zendesk::{
    Attachment, Context, Credential, Delete, Get, Upload, UploadOptions, ZendeskClient,
    ZendeskError,
};

fn client(server: &MockServer) -> ZendeskClient {
    ZendeskClient::with_endpoint(&format!("{}/api/v2", server.uri()), Credential::bearer("t"))
        .unwrap()
}

fn upload_response() -> serde_json::Value {
    serde_json::json!({
        "upload": {
            "token": "6bk3gql82em5nmf",
            "attachment": {
                "id": 498483,
                "file_name": "crash.log",
                "content_type": "text/plain",
                "size": 9
            },
            "attachments": [{"id": 498483, "file_name": "crash.log"}]
        }
    })
}

#[tokio::test]
async fn test_upload_posts_raw_bytes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/uploads.json"))
        .and(query_param("filename", "crash.log"))
        .and(query_param_is_missing("token"))
        .and(header("content-type", "text/plain"))
        .and(body_bytes(b"paper jam".to_vec()))
        .respond_with(ResponseTemplate::new(201).set_body_json(upload_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let upload = Upload::create(
        &client,
        &Context::background(),
        &UploadOptions::new("crash.log").content_type("text/plain"),
        b"paper jam".to_vec(),
    )
    .await
    .unwrap();

    assert_eq!(upload.token, "6bk3gql82em5nmf");
    assert_eq!(upload.attachment.unwrap().id, 498483);
}

#[tokio::test]
async fn test_upload_reuses_token_with_default_content_type() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/uploads.json"))
        .and(query_param("filename", "second.bin"))
        .and(query_param("token", "6bk3gql82em5nmf"))
        .and(header("content-type", "application/binary"))
        .respond_with(ResponseTemplate::new(201).set_body_json(upload_response()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    Upload::create(
        &client,
        &Context::background(),
        &UploadOptions::new("second.bin").token("6bk3gql82em5nmf"),
        vec![0, 1, 2],
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_upload_with_cancelled_context_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201).set_body_json(upload_response()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let (ctx, handle) = Context::background().with_cancel();
    handle.cancel();

    let err = Upload::create(&client, &ctx, &UploadOptions::new("foo"), b"body".to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, ZendeskError::Cancelled));
}

#[tokio::test]
async fn test_upload_cancelled_midway_does_not_hang() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/uploads.json"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(upload_response())
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let (ctx, handle) = Context::background().with_cancel();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    });

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        Upload::create(&client, &ctx, &UploadOptions::new("big.bin"), vec![7; 64 * 1024]),
    )
    .await
    .expect("upload should stop once the context is cancelled");

    assert!(matches!(result, Err(ZendeskError::Cancelled)));
}

#[tokio::test]
async fn test_upload_deadline_exceeded() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v2/uploads.json"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(upload_response())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let ctx = Context::background().with_timeout(Duration::from_millis(50));

    let err = Upload::create(&client, &ctx, &UploadOptions::new("foo"), b"body".to_vec())
        .await
        .unwrap_err();

    assert!(matches!(err, ZendeskError::DeadlineExceeded));
}

#[tokio::test]
async fn test_delete_upload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/v2/uploads/foobar.json"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    Upload::delete(&client, &Context::background(), "foobar".to_string())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_attachment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/attachments/498483.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "attachment": {
                "id": 498483,
                "file_name": "crash.log",
                "content_url": "https://acme.zendesk.com/attachments/token/abc/?name=crash.log",
                "thumbnails": [{"id": 1, "file_name": "crash_thumb.png"}]
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let attachment = Attachment::get(&client, &Context::background(), 498483)
        .await
        .unwrap();

    assert_eq!(attachment.file_name, "crash.log");
    assert_eq!(attachment.thumbnails[0].file_name, "crash_thumb.png");
}
