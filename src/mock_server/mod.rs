//! Mock Zendesk API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Zendesk
//! API for integration and end-to-end testing. Unlike wiremock which mocks at
//! the HTTP level per-test, this server maintains state across requests and
//! speaks both offset and cursor pagination, enabling realistic workflow
//! testing.
//!
//! # Example
//!
//! ```ignore
//! use zendesk::mock_server::MockServer;
//! use zendesk::{Context, Credential, Get, Ticket, ZendeskClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client =
//!         ZendeskClient::with_endpoint(&server.api_url(), Credential::bearer("t")).unwrap();
//!
//!     // Server comes with default fixtures
//!     let ticket = Ticket::get(&client, &Context::background(), 35436).await.unwrap();
//!     assert_eq!(ticket.status, "solved");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::MockState;
