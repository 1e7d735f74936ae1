//! Mock Zendesk API server.
//!
//! Provides an axum-based HTTP server that simulates the Zendesk API.

use std::sync::Arc;

use axum::{
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock Zendesk API server for testing.
///
/// The server runs in the background and can be used to test the Zendesk
/// client against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `api_url()` to get the API root to hand to the client.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The API root (`{url}/api/v2`) to pass to
    /// [`ZendeskClient::with_endpoint`](crate::ZendeskClient::with_endpoint).
    pub fn api_url(&self) -> String {
        format!("{}/api/v2", self.url)
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Number of API requests served so far (health checks excluded).
    pub async fn request_count(&self) -> usize {
        self.state.read().await.requests
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        Self::state_from_scenario(Fixtures::default_scenario())
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        let mut state = MockState::new().with_users(scenario.users);

        for organization in scenario.organizations {
            state = state.with_organization(organization);
        }

        for ticket in scenario.tickets {
            state = state.with_ticket(ticket);
        }

        for (ticket_id, dates) in scenario.ticket_dates {
            state = state.with_ticket_dates(ticket_id, dates);
        }

        state
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Ticket routes
            .route(
                "/api/v2/tickets.json",
                get(handlers::list_tickets).post(handlers::create_ticket),
            )
            .route("/api/v2/tickets/show_many.json", get(handlers::show_many_tickets))
            .route(
                "/api/v2/tickets/:id",
                get(handlers::get_ticket)
                    .put(handlers::update_ticket)
                    .delete(handlers::delete_ticket),
            )
            .route(
                "/api/v2/organizations/:id/tickets.json",
                get(handlers::list_organization_tickets),
            )
            // User routes
            .route("/api/v2/users.json", get(handlers::list_users))
            .route("/api/v2/users/:id", get(handlers::get_user))
            .route(
                "/api/v2/organizations/:id/users.json",
                get(handlers::list_organization_users),
            )
            // Search
            .route("/api/v2/search.json", get(handlers::search))
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Context, Credential, Get, List, PaginationOptions, Ticket, User, ZendeskClient};

    fn client_for(server: &MockServer) -> ZendeskClient {
        ZendeskClient::with_endpoint(&server.api_url(), Credential::bearer("test-token")).unwrap()
    }

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");
        assert_eq!(server.request_count().await, 0);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_get_ticket_with_zendesk_client() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let ticket = Ticket::get(&client, &Context::background(), 35436)
            .await
            .expect("Failed to get ticket");

        assert_eq!(ticket.subject, "Help, my printer is on fire!");
        assert_eq!(ticket.status, "solved");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_list_users_with_zendesk_client() {
        let server = MockServer::start().await;
        let client = client_for(&server);

        let users = User::list_all(&client, &Context::background(), PaginationOptions::new())
            .await
            .expect("Failed to list users");

        assert_eq!(users.len(), 4);
        assert_eq!(users[0].role, "admin");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = client_for(&server);

        let result = Ticket::get(&client, &Context::background(), 1).await;

        assert_eq!(result.unwrap_err().status_code(), Some(404));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_custom_state() {
        let state = MockState::new().with_ticket(Fixtures::ticket(9, "My Custom Ticket", "open"));

        let server = MockServer::with_state(state).await;
        let client = client_for(&server);

        let ticket = Ticket::get(&client, &Context::background(), 9)
            .await
            .expect("Failed to get ticket");

        assert_eq!(ticket.subject, "My Custom Ticket");

        server.shutdown().await;
    }
}
