//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Zendesk API server.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{Organization, Ticket, TicketDates, User};

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access. Collections are
/// keyed by id so listings come back in id order, as Zendesk returns them.
#[derive(Debug, Default)]
pub struct MockState {
    /// Tickets indexed by id.
    pub tickets: BTreeMap<i64, Ticket>,

    /// Sideloaded ticket dates indexed by ticket id.
    pub ticket_dates: HashMap<i64, TicketDates>,

    /// Users indexed by id.
    pub users: BTreeMap<i64, User>,

    /// Organizations indexed by id.
    pub organizations: BTreeMap<i64, Organization>,

    /// If set, requests must carry exactly this `Authorization` header.
    pub required_auth: Option<String>,

    /// If set, every request is rejected with 429 and this `Retry-After`.
    pub retry_after: Option<u64>,

    /// Number of API requests received so far.
    pub requests: usize,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a ticket to the state.
    pub fn with_ticket(mut self, ticket: Ticket) -> Self {
        self.tickets.insert(ticket.id, ticket);
        self
    }

    /// Attach sideloadable dates to a ticket.
    pub fn with_ticket_dates(mut self, ticket_id: i64, dates: TicketDates) -> Self {
        self.ticket_dates.insert(ticket_id, dates);
        self
    }

    /// Add a user to the state.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.insert(user.id, user);
        self
    }

    /// Add several users to the state.
    pub fn with_users(mut self, users: impl IntoIterator<Item = User>) -> Self {
        self.users.extend(users.into_iter().map(|u| (u.id, u)));
        self
    }

    /// Add an organization to the state.
    pub fn with_organization(mut self, organization: Organization) -> Self {
        self.organizations.insert(organization.id, organization);
        self
    }

    /// Require an exact `Authorization` header value.
    pub fn with_required_auth(mut self, header: &str) -> Self {
        self.required_auth = Some(header.to_string());
        self
    }

    /// Throttle every request.
    pub fn with_retry_after(mut self, seconds: u64) -> Self {
        self.retry_after = Some(seconds);
        self
    }

    /// Get a ticket by id.
    pub fn get_ticket(&self, id: i64) -> Option<&Ticket> {
        self.tickets.get(&id)
    }

    /// Get a user by id.
    pub fn get_user(&self, id: i64) -> Option<&User> {
        self.users.get(&id)
    }

    /// List tickets, optionally only those of one organization.
    pub fn list_tickets(&self, organization_id: Option<i64>) -> Vec<&Ticket> {
        self.tickets
            .values()
            .filter(|t| organization_id.is_none() || t.organization_id == organization_id)
            .collect()
    }

    /// List users whose role is one of `roles` (all users when empty).
    pub fn list_users(&self, roles: &[String], organization_id: Option<i64>) -> Vec<&User> {
        self.users
            .values()
            .filter(|u| roles.is_empty() || roles.iter().any(|r| *r == u.role))
            .filter(|u| organization_id.is_none() || u.organization_id == organization_id)
            .collect()
    }

    /// Store a new ticket under the next free id and return it.
    pub fn insert_ticket(&mut self, mut ticket: Ticket) -> &Ticket {
        let id = self.tickets.keys().next_back().copied().unwrap_or(0) + 1;
        ticket.id = id;
        self.tickets.entry(id).or_insert(ticket)
    }

    /// Apply the non-empty fields of `changes` to a ticket.
    pub fn update_ticket(&mut self, id: i64, changes: Ticket) -> Option<&Ticket> {
        let ticket = self.tickets.get_mut(&id)?;
        if !changes.subject.is_empty() {
            ticket.subject = changes.subject;
        }
        if !changes.status.is_empty() {
            ticket.status = changes.status;
        }
        if !changes.priority.is_empty() {
            ticket.priority = changes.priority;
        }
        if !changes.tags.is_empty() {
            ticket.tags = changes.tags;
        }
        if changes.assignee_id.is_some() {
            ticket.assignee_id = changes.assignee_id;
        }
        ticket.updated_at = Some(chrono::Utc::now());
        Some(&*ticket)
    }

    /// Remove a ticket, returning whether it existed.
    pub fn delete_ticket(&mut self, id: i64) -> bool {
        self.ticket_dates.remove(&id);
        self.tickets.remove(&id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::Fixtures;

    #[test]
    fn test_state_add_and_get_ticket() {
        let state = MockState::new().with_ticket(Fixtures::ticket(7, "Printer on fire", "open"));

        let ticket = state.get_ticket(7);
        assert!(ticket.is_some());
        assert_eq!(ticket.unwrap().subject, "Printer on fire");
        assert!(state.get_ticket(8).is_none());
    }

    #[test]
    fn test_state_list_users_by_role() {
        let state = MockState::new()
            .with_user(Fixtures::user(1, "Ann", "admin"))
            .with_user(Fixtures::user(2, "Bob", "agent"))
            .with_user(Fixtures::user(3, "Cid", "end-user"));

        assert_eq!(state.list_users(&[], None).len(), 3);
        assert_eq!(state.list_users(&["agent".to_string()], None).len(), 1);

        let staff = state.list_users(&["agent".to_string(), "admin".to_string()], None);
        assert_eq!(staff.iter().map(|u| u.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_state_insert_assigns_next_id() {
        let mut state = MockState::new().with_ticket(Fixtures::ticket(10, "Old", "open"));

        let created = state.insert_ticket(Ticket {
            subject: "New".to_string(),
            ..Default::default()
        });
        assert_eq!(created.id, 11);
    }

    #[test]
    fn test_state_update_ticket() {
        let mut state = MockState::new().with_ticket(Fixtures::ticket(1, "Original", "new"));

        let updated = state
            .update_ticket(
                1,
                Ticket {
                    status: "solved".to_string(),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.status, "solved");
        assert_eq!(updated.subject, "Original");
        assert!(state.update_ticket(99, Ticket::default()).is_none());
    }
}
