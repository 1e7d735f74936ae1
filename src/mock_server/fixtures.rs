//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{DateTime, TimeZone, Utc};

use crate::{Organization, Ticket, TicketDates, User};

/// Collection of fixture factories for test data.
pub struct Fixtures;

fn at(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

impl Fixtures {
    // =========================================================================
    // Ticket Fixtures
    // =========================================================================

    /// Create a ticket with the fields every listing shows.
    pub fn ticket(id: i64, subject: &str, status: &str) -> Ticket {
        Ticket {
            id,
            url: format!("https://example.zendesk.com/api/v2/tickets/{id}.json"),
            subject: subject.to_string(),
            raw_subject: subject.to_string(),
            status: status.to_string(),
            priority: "normal".to_string(),
            ticket_type: "question".to_string(),
            created_at: at(1_560_000_000 + id),
            updated_at: at(1_560_000_000 + id),
            ..Default::default()
        }
    }

    /// Create a ticket requested by a user of an organization.
    pub fn organization_ticket(
        id: i64,
        subject: &str,
        requester_id: i64,
        organization_id: i64,
    ) -> Ticket {
        let mut ticket = Self::ticket(id, subject, "open");
        ticket.requester_id = Some(requester_id);
        ticket.organization_id = Some(organization_id);
        ticket
    }

    /// Create a solved ticket's sideloadable dates.
    pub fn solved_dates(solved_at: i64) -> TicketDates {
        TicketDates {
            assigned_at: at(solved_at - 7200),
            initially_assigned_at: at(solved_at - 7200),
            status_updated_at: at(solved_at),
            solved_at: at(solved_at),
            latest_comment_added_at: at(solved_at - 60),
            ..Default::default()
        }
    }

    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Create an active user with a derived email address.
    pub fn user(id: i64, name: &str, role: &str) -> User {
        User {
            id,
            url: format!("https://example.zendesk.com/api/v2/users/{id}.json"),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            role: role.to_string(),
            active: true,
            ..Default::default()
        }
    }

    /// Create `count` end users with ids starting at `first_id`.
    pub fn end_users(first_id: i64, count: usize) -> Vec<User> {
        (first_id..)
            .take(count)
            .map(|id| Self::user(id, &format!("Customer {id}"), "end-user"))
            .collect()
    }

    // =========================================================================
    // Organization Fixtures
    // =========================================================================

    /// Create an organization with one domain.
    pub fn organization(id: i64, name: &str) -> Organization {
        Organization {
            id,
            url: format!("https://example.zendesk.com/api/v2/organizations/{id}.json"),
            name: name.to_string(),
            domain_names: vec![format!("{}.com", name.to_lowercase().replace(' ', ""))],
            created_at: at(1_500_000_000 + id),
            ..Default::default()
        }
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario with related entities.
pub struct DefaultScenario {
    pub organizations: Vec<Organization>,
    pub users: Vec<User>,
    pub tickets: Vec<Ticket>,
    pub ticket_dates: Vec<(i64, TicketDates)>,
}

impl DefaultScenario {
    fn new() -> Self {
        let organizations = vec![
            Fixtures::organization(1, "Acme"),
            Fixtures::organization(2, "Globex"),
        ];

        let mut customer = Fixtures::user(3, "Wile Coyote", "end-user");
        customer.organization_id = Some(1);

        let users = vec![
            Fixtures::user(1, "Ada Admin", "admin"),
            Fixtures::user(2, "Sam Agent", "agent"),
            customer,
            Fixtures::user(4, "Hank Scorpio", "end-user"),
        ];

        let mut solved = Fixtures::organization_ticket(35436, "Help, my printer is on fire!", 3, 1);
        solved.status = "solved".to_string();
        solved.assignee_id = Some(2);
        solved.tags = vec!["hardware".to_string(), "urgent".to_string()];

        let tickets = vec![
            Fixtures::ticket(1, "Sample ticket", "new"),
            Fixtures::organization_ticket(2, "Rocket skates broken", 3, 1),
            Fixtures::ticket(3, "Password reset", "pending"),
            solved,
        ];

        let ticket_dates = vec![(35436, Fixtures::solved_dates(1_600_000_000))];

        Self {
            organizations,
            users,
            tickets,
            ticket_dates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_email_derived_from_name() {
        let user = Fixtures::user(5, "Ann Lee", "agent");
        assert_eq!(user.email, "ann.lee@example.com");
        assert!(user.active);
    }

    #[test]
    fn test_end_users_are_sequential() {
        let users = Fixtures::end_users(100, 3);
        assert_eq!(users.iter().map(|u| u.id).collect::<Vec<_>>(), vec![100, 101, 102]);
        assert!(users.iter().all(|u| u.role == "end-user"));
    }

    #[test]
    fn test_solved_dates() {
        let dates = Fixtures::solved_dates(1_600_000_000);
        assert_eq!(dates.solved_at, at(1_600_000_000));
        assert!(dates.requester_updated_at.is_none());
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();
        assert!(!scenario.organizations.is_empty());
        assert!(!scenario.users.is_empty());
        assert!(scenario.tickets.iter().any(|t| t.id == 35436));
        assert_eq!(scenario.ticket_dates[0].0, 35436);
    }
}
