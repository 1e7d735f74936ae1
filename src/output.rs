//! Output formatting for CLI display.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output
//! as an alternative to JSON serialization.

use chrono::{DateTime, Utc};

use crate::{ActionValue, Group, Macro, Organization, SearchResult, Ticket, Trigger, User, Webhook};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

fn header(title: String) -> Vec<String> {
    let divider = "─".repeat(title.chars().count().max(30));
    vec![title, divider]
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl PrettyPrint for Ticket {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Ticket #{}", self.id));
        lines.push(format!("Subject:        {}", self.subject));
        lines.push(format!("Status:         {}", self.status));

        if !self.priority.is_empty() {
            lines.push(format!("Priority:       {}", self.priority));
        }
        if !self.ticket_type.is_empty() {
            lines.push(format!("Type:           {}", self.ticket_type));
        }
        if let Some(requester) = self.requester_id {
            lines.push(format!("Requester:      {}", requester));
        }
        if let Some(assignee) = self.assignee_id {
            lines.push(format!("Assignee:       {}", assignee));
        }
        if !self.tags.is_empty() {
            lines.push(format!("Tags:           {}", self.tags.join(", ")));
        }
        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", timestamp(created)));
        }
        if let Some(ref updated) = self.updated_at {
            lines.push(format!("Updated:        {}", timestamp(updated)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for User {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("User #{}", self.id));
        lines.push(format!("Name:           {}", self.name));
        lines.push(format!("Email:          {}", self.email));
        lines.push(format!("Role:           {}", self.role));

        if let Some(org) = self.organization_id {
            lines.push(format!("Organization:   {}", org));
        }
        if self.suspended {
            lines.push("Suspended:      yes".to_string());
        }
        if let Some(ref login) = self.last_login_at {
            lines.push(format!("Last Login:     {}", timestamp(login)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Organization {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Organization #{}", self.id));
        lines.push(format!("Name:           {}", self.name));

        if !self.domain_names.is_empty() {
            lines.push(format!("Domains:        {}", self.domain_names.join(", ")));
        }
        if let Some(ref created) = self.created_at {
            lines.push(format!("Created:        {}", timestamp(created)));
        }

        lines.join("\n")
    }
}

impl PrettyPrint for Group {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Group #{}", self.id));
        lines.push(format!("Name:           {}", self.name));
        if !self.description.is_empty() {
            lines.push(format!("Description:    {}", self.description));
        }
        if self.default {
            lines.push("Default:        yes".to_string());
        }
        lines.join("\n")
    }
}

fn action_value(value: &ActionValue) -> String {
    match value {
        ActionValue::String(s) => s.clone(),
        ActionValue::List(items) => format!("[{}]", items.join(", ")),
    }
}

impl PrettyPrint for Trigger {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Trigger #{}", self.id));
        lines.push(format!("Title:          {}", self.title));
        lines.push(format!("Active:         {}", if self.active { "yes" } else { "no" }));
        lines.push(format!(
            "Conditions:     {} all, {} any",
            self.conditions.all.len(),
            self.conditions.any.len()
        ));
        for action in &self.actions {
            lines.push(format!("  {} = {}", action.field, action_value(&action.value)));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for Macro {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Macro #{}", self.id));
        lines.push(format!("Title:          {}", self.title));
        lines.push(format!("Active:         {}", if self.active { "yes" } else { "no" }));
        for action in &self.actions {
            lines.push(format!("  {} = {}", action.field, action_value(&action.value)));
        }
        lines.join("\n")
    }
}

impl PrettyPrint for Webhook {
    fn pretty_print(&self) -> String {
        let mut lines = header(format!("Webhook {}", self.id));
        lines.push(format!("Name:           {}", self.name));
        lines.push(format!("Endpoint:       {} {}", self.http_method, self.endpoint));
        lines.push(format!("Status:         {}", self.status));
        lines.join("\n")
    }
}

impl PrettyPrint for SearchResult {
    fn pretty_print(&self) -> String {
        match self {
            Self::Group(g) => g.pretty_print(),
            Self::Ticket(t) => t.pretty_print(),
            Self::User(u) => u.pretty_print(),
            Self::Organization(o) => o.pretty_print(),
            Self::Topic(t) => {
                let mut lines = header(format!("Topic #{}", t.id));
                lines.push(format!("Name:           {}", t.name));
                lines.join("\n")
            }
        }
    }
}
