//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the zendesk binary.

use clap::{Parser, Subcommand, ValueEnum};

use crate::DEFAULT_PAGE_SIZE;

/// Zendesk API command-line interface.
#[derive(Parser, Debug)]
#[command(name = "zendesk", about = "Zendesk Support API CLI", version)]
pub struct Cli {
    /// Output results as JSON instead of a table.
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Get a single entity by ID.
    Get {
        /// The type of entity to get.
        entity: Entity,

        /// The entity ID.
        id: String,
    },

    /// List entities, following pagination.
    List {
        /// The type of entity to list.
        entity: Entity,

        /// Number of items per page.
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,

        /// Use offset pagination instead of cursor pagination.
        #[arg(long)]
        offset: bool,

        /// Stop after this many pages.
        #[arg(long)]
        limit_pages: Option<usize>,

        /// Sort field; prefix with '-' for descending.
        #[arg(long)]
        sort: Option<String>,
    },

    /// Search tickets, users, organizations and groups.
    Search {
        /// Search expression, e.g. "type:ticket status:open".
        query: String,

        /// Page number (1-indexed).
        #[arg(long)]
        page: Option<u32>,
    },
}

/// Entity types that can be operated on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A support ticket.
    #[value(alias = "tickets")]
    Ticket,
    /// An end user, agent or admin.
    #[value(alias = "users")]
    User,
    /// A customer organization.
    #[value(aliases = ["organizations", "org", "orgs"])]
    Organization,
    /// An agent group.
    #[value(alias = "groups")]
    Group,
    /// A ticket trigger.
    #[value(alias = "triggers")]
    Trigger,
    /// An agent macro.
    #[value(alias = "macros")]
    Macro,
    /// A webhook (get only).
    #[value(alias = "webhooks")]
    Webhook,
}
