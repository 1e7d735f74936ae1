//! Zendesk Support API client library.
//!
//! A Rust library for the Zendesk REST API built around a trait-based
//! architecture: each operation (Get, List, Create, Update, Delete) is a
//! trait that entity types implement, and every paginated collection can
//! be walked with one [`PageIterator`] whichever pagination style the
//! endpoint uses.
//!
//! # Quick Start
//!
//! ```no_run
//! use zendesk::{Context, Get, List, PaginationOptions, Ticket, User, ZendeskClient};
//!
//! #[tokio::main]
//! async fn main() -> zendesk::Result<()> {
//!     // Create client from environment variables
//!     let client = ZendeskClient::from_env()?;
//!     let ctx = Context::background();
//!
//!     // Get a ticket by id
//!     let ticket = Ticket::get(&client, &ctx, 35436).await?;
//!     println!("Ticket: {}", ticket.subject);
//!
//!     // Walk every user, 100 at a time
//!     let mut users = User::iter(&client, &ctx, PaginationOptions::new());
//!     while users.has_more() {
//!         for user in users.get_next().await? {
//!             println!("{} <{}>", user.name, user.email);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`ZendeskClient`] holds the endpoint, credential and headers, and
//!   performs raw requests inside a [`Context`].
//! - [`PageIterator`] drives offset or cursor pagination.
//! - [`Polymorphic`] types decode fields whose JSON shape varies.
//! - [`Sideload`] pulls related records out of the same response.
//!
//! # Configuration
//!
//! [`ZendeskClient::from_env`] reads:
//!
//! - `ZENDESK_SUBDOMAIN` or `ZENDESK_API_URL` - which account to talk to
//! - `ZENDESK_OAUTH_TOKEN`, or `ZENDESK_EMAIL` with `ZENDESK_API_TOKEN` or
//!   `ZENDESK_PASSWORD` - how to authenticate

pub mod cli;
mod client;
mod context;
mod credential;
mod decode;
mod error;
mod iterator;
mod models;
pub mod output;
mod pagination;
mod query;
mod sideload;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::ZendeskClient;
pub use context::{CancelHandle, Context};
pub use credential::Credential;
pub use error::{Result, ZendeskError};
pub use query::{add_options, query_pairs};

// Pagination
pub use iterator::{CbpFetch, ObpFetch, PageIterator, MAX_COLLECT_PAGES};
pub use pagination::{
    CbpOptions, CommonOptions, CursorPagination, CursorPaginationMeta, ObpOptions, OffsetPage,
    PageOptions, PaginationOptions, SortOrder, DEFAULT_PAGE_SIZE,
};

// Decoding and sideloads
pub use decode::{
    decode_polymorphic, DecodeError, JsonKind, Polymorphic, VariantDecoder, VariantTable,
};
pub use sideload::{lookup, resolve_sideloads, IncludeOptions, Sideload, SideloadTarget};

// Re-export traits
pub use traits::{Create, Delete, Get, List, Update};

// Re-export models
pub use models::{
    search,
    Action,
    ActionValue,
    Attachment,
    Collaborator,
    Collaborators,
    CustomField,
    CustomFieldValue,
    Group,
    Macro,
    Organization,
    Requester,
    SatisfactionRating,
    SearchOptions,
    SearchResult,
    SearchResults,
    Ticket,
    TicketComment,
    TicketDates,
    Topic,
    Thumbnail,
    Trigger,
    TriggerCondition,
    TriggerConditions,
    Upload,
    UploadOptions,
    User,
    Via,
    ViaSource,
    Webhook,
    WebhookAuthentication,
    WebhookSigningSecret,
    DEFAULT_UPLOAD_CONTENT_TYPE,
    SEARCH_RESULT_TYPES,
};
