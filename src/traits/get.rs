//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::ZendeskClient;
use crate::context::Context;
use crate::error::Result;

/// Fetch a single entity by ID.
///
/// # Example
///
/// ```no_run
/// use zendesk::{Context, Get, Ticket, ZendeskClient};
///
/// # async fn example() -> zendesk::Result<()> {
/// let client = ZendeskClient::from_env()?;
/// let ticket = Ticket::get(&client, &Context::background(), 35436).await?;
/// println!("{}", ticket.subject);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Get: Sized {
    /// The ID type for this entity.
    type Id: Send;

    /// Fetch the entity by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn get(client: &ZendeskClient, ctx: &Context, id: Self::Id) -> Result<Self>;
}
