//! Update trait for modifying entities.

use async_trait::async_trait;

use crate::client::ZendeskClient;
use crate::context::Context;
use crate::error::Result;

/// Update an existing entity.
///
/// # Example
///
/// ```no_run
/// use zendesk::{Context, Ticket, Update, ZendeskClient};
///
/// # async fn example() -> zendesk::Result<()> {
/// let client = ZendeskClient::from_env()?;
/// let changes = Ticket {
///     status: "solved".to_string(),
///     ..Default::default()
/// };
/// let updated = Ticket::update(&client, &Context::background(), 35436, &changes).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait Update: Sized {
    /// The ID type for this entity.
    type Id: Send;

    /// Parameters for the update.
    type Params: Send + Sync;

    /// Update the entity and return the updated version.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn update(
        client: &ZendeskClient,
        ctx: &Context,
        id: Self::Id,
        params: &Self::Params,
    ) -> Result<Self>;
}
