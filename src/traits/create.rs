//! Create trait for new entities.

use async_trait::async_trait;

use crate::client::ZendeskClient;
use crate::context::Context;
use crate::error::Result;

/// Create an entity and return it as stored by the server.
#[async_trait]
pub trait Create: Sized {
    /// Body sent for the new entity.
    type Params: Send + Sync;

    /// Create the entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the server rejects the entity or the request fails.
    async fn create(client: &ZendeskClient, ctx: &Context, params: &Self::Params) -> Result<Self>;
}
