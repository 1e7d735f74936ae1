//! Delete trait for removing entities.

use async_trait::async_trait;

use crate::client::ZendeskClient;
use crate::context::Context;
use crate::error::Result;

/// Delete an entity by ID.
#[async_trait]
pub trait Delete {
    /// The ID type for this entity.
    type Id: Send;

    /// Delete the entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found or the request fails.
    async fn delete(client: &ZendeskClient, ctx: &Context, id: Self::Id) -> Result<()>;
}
