//! List trait for fetching collections of entities.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::client::ZendeskClient;
use crate::context::Context;
use crate::error::Result;
use crate::iterator::PageIterator;
use crate::pagination::{CbpOptions, CommonOptions, CursorPaginationMeta, ObpOptions, OffsetPage, PaginationOptions};

/// List entities with offset or cursor pagination.
///
/// Implementors name the collection path and the response key holding the
/// items; every fetch style is derived from those two.
///
/// # Example
///
/// ```no_run
/// use zendesk::{Context, List, PaginationOptions, User, ZendeskClient};
///
/// # async fn example() -> zendesk::Result<()> {
/// let client = ZendeskClient::from_env()?;
/// let ctx = Context::background();
///
/// // Fetch a single page
/// let (users, page) = User::list_obp(&client, &ctx, &PaginationOptions::new().obp(1)).await?;
///
/// // Fetch all pages
/// let all_users = User::list_all(&client, &ctx, PaginationOptions::new()).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait List: DeserializeOwned + Send + 'static {
    /// Key of the item array in a list response, e.g. `"tickets"`.
    const KEY: &'static str;

    /// Collection path for `opts`, e.g. `tickets.json` or
    /// `organizations/{id}/tickets.json` when a parent id is set.
    fn collection_path(opts: &CommonOptions) -> String;

    /// Fetch one offset page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    async fn list_obp(
        client: &ZendeskClient,
        ctx: &Context,
        opts: &ObpOptions,
    ) -> Result<(Vec<Self>, OffsetPage)> {
        let path = Self::collection_path(&opts.common);
        client.list_obp(ctx, &path, Self::KEY, opts).await
    }

    /// Fetch one cursor page.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or decoding fails.
    async fn list_cbp(
        client: &ZendeskClient,
        ctx: &Context,
        opts: &CbpOptions,
    ) -> Result<(Vec<Self>, CursorPaginationMeta)> {
        let path = Self::collection_path(&opts.common);
        client.list_cbp(ctx, &path, Self::KEY, opts).await
    }

    /// Iterate over the whole collection in batches.
    fn iter(client: &ZendeskClient, ctx: &Context, opts: PaginationOptions) -> PageIterator<Self> {
        let obp_client = client.clone();
        let cbp_client = client.clone();

        PageIterator::new(
            ctx.clone(),
            opts,
            move |ctx, opts| {
                let client = obp_client.clone();
                async move { Self::list_obp(&client, &ctx, &opts).await }
            },
            move |ctx, opts| {
                let client = cbp_client.clone();
                async move { Self::list_cbp(&client, &ctx, &opts).await }
            },
        )
    }

    /// List all entities (fetches every page).
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all(
        client: &ZendeskClient,
        ctx: &Context,
        opts: PaginationOptions,
    ) -> Result<Vec<Self>> {
        Self::iter(client, ctx, opts).collect_all().await
    }
}
