//! A single iterator over paginated collections, whichever pagination
//! style the endpoint speaks.

use std::fmt;
use std::future::Future;

use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, Stream};

use crate::context::Context;
use crate::error::{Result, ZendeskError};
use crate::pagination::{CbpOptions, CursorPaginationMeta, ObpOptions, OffsetPage, PaginationOptions};

/// Upper bound on pages drained by [`PageIterator::collect_all`].
pub const MAX_COLLECT_PAGES: usize = 1000;

/// Fetches one offset page.
pub type ObpFetch<T> = Box<
    dyn Fn(Context, ObpOptions) -> BoxFuture<'static, Result<(Vec<T>, OffsetPage)>> + Send + Sync,
>;

/// Fetches one cursor page.
pub type CbpFetch<T> = Box<
    dyn Fn(Context, CbpOptions) -> BoxFuture<'static, Result<(Vec<T>, CursorPaginationMeta)>>
        + Send
        + Sync,
>;

/// Stateful "fetch next batch" over a paginated collection.
///
/// Offset mode walks pages 1, 2, 3, ... until the server stops reporting a
/// next page. Cursor mode starts from an empty cursor and follows the
/// `after_cursor` chain until `has_more` is false. Either way, once
/// [`has_more`](Self::has_more) returns false no further fetch is made.
///
/// An iterator is driven by one caller at a time (`get_next` takes
/// `&mut self`); independent iterators share nothing.
///
/// # Example
///
/// ```no_run
/// use zendesk::{Context, Credential, List, PageIterator, PaginationOptions, Ticket, ZendeskClient};
///
/// # async fn run() -> zendesk::Result<()> {
/// let client = ZendeskClient::new("acme", Credential::bearer("token"))?;
/// let mut tickets = Ticket::iter(&client, &Context::background(), PaginationOptions::new());
/// while tickets.has_more() {
///     for ticket in tickets.get_next().await? {
///         println!("{} {}", ticket.id, ticket.subject);
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct PageIterator<T> {
    ctx: Context,
    opts: PaginationOptions,
    has_more: bool,
    page_index: u32,
    page_after: String,
    obp: ObpFetch<T>,
    cbp: CbpFetch<T>,
}

impl<T> fmt::Debug for PageIterator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageIterator")
            .field("opts", &self.opts)
            .field("has_more", &self.has_more)
            .field("page_index", &self.page_index)
            .field("page_after", &self.page_after)
            .finish_non_exhaustive()
    }
}

impl<T: Send + 'static> PageIterator<T> {
    /// Build an iterator from the two fetch functions of a resource.
    ///
    /// Only the function matching `opts.use_cursor` is ever called.
    pub fn new<O, OFut, C, CFut>(ctx: Context, opts: PaginationOptions, obp: O, cbp: C) -> Self
    where
        O: Fn(Context, ObpOptions) -> OFut + Send + Sync + 'static,
        OFut: Future<Output = Result<(Vec<T>, OffsetPage)>> + Send + 'static,
        C: Fn(Context, CbpOptions) -> CFut + Send + Sync + 'static,
        CFut: Future<Output = Result<(Vec<T>, CursorPaginationMeta)>> + Send + 'static,
    {
        Self {
            ctx,
            opts,
            has_more: true,
            page_index: 1,
            page_after: String::new(),
            obp: Box::new(move |ctx, o| obp(ctx, o).boxed()),
            cbp: Box::new(move |ctx, o| cbp(ctx, o).boxed()),
        }
    }

    /// Whether another call to [`get_next`](Self::get_next) may return items.
    pub fn has_more(&self) -> bool {
        self.has_more
    }

    /// Fetch the next batch.
    ///
    /// After exhaustion this returns an empty batch without touching the
    /// network. A failed fetch exhausts the iterator and returns the error
    /// alone; batches returned earlier stay valid.
    pub async fn get_next(&mut self) -> Result<Vec<T>> {
        if !self.has_more {
            return Ok(Vec::new());
        }

        if let Err(err) = self.opts.validate() {
            self.has_more = false;
            return Err(err);
        }

        let result = if self.opts.use_cursor {
            self.next_cursor_page().await
        } else {
            self.next_offset_page().await
        };

        if result.is_err() {
            self.has_more = false;
        }
        result
    }

    async fn next_offset_page(&mut self) -> Result<Vec<T>> {
        let opts = self.opts.obp(self.page_index);
        let (items, page) = (self.obp)(self.ctx.clone(), opts).await?;

        self.has_more = page.has_next();
        tracing::debug!(
            page = self.page_index,
            items = items.len(),
            has_more = self.has_more,
            "fetched offset page"
        );
        self.page_index += 1;
        Ok(items)
    }

    async fn next_cursor_page(&mut self) -> Result<Vec<T>> {
        let opts = self.opts.cbp(&self.page_after);
        let (items, meta) = (self.cbp)(self.ctx.clone(), opts).await?;

        self.has_more = meta.has_more;
        self.page_after = meta.after_cursor;
        tracing::debug!(
            after_cursor = %self.page_after,
            items = items.len(),
            has_more = self.has_more,
            "fetched cursor page"
        );
        Ok(items)
    }

    /// Drain every remaining page into one vector.
    ///
    /// Stops after [`MAX_COLLECT_PAGES`] pages even if the server keeps
    /// reporting more.
    pub async fn collect_all(mut self) -> Result<Vec<T>> {
        let mut all = Vec::new();
        let mut pages = 0;

        while self.has_more {
            if pages == MAX_COLLECT_PAGES {
                tracing::warn!(
                    pages,
                    items = all.len(),
                    "page limit reached, returning partial collection"
                );
                break;
            }
            all.extend(self.get_next().await?);
            pages += 1;
        }

        Ok(all)
    }

    /// Turn the iterator into a stream of batches.
    ///
    /// The stream ends after the last batch or right after the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<Vec<T>>> + Send {
        stream::unfold(self, |mut iter| async move {
            if !iter.has_more() {
                return None;
            }
            let batch = iter.get_next().await;
            Some((batch, iter))
        })
    }
}
