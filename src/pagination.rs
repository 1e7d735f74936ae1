//! Pagination types for Zendesk API responses and requests.
//!
//! Zendesk offers two pagination styles. Offset based pagination (OBP)
//! addresses pages by number and reports a `next_page` URL. Cursor based
//! pagination (CBP) hands out opaque cursors in a `meta` object.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ZendeskError;
use crate::query::{is_false, is_zero};

/// Default number of items requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Query keys owned by the iterator; filters may not reuse them.
const PAGINATION_KEYS: &[&str] = &[
    "page",
    "per_page",
    "page[size]",
    "page[after]",
    "page[before]",
];

/// Offset pagination markers returned alongside a collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetPage {
    /// URL of the previous page, absent on the first page.
    #[serde(default)]
    pub previous_page: Option<String>,
    /// URL of the next page, absent on the last page.
    #[serde(default)]
    pub next_page: Option<String>,
    /// Total number of items in the collection.
    #[serde(default)]
    pub count: i64,
}

impl OffsetPage {
    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.next_page.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Whether a previous page exists.
    pub fn has_prev(&self) -> bool {
        self.previous_page.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Cursor pagination metadata (the `meta` object of a CBP response).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPaginationMeta {
    /// Whether another page follows. When false `after_cursor` must not be used.
    #[serde(default)]
    pub has_more: bool,
    /// Cursor to pass as `page[after]` for the next page.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub after_cursor: String,
    /// Cursor to pass as `page[before]` for the previous page.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub before_cursor: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Offset pagination request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageOptions {
    /// Number of items per page.
    #[serde(skip_serializing_if = "is_zero")]
    pub per_page: u32,
    /// Page number (1-indexed).
    #[serde(skip_serializing_if = "is_zero")]
    pub page: u32,
}

/// Cursor pagination request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CursorPagination {
    /// Number of items per page.
    #[serde(rename = "page[size]", skip_serializing_if = "is_zero")]
    pub page_size: u32,
    /// Fetch the page after this cursor.
    #[serde(rename = "page[after]", skip_serializing_if = "String::is_empty")]
    pub page_after: String,
    /// Fetch the page before this cursor.
    #[serde(rename = "page[before]", skip_serializing_if = "String::is_empty")]
    pub page_before: String,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// Filter and sort options shared by both pagination styles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommonOptions {
    /// Only active records.
    #[serde(skip_serializing_if = "is_false")]
    pub active: bool,

    /// Single role filter (users).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub role: String,

    /// Multiple role filter, sent as repeated `role[]` keys.
    #[serde(rename = "role[]", skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    /// Custom role id filter (users).
    #[serde(skip_serializing_if = "is_zero")]
    pub permission_set: i64,

    /// OBP sort field, e.g. "created_at", "updated_at", "status".
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sort_by: String,

    /// OBP sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,

    /// CBP sort expression, e.g. "updated_at" or "-updated_at".
    #[serde(skip_serializing_if = "String::is_empty")]
    pub sort: String,

    /// Parent resource id for scoped collections (not sent as a query key).
    #[serde(skip)]
    pub id: i64,

    /// Extra endpoint-specific filters, sent verbatim.
    #[serde(flatten)]
    pub filter_fields: BTreeMap<String, String>,
}

/// Options handed to an offset pagination fetch function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObpOptions {
    #[serde(flatten)]
    pub page: PageOptions,
    #[serde(flatten)]
    pub common: CommonOptions,
}

/// Options handed to a cursor pagination fetch function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CbpOptions {
    #[serde(flatten)]
    pub cursor: CursorPagination,
    #[serde(flatten)]
    pub common: CommonOptions,
}

/// Iterator configuration supplied once by the caller.
///
/// # Example
///
/// ```
/// use zendesk::{PaginationOptions, SortOrder};
///
/// let opts = PaginationOptions::new()
///     .page_size(50)
///     .offset()
///     .sort_by("updated_at")
///     .sort_order(SortOrder::Desc);
/// assert!(!opts.use_cursor);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationOptions {
    /// Items per page. Must be greater than zero.
    pub page_size: u32,
    /// Use cursor pagination (default) instead of offset pagination.
    pub use_cursor: bool,
    /// Filters and sorting shared by every page request.
    pub common: CommonOptions,
}

impl Default for PaginationOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            use_cursor: true,
            common: CommonOptions::default(),
        }
    }
}

impl PaginationOptions {
    /// Defaults: 100 items per page, cursor pagination.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Switch to offset pagination.
    #[must_use]
    pub fn offset(mut self) -> Self {
        self.use_cursor = false;
        self
    }

    /// Switch to cursor pagination.
    #[must_use]
    pub fn cursor(mut self) -> Self {
        self.use_cursor = true;
        self
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.common.sort_by = field.into();
        self
    }

    #[must_use]
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.common.sort_order = Some(order);
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.common.sort = sort.into();
        self
    }

    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.common.filter_fields.insert(key.into(), value.into());
        self
    }

    /// Scope the collection to a parent resource (organization, group, ...).
    #[must_use]
    pub fn parent_id(mut self, id: i64) -> Self {
        self.common.id = id;
        self
    }

    /// Check the options before the first fetch.
    ///
    /// # Errors
    ///
    /// Returns [`ZendeskError::Options`] for a zero page size or a filter
    /// named like a pagination parameter, which would override the page
    /// position chosen by the iterator.
    pub fn validate(&self) -> crate::Result<()> {
        if self.page_size == 0 {
            return Err(ZendeskError::Options(
                "page size must be greater than zero".to_string(),
            ));
        }
        if let Some(key) = self
            .common
            .filter_fields
            .keys()
            .find(|key| PAGINATION_KEYS.contains(&key.as_str()))
        {
            return Err(ZendeskError::Options(format!(
                "filter {key:?} collides with a pagination parameter"
            )));
        }
        Ok(())
    }

    /// Options for fetching offset page `page`.
    pub fn obp(&self, page: u32) -> ObpOptions {
        ObpOptions {
            page: PageOptions {
                per_page: self.page_size,
                page,
            },
            common: self.common.clone(),
        }
    }

    /// Options for fetching the cursor page after `after`.
    pub fn cbp(&self, after: &str) -> CbpOptions {
        CbpOptions {
            cursor: CursorPagination {
                page_size: self.page_size,
                page_after: after.to_string(),
                page_before: String::new(),
            },
            common: self.common.clone(),
        }
    }
}
