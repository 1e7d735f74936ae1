//! Unified search across tickets, users, organizations, groups and topics.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::client::ZendeskClient;
use crate::context::Context;
use crate::decode::{deserialize_polymorphic, DecodeError, Polymorphic, VariantDecoder, VariantTable};
use crate::error::{Result, ZendeskError};
use crate::models::{Group, Organization, Ticket, Topic, User};
use crate::pagination::{OffsetPage, PageOptions, SortOrder};
use crate::query::add_options;

/// One hit of a search, tagged by its `result_type`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SearchResult {
    Group(Group),
    Ticket(Ticket),
    User(User),
    Organization(Organization),
    Topic(Topic),
}

impl SearchResult {
    /// The `result_type` tag of this hit.
    pub fn result_type(&self) -> &'static str {
        match self {
            Self::Group(_) => "group",
            Self::Ticket(_) => "ticket",
            Self::User(_) => "user",
            Self::Organization(_) => "organization",
            Self::Topic(_) => "topic",
        }
    }
}

fn group(value: Value) -> serde_json::Result<SearchResult> {
    serde_json::from_value(value).map(SearchResult::Group)
}

fn ticket(value: Value) -> serde_json::Result<SearchResult> {
    serde_json::from_value(value).map(SearchResult::Ticket)
}

fn user(value: Value) -> serde_json::Result<SearchResult> {
    serde_json::from_value(value).map(SearchResult::User)
}

fn organization(value: Value) -> serde_json::Result<SearchResult> {
    serde_json::from_value(value).map(SearchResult::Organization)
}

fn topic(value: Value) -> serde_json::Result<SearchResult> {
    serde_json::from_value(value).map(SearchResult::Topic)
}

/// Known `result_type` values.
pub const SEARCH_RESULT_TYPES: VariantTable<SearchResult> = VariantTable::new(
    "result_type",
    &[
        ("group", group as VariantDecoder<SearchResult>),
        ("ticket", ticket as VariantDecoder<SearchResult>),
        ("user", user as VariantDecoder<SearchResult>),
        ("organization", organization as VariantDecoder<SearchResult>),
        ("topic", topic as VariantDecoder<SearchResult>),
    ],
);

impl Polymorphic for SearchResult {
    fn from_value(value: Value) -> std::result::Result<Self, DecodeError> {
        SEARCH_RESULT_TYPES.decode_value(value)
    }
}

impl<'de> Deserialize<'de> for SearchResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserialize_polymorphic(deserializer)
    }
}

/// Hits of one search page, in server order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchResults(pub Vec<SearchResult>);

impl SearchResults {
    pub fn iter(&self) -> std::slice::Iter<'_, SearchResult> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Only the ticket hits.
    pub fn tickets(&self) -> impl Iterator<Item = &Ticket> {
        self.0.iter().filter_map(|r| match r {
            SearchResult::Ticket(t) => Some(t),
            _ => None,
        })
    }
}

impl IntoIterator for SearchResults {
    type Item = SearchResult;
    type IntoIter = std::vec::IntoIter<SearchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Search request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchOptions {
    #[serde(flatten)]
    pub page: PageOptions,

    /// Search expression, e.g. `type:ticket status:open`. Required.
    pub query: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub sort_by: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// Run a search and return one page of hits.
///
/// # Errors
///
/// An empty query is rejected with [`ZendeskError::Options`] before any
/// request is made. A hit with an unknown `result_type` fails the whole
/// page with [`ZendeskError::Decode`].
#[tracing::instrument(skip(client, ctx))]
pub async fn search(
    client: &ZendeskClient,
    ctx: &Context,
    opts: &SearchOptions,
) -> Result<(SearchResults, OffsetPage)> {
    if opts.query.trim().is_empty() {
        return Err(ZendeskError::Options("search query must not be empty".to_string()));
    }

    let path = add_options("search.json", opts)?;
    let body = client.get(ctx, &path).await?;
    decode_search_page(&body)
}

fn decode_search_page(body: &[u8]) -> Result<(SearchResults, OffsetPage)> {
    let mut value: Value = serde_json::from_slice(body)?;

    let raw_results = match value.get_mut("results").map(Value::take) {
        Some(Value::Array(items)) => items,
        _ => Vec::new(),
    };
    let results = raw_results
        .into_iter()
        .map(SearchResult::from_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let page: OffsetPage = serde_json::from_value(value)?;
    Ok((SearchResults(results), page))
}
