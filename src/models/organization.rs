//! Organization model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{unwrap_envelope, ZendeskClient};
use crate::context::Context;
use crate::error::Result;
use crate::models::null_default;
use crate::pagination::CommonOptions;
use crate::traits::{Get, List};

/// A group of end users, usually a customer company.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    pub id: i64,
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    pub shared_tickets: bool,
    pub shared_comments: bool,
    #[serde(deserialize_with = "null_default")]
    pub external_id: String,
    #[serde(deserialize_with = "null_default")]
    pub domain_names: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub details: String,
    #[serde(deserialize_with = "null_default")]
    pub notes: String,
    pub group_id: Option<i64>,
    #[serde(deserialize_with = "null_default")]
    pub tags: Vec<String>,
    #[serde(deserialize_with = "null_default")]
    pub organization_fields: Map<String, Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl Get for Organization {
    type Id = i64;

    #[tracing::instrument(skip(client, ctx))]
    async fn get(client: &ZendeskClient, ctx: &Context, id: i64) -> Result<Self> {
        let body = client.get(ctx, &format!("organizations/{id}.json")).await?;
        unwrap_envelope(&body, "organization")
    }
}

#[async_trait]
impl List for Organization {
    const KEY: &'static str = "organizations";

    fn collection_path(_opts: &CommonOptions) -> String {
        "organizations.json".to_string()
    }
}
