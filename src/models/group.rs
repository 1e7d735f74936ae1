//! Group model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{unwrap_envelope, ZendeskClient};
use crate::context::Context;
use crate::error::Result;
use crate::models::null_default;
use crate::pagination::CommonOptions;
use crate::traits::{Get, List};

/// A group of agents tickets can be assigned to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub id: i64,
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    #[serde(deserialize_with = "null_default")]
    pub description: String,
    /// Whether new agents join this group by default.
    pub default: bool,
    pub deleted: bool,
    pub is_public: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl Get for Group {
    type Id = i64;

    #[tracing::instrument(skip(client, ctx))]
    async fn get(client: &ZendeskClient, ctx: &Context, id: i64) -> Result<Self> {
        let body = client.get(ctx, &format!("groups/{id}.json")).await?;
        unwrap_envelope(&body, "group")
    }
}

#[async_trait]
impl List for Group {
    const KEY: &'static str = "groups";

    fn collection_path(_opts: &CommonOptions) -> String {
        "groups.json".to_string()
    }
}
