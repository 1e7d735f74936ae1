//! Macro model: canned ticket updates applied by agents.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{unwrap_envelope, ZendeskClient};
use crate::context::Context;
use crate::error::Result;
use crate::models::null_default;
use crate::models::trigger::Action;
use crate::pagination::CommonOptions;
use crate::traits::{Get, List};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Macro {
    pub id: i64,
    #[serde(deserialize_with = "null_default")]
    pub url: String,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    pub active: bool,
    pub position: i64,
    pub description: Option<String>,
    /// Who may use the macro; null when everyone can.
    pub restriction: Option<Value>,
    #[serde(deserialize_with = "null_default")]
    pub actions: Vec<Action>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl Get for Macro {
    type Id = i64;

    #[tracing::instrument(skip(client, ctx))]
    async fn get(client: &ZendeskClient, ctx: &Context, id: i64) -> Result<Self> {
        let body = client.get(ctx, &format!("macros/{id}.json")).await?;
        unwrap_envelope(&body, "macro")
    }
}

#[async_trait]
impl List for Macro {
    const KEY: &'static str = "macros";

    fn collection_path(_opts: &CommonOptions) -> String {
        "macros.json".to_string()
    }
}
