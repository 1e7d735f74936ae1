//! Webhook model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{envelope, unwrap_envelope, ZendeskClient};
use crate::context::Context;
use crate::error::Result;
use crate::models::null_default;
use crate::traits::{Create, Delete, Get};

/// An HTTP endpoint Zendesk calls on events or from triggers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Webhook {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub name: String,
    pub endpoint: String,
    /// "GET", "POST", "PUT", "PATCH" or "DELETE".
    pub http_method: String,
    /// "json", "xml" or "form_encoded".
    pub request_format: String,
    /// "active" or "inactive".
    pub status: String,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub subscriptions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<WebhookAuthentication>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_secret: Option<WebhookSigningSecret>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_source: Option<Value>,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub updated_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebhookAuthentication {
    /// "basic_auth", "bearer_token" or "api_key".
    #[serde(rename = "type")]
    pub auth_type: String,
    #[serde(default)]
    pub data: Value,
    /// Where the credential goes, e.g. "header".
    pub add_position: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookSigningSecret {
    pub algorithm: String,
    pub secret: String,
}

impl Webhook {
    /// Replace a webhook's settings. The API answers without a body.
    #[tracing::instrument(skip(client, ctx, webhook))]
    pub async fn replace(
        client: &ZendeskClient,
        ctx: &Context,
        id: &str,
        webhook: &Webhook,
    ) -> Result<()> {
        let path = format!("webhooks/{}", urlencoding::encode(id));
        client.put(ctx, &path, &envelope("webhook", webhook)?).await?;
        Ok(())
    }
}

#[async_trait]
impl Get for Webhook {
    type Id = String;

    #[tracing::instrument(skip(client, ctx))]
    async fn get(client: &ZendeskClient, ctx: &Context, id: String) -> Result<Self> {
        let path = format!("webhooks/{}", urlencoding::encode(&id));
        let body = client.get(ctx, &path).await?;
        unwrap_envelope(&body, "webhook")
    }
}

#[async_trait]
impl Create for Webhook {
    type Params = Webhook;

    #[tracing::instrument(skip(client, ctx, params))]
    async fn create(client: &ZendeskClient, ctx: &Context, params: &Webhook) -> Result<Self> {
        let body = client.post(ctx, "webhooks", &envelope("webhook", params)?).await?;
        unwrap_envelope(&body, "webhook")
    }
}

#[async_trait]
impl Delete for Webhook {
    type Id = String;

    #[tracing::instrument(skip(client, ctx))]
    async fn delete(client: &ZendeskClient, ctx: &Context, id: String) -> Result<()> {
        let path = format!("webhooks/{}", urlencoding::encode(&id));
        client.delete(ctx, &path).await
    }
}
