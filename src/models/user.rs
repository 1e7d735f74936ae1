//! User model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::{envelope, unwrap_envelope, ZendeskClient};
use crate::context::Context;
use crate::error::Result;
use crate::models::null_default;
use crate::pagination::{CommonOptions, PaginationOptions};
use crate::query::{is_false, is_zero};
use crate::traits::{Create, Get, List, Update};

/// A Zendesk user (end user, agent or admin).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: i64,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub email: String,

    #[serde(deserialize_with = "null_default")]
    pub name: String,

    #[serde(skip_serializing_if = "is_false")]
    pub active: bool,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub alias: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_role_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_group_id: Option<i64>,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub details: String,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub external_id: String,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub locale: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale_id: Option<i64>,

    #[serde(skip_serializing_if = "is_false")]
    pub moderator: bool,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub notes: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub phone: String,

    /// "end-user", "agent" or "admin".
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub role: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_type: Option<i64>,

    #[serde(skip_serializing_if = "is_false")]
    pub shared: bool,

    #[serde(skip_serializing_if = "is_false")]
    pub suspended: bool,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub time_zone: String,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub iana_time_zone: String,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "Map::is_empty")]
    pub user_fields: Map<String, Value>,

    #[serde(skip_serializing_if = "is_false")]
    pub verified: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Listing options filtered to one role.
    pub fn with_role(opts: PaginationOptions, role: impl Into<String>) -> PaginationOptions {
        let mut opts = opts;
        opts.common.role = role.into();
        opts
    }

    /// Listing options filtered to any of several roles (`role[]`).
    pub fn with_roles<I, S>(opts: PaginationOptions, roles: I) -> PaginationOptions
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut opts = opts;
        opts.common.roles = roles.into_iter().map(Into::into).collect();
        opts
    }

    /// Listing options filtered to agents holding a custom role.
    pub fn with_permission_set(opts: PaginationOptions, permission_set: i64) -> PaginationOptions {
        let mut opts = opts;
        opts.common.permission_set = permission_set;
        opts
    }
}

#[async_trait]
impl Get for User {
    type Id = i64;

    #[tracing::instrument(skip(client, ctx))]
    async fn get(client: &ZendeskClient, ctx: &Context, id: i64) -> Result<Self> {
        let body = client.get(ctx, &format!("users/{id}.json")).await?;
        unwrap_envelope(&body, "user")
    }
}

#[async_trait]
impl List for User {
    const KEY: &'static str = "users";

    fn collection_path(opts: &CommonOptions) -> String {
        if opts.id != 0 {
            format!("organizations/{}/users.json", opts.id)
        } else {
            "users.json".to_string()
        }
    }
}

#[async_trait]
impl Create for User {
    type Params = User;

    #[tracing::instrument(skip(client, ctx, params))]
    async fn create(client: &ZendeskClient, ctx: &Context, params: &User) -> Result<Self> {
        let body = client.post(ctx, "users.json", &envelope("user", params)?).await?;
        unwrap_envelope(&body, "user")
    }
}

#[async_trait]
impl Update for User {
    type Id = i64;
    type Params = User;

    #[tracing::instrument(skip(client, ctx, params))]
    async fn update(client: &ZendeskClient, ctx: &Context, id: i64, params: &User) -> Result<Self> {
        let body = client
            .put(ctx, &format!("users/{id}.json"), &envelope("user", params)?)
            .await?;
        unwrap_envelope(&body, "user")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::add_options;

    #[test]
    fn test_user_from_api() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 369531345753_i64,
            "name": "Sample User",
            "email": "sample@example.com",
            "role": "end-user",
            "organization_id": null,
            "phone": null,
            "user_fields": {"plan": "gold"},
            "created_at": "2021-01-02T03:04:05Z"
        }))
        .unwrap();

        assert_eq!(user.id, 369531345753);
        assert_eq!(user.role, "end-user");
        assert_eq!(user.phone, "");
        assert_eq!(user.user_fields["plan"], "gold");
    }

    #[test]
    fn test_role_filters_encode() {
        let opts = User::with_roles(PaginationOptions::new().offset(), ["admin", "agent"]).obp(1);
        let path = add_options(&User::collection_path(&opts.common), &opts).unwrap();
        assert_eq!(
            path,
            "users.json?page=1&per_page=100&role%5B%5D=admin&role%5B%5D=agent"
        );

        let opts = User::with_role(PaginationOptions::new(), "agent").cbp("");
        let path = add_options("users.json", &opts).unwrap();
        assert_eq!(path, "users.json?page%5Bsize%5D=100&role=agent");

        let opts = User::with_permission_set(PaginationOptions::new(), 42).cbp("");
        let path = add_options("users.json", &opts).unwrap();
        assert_eq!(path, "users.json?page%5Bsize%5D=100&permission_set=42");
    }

    #[test]
    fn test_org_scoped_path() {
        let opts = PaginationOptions::new().parent_id(7);
        assert_eq!(User::collection_path(&opts.common), "organizations/7/users.json");
    }
}
