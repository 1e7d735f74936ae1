//! Ticket model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::client::{envelope, unwrap_envelope, ZendeskClient};
use crate::context::Context;
use crate::decode::{deserialize_polymorphic, string_list, DecodeError, JsonKind, Polymorphic};
use crate::error::Result;
use crate::models::collaborator::Collaborators;
use crate::models::null_default;
use crate::pagination::{CommonOptions, ObpOptions, OffsetPage};
use crate::query::{add_options, is_false, is_zero};
use crate::sideload::{resolve_sideloads, IncludeOptions, Sideload};
use crate::traits::{Create, Delete, Get, List, Update};

/// A Zendesk support ticket.
///
/// The same type is used to read tickets and to describe new or changed
/// ones: unset fields are left out of request bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ticket {
    #[serde(skip_serializing_if = "is_zero")]
    pub id: i64,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub external_id: String,

    /// "problem", "incident", "question" or "task".
    #[serde(rename = "type", deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub ticket_type: String,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub subject: String,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub raw_subject: String,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// "urgent", "high", "normal" or "low".
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub priority: String,

    /// "new", "open", "pending", "hold", "solved" or "closed".
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub status: String,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub recipient: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitter_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub collaborator_ids: Vec<i64>,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub follower_ids: Vec<i64>,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub email_cc_ids: Vec<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<i64>,

    #[serde(skip_serializing_if = "is_false")]
    pub has_incidents: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_at: Option<DateTime<Utc>>,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,

    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub custom_fields: Vec<CustomField>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<Via>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub satisfaction_rating: Option<SatisfactionRating>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_form_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<i64>,

    #[serde(skip_serializing_if = "is_false")]
    pub is_public: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Users to copy on a new ticket (write only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Collaborators>,

    /// First comment of a new ticket (write only, required on create).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<TicketComment>,

    /// Requester to create along with the ticket (write only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester: Option<Requester>,

    /// Reject the update if the ticket changed after this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_stamp: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "is_false")]
    pub safe_update: bool,
}

/// A custom field value set on a ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: i64,
    #[serde(default)]
    pub value: CustomFieldValue,
}

/// Value of a ticket custom field.
///
/// Text-like fields hold strings, checkboxes hold booleans, multi-select
/// fields hold a list of option tags, and unset fields are null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CustomFieldValue {
    #[default]
    Null,
    Bool(bool),
    String(String),
    List(Vec<String>),
}

impl Polymorphic for CustomFieldValue {
    fn from_value(value: Value) -> std::result::Result<Self, DecodeError> {
        const EXPECTED: &str = "string, bool, null or list of strings";
        match value {
            Value::Null => Ok(Self::Null),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::String(s) => Ok(Self::String(s)),
            Value::Array(items) => string_list(items, EXPECTED).map(Self::List),
            other => Err(DecodeError::UnsupportedShape {
                expected: EXPECTED,
                found: JsonKind::of(&other),
                raw: other.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for CustomFieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserialize_polymorphic(deserializer)
    }
}

/// How a ticket or comment was created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Via {
    #[serde(deserialize_with = "null_default")]
    pub channel: String,
    pub source: ViaSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViaSource {
    #[serde(deserialize_with = "null_default")]
    pub from: Map<String, Value>,
    #[serde(deserialize_with = "null_default")]
    pub to: Map<String, Value>,
    pub rel: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SatisfactionRating {
    pub id: Option<i64>,
    #[serde(deserialize_with = "null_default")]
    pub score: String,
    #[serde(deserialize_with = "null_default")]
    pub comment: String,
}

/// Comment attached to a ticket on create or update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketComment {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub html_body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    /// Upload tokens whose files are attached to this comment.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uploads: Vec<String>,
}

/// New requester created together with a ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Requester {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub locale_id: String,
}

/// Timestamps sideloaded with `include=dates` at `ticket.dates`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TicketDates {
    pub assignee_updated_at: Option<DateTime<Utc>>,
    pub requester_updated_at: Option<DateTime<Utc>>,
    pub status_updated_at: Option<DateTime<Utc>>,
    pub initially_assigned_at: Option<DateTime<Utc>>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub solved_at: Option<DateTime<Utc>>,
    pub latest_comment_added_at: Option<DateTime<Utc>>,
}

impl TicketDates {
    /// Sideload request for these dates on a single ticket.
    pub fn sideload(dest: &mut Self) -> Sideload<'_> {
        Sideload::at("dates", "ticket.dates", dest)
    }
}

#[derive(Serialize)]
struct ShowManyOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    ids: String,
}

impl Ticket {
    /// Fetch a ticket and decode the requested sideloads from the same
    /// response.
    ///
    /// ```no_run
    /// use zendesk::{Context, Ticket, TicketDates, ZendeskClient};
    ///
    /// # async fn example() -> zendesk::Result<()> {
    /// let client = ZendeskClient::from_env()?;
    /// let mut dates = TicketDates::default();
    /// let ticket = Ticket::get_with_sideloads(
    ///     &client,
    ///     &Context::background(),
    ///     35436,
    ///     &mut [TicketDates::sideload(&mut dates)],
    /// )
    /// .await?;
    /// println!("{} solved at {:?}", ticket.id, dates.solved_at);
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip(client, ctx, sideloads))]
    pub async fn get_with_sideloads(
        client: &ZendeskClient,
        ctx: &Context,
        id: i64,
        sideloads: &mut [Sideload<'_>],
    ) -> Result<Self> {
        let path = add_options(
            &format!("tickets/{id}.json"),
            &IncludeOptions::from_sideloads(sideloads),
        )?;

        let body = client.get(ctx, &path).await?;
        resolve_sideloads(&body, sideloads)?;
        unwrap_envelope(&body, "ticket")
    }

    /// Fetch several tickets by id in one request.
    #[tracing::instrument(skip(client, ctx))]
    pub async fn show_many(client: &ZendeskClient, ctx: &Context, ids: &[i64]) -> Result<Vec<Self>> {
        let opts = ShowManyOptions {
            ids: ids
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        };
        let path = add_options("tickets/show_many.json", &opts)?;

        let body = client.get(ctx, &path).await?;
        unwrap_envelope(&body, "tickets")
    }

    /// One offset page of an organization's tickets.
    pub async fn list_for_organization(
        client: &ZendeskClient,
        ctx: &Context,
        organization_id: i64,
        opts: &ObpOptions,
    ) -> Result<(Vec<Self>, OffsetPage)> {
        let mut opts = opts.clone();
        opts.common.id = organization_id;
        Self::list_obp(client, ctx, &opts).await
    }
}

#[async_trait]
impl Get for Ticket {
    type Id = i64;

    #[tracing::instrument(skip(client, ctx))]
    async fn get(client: &ZendeskClient, ctx: &Context, id: i64) -> Result<Self> {
        let body = client.get(ctx, &format!("tickets/{id}.json")).await?;
        unwrap_envelope(&body, "ticket")
    }
}

#[async_trait]
impl List for Ticket {
    const KEY: &'static str = "tickets";

    fn collection_path(opts: &CommonOptions) -> String {
        if opts.id != 0 {
            format!("organizations/{}/tickets.json", opts.id)
        } else {
            "tickets.json".to_string()
        }
    }
}

#[async_trait]
impl Create for Ticket {
    type Params = Ticket;

    #[tracing::instrument(skip(client, ctx, params))]
    async fn create(client: &ZendeskClient, ctx: &Context, params: &Ticket) -> Result<Self> {
        let body = client.post(ctx, "tickets.json", &envelope("ticket", params)?).await?;
        unwrap_envelope(&body, "ticket")
    }
}

#[async_trait]
impl Update for Ticket {
    type Id = i64;
    type Params = Ticket;

    #[tracing::instrument(skip(client, ctx, params))]
    async fn update(client: &ZendeskClient, ctx: &Context, id: i64, params: &Ticket) -> Result<Self> {
        let body = client
            .put(ctx, &format!("tickets/{id}.json"), &envelope("ticket", params)?)
            .await?;
        unwrap_envelope(&body, "ticket")
    }
}

#[async_trait]
impl Delete for Ticket {
    type Id = i64;

    #[tracing::instrument(skip(client, ctx))]
    async fn delete(client: &ZendeskClient, ctx: &Context, id: i64) -> Result<()> {
        client.delete(ctx, &format!("tickets/{id}.json")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn test_ticket_with_nulls() {
        let ticket: Ticket = serde_json::from_value(serde_json::json!({
            "id": 2,
            "subject": "Printer on fire",
            "type": null,
            "priority": null,
            "assignee_id": null,
            "tags": ["hardware"],
            "custom_fields": [
                {"id": 1, "value": null},
                {"id": 2, "value": "text"},
                {"id": 3, "value": true},
                {"id": 4, "value": ["a", "b"]}
            ],
            "via": {"channel": "web", "source": {"from": {}, "to": {}, "rel": null}},
            "created_at": "2019-06-06T10:02:04Z"
        }))
        .unwrap();

        assert_eq!(ticket.id, 2);
        assert_eq!(ticket.ticket_type, "");
        assert_eq!(ticket.assignee_id, None);
        assert_eq!(
            ticket.custom_fields.iter().map(|f| f.value.clone()).collect::<Vec<_>>(),
            vec![
                CustomFieldValue::Null,
                CustomFieldValue::String("text".to_string()),
                CustomFieldValue::Bool(true),
                CustomFieldValue::List(vec!["a".to_string(), "b".to_string()]),
            ]
        );
        assert_eq!(ticket.via.unwrap().channel, "web");
    }

    #[test_case(r#"{"id": 1, "value": 3}"# ; "number")]
    #[test_case(r#"{"id": 1, "value": {"a": 1}}"# ; "object")]
    #[test_case(r#"{"id": 1, "value": ["a", 2]}"# ; "mixed list")]
    fn test_custom_field_rejects(raw: &str) {
        assert!(serde_json::from_str::<CustomField>(raw).is_err());
    }

    #[test]
    fn test_create_body_omits_unset_fields() {
        let ticket = Ticket {
            subject: "Help".to_string(),
            comment: Some(TicketComment {
                body: "It broke".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let body = envelope("ticket", &ticket).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"ticket": {"subject": "Help", "comment": {"body": "It broke"}}})
        );
    }

    #[test]
    fn test_collection_path() {
        assert_eq!(Ticket::collection_path(&CommonOptions::default()), "tickets.json");
        let scoped = CommonOptions {
            id: 9,
            ..Default::default()
        };
        assert_eq!(Ticket::collection_path(&scoped), "organizations/9/tickets.json");
    }
}
