//! Trigger model, business-rule actions and their polymorphic values.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::client::{envelope, unwrap_envelope, ZendeskClient};
use crate::context::Context;
use crate::decode::{deserialize_polymorphic, string_list, DecodeError, JsonKind, Polymorphic};
use crate::error::Result;
use crate::models::null_default;
use crate::pagination::CommonOptions;
use crate::traits::{Create, Get, List};

/// Value of a trigger or macro action.
///
/// Most actions carry one string (`"status": "solved"`); some, like
/// notifications, carry a list (`["requester_id", "Subject", "Body"]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ActionValue {
    String(String),
    List(Vec<String>),
}

const ACTION_VALUE_SHAPE: &str = "string or list of strings";

impl Polymorphic for ActionValue {
    fn from_value(value: Value) -> std::result::Result<Self, DecodeError> {
        match value {
            Value::String(s) => Ok(Self::String(s)),
            Value::Array(items) => string_list(items, ACTION_VALUE_SHAPE).map(Self::List),
            other => Err(DecodeError::UnsupportedShape {
                expected: ACTION_VALUE_SHAPE,
                found: JsonKind::of(&other),
                raw: other.to_string(),
            }),
        }
    }

    /// Dispatch on the leading token without building a full value first.
    fn from_slice(raw: &[u8]) -> Result<Self> {
        match JsonKind::sniff(raw) {
            Some(JsonKind::String) => Ok(Self::String(serde_json::from_slice(raw)?)),
            Some(JsonKind::Array) => Ok(Self::List(serde_json::from_slice(raw)?)),
            Some(found) => Err(DecodeError::UnsupportedShape {
                expected: ACTION_VALUE_SHAPE,
                found,
                raw: String::from_utf8_lossy(raw).into_owned(),
            }
            .into()),
            None => Ok(Self::from_value(serde_json::from_slice(raw)?)?),
        }
    }
}

impl<'de> Deserialize<'de> for ActionValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserialize_polymorphic(deserializer)
    }
}

impl ActionValue {
    /// The single value, if this is not a list.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::List(_) => None,
        }
    }
}

/// One `field = value` change applied by a trigger or macro.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub field: String,
    pub value: ActionValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriggerCondition {
    pub field: String,
    pub operator: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConditions {
    #[serde(deserialize_with = "null_default")]
    pub all: Vec<TriggerCondition>,
    #[serde(deserialize_with = "null_default")]
    pub any: Vec<TriggerCondition>,
}

/// A business rule run on every ticket create or update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Trigger {
    #[serde(skip_serializing_if = "crate::query::is_zero")]
    pub id: i64,
    pub title: String,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<i64>,
    pub conditions: TriggerConditions,
    #[serde(deserialize_with = "null_default")]
    pub actions: Vec<Action>,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[async_trait]
impl Get for Trigger {
    type Id = i64;

    #[tracing::instrument(skip(client, ctx))]
    async fn get(client: &ZendeskClient, ctx: &Context, id: i64) -> Result<Self> {
        let body = client.get(ctx, &format!("triggers/{id}.json")).await?;
        unwrap_envelope(&body, "trigger")
    }
}

#[async_trait]
impl List for Trigger {
    const KEY: &'static str = "triggers";

    fn collection_path(_opts: &CommonOptions) -> String {
        "triggers.json".to_string()
    }
}

#[async_trait]
impl Create for Trigger {
    type Params = Trigger;

    #[tracing::instrument(skip(client, ctx, params))]
    async fn create(client: &ZendeskClient, ctx: &Context, params: &Trigger) -> Result<Self> {
        let body = client.post(ctx, "triggers.json", &envelope("trigger", params)?).await?;
        unwrap_envelope(&body, "trigger")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ZendeskError;
    use test_case::test_case;

    #[test]
    fn test_string_value() {
        assert_eq!(
            ActionValue::from_slice(br#""status""#).unwrap(),
            ActionValue::String("status".to_string())
        );
    }

    #[test]
    fn test_list_value() {
        assert_eq!(
            ActionValue::from_slice(br#"["a","b"]"#).unwrap(),
            ActionValue::List(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test_case(b"42", JsonKind::Number ; "number")]
    #[test_case(b"{}", JsonKind::Object ; "object")]
    #[test_case(b"null", JsonKind::Null ; "null")]
    fn test_other_tokens_rejected(raw: &[u8], kind: JsonKind) {
        let err = ActionValue::from_slice(raw).unwrap_err();
        assert!(matches!(
            err,
            ZendeskError::Decode(DecodeError::UnsupportedShape { found, .. }) if found == kind
        ));
    }

    #[test]
    fn test_list_with_non_string_rejected() {
        assert!(ActionValue::from_slice(br#"["a", 1]"#).is_err());
    }

    #[test]
    fn test_trigger_actions() {
        let trigger: Trigger = serde_json::from_str(
            r#"{
                "id": 144,
                "title": "Notify requester",
                "active": true,
                "conditions": {"all": [{"field": "status", "operator": "is", "value": "open"}], "any": null},
                "actions": [
                    {"field": "status", "value": "solved"},
                    {"field": "notification_user", "value": ["requester_id", "Hi", "Body"]}
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(trigger.actions[0].value.as_str(), Some("solved"));
        assert!(matches!(trigger.actions[1].value, ActionValue::List(ref l) if l.len() == 3));
        assert!(trigger.conditions.any.is_empty());

        let round_trip = serde_json::to_value(&trigger.actions).unwrap();
        assert_eq!(round_trip[1]["value"][0], "requester_id");
    }

    #[test]
    fn test_trigger_with_numeric_action_fails() {
        let raw = r#"{"title": "x", "actions": [{"field": "priority", "value": 42}]}"#;
        assert!(serde_json::from_str::<Trigger>(raw).is_err());
    }
}
