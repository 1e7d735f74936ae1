//! Ticket collaborators.
//!
//! When creating a ticket, collaborators may be given as user ids, bare
//! email addresses, or `{"name", "email"}` objects, freely mixed in one
//! array.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::decode::{deserialize_polymorphic, DecodeError, JsonKind, Polymorphic};

/// One collaborator reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Collaborator {
    /// Existing user id.
    Id(i64),
    /// Email address, matched to or creating a user.
    Email(String),
    /// Name and email for a user that may not exist yet.
    Named { name: String, email: String },
}

impl Polymorphic for Collaborator {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Number(n) => {
                if let Some(id) = n.as_i64() {
                    return Ok(Self::Id(id));
                }
                // Integral floats (562.0) still name a user id.
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                        Ok(Self::Id(f as i64))
                    }
                    _ => Err(DecodeError::UnsupportedShape {
                        expected: "integer user id",
                        found: JsonKind::Number,
                        raw: n.to_string(),
                    }),
                }
            }
            Value::String(email) => Ok(Self::Email(email)),
            Value::Object(map) => {
                let field = |key: &str| match map.get(key) {
                    Some(Value::String(s)) => Ok(s.clone()),
                    _ => Err(DecodeError::InvalidPayload {
                        variant: "collaborator".to_string(),
                        message: format!("{key} must be a string in {}", Value::Object(map.clone())),
                    }),
                };
                Ok(Self::Named {
                    name: field("name")?,
                    email: field("email")?,
                })
            }
            other => Err(DecodeError::UnsupportedShape {
                expected: "user id, email or {name, email} object",
                found: JsonKind::of(&other),
                raw: other.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Collaborator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserialize_polymorphic(deserializer)
    }
}

impl From<i64> for Collaborator {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for Collaborator {
    fn from(email: &str) -> Self {
        Self::Email(email.to_string())
    }
}

/// Ordered list of collaborators, encoded as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collaborators(Vec<Collaborator>);

impl Collaborators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, collaborator: impl Into<Collaborator>) {
        self.0.push(collaborator.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Collaborator> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Polymorphic for Collaborators {
    fn from_value(value: Value) -> Result<Self, DecodeError> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(Collaborator::from_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Self),
            other => Err(DecodeError::UnsupportedShape {
                expected: "array of collaborators",
                found: JsonKind::of(&other),
                raw: other.to_string(),
            }),
        }
    }
}

impl From<Vec<Collaborator>> for Collaborators {
    fn from(list: Vec<Collaborator>) -> Self {
        Self(list)
    }
}

impl<'a> IntoIterator for &'a Collaborators {
    type Item = &'a Collaborator;
    type IntoIter = std::slice::Iter<'a, Collaborator>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MIXED: &str = r#"[562,"someone@example.com",{"name":"SomeoneElse","email":"else@example.com"}]"#;

    #[test]
    fn test_mixed_array() {
        let collaborators: Collaborators = serde_json::from_str(MIXED).unwrap();
        assert_eq!(
            collaborators.iter().cloned().collect::<Vec<_>>(),
            vec![
                Collaborator::Id(562),
                Collaborator::Email("someone@example.com".to_string()),
                Collaborator::Named {
                    name: "SomeoneElse".to_string(),
                    email: "else@example.com".to_string(),
                },
            ]
        );
        assert_eq!(serde_json::to_string(&collaborators).unwrap(), MIXED);
    }

    #[test]
    fn test_integral_float_is_id() {
        let collaborator = Collaborator::from_slice(b"562.0").unwrap();
        assert_eq!(collaborator, Collaborator::Id(562));
    }

    #[test]
    fn test_fractional_number_is_rejected() {
        assert!(Collaborator::from_slice(b"562.5").is_err());
    }

    #[test]
    fn test_out_of_range_id_is_rejected() {
        assert_eq!(
            Collaborator::from_slice(b"9223372036854775807").unwrap(),
            Collaborator::Id(i64::MAX)
        );
        for raw in ["9223372036854775808", "9223372036854775808.0", "1e19"] {
            let value: Value = serde_json::from_str(raw).unwrap();
            let err = Collaborator::from_value(value).unwrap_err();
            assert!(
                matches!(err, DecodeError::UnsupportedShape { found: JsonKind::Number, .. }),
                "{raw} decoded as {err:?}"
            );
        }
    }

    #[test]
    fn test_object_requires_string_fields() {
        let err = Collaborator::from_value(serde_json::json!({"name": "x"})).unwrap_err();
        assert!(err.to_string().contains("email"));

        let err = Collaborator::from_value(serde_json::json!({"name": 1, "email": "a@b.c"})).unwrap_err();
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_bool_is_rejected() {
        let err = serde_json::from_str::<Collaborators>("[true]").unwrap_err();
        assert!(err.to_string().contains("bool"));
    }

    #[test]
    fn test_push() {
        let mut collaborators = Collaborators::new();
        collaborators.push(42_i64);
        collaborators.push("a@example.com");
        assert_eq!(serde_json::to_string(&collaborators).unwrap(), r#"[42,"a@example.com"]"#);
    }
}
