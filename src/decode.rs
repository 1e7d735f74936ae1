//! Decoding of JSON values whose shape varies.
//!
//! Some Zendesk fields are polymorphic: a trigger action value is either a
//! string or a list of strings, a collaborator is an id, an email or an
//! object, and a search result is one of several resources tagged by
//! `result_type`. Such fields are modelled as closed enums implementing
//! [`Polymorphic`]. Decoding picks exactly one variant or fails; there is
//! no catch-all variant.
//!
//! Two dispatch styles are supported:
//!
//! - by JSON token kind ([`JsonKind`]), for values told apart by whether
//!   they are strings, arrays, numbers, ...
//! - by discriminator field ([`VariantTable`]), for objects carrying a tag.

use std::fmt;

use serde::de::{Deserialize, Deserializer, Error as _};
use serde_json::Value;
use thiserror::Error;

use crate::error::Result;

/// Errors produced while decoding a polymorphic value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The JSON token kind is not one the target accepts.
    #[error("unsupported value shape: expected {expected}, found {found} in {raw}")]
    UnsupportedShape {
        expected: &'static str,
        found: JsonKind,
        raw: String,
    },

    /// The discriminator named a variant outside the known set.
    #[error("value of result was an unsupported type {value}")]
    UnsupportedType { value: String },

    /// The discriminator field is absent or not a string.
    #[error("could not read {field} as string. json was: {raw}")]
    MissingDiscriminator { field: &'static str, raw: String },

    /// The selected variant did not accept the payload.
    #[error("failed to decode {variant}: {message}")]
    InvalidPayload { variant: String, message: String },
}

/// Kind of a JSON value, as seen from its first significant token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

impl JsonKind {
    /// Kind of a parsed value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Kind of raw JSON, judged by its first non-whitespace byte.
    ///
    /// Returns `None` for empty input or a byte no JSON value starts with.
    pub fn sniff(raw: &[u8]) -> Option<Self> {
        let first = *raw.iter().find(|b| !b.is_ascii_whitespace())?;
        match first {
            b'"' => Some(Self::String),
            b'[' => Some(Self::Array),
            b'{' => Some(Self::Object),
            b'n' => Some(Self::Null),
            b't' | b'f' => Some(Self::Bool),
            b'-' | b'0'..=b'9' => Some(Self::Number),
            _ => None,
        }
    }
}

/// A closed sum type decoded from a loosely-typed JSON value.
pub trait Polymorphic: Sized {
    /// Pick and decode the variant matching `value`.
    fn from_value(value: Value) -> std::result::Result<Self, DecodeError>;

    /// Decode raw JSON bytes.
    fn from_slice(raw: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(raw)?;
        Ok(Self::from_value(value)?)
    }
}

/// Decoder for one variant of a field-discriminated type.
pub type VariantDecoder<T> = fn(Value) -> serde_json::Result<T>;

/// Discriminator field name plus the decoder for each known tag value.
pub struct VariantTable<T: 'static> {
    discriminator: &'static str,
    variants: &'static [(&'static str, VariantDecoder<T>)],
}

impl<T> VariantTable<T> {
    pub const fn new(
        discriminator: &'static str,
        variants: &'static [(&'static str, VariantDecoder<T>)],
    ) -> Self {
        Self {
            discriminator,
            variants,
        }
    }

    /// Name of the discriminator field.
    pub fn discriminator(&self) -> &'static str {
        self.discriminator
    }

    /// Known tag values, in declaration order.
    pub fn tags(&self) -> impl Iterator<Item = &'static str> {
        self.variants.iter().map(|(tag, _)| *tag)
    }

    /// Read the discriminator, then decode the same value as that variant.
    pub fn decode_value(&self, value: Value) -> std::result::Result<T, DecodeError> {
        let tag = match value.get(self.discriminator).and_then(Value::as_str) {
            Some(tag) => tag.to_string(),
            None => {
                return Err(DecodeError::MissingDiscriminator {
                    field: self.discriminator,
                    raw: value.to_string(),
                })
            }
        };

        let decoder = self
            .variants
            .iter()
            .find(|(known, _)| *known == tag)
            .map(|(_, decoder)| *decoder)
            .ok_or_else(|| DecodeError::UnsupportedType { value: tag.clone() })?;

        decoder(value).map_err(|e| DecodeError::InvalidPayload {
            variant: tag,
            message: e.to_string(),
        })
    }
}

/// Decode raw JSON into one variant of `table`.
///
/// # Errors
///
/// Malformed JSON yields [`ZendeskError::Parse`](crate::ZendeskError::Parse);
/// an unknown or missing discriminator yields
/// [`ZendeskError::Decode`](crate::ZendeskError::Decode).
pub fn decode_polymorphic<T>(raw: &[u8], table: &VariantTable<T>) -> Result<T> {
    let value: Value = serde_json::from_slice(raw)?;
    Ok(table.decode_value(value)?)
}

/// Require every element of `items` to be a string.
pub(crate) fn string_list(
    items: Vec<Value>,
    expected: &'static str,
) -> std::result::Result<Vec<String>, DecodeError> {
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(DecodeError::UnsupportedShape {
                expected,
                found: JsonKind::of(&other),
                raw: other.to_string(),
            }),
        })
        .collect()
}

/// Serde bridge: deserialize any JSON, then hand it to [`Polymorphic`].
pub(crate) fn deserialize_polymorphic<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Polymorphic,
{
    let value = Value::deserialize(deserializer)?;
    T::from_value(value).map_err(D::Error::custom)
}
