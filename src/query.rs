//! Query string encoding shared by every endpoint binding.
//!
//! Options types describe their wire names and omit-if-empty behavior with
//! serde attributes (`rename`, `skip_serializing_if`). [`add_options`]
//! flattens such a value into `key=value` pairs and appends them to a path.

use serde::Serialize;
use serde_json::Value;
use url::form_urlencoded;
use url::Url;

use crate::error::{Result, ZendeskError};

/// Base used only to validate relative paths.
const VALIDATION_BASE: &str = "https://zendesk.invalid/api/v2/";

/// Append the query encoding of `opts` to `path`.
///
/// Array-valued fields produce one pair per element under the same key.
/// Keys are sorted by name; repeated keys keep element order. Any query
/// already present on `path` is kept verbatim in front.
///
/// # Errors
///
/// Returns [`ZendeskError::Url`] if `path` cannot be parsed and
/// [`ZendeskError::Options`] if `opts` does not serialize to a flat object.
pub fn add_options<O: Serialize + ?Sized>(path: &str, opts: &O) -> Result<String> {
    Url::parse(VALIDATION_BASE)?.join(path)?;

    let pairs = query_pairs(opts)?;
    if pairs.is_empty() {
        return Ok(path.to_string());
    }

    let encoded = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();

    match path.split_once('?') {
        Some((base, "")) => Ok(format!("{base}?{encoded}")),
        Some((base, existing)) => Ok(format!("{base}?{existing}&{encoded}")),
        None => Ok(format!("{path}?{encoded}")),
    }
}

/// Flatten `opts` into ordered query pairs.
pub fn query_pairs<O: Serialize + ?Sized>(opts: &O) -> Result<Vec<(String, String)>> {
    let value = serde_json::to_value(opts)?;
    let map = match value {
        Value::Object(map) => map,
        Value::Null => return Ok(Vec::new()),
        other => {
            return Err(ZendeskError::Options(format!(
                "query options must be a struct or map, got {other}"
            )))
        }
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    if let Some(scalar) = scalar_to_string(&key, item)? {
                        pairs.push((key.clone(), scalar));
                    }
                }
            }
            other => {
                if let Some(scalar) = scalar_to_string(&key, other)? {
                    pairs.push((key, scalar));
                }
            }
        }
    }

    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(pairs)
}

fn scalar_to_string(key: &str, value: Value) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(ZendeskError::Options(format!(
            "query field {key} must be a scalar or a list of scalars"
        ))),
    }
}

pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}

pub(crate) fn is_zero<T: Default + PartialEq>(value: &T) -> bool {
    *value == T::default()
}
