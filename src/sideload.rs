//! Sideloading of associated records.
//!
//! Zendesk can embed related records in a response when asked with
//! `?include=users,groups`. They sit next to (or inside) the primary
//! resource under a conventional key, so the primary type never declares
//! them. A [`Sideload`] names where such a record lives and where it should
//! be decoded to.
//!
//! ```
//! use zendesk::{resolve_sideloads, Sideload, TicketDates, User};
//!
//! let body = br#"{
//!     "ticket": {"id": 1, "dates": {"solved_at": null}},
//!     "users": [{"id": 7, "name": "Ann"}]
//! }"#;
//!
//! let mut users: Vec<User> = Vec::new();
//! let mut dates = TicketDates::default();
//! let mut sideloads = [
//!     Sideload::include("users", &mut users),
//!     Sideload::at("dates", "ticket.dates", &mut dates),
//! ];
//! resolve_sideloads(body, &mut sideloads).unwrap();
//! assert_eq!(users[0].name, "Ann");
//! ```
//!
//! Destinations are always mutable borrows, so decoding into a copy that
//! the caller never sees cannot be expressed:
//!
//! ```compile_fail
//! use zendesk::{Sideload, TicketDates};
//!
//! let dates = TicketDates::default();
//! let _ = Sideload::at("dates", "ticket.dates", dates);
//! ```

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, ZendeskError};

/// Something a sideloaded value can be decoded into.
pub trait SideloadTarget {
    /// Replace `self` with the decoded `value`.
    fn decode_into(&mut self, value: Value) -> serde_json::Result<()>;
}

impl<T: DeserializeOwned> SideloadTarget for T {
    fn decode_into(&mut self, value: Value) -> serde_json::Result<()> {
        *self = serde_json::from_value(value)?;
        Ok(())
    }
}

/// A named side channel of a response and the caller's destination for it.
pub struct Sideload<'a> {
    key: String,
    path: String,
    dest: &'a mut dyn SideloadTarget,
}

impl fmt::Debug for Sideload<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sideload")
            .field("key", &self.key)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<'a> Sideload<'a> {
    /// Sideload found at the top-level key named like the include key.
    pub fn include<T: DeserializeOwned>(key: impl Into<String>, dest: &'a mut T) -> Self {
        let key = key.into();
        Self {
            path: key.clone(),
            key,
            dest,
        }
    }

    /// Sideload found at `path`, e.g. `ticket.dates` or `users[0]`.
    pub fn at<T: DeserializeOwned>(
        key: impl Into<String>,
        path: impl Into<String>,
        dest: &'a mut T,
    ) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            dest,
        }
    }

    /// The `include` key sent to the API.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Location of the value in the response body.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// The `include` query parameter for a set of sideloads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IncludeOptions {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub include: String,
}

impl IncludeOptions {
    /// Comma-joined keys of `sideloads`, duplicates dropped.
    pub fn from_sideloads(sideloads: &[Sideload<'_>]) -> Self {
        let mut keys: Vec<&str> = Vec::with_capacity(sideloads.len());
        for sideload in sideloads {
            if !keys.contains(&sideload.key()) {
                keys.push(sideload.key());
            }
        }
        Self {
            include: keys.join(","),
        }
    }
}

/// Decode each sideload's value from `body` into its destination.
///
/// Sideloads are processed in order and processing stops at the first
/// failure; destinations after it are left untouched.
///
/// # Errors
///
/// [`ZendeskError::SideloadNotFound`] when a path does not resolve (the
/// message names the path and includes the body), or
/// [`ZendeskError::Parse`] when the body is not JSON or a value does not
/// fit its destination.
pub fn resolve_sideloads(body: &[u8], sideloads: &mut [Sideload<'_>]) -> Result<()> {
    if sideloads.is_empty() {
        return Ok(());
    }

    let root: Value = serde_json::from_slice(body)?;

    for sideload in sideloads.iter_mut() {
        let value = lookup(&root, &sideload.path).ok_or_else(|| ZendeskError::SideloadNotFound {
            path: sideload.path.clone(),
            body: String::from_utf8_lossy(body).into_owned(),
        })?;

        sideload.dest.decode_into(value.clone())?;
        tracing::trace!(key = %sideload.key, path = %sideload.path, "resolved sideload");
    }

    Ok(())
}

/// Locate `path` in `root`.
///
/// Segments are separated by `.`; a segment may carry `[n]` indices, and a
/// purely numeric segment indexes into an array. A leading `$.` is ignored.
pub fn lookup<'v>(root: &'v Value, path: &str) -> Option<&'v Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() {
        return None;
    }

    let mut current = root;
    for segment in path.split('.') {
        let (name, indices) = match segment.find('[') {
            Some(pos) => (&segment[..pos], &segment[pos..]),
            None => (segment, ""),
        };

        if !name.is_empty() {
            current = match current {
                Value::Object(map) => map.get(name)?,
                Value::Array(items) => items.get(name.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }

        let mut rest = indices;
        while let Some(stripped) = rest.strip_prefix('[') {
            let end = stripped.find(']')?;
            let index: usize = stripped[..end].parse().ok()?;
            current = current.as_array()?.get(index)?;
            rest = &stripped[end + 1..];
        }
        if !rest.is_empty() {
            return None;
        }
    }

    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Dates {
        solved_at: Option<String>,
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    struct Person {
        id: i64,
        name: String,
    }

    const BODY: &[u8] = br#"{
        "ticket": {"id": 35436, "dates": {"solved_at": "2019-06-06T10:02:04Z"}},
        "users": [{"id": 1, "name": "Ann"}, {"id": 2, "name": "Bob"}]
    }"#;

    #[test]
    fn test_nested_path() {
        let mut dates = Dates::default();
        let mut sideloads = [Sideload::at("dates", "ticket.dates", &mut dates)];
        resolve_sideloads(BODY, &mut sideloads).unwrap();
        assert_eq!(dates.solved_at.as_deref(), Some("2019-06-06T10:02:04Z"));
    }

    #[test]
    fn test_top_level_collection() {
        let mut users: Vec<Person> = Vec::new();
        let mut sideloads = [Sideload::include("users", &mut users)];
        resolve_sideloads(BODY, &mut sideloads).unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].name, "Bob");
    }

    #[test]
    fn test_indexed_paths() {
        let mut first = Person::default();
        let mut second = Person::default();
        let mut sideloads = [
            Sideload::at("users", "users[0]", &mut first),
            Sideload::at("users", "$.users.1", &mut second),
        ];
        resolve_sideloads(BODY, &mut sideloads).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[test]
    fn test_missing_path_names_path_and_body() {
        let body = br#"{"ticket": {"id": 1}}"#;
        let mut dates = Dates::default();
        let mut sideloads = [Sideload::at("dates", "ticket.dates", &mut dates)];
        let err = resolve_sideloads(body, &mut sideloads).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("ticket.dates"));
        assert!(message.contains(r#"{"ticket": {"id": 1}}"#));
        assert!(matches!(err, ZendeskError::SideloadNotFound { .. }));
    }

    #[test]
    fn test_fail_fast_leaves_later_destinations_untouched() {
        let mut dates = Dates::default();
        let mut users: Vec<Person> = Vec::new();
        let mut sideloads = [
            Sideload::at("missing", "nope", &mut dates),
            Sideload::include("users", &mut users),
        ];
        assert!(resolve_sideloads(BODY, &mut sideloads).is_err());
        assert!(users.is_empty());
    }

    #[test]
    fn test_type_mismatch_is_parse_error() {
        let mut person = Person::default();
        let mut sideloads = [Sideload::at("users", "users", &mut person)];
        let err = resolve_sideloads(BODY, &mut sideloads).unwrap_err();
        assert!(matches!(err, ZendeskError::Parse(_)));
    }

    #[test]
    fn test_no_sideloads_skips_parsing() {
        assert!(resolve_sideloads(b"not json", &mut []).is_ok());
    }

    #[test]
    fn test_include_options() {
        let mut users: Vec<Person> = Vec::new();
        let mut first = Person::default();
        let mut groups: Vec<Value> = Vec::new();
        let sideloads = [
            Sideload::include("users", &mut users),
            Sideload::at("users", "users[0]", &mut first),
            Sideload::include("groups", &mut groups),
        ];
        let opts = IncludeOptions::from_sideloads(&sideloads);
        assert_eq!(opts.include, "users,groups");
    }

    #[test]
    fn test_lookup_rejects_bad_segments() {
        let root = json!({"a": [1, 2], "b": {"c": null}});
        assert_eq!(lookup(&root, "b.c"), Some(&Value::Null));
        assert_eq!(lookup(&root, "a[5]"), None);
        assert_eq!(lookup(&root, "a[x]"), None);
        assert_eq!(lookup(&root, "b[0]"), None);
        assert_eq!(lookup(&root, ""), None);
    }
}
