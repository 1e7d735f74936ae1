//! Zendesk API model types.

mod attachment;
mod collaborator;
mod group;
mod macros;
mod organization;
mod search_result;
mod ticket;
mod topic;
mod trigger;
mod user;
mod webhook;

pub use attachment::*;
pub use collaborator::*;
pub use group::*;
pub use macros::*;
pub use organization::*;
pub use search_result::*;
pub use ticket::*;
pub use topic::*;
pub use trigger::*;
pub use user::*;
pub use webhook::*;

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
