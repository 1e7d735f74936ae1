//! Trait definitions for Zendesk operations.
//!
//! Each entity type implements the traits its endpoints support, so the
//! differences between resources live in the implementations.

mod create;
mod delete;
mod get;
mod list;
mod update;

pub use create::Create;
pub use delete::Delete;
pub use get::Get;
pub use list::List;
pub use update::Update;
