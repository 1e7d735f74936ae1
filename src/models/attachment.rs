//! Attachment and upload models.
//!
//! Files reach a ticket in two steps: the raw bytes are posted to
//! `uploads.json`, which answers with a token, and the token is then listed
//! in a comment's `uploads`. Several files can share one token by passing
//! it back on later uploads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::{unwrap_envelope, ZendeskClient};
use crate::context::Context;
use crate::error::Result;
use crate::models::null_default;
use crate::query::{add_options, is_false};
use crate::traits::{Delete, Get};

/// Content type sent with upload bodies when the caller names none.
pub const DEFAULT_UPLOAD_CONTENT_TYPE: &str = "application/binary";

/// A file attached to a ticket comment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Attachment {
    pub id: i64,
    pub file_name: String,
    pub content_url: String,
    pub content_type: String,
    pub size: i64,
    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub thumbnails: Vec<Thumbnail>,
    #[serde(skip_serializing_if = "is_false")]
    pub inline: bool,
}

/// Preview image generated for an image attachment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thumbnail {
    pub id: i64,
    pub file_name: String,
    pub content_url: String,
    pub content_type: String,
    pub size: i64,
}

/// Result of posting a file to `uploads.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Upload {
    /// Token to reference in [`TicketComment::uploads`](crate::TicketComment::uploads).
    pub token: String,
    /// The file just uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    /// Every file uploaded under this token so far.
    #[serde(deserialize_with = "null_default", skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

/// Query options of an upload request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadOptions {
    /// Name the file is stored under.
    pub filename: String,
    /// Existing token to add the file to.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub token: String,
    /// Content type of the body; [`DEFAULT_UPLOAD_CONTENT_TYPE`] when empty.
    #[serde(skip)]
    pub content_type: String,
}

impl UploadOptions {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            ..Default::default()
        }
    }

    /// Add the file to an earlier upload's token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

impl Upload {
    /// Upload `data` as one file.
    ///
    /// The request, body upload included, is bound to `ctx`: a cancelled or
    /// expired context fails the call instead of finishing the transfer.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use zendesk::{Context, Upload, UploadOptions, ZendeskClient};
    ///
    /// # async fn run() -> zendesk::Result<()> {
    /// let client = ZendeskClient::from_env()?;
    /// let upload = Upload::create(
    ///     &client,
    ///     &Context::background(),
    ///     &UploadOptions::new("printer.log").content_type("text/plain"),
    ///     b"paper jam".to_vec(),
    /// )
    /// .await?;
    /// println!("attach with token {}", upload.token);
    /// # Ok(())
    /// # }
    /// ```
    #[tracing::instrument(skip(client, ctx, data), fields(len = data.len()))]
    pub async fn create(
        client: &ZendeskClient,
        ctx: &Context,
        opts: &UploadOptions,
        data: Vec<u8>,
    ) -> Result<Self> {
        let path = add_options("uploads.json", opts)?;
        let content_type = if opts.content_type.is_empty() {
            DEFAULT_UPLOAD_CONTENT_TYPE
        } else {
            opts.content_type.as_str()
        };
        let body = client.post_bytes(ctx, &path, content_type, data).await?;
        unwrap_envelope(&body, "upload")
    }
}

#[async_trait]
impl Delete for Upload {
    type Id = String;

    /// Discard an upload token and the files posted under it.
    #[tracing::instrument(skip(client, ctx))]
    async fn delete(client: &ZendeskClient, ctx: &Context, token: String) -> Result<()> {
        let path = format!("uploads/{}.json", urlencoding::encode(&token));
        client.delete(ctx, &path).await
    }
}

#[async_trait]
impl Get for Attachment {
    type Id = i64;

    #[tracing::instrument(skip(client, ctx))]
    async fn get(client: &ZendeskClient, ctx: &Context, id: i64) -> Result<Self> {
        let body = client.get(ctx, &format!("attachments/{id}.json")).await?;
        unwrap_envelope(&body, "attachment")
    }
}
