use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use linkick_core::RoomId;

use crate::api::ApiSettings;

/// Known slug -> chat room pairs consulted before any network call.
const OVERRIDES: [(&str, &str); 7] = [
    ("buraksakinol", "25461130"),
    ("cavs", "25594923"),
    ("purplebixi", "25593921"),
    ("jahrein", "25314085"),
    ("vroft", "26489449"),
    ("oonuuur", "24845898"),
    ("burhi", "7736118"),
];

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The directory answered but has no chat room for this slug.
    #[error("channel not found: {slug}")]
    NotFound { slug: String },
    /// The lookup itself failed (network, TLS, upstream blocking).
    #[error("channel lookup failed for {slug}: {message}")]
    Blocked { slug: String, message: String },
}

/// Remote slug -> room lookup capability.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    async fn room_for(&self, slug: &str) -> Result<RoomId, ResolveError>;
}

/// Directory backed by the upstream channels API.
#[derive(Debug, Clone)]
pub struct KickDirectory {
    settings: ApiSettings,
}

impl KickDirectory {
    pub fn new(settings: ApiSettings) -> Self {
        Self { settings }
    }
}

#[derive(Debug, Deserialize)]
struct ChannelPayload {
    chatroom: Option<ChatroomPayload>,
}

#[derive(Debug, Deserialize)]
struct ChatroomPayload {
    id: Option<u64>,
}

#[async_trait]
impl ChannelDirectory for KickDirectory {
    async fn room_for(&self, slug: &str) -> Result<RoomId, ResolveError> {
        let client = self.settings.build_client().map_err(|err| ResolveError::Blocked {
            slug: slug.to_string(),
            message: err.to_string(),
        })?;
        let url = format!("{}/api/v1/channels/{}", self.settings.base_url, slug);

        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|err| ResolveError::Blocked {
                slug: slug.to_string(),
                message: err.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ResolveError::NotFound {
                slug: slug.to_string(),
            });
        }

        // A payload without the chatroom id counts as "not found" just like
        // a miss: there is nothing to subscribe to.
        let payload: ChannelPayload = match response.json().await {
            Ok(payload) => payload,
            Err(_) => {
                return Err(ResolveError::NotFound {
                    slug: slug.to_string(),
                })
            }
        };

        payload
            .chatroom
            .and_then(|chatroom| chatroom.id)
            .map(|id| id.to_string())
            .ok_or_else(|| ResolveError::NotFound {
                slug: slug.to_string(),
            })
    }
}

/// Slug resolution: a static override table first, the directory second.
///
/// One attempt, no retries; a failed lookup fails the whole connect.
#[derive(Clone)]
pub struct ChannelResolver {
    overrides: HashMap<String, RoomId>,
    directory: Arc<dyn ChannelDirectory>,
}

impl ChannelResolver {
    pub fn new(directory: Arc<dyn ChannelDirectory>) -> Self {
        Self::with_overrides(directory, [])
    }

    /// Built-in overrides plus caller-supplied extras (extras win).
    pub fn with_overrides(
        directory: Arc<dyn ChannelDirectory>,
        extra: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let mut overrides: HashMap<String, RoomId> = OVERRIDES
            .iter()
            .map(|(slug, room)| (slug.to_string(), room.to_string()))
            .collect();
        overrides.extend(extra);
        Self {
            overrides,
            directory,
        }
    }

    pub async fn resolve(&self, slug: &str) -> Result<RoomId, ResolveError> {
        let slug = slug.trim().to_lowercase();
        if let Some(room) = self.overrides.get(&slug) {
            return Ok(room.clone());
        }
        self.directory.room_for(&slug).await
    }
}
