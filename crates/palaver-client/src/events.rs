use serde::Serialize;
use tokio::sync::broadcast;

use palaver_media::Rejection;

pub const EVENT_CONVERSATION_SELECTED: &str = "conversation-selected";
pub const EVENT_MESSAGE_SENT: &str = "message-sent";
pub const EVENT_FILE_REJECTED: &str = "file-rejected";
pub const EVENT_THUMBNAIL_READY: &str = "thumbnail-ready";
pub const EVENT_THUMBNAIL_FAILED: &str = "thumbnail-failed";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSelectedPayload {
    pub conversation_id: String,
    /// False when the id matched no conversation.
    pub found: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageSentPayload {
    pub conversation_id: String,
    pub message_id: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRejectedPayload {
    pub file_name: String,
    pub message: String,
    pub rejection: Rejection,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailPayload {
    pub attachment_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThumbnailFailedPayload {
    pub attachment_id: String,
    pub error: String,
}

/// Notifications for the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "payload", rename_all = "kebab-case")]
pub enum ClientEvent {
    ConversationSelected(ConversationSelectedPayload),
    MessageSent(MessageSentPayload),
    FileRejected(FileRejectedPayload),
    ThumbnailReady(ThumbnailPayload),
    ThumbnailFailed(ThumbnailFailedPayload),
}

impl ClientEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConversationSelected(_) => EVENT_CONVERSATION_SELECTED,
            Self::MessageSent(_) => EVENT_MESSAGE_SENT,
            Self::FileRejected(_) => EVENT_FILE_REJECTED,
            Self::ThumbnailReady(_) => EVENT_THUMBNAIL_READY,
            Self::ThumbnailFailed(_) => EVENT_THUMBNAIL_FAILED,
        }
    }

    pub(crate) fn file_rejected(rejection: Rejection) -> Self {
        Self::FileRejected(FileRejectedPayload {
            file_name: rejection.file_name().to_string(),
            message: rejection.message(),
            rejection,
        })
    }
}

pub fn emit_event(tx: &broadcast::Sender<ClientEvent>, event: ClientEvent) {
    let name = event.name();
    if tx.send(event).is_err() {
        tracing::debug!(event = name, "No subscribers for event");
    }
}
