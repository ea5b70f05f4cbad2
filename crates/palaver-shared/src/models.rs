//! Domain model shared by the store, the media pipeline and the client.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to a UI layer or loaded from seed data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AttachmentId, ConversationId, MessageId, UserId};

// ---------------------------------------------------------------------------
// User
// ---------------------------------------------------------------------------

/// A remote participant (or the local user).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Opaque reference to an avatar image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_online: bool,
    /// Only meaningful while `is_online` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<DateTime<Utc>>,
}

/// Presence as derived from [`User::is_online`] and [`User::last_seen`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Online,
    LastSeen(DateTime<Utc>),
    /// Offline and never seen.
    Offline,
}

impl User {
    pub fn new(id: impl Into<UserId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar: None,
            is_online: false,
            last_seen: None,
        }
    }

    pub fn presence(&self) -> Presence {
        match (self.is_online, self.last_seen) {
            (true, _) => Presence::Online,
            (false, Some(ts)) => Presence::LastSeen(ts),
            (false, None) => Presence::Offline,
        }
    }

    /// Up to two uppercase initials, used when no avatar is set.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Attachment
// ---------------------------------------------------------------------------

/// A file reference attached to a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    /// Unique within the owning message.
    pub id: AttachmentId,
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    /// MIME type, e.g. `image/png`.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Opaque reference to the content.
    pub url: String,
    /// Preview reference, only ever set for images.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    /// What to display for an image: the thumbnail if one exists, else the
    /// full content.
    pub fn display_src(&self) -> &str {
        self.thumbnail.as_deref().unwrap_or(&self.url)
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// Direction of a message relative to the local user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Sent,
    Received,
}

impl MessageKind {
    /// The only place the sent/received tag is derived.
    pub fn for_sender(sender: &UserId, local_user: &UserId) -> Self {
        if sender == local_user {
            Self::Sent
        } else {
            Self::Received
        }
    }
}

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    /// May be empty when the message carries attachments.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub sender_id: UserId,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Absent and empty are the same thing.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn new(
        id: MessageId,
        text: impl Into<String>,
        timestamp: DateTime<Utc>,
        sender_id: UserId,
        local_user: &UserId,
        attachments: Vec<Attachment>,
    ) -> Self {
        let kind = MessageKind::for_sender(&sender_id, local_user);
        Self {
            id,
            text: text.into(),
            timestamp,
            sender_id,
            kind,
            attachments,
        }
    }

    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// A one-to-one thread with a remote user.
///
/// The most recent message is always derived from `messages`; there is no
/// separately stored copy that could drift.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    id: ConversationId,
    user: User,
    /// Insertion order is chronological order.
    messages: Vec<Message>,
    unread_count: u32,
}

impl Conversation {
    pub fn new(id: ConversationId, user: User, messages: Vec<Message>, unread_count: u32) -> Self {
        Self {
            id,
            user,
            messages,
            unread_count,
        }
    }

    pub fn id(&self) -> &ConversationId {
        &self.id
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn unread_count(&self) -> u32 {
        self.unread_count
    }

    // Mutators for the conversation store only. It keeps timestamps
    // monotonic on append; everyone else receives `&Conversation`.
    #[doc(hidden)]
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    #[doc(hidden)]
    pub fn mark_read(&mut self) {
        self.unread_count = 0;
    }
}
