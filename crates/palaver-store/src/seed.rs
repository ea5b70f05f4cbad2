//! Initial conversation data.
//!
//! Conversations are loaded once at start-up from JSON. Timestamps may be
//! absolute (`timestamp`) or relative to load time (`minutesAgo`), so demo
//! data always looks recent. Message kinds are derived from `senderId`;
//! histories are kept in the order given.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::debug;

use palaver_shared::{Attachment, Conversation, ConversationId, Message, MessageId, User, UserId};

use crate::error::{Result, StoreError};
use crate::store::ConversationStore;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Seed {
    users: Vec<SeedUser>,
    conversations: Vec<SeedConversation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedUser {
    id: UserId,
    name: String,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    is_online: bool,
    #[serde(default)]
    last_seen: Option<DateTime<Utc>>,
    #[serde(default)]
    last_seen_minutes_ago: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedConversation {
    id: ConversationId,
    user_id: UserId,
    #[serde(default)]
    unread_count: u32,
    #[serde(default)]
    messages: Vec<SeedMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedMessage {
    id: MessageId,
    #[serde(default)]
    text: String,
    sender_id: UserId,
    #[serde(default)]
    timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    minutes_ago: Option<i64>,
    #[serde(default)]
    attachments: Vec<Attachment>,
}

fn resolve_time(
    absolute: Option<DateTime<Utc>>,
    minutes_ago: Option<i64>,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    absolute.or_else(|| minutes_ago.map(|m| now - Duration::minutes(m)))
}

/// Parse seed JSON into conversations, in file order.
pub fn load_json(json: &str, local_user: &UserId, now: DateTime<Utc>) -> Result<Vec<Conversation>> {
    let seed: Seed = serde_json::from_str(json)?;

    let users: HashMap<UserId, User> = seed
        .users
        .into_iter()
        .map(|u| {
            let last_seen = resolve_time(u.last_seen, u.last_seen_minutes_ago, now);
            let user = User {
                id: u.id.clone(),
                name: u.name,
                avatar: u.avatar,
                is_online: u.is_online,
                last_seen,
            };
            (u.id, user)
        })
        .collect();

    let mut conversations = Vec::with_capacity(seed.conversations.len());
    for conv in seed.conversations {
        let user = users
            .get(&conv.user_id)
            .cloned()
            .ok_or_else(|| StoreError::UnknownUser(conv.user_id.to_string()))?;

        let messages = conv
            .messages
            .into_iter()
            .map(|m| {
                let timestamp = resolve_time(m.timestamp, m.minutes_ago, now).unwrap_or(now);
                Message::new(m.id, m.text, timestamp, m.sender_id, local_user, m.attachments)
            })
            .collect::<Vec<_>>();

        debug!(conversation = %conv.id, messages = messages.len(), "Seeded conversation");
        conversations.push(Conversation::new(conv.id, user, messages, conv.unread_count));
    }

    Ok(conversations)
}

impl ConversationStore {
    /// Build a store straight from seed JSON, timed against the current clock.
    pub fn from_seed_json(local_user: UserId, json: &str) -> Result<Self> {
        let conversations = load_json(json, &local_user, Utc::now())?;
        Self::new(local_user, conversations)
    }
}
