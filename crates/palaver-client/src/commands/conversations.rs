//! Conversation list, selection and the open chat view.

use serde::Serialize;

use palaver_shared::constants::SENT_PREVIEW_PREFIX;
use palaver_shared::time::{format_relative, presence_label};
use palaver_shared::{Conversation, ConversationId, Message, MessageKind};

use crate::client::Client;
use crate::commands::messaging::MessageDto;
use crate::commands::ViewClock;
use crate::error::Result;
use crate::events::{emit_event, ClientEvent, ConversationSelectedPayload};

/// One row of the conversation list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryDto {
    pub id: String,
    pub name: String,
    pub initials: String,
    pub avatar: Option<String>,
    pub is_online: bool,
    pub status: String,
    pub preview: String,
    /// Age of the last message, e.g. `"5m ago"`.
    pub last_activity: Option<String>,
    pub unread_count: u32,
    pub is_selected: bool,
}

impl ConversationSummaryDto {
    fn from_conversation(c: &Conversation, selected: Option<&ConversationId>, clock: &ViewClock) -> Self {
        let user = c.user();
        let last = c.last_message();
        Self {
            id: c.id().to_string(),
            name: user.name.clone(),
            initials: user.initials(),
            avatar: user.avatar.clone(),
            is_online: user.is_online,
            status: presence_label(user, clock.now),
            preview: last.map(preview).unwrap_or_default(),
            last_activity: last.map(|m| format_relative(m.timestamp, clock.now)),
            unread_count: c.unread_count(),
            is_selected: selected == Some(c.id()),
        }
    }
}

fn preview(m: &Message) -> String {
    let body = if m.text.is_empty() && m.has_attachments() {
        match m.attachments.as_slice() {
            [only] => only.name.clone(),
            many => format!("{} files", many.len()),
        }
    } else {
        m.text.clone()
    };

    match m.kind {
        MessageKind::Sent => format!("{SENT_PREVIEW_PREFIX}{body}"),
        MessageKind::Received => body,
    }
}

/// Header and history of the open conversation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatViewDto {
    pub conversation_id: String,
    pub name: String,
    pub initials: String,
    pub avatar: Option<String>,
    pub status: String,
    pub messages: Vec<MessageDto>,
}

impl ChatViewDto {
    fn from_conversation(c: &Conversation, clock: &ViewClock) -> Self {
        let user = c.user();
        Self {
            conversation_id: c.id().to_string(),
            name: user.name.clone(),
            initials: user.initials(),
            avatar: user.avatar.clone(),
            status: presence_label(user, clock.now),
            messages: c
                .messages()
                .iter()
                .map(|m| MessageDto::from_message(m, clock))
                .collect(),
        }
    }
}

impl Client {
    pub fn list_conversations(&self) -> Result<Vec<ConversationSummaryDto>> {
        self.list_conversations_at(&ViewClock::current())
    }

    pub fn list_conversations_at(&self, clock: &ViewClock) -> Result<Vec<ConversationSummaryDto>> {
        self.search_conversations_at("", clock)
    }

    /// Conversations whose participant name contains `query`.
    pub fn search_conversations(&self, query: &str) -> Result<Vec<ConversationSummaryDto>> {
        self.search_conversations_at(query, &ViewClock::current())
    }

    pub fn search_conversations_at(
        &self,
        query: &str,
        clock: &ViewClock,
    ) -> Result<Vec<ConversationSummaryDto>> {
        let state = self.lock()?;
        let selected = state.store.selected_id();
        Ok(state
            .store
            .search(query)
            .into_iter()
            .map(|c| ConversationSummaryDto::from_conversation(c, selected, clock))
            .collect())
    }

    /// Open a conversation and mark it read.
    pub fn select_conversation(&self, id: &str) -> Result<()> {
        let found = {
            let mut state = self.lock()?;
            state.store.select_conversation(ConversationId::from(id));
            state.store.selected_conversation().is_some()
        };

        emit_event(
            &self.events,
            ClientEvent::ConversationSelected(ConversationSelectedPayload {
                conversation_id: id.to_string(),
                found,
            }),
        );
        Ok(())
    }

    /// The open conversation, or `None` when nothing (or an unknown id) is
    /// selected.
    pub fn open_chat(&self) -> Result<Option<ChatViewDto>> {
        self.open_chat_at(&ViewClock::current())
    }

    pub fn open_chat_at(&self, clock: &ViewClock) -> Result<Option<ChatViewDto>> {
        let state = self.lock()?;
        Ok(state
            .store
            .selected_conversation()
            .map(|c| ChatViewDto::from_conversation(c, clock)))
    }

    pub fn total_unread(&self) -> Result<u32> {
        Ok(self.lock()?.store.total_unread())
    }
}
