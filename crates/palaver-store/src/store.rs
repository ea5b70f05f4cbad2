//! The conversation store.
//!
//! Presentation code only ever receives shared references, so every
//! mutation goes through [`ConversationStore::select_conversation`] or
//! [`ConversationStore::send_message`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use palaver_shared::{Attachment, Conversation, ConversationId, Message, MessageId, UserId};

use crate::error::{Result, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationStore {
    local_user: UserId,
    /// Display order. Activity never reorders it.
    conversations: Vec<Conversation>,
    selected_id: Option<ConversationId>,
}

impl ConversationStore {
    /// Build a store over seeded conversations. Nothing is selected.
    pub fn new(local_user: UserId, conversations: Vec<Conversation>) -> Result<Self> {
        let mut seen = HashSet::new();
        for conv in &conversations {
            if !seen.insert(conv.id()) {
                return Err(StoreError::DuplicateConversation(conv.id().clone()));
            }
        }

        info!(
            local_user = %local_user,
            conversations = conversations.len(),
            "Conversation store initialised"
        );

        Ok(Self {
            local_user,
            conversations,
            selected_id: None,
        })
    }

    pub fn local_user(&self) -> &UserId {
        &self.local_user
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id() == id)
    }

    /// The raw selection, which may not match any conversation.
    pub fn selected_id(&self) -> Option<&ConversationId> {
        self.selected_id.as_ref()
    }

    pub fn selected_conversation(&self) -> Option<&Conversation> {
        self.selected_id.as_ref().and_then(|id| self.conversation(id))
    }

    pub fn total_unread(&self) -> u32 {
        self.conversations.iter().map(Conversation::unread_count).sum()
    }

    /// Conversations whose participant name contains `query`, ignoring case,
    /// in display order. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Conversation> {
        let query = query.trim().to_lowercase();
        self.conversations
            .iter()
            .filter(|c| query.is_empty() || c.user().name.to_lowercase().contains(&query))
            .collect()
    }

    /// Select a conversation and mark it read.
    ///
    /// An id with no matching conversation is still recorded as the
    /// selection; [`Self::selected_conversation`] then resolves to `None`.
    pub fn select_conversation(&mut self, id: ConversationId) {
        match self.conversations.iter_mut().find(|c| c.id() == &id) {
            Some(conv) => {
                if conv.unread_count() > 0 {
                    debug!(conversation = %id, unread = conv.unread_count(), "Marking read");
                }
                conv.mark_read();
                info!(conversation = %id, "Conversation selected");
            }
            None => debug!(conversation = %id, "Selected id has no conversation"),
        }
        self.selected_id = Some(id);
    }

    /// Append a message from the local user to the selected conversation.
    ///
    /// The store does not validate content; callers must not send an empty
    /// text without attachments.
    pub fn send_message(
        &mut self,
        text: impl Into<String>,
        attachments: Vec<Attachment>,
    ) -> Result<Message> {
        self.send_message_at(text, attachments, Utc::now())
    }

    /// [`Self::send_message`] with an explicit clock reading.
    ///
    /// The timestamp is never earlier than the conversation's current last
    /// message, so append order stays chronological.
    pub fn send_message_at(
        &mut self,
        text: impl Into<String>,
        attachments: Vec<Attachment>,
        now: DateTime<Utc>,
    ) -> Result<Message> {
        let selected = self
            .selected_id
            .as_ref()
            .ok_or(StoreError::NoConversationSelected)?;
        let conv = self
            .conversations
            .iter_mut()
            .find(|c| c.id() == selected)
            .ok_or_else(|| StoreError::UnknownConversation(selected.clone()))?;

        let timestamp = conv
            .last_message()
            .map_or(now, |last| last.timestamp.max(now));

        let message = Message::new(
            MessageId::generate(),
            text,
            timestamp,
            self.local_user.clone(),
            &self.local_user,
            attachments,
        );
        conv.append(message.clone());

        info!(
            conversation = %conv.id(),
            msg_id = %message.id,
            attachments = message.attachments.len(),
            "Message sent"
        );
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use palaver_shared::{AttachmentId, MessageKind, User};

    use super::*;
    use crate::seed;

    const DEMO: &str = include_str!("../fixtures/demo.json");

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-14T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn local() -> UserId {
        UserId::from("current-user")
    }

    fn demo_store() -> ConversationStore {
        let conversations = seed::load_json(DEMO, &local(), now()).unwrap();
        ConversationStore::new(local(), conversations).unwrap()
    }

    fn unread(store: &ConversationStore) -> Vec<u32> {
        store.conversations().iter().map(|c| c.unread_count()).collect()
    }

    #[test]
    fn test_seeded_scenario() {
        let mut store = demo_store();
        assert!(store.selected_conversation().is_none());

        let first = store.conversation(&ConversationId::from("1")).unwrap();
        assert_eq!(first.unread_count(), 2);
        assert_eq!(first.messages().len(), 10);

        store.select_conversation(ConversationId::from("1"));
        let selected = store.selected_conversation().unwrap();
        assert_eq!(selected.id().as_str(), "1");
        assert_eq!(selected.unread_count(), 0);

        store.send_message("hello", vec![]).unwrap();
        let selected = store.selected_conversation().unwrap();
        assert_eq!(selected.messages().len(), 11);
        let last = selected.last_message().unwrap();
        assert_eq!(last.text, "hello");
        assert_eq!(last.kind, MessageKind::Sent);
        assert_eq!(last.sender_id, local());
    }

    #[test]
    fn test_select_only_clears_target() {
        let mut store = demo_store();
        let before = unread(&store);
        assert_eq!(before, vec![2, 0, 1, 0, 0]);

        store.select_conversation(ConversationId::from("3"));
        assert_eq!(unread(&store), vec![2, 0, 0, 0, 0]);
    }

    #[test]
    fn test_select_is_idempotent() {
        let mut once = demo_store();
        once.select_conversation(ConversationId::from("1"));

        let mut twice = demo_store();
        twice.select_conversation(ConversationId::from("1"));
        twice.select_conversation(ConversationId::from("1"));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_select_unknown_id_is_recorded() {
        let mut store = demo_store();
        let before = unread(&store);

        store.select_conversation(ConversationId::from("404"));
        assert_eq!(store.selected_id(), Some(&ConversationId::from("404")));
        assert!(store.selected_conversation().is_none());
        assert_eq!(unread(&store), before);
    }

    #[test]
    fn test_send_without_selection_is_rejected() {
        let mut store = demo_store();
        let before = store.clone();

        let err = store.send_message("lost", vec![]).unwrap_err();
        assert!(matches!(err, StoreError::NoConversationSelected));
        assert_eq!(store, before);
    }

    #[test]
    fn test_send_to_unknown_selection_is_rejected() {
        let mut store = demo_store();
        store.select_conversation(ConversationId::from("404"));
        let before = store.clone();

        let err = store.send_message("lost", vec![]).unwrap_err();
        assert!(matches!(err, StoreError::UnknownConversation(_)));
        assert_eq!(store, before);
    }

    #[test]
    fn test_send_touches_only_selected() {
        let mut store = demo_store();
        store.select_conversation(ConversationId::from("2"));
        let before = store.clone();

        let attachment = Attachment {
            id: AttachmentId::from("att-x"),
            name: "plan.pdf".into(),
            size: 10,
            mime_type: "application/pdf".into(),
            url: "blob:palaver/x".into(),
            thumbnail: None,
        };
        let sent = store.send_message("", vec![attachment]).unwrap();
        assert!(sent.has_attachments());

        for (old, new) in before.conversations().iter().zip(store.conversations()) {
            if old.id().as_str() == "2" {
                assert_eq!(new.messages().len(), old.messages().len() + 1);
                assert_eq!(new.unread_count(), old.unread_count());
            } else {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn test_last_message_is_last_element_after_every_operation() {
        let mut store = demo_store();
        let check = |store: &ConversationStore| {
            for conv in store.conversations() {
                assert_eq!(conv.last_message(), conv.messages().last());
            }
        };

        check(&store);
        store.select_conversation(ConversationId::from("4"));
        check(&store);
        store.send_message("one", vec![]).unwrap();
        store.send_message("two", vec![]).unwrap();
        check(&store);
        assert_eq!(store.selected_conversation().unwrap().last_message().unwrap().text, "two");
    }

    #[test]
    fn test_timestamps_never_go_backwards() {
        let mut store = demo_store();
        store.select_conversation(ConversationId::from("1"));

        let first = store.send_message_at("a", vec![], now()).unwrap();
        let second = store
            .send_message_at("b", vec![], now() - Duration::minutes(30))
            .unwrap();
        assert!(second.timestamp >= first.timestamp);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let user = User::new("1", "Sarah Johnson");
        let conv = Conversation::new(ConversationId::from("1"), user, vec![], 0);
        let err = ConversationStore::new(local(), vec![conv.clone(), conv]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateConversation(id) if id.as_str() == "1"));
    }

    #[test]
    fn test_search_and_totals() {
        let store = demo_store();
        assert_eq!(store.total_unread(), 3);

        let hits: Vec<&str> = store.search("  EM ").iter().map(|c| c.user().name.as_str()).collect();
        assert_eq!(hits, vec!["Emma Davis"]);
        assert_eq!(store.search("").len(), 5);
        assert!(store.search("nobody").is_empty());
    }
}
