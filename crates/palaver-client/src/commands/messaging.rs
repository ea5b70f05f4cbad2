//! Sending messages and the composer that feeds it.

use serde::Serialize;
use tracing::debug;

use palaver_shared::time::format_clock;
use palaver_shared::{Attachment, Message, MessageKind};

use crate::client::Client;
use crate::commands::files::AttachmentDto;
use crate::commands::ViewClock;
use crate::error::{ClientError, Result};
use crate::events::{emit_event, ClientEvent, MessageSentPayload};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub id: String,
    pub text: String,
    pub sender_id: String,
    pub kind: MessageKind,
    /// RFC 3339.
    pub timestamp: String,
    /// `HH:MM`, local time.
    pub time: String,
    pub attachments: Vec<AttachmentDto>,
}

impl MessageDto {
    pub fn from_message(m: &Message, clock: &ViewClock) -> Self {
        Self {
            id: m.id.to_string(),
            text: m.text.clone(),
            sender_id: m.sender_id.to_string(),
            kind: m.kind,
            timestamp: m.timestamp.to_rfc3339(),
            time: format_clock(m.timestamp, clock.offset),
            attachments: m.attachments.iter().map(AttachmentDto::from).collect(),
        }
    }
}

impl Client {
    /// Send `text` with `attachments` to the selected conversation.
    ///
    /// Blank text is only allowed alongside at least one attachment.
    pub fn send_message(&self, text: &str, attachments: Vec<Attachment>) -> Result<MessageDto> {
        self.send_message_at(text, attachments, &ViewClock::current())
    }

    pub fn send_message_at(
        &self,
        text: &str,
        attachments: Vec<Attachment>,
        clock: &ViewClock,
    ) -> Result<MessageDto> {
        let mut state = self.lock()?;
        self.deliver(&mut state, text, attachments, clock)
    }

    pub fn set_draft(&self, text: &str) -> Result<()> {
        let mut state = self.lock()?;
        state.draft = text.to_string();
        Ok(())
    }

    pub fn draft(&self) -> Result<String> {
        Ok(self.lock()?.draft.clone())
    }

    /// Whether the composer currently has something to send.
    pub fn can_submit(&self) -> Result<bool> {
        let state = self.lock()?;
        Ok(!state.draft.trim().is_empty() || !state.pending.is_empty())
    }

    /// Send the draft and pending attachments, then reset the composer.
    ///
    /// On failure the draft and attachments are left in place.
    pub fn submit(&self) -> Result<MessageDto> {
        self.submit_at(&ViewClock::current())
    }

    pub fn submit_at(&self, clock: &ViewClock) -> Result<MessageDto> {
        let mut state = self.lock()?;
        let text = state.draft.trim().to_string();
        let attachments = state.pending.as_slice().to_vec();

        let dto = self.deliver(&mut state, &text, attachments, clock)?;

        state.draft.clear();
        state.pending.take();
        Ok(dto)
    }

    fn deliver(
        &self,
        state: &mut AppState,
        text: &str,
        attachments: Vec<Attachment>,
        clock: &ViewClock,
    ) -> Result<MessageDto> {
        let text = text.trim();
        if text.is_empty() && attachments.is_empty() {
            debug!("Refusing to send an empty message");
            return Err(ClientError::EmptyMessage);
        }

        let message = state.store.send_message_at(text, attachments, clock.now)?;
        let conversation_id = state
            .store
            .selected_id()
            .map(ToString::to_string)
            .unwrap_or_default();

        emit_event(
            &self.events,
            ClientEvent::MessageSent(MessageSentPayload {
                conversation_id,
                message_id: message.id.to_string(),
                timestamp: message.timestamp.to_rfc3339(),
            }),
        );

        Ok(MessageDto::from_message(&message, clock))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use chrono::{Duration, FixedOffset, Utc};
    use palaver_media::CandidateFile;
    use palaver_store::StoreError;

    use super::*;
    use crate::config::ClientConfig;

    const DEMO: &str = include_str!("../../../palaver-store/fixtures/demo.json");

    fn client() -> Client {
        Client::from_seed_json(ClientConfig::default(), DEMO).unwrap()
    }

    fn doc(name: &str) -> CandidateFile {
        CandidateFile::from_bytes(name, None, Bytes::from_static(b"data"))
    }

    #[test]
    fn test_send_requires_selection() {
        let client = client();
        let err = client.send_message("hello", vec![]).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Store(StoreError::NoConversationSelected)
        ));
    }

    #[test]
    fn test_send_trims_and_emits() {
        let client = client();
        let mut events = client.subscribe();
        client.select_conversation("1").unwrap();

        let dto = client.send_message("  hello  ", vec![]).unwrap();
        assert_eq!(dto.text, "hello");
        assert_eq!(dto.kind, MessageKind::Sent);
        assert_eq!(dto.sender_id, "current-user");

        let sent = std::iter::from_fn(|| events.try_recv().ok())
            .find_map(|e| match e {
                ClientEvent::MessageSent(p) => Some(p),
                _ => None,
            })
            .unwrap();
        assert_eq!(sent.conversation_id, "1");
        assert_eq!(sent.message_id, dto.id);
    }

    #[test]
    fn test_blank_message_refused() {
        let client = client();
        client.select_conversation("1").unwrap();
        assert!(matches!(
            client.send_message("   ", vec![]),
            Err(ClientError::EmptyMessage)
        ));
    }

    #[tokio::test]
    async fn test_submit_sends_attachments_and_resets() {
        let client = client();
        client.select_conversation("2").unwrap();
        assert!(!client.can_submit().unwrap());

        client.attach_files(vec![doc("plan.pdf"), doc("notes.txt")]).await.unwrap();
        assert!(client.can_submit().unwrap());

        let dto = client.submit().unwrap();
        assert_eq!(dto.text, "");
        let names: Vec<&str> = dto.attachments.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["plan.pdf", "notes.txt"]);

        assert!(client.pending_attachments().unwrap().is_empty());
        assert!(!client.can_submit().unwrap());
    }

    #[test]
    fn test_submit_uses_trimmed_draft() {
        let client = client();
        client.select_conversation("3").unwrap();
        client.set_draft("  see you there ").unwrap();

        let dto = client.submit().unwrap();
        assert_eq!(dto.text, "see you there");
        assert_eq!(client.draft().unwrap(), "");
    }

    #[test]
    fn test_sent_message_time_uses_clock() {
        let client = client();
        client.select_conversation("1").unwrap();
        let clock = ViewClock {
            now: Utc::now() + Duration::hours(1),
            offset: FixedOffset::east_opt(-5 * 3600).unwrap(),
        };

        let dto = client.send_message_at("later", vec![], &clock).unwrap();
        assert_eq!(dto.timestamp, clock.now.to_rfc3339());
        assert_eq!(dto.time, format_clock(clock.now, clock.offset));

        client.set_draft("and again").unwrap();
        let dto = client.submit_at(&clock).unwrap();
        assert_eq!(dto.time, format_clock(clock.now, clock.offset));
    }

    #[test]
    fn test_failed_submit_keeps_draft() {
        let client = client();
        client.set_draft("pending thought").unwrap();

        assert!(client.submit().is_err());
        assert_eq!(client.draft().unwrap(), "pending thought");
    }
}
