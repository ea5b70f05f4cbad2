//! Application state shared by every command.
//!
//! The [`AppState`] struct is wrapped in `Arc<Mutex<>>` by the
//! [`Client`](crate::Client) so background thumbnail tasks can reach it.

use palaver_media::PendingAttachments;
use palaver_store::ConversationStore;

/// Central application state.
pub struct AppState {
    /// All conversations and the current selection.
    pub store: ConversationStore,

    /// Text typed into the composer, untrimmed.
    pub draft: String,

    /// Files picked for the message being composed.
    pub pending: PendingAttachments,
}

impl AppState {
    pub fn new(store: ConversationStore, max_files: usize) -> Self {
        Self {
            store,
            draft: String::new(),
            pending: PendingAttachments::new(max_files),
        }
    }
}
