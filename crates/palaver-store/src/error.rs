use thiserror::Error;

use palaver_shared::ConversationId;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// `send_message` was called with no conversation selected.
    #[error("No conversation selected")]
    NoConversationSelected,

    /// The selected id does not match any conversation.
    #[error("Conversation not found: {0}")]
    UnknownConversation(ConversationId),

    /// Two seeded conversations share an id.
    #[error("Duplicate conversation id: {0}")]
    DuplicateConversation(ConversationId),

    /// A seeded conversation references a user that is not defined.
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    /// Seed JSON could not be parsed.
    #[error("Seed parse error: {0}")]
    Seed(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
