//! # palaver-store
//!
//! In-memory conversation state for Palaver.
//!
//! [`ConversationStore`] owns every conversation and the selected-conversation
//! pointer, and is the only writer. It exposes two transitions: selecting a
//! conversation (which marks it read) and sending a message into the selected
//! one. Initial state comes from a JSON seed, see [`seed`].

pub mod seed;
pub mod store;

mod error;

pub use error::{Result, StoreError};
pub use store::ConversationStore;
