use thiserror::Error;

use palaver_media::IntakeError;
use palaver_store::StoreError;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),

    /// Nothing to send: the text is blank and no file is attached.
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
