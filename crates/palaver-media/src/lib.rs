//! # palaver-media
//!
//! Attachment intake for Palaver: validates candidate files against the
//! configured limits, turns them into [`Attachment`](palaver_shared::Attachment)
//! records, renders image thumbnails and tracks the not-yet-sent list.

pub mod accept;
pub mod intake;
pub mod pending;
pub mod size;
pub mod thumbnail;

mod error;

pub use accept::AcceptedTypes;
pub use error::{IntakeError, ThumbnailError};
pub use intake::{intake, AcceptedFile, CandidateFile, FileSource, IntakeConfig, IntakeOutcome, Rejection};
pub use pending::PendingAttachments;
pub use size::format_file_size;
pub use thumbnail::generate_thumbnail;
