//! Candidate-file validation.
//!
//! [`intake`] walks the candidates in order, drops files that are too large
//! or of an unaccepted type, and stops accepting once `max_files` is reached.
//! Dropped files come back as [`Rejection`]s for the notification channel;
//! they are never errors.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use palaver_shared::constants::{DEFAULT_MAX_FILES, DEFAULT_MAX_FILE_SIZE};
use palaver_shared::{Attachment, AttachmentId};

use crate::accept::AcceptedTypes;
use crate::error::IntakeError;
use crate::size::format_file_size;

/// Attachment limits.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    pub max_files: usize,
    /// Bytes.
    pub max_file_size: u64,
    pub accepted_types: AcceptedTypes,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            accepted_types: AcceptedTypes::default(),
        }
    }
}

/// Where a candidate's content lives.
#[derive(Debug, Clone)]
pub enum FileSource {
    Path(PathBuf),
    Bytes(Bytes),
}

/// A file offered for attachment, not yet validated.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub size: u64,
    pub mime_type: String,
    pub source: FileSource,
}

impl CandidateFile {
    /// In-memory candidate. The MIME type is guessed from `name` when not given.
    pub fn from_bytes(name: impl Into<String>, mime_type: Option<&str>, data: Bytes) -> Self {
        let name = name.into();
        let mime_type = mime_type
            .map(str::to_string)
            .unwrap_or_else(|| guess_mime(&name));
        Self {
            size: data.len() as u64,
            name,
            mime_type,
            source: FileSource::Bytes(data),
        }
    }

    /// Candidate backed by a file on disk. Only metadata is read here.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, IntakeError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(IntakeError::NotAFile(path.to_path_buf()));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string());
        let mime_type = guess_mime(&name);

        Ok(Self {
            name,
            size: metadata.len(),
            mime_type,
            source: FileSource::Path(path.to_path_buf()),
        })
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }

    fn content_url(&self) -> String {
        match &self.source {
            FileSource::Path(path) => format!("file://{}", path.display()),
            FileSource::Bytes(_) => format!("blob:palaver/{}", Uuid::new_v4()),
        }
    }
}

fn guess_mime(name: &str) -> String {
    mime_guess::from_path(name)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Why a candidate was not attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "camelCase")]
pub enum Rejection {
    #[serde(rename_all = "camelCase")]
    TooLarge { name: String, size: u64, max: u64 },
    #[serde(rename_all = "camelCase")]
    UnsupportedType { name: String, mime_type: String },
    #[serde(rename_all = "camelCase")]
    LimitReached { name: String, max: usize },
}

impl Rejection {
    pub fn file_name(&self) -> &str {
        match self {
            Self::TooLarge { name, .. }
            | Self::UnsupportedType { name, .. }
            | Self::LimitReached { name, .. } => name,
        }
    }

    /// Text suitable for showing to the user.
    pub fn message(&self) -> String {
        match self {
            Self::TooLarge { name, max, .. } => format!(
                "File \"{name}\" is too large. Maximum size is {}.",
                format_file_size(*max)
            ),
            Self::UnsupportedType { name, mime_type } => {
                format!("File \"{name}\" has an unsupported type ({mime_type}).")
            }
            Self::LimitReached { name, max } => {
                format!("File \"{name}\" was skipped. At most {max} files can be attached.")
            }
        }
    }
}

/// A validated candidate together with the attachment made from it.
#[derive(Debug, Clone)]
pub struct AcceptedFile {
    pub attachment: Attachment,
    pub file: CandidateFile,
}

#[derive(Debug, Clone, Default)]
pub struct IntakeOutcome {
    /// In input order.
    pub accepted: Vec<AcceptedFile>,
    pub rejected: Vec<Rejection>,
}

impl IntakeOutcome {
    pub fn attachments(&self) -> Vec<Attachment> {
        self.accepted.iter().map(|a| a.attachment.clone()).collect()
    }
}

/// Validate `candidates` against `config`.
pub fn intake(candidates: Vec<CandidateFile>, config: &IntakeConfig) -> IntakeOutcome {
    let mut outcome = IntakeOutcome::default();

    for file in candidates {
        if outcome.accepted.len() >= config.max_files {
            debug!(file = %file.name, max = config.max_files, "Attachment limit reached");
            outcome.rejected.push(Rejection::LimitReached {
                name: file.name,
                max: config.max_files,
            });
            continue;
        }

        if file.size > config.max_file_size {
            warn!(
                file = %file.name,
                size = file.size,
                max = config.max_file_size,
                "File too large"
            );
            outcome.rejected.push(Rejection::TooLarge {
                name: file.name,
                size: file.size,
                max: config.max_file_size,
            });
            continue;
        }

        if !config.accepted_types.accepts(&file.name, &file.mime_type) {
            warn!(file = %file.name, mime = %file.mime_type, "Unsupported file type");
            outcome.rejected.push(Rejection::UnsupportedType {
                name: file.name,
                mime_type: file.mime_type,
            });
            continue;
        }

        let attachment = Attachment {
            id: AttachmentId::generate(),
            name: file.name.clone(),
            size: file.size,
            mime_type: file.mime_type.clone(),
            url: file.content_url(),
            thumbnail: None,
        };
        debug!(attachment = %attachment.id, file = %file.name, "File accepted");
        outcome.accepted.push(AcceptedFile { attachment, file });
    }

    outcome
}
