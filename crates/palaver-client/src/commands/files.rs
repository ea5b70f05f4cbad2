//! Attachment commands: picking, removing and clearing the files that will
//! go out with the next message.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

use palaver_media::{format_file_size, generate_thumbnail, intake, CandidateFile, Rejection};
use palaver_shared::{Attachment, AttachmentId};

use crate::client::{lock_state, Client};
use crate::error::Result;
use crate::events::{emit_event, ClientEvent, ThumbnailFailedPayload, ThumbnailPayload};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDto {
    pub id: String,
    pub name: String,
    pub size: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub is_image: bool,
    /// Thumbnail if one exists, else the content url.
    pub src: String,
    pub url: String,
}

impl From<&Attachment> for AttachmentDto {
    fn from(a: &Attachment) -> Self {
        Self {
            id: a.id.to_string(),
            name: a.name.clone(),
            size: format_file_size(a.size),
            size_bytes: a.size,
            mime_type: a.mime_type.clone(),
            is_image: a.is_image(),
            src: a.display_src().to_string(),
            url: a.url.clone(),
        }
    }
}

/// Result of an attach request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachReport {
    /// The whole pending list after the merge.
    pub pending: Vec<AttachmentDto>,
    pub rejected: Vec<Rejection>,
}

impl Client {
    /// Validate `candidates` and add the accepted ones to the pending list.
    ///
    /// Rejected files are reported through a `file-rejected` event each.
    /// Image thumbnails render in the background; see
    /// [`Client::settle_thumbnails`].
    pub async fn attach_files(&self, candidates: Vec<CandidateFile>) -> Result<AttachReport> {
        let max_files = self.config.intake.max_files;
        let outcome = intake(candidates, &self.config.intake);
        let mut rejected = outcome.rejected;

        let (epoch, overflow, pending) = {
            let mut state = self.lock()?;
            let overflow: Vec<AttachmentId> = state
                .pending
                .extend(outcome.accepted.iter().map(|a| a.attachment.clone()))
                .into_iter()
                .map(|dropped| {
                    rejected.push(Rejection::LimitReached {
                        name: dropped.name,
                        max: max_files,
                    });
                    dropped.id
                })
                .collect();
            let pending: Vec<AttachmentDto> =
                state.pending.as_slice().iter().map(AttachmentDto::from).collect();
            (state.pending.epoch(), overflow, pending)
        };

        for rejection in &rejected {
            emit_event(&self.events, ClientEvent::file_rejected(rejection.clone()));
        }

        let mut tasks = self.thumbnails.lock().await;
        while let Some(result) = tasks.try_join_next() {
            if let Err(e) = result {
                warn!(error = %e, "Thumbnail task aborted");
            }
        }

        let mut attached = 0;
        for accepted in outcome.accepted {
            let id = accepted.attachment.id;
            if overflow.contains(&id) {
                continue;
            }
            attached += 1;
            if !accepted.file.is_image() {
                continue;
            }
            tasks.spawn(render_thumbnail(
                Arc::clone(&self.state),
                self.events.clone(),
                accepted.file,
                id,
                epoch,
                self.config.thumbnail_size,
            ));
        }

        info!(attached, rejected = rejected.len(), "Files attached");

        Ok(AttachReport { pending, rejected })
    }

    /// Read the files at `paths` and attach them.
    pub async fn attach_paths(&self, paths: Vec<PathBuf>) -> Result<AttachReport> {
        let mut candidates = Vec::with_capacity(paths.len());
        for path in paths {
            candidates.push(CandidateFile::from_path(&path).await?);
        }
        self.attach_files(candidates).await
    }

    pub fn pending_attachments(&self) -> Result<Vec<AttachmentDto>> {
        let state = self.lock()?;
        Ok(state.pending.as_slice().iter().map(AttachmentDto::from).collect())
    }

    /// Returns whether anything was removed.
    pub fn remove_attachment(&self, id: &str) -> Result<bool> {
        let mut state = self.lock()?;
        Ok(state.pending.remove(&AttachmentId::from(id)))
    }

    pub fn clear_attachments(&self) -> Result<()> {
        let mut state = self.lock()?;
        state.pending.clear();
        Ok(())
    }
}

async fn render_thumbnail(
    state: Arc<Mutex<AppState>>,
    events: broadcast::Sender<ClientEvent>,
    file: CandidateFile,
    id: AttachmentId,
    epoch: u64,
    max_dim: u32,
) {
    match generate_thumbnail(&file, max_dim).await {
        Ok(thumbnail) => {
            let applied = match lock_state(&state) {
                Ok(mut guard) => guard.pending.apply_thumbnail(epoch, &id, thumbnail),
                Err(e) => {
                    warn!(error = %e, "Cannot apply thumbnail");
                    false
                }
            };
            if applied {
                emit_event(
                    &events,
                    ClientEvent::ThumbnailReady(ThumbnailPayload {
                        attachment_id: id.to_string(),
                    }),
                );
            }
        }
        Err(e) => {
            warn!(file = %file.name, error = %e, "Could not create thumbnail");
            emit_event(
                &events,
                ClientEvent::ThumbnailFailed(ThumbnailFailedPayload {
                    attachment_id: id.to_string(),
                    error: e.to_string(),
                }),
            );
        }
    }
}
