//! The list of attachments picked for the message being composed.
//!
//! Thumbnails resolve in the background. Each one is tagged with the epoch
//! it was started in; clearing or sending bumps the epoch, so a thumbnail
//! that resolves after that point is dropped instead of applied.

use tracing::debug;

use palaver_shared::{Attachment, AttachmentId};

#[derive(Debug, Clone)]
pub struct PendingAttachments {
    items: Vec<Attachment>,
    max_files: usize,
    epoch: u64,
}

impl PendingAttachments {
    pub fn new(max_files: usize) -> Self {
        Self {
            items: Vec::new(),
            max_files,
            epoch: 0,
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[Attachment] {
        &self.items
    }

    /// Room left before the cap.
    pub fn remaining(&self) -> usize {
        self.max_files.saturating_sub(self.items.len())
    }

    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Append up to the cap. Returns the attachments that did not fit, in
    /// input order, so the caller can report them.
    pub fn extend(&mut self, attachments: impl IntoIterator<Item = Attachment>) -> Vec<Attachment> {
        let mut overflow = Vec::new();
        for attachment in attachments {
            if self.items.len() >= self.max_files {
                debug!(attachment = %attachment.id, "Pending list full");
                overflow.push(attachment);
                continue;
            }
            self.items.push(attachment);
        }
        overflow
    }

    pub fn remove(&mut self, id: &AttachmentId) -> bool {
        let before = self.items.len();
        self.items.retain(|a| &a.id != id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.epoch += 1;
    }

    /// Drain the list for sending. Thumbnails still in flight are discarded.
    pub fn take(&mut self) -> Vec<Attachment> {
        self.epoch += 1;
        std::mem::take(&mut self.items)
    }

    /// Apply a thumbnail started in `epoch`. Returns whether it was applied.
    pub fn apply_thumbnail(&mut self, epoch: u64, id: &AttachmentId, thumbnail: String) -> bool {
        if epoch != self.epoch {
            debug!(attachment = %id, "Stale thumbnail discarded");
            return false;
        }
        match self.items.iter_mut().find(|a| &a.id == id) {
            Some(attachment) => {
                attachment.thumbnail = Some(thumbnail);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn att(id: &str) -> Attachment {
        Attachment {
            id: AttachmentId::from(id),
            name: format!("{id}.png"),
            size: 1,
            mime_type: "image/png".into(),
            url: format!("blob:palaver/{id}"),
            thumbnail: None,
        }
    }

    fn ids(pending: &PendingAttachments) -> Vec<&str> {
        pending.as_slice().iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn test_extend_truncates_to_cap() {
        let mut pending = PendingAttachments::new(3);
        pending.extend([att("a"), att("b")]);
        let overflow = pending.extend([att("c"), att("d")]);

        assert_eq!(ids(&pending), vec!["a", "b", "c"]);
        assert_eq!(overflow, vec![att("d")]);
        assert_eq!(pending.remaining(), 0);
    }

    #[test]
    fn test_remove() {
        let mut pending = PendingAttachments::new(5);
        pending.extend([att("a"), att("b")]);
        assert!(pending.remove(&AttachmentId::from("a")));
        assert!(!pending.remove(&AttachmentId::from("a")));
        assert_eq!(ids(&pending), vec!["b"]);
    }

    #[test]
    fn test_thumbnail_applied_in_same_epoch() {
        let mut pending = PendingAttachments::new(5);
        pending.extend([att("a")]);
        let epoch = pending.epoch();

        assert!(pending.apply_thumbnail(epoch, &AttachmentId::from("a"), "thumb".into()));
        assert_eq!(pending.as_slice()[0].thumbnail.as_deref(), Some("thumb"));
    }

    #[test]
    fn test_thumbnail_after_clear_discarded() {
        let mut pending = PendingAttachments::new(5);
        pending.extend([att("a")]);
        let epoch = pending.epoch();
        pending.clear();
        pending.extend([att("a")]);

        assert!(!pending.apply_thumbnail(epoch, &AttachmentId::from("a"), "late".into()));
        assert!(pending.as_slice()[0].thumbnail.is_none());
    }

    #[test]
    fn test_thumbnail_for_removed_attachment_ignored() {
        let mut pending = PendingAttachments::new(5);
        pending.extend([att("a")]);
        let epoch = pending.epoch();
        pending.remove(&AttachmentId::from("a"));
        assert!(!pending.apply_thumbnail(epoch, &AttachmentId::from("a"), "t".into()));
    }

    #[test]
    fn test_take_drains_and_bumps_epoch() {
        let mut pending = PendingAttachments::new(5);
        pending.extend([att("a"), att("b")]);
        let epoch = pending.epoch();

        let taken = pending.take();
        assert_eq!(taken.len(), 2);
        assert!(pending.is_empty());
        assert_ne!(pending.epoch(), epoch);
    }
}
