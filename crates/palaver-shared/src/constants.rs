/// Application name
pub const APP_NAME: &str = "Palaver";

/// Id of the local user when none is configured
pub const DEFAULT_LOCAL_USER_ID: &str = "current-user";

/// Maximum number of attachments on one message
pub const DEFAULT_MAX_FILES: usize = 5;

/// Maximum attachment size in bytes (10 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Accepted attachment types, in HTML `accept` syntax
pub const DEFAULT_ACCEPTED_TYPES: &[&str] =
    &["image/*", "application/pdf", ".doc", ".docx", ".txt"];

/// Bounding box of generated thumbnails, in pixels
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 400;

/// Prefix shown before the preview of a message the local user sent
pub const SENT_PREVIEW_PREFIX: &str = "You: ";
