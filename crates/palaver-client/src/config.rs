//! Client configuration loaded from environment variables.
//!
//! All settings have defaults so the client starts with zero configuration.

use palaver_media::{AcceptedTypes, IntakeConfig};
use palaver_shared::constants::{DEFAULT_LOCAL_USER_ID, DEFAULT_THUMBNAIL_SIZE};

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Id of the user sending from this client.
    /// Env: `PALAVER_LOCAL_USER_ID`
    /// Default: `current-user`
    pub local_user_id: String,

    /// Attachment limits.
    /// Env: `PALAVER_MAX_FILES` (default 5), `PALAVER_MAX_FILE_SIZE`
    /// (bytes, default 10 MiB), `PALAVER_ACCEPTED_TYPES` (comma list,
    /// default `image/*,application/pdf,.doc,.docx,.txt`)
    pub intake: IntakeConfig,

    /// Bounding box for image thumbnails, in pixels.
    /// Env: `PALAVER_THUMBNAIL_SIZE`
    /// Default: `400`
    pub thumbnail_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            local_user_id: DEFAULT_LOCAL_USER_ID.to_string(),
            intake: IntakeConfig::default(),
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(id) = lookup("PALAVER_LOCAL_USER_ID") {
            if !id.trim().is_empty() {
                config.local_user_id = id.trim().to_string();
            }
        }

        if let Some(val) = lookup("PALAVER_MAX_FILES") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => config.intake.max_files = n,
                _ => tracing::warn!(value = %val, "Invalid PALAVER_MAX_FILES, using default"),
            }
        }

        if let Some(val) = lookup("PALAVER_MAX_FILE_SIZE") {
            match val.parse::<u64>() {
                Ok(n) => config.intake.max_file_size = n,
                Err(_) => {
                    tracing::warn!(value = %val, "Invalid PALAVER_MAX_FILE_SIZE, using default")
                }
            }
        }

        if let Some(val) = lookup("PALAVER_ACCEPTED_TYPES") {
            let accepted = AcceptedTypes::parse_list(&val);
            if accepted.is_empty() {
                tracing::warn!(value = %val, "Empty PALAVER_ACCEPTED_TYPES, using default");
            } else {
                config.intake.accepted_types = accepted;
            }
        }

        if let Some(val) = lookup("PALAVER_THUMBNAIL_SIZE") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => config.thumbnail_size = n,
                _ => tracing::warn!(value = %val, "Invalid PALAVER_THUMBNAIL_SIZE, using default"),
            }
        }

        config
    }
}
