//! Command handlers, grouped by domain.
//!
//! Each sub-module adds an `impl Client` block. Read commands return
//! serialisable view DTOs; write commands go through the store.

pub mod conversations;
pub mod files;
pub mod messaging;

use chrono::{DateTime, FixedOffset, Local, Utc};

/// Clock reading used to render relative and wall-clock times.
#[derive(Debug, Clone, Copy)]
pub struct ViewClock {
    pub now: DateTime<Utc>,
    pub offset: FixedOffset,
}

impl ViewClock {
    pub fn current() -> Self {
        Self {
            now: Utc::now(),
            offset: *Local::now().offset(),
        }
    }
}
