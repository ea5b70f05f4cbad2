//! The [`Client`] facade that command handlers hang off.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::broadcast;
use tokio::task::JoinSet;
use tracing::{info, warn};

use palaver_shared::UserId;
use palaver_store::ConversationStore;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::events::ClientEvent;
use crate::state::AppState;

const EVENT_CAPACITY: usize = 64;

pub struct Client {
    pub(crate) state: Arc<Mutex<AppState>>,
    pub(crate) events: broadcast::Sender<ClientEvent>,
    pub(crate) thumbnails: tokio::sync::Mutex<JoinSet<()>>,
    pub(crate) config: Arc<ClientConfig>,
}

impl Client {
    pub fn new(config: ClientConfig, store: ConversationStore) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let state = AppState::new(store, config.intake.max_files);

        info!(
            local_user = %config.local_user_id,
            max_files = config.intake.max_files,
            max_file_size = config.intake.max_file_size,
            "Client ready"
        );

        Self {
            state: Arc::new(Mutex::new(state)),
            events,
            thumbnails: tokio::sync::Mutex::new(JoinSet::new()),
            config: Arc::new(config),
        }
    }

    /// Build a client whose conversations come from seed JSON.
    pub fn from_seed_json(config: ClientConfig, json: &str) -> Result<Self> {
        let local_user = UserId::new(config.local_user_id.clone());
        let store = ConversationStore::from_seed_json(local_user, json)?;
        Ok(Self::new(config, store))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Wait for every in-flight thumbnail task to finish.
    ///
    /// The task set is swapped out before waiting, so attaching more files
    /// meanwhile is not blocked; tasks spawned during the wait are drained
    /// on the next pass.
    pub async fn settle_thumbnails(&self) {
        loop {
            let mut tasks = std::mem::take(&mut *self.thumbnails.lock().await);
            if tasks.is_empty() {
                break;
            }
            while let Some(result) = tasks.join_next().await {
                if let Err(e) = result {
                    warn!(error = %e, "Thumbnail task aborted");
                }
            }
        }
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, AppState>> {
        lock_state(&self.state)
    }
}

pub(crate) fn lock_state(state: &Mutex<AppState>) -> Result<MutexGuard<'_, AppState>> {
    state
        .lock()
        .map_err(|e| ClientError::LockPoisoned(e.to_string()))
}
