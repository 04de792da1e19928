//! The subscription store: the list of newsletter subscribers behind a `StoreBackend`.

pub mod backend;
pub mod record;

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{info, warn};

pub use backend::{BackendError, InMemoryBackend, JsonFileBackend, StoreBackend};
pub use record::{SubscriberList, SubscriberRecord};

use crate::{config::StoreConfig, web::types::ValidEmail};

/// Owns the backend and serializes every subscribe (load, duplicate check, append, save)
/// so two concurrent requests can never both insert the same email.
#[derive(Clone)]
pub struct SubscriberStore {
    backend: Arc<dyn StoreBackend>,
    write_lock: Arc<Mutex<()>>,
}

impl SubscriberStore {
    pub fn new(backend: Arc<dyn StoreBackend>) -> Self {
        Self {
            backend,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Builds a file backed store and creates the file if it doesn't exist yet.
    pub async fn init(config: &StoreConfig) -> Result<Self> {
        info!(
            "{:<20} - {}",
            "Initializing store",
            config.path.display()
        );
        let backend = JsonFileBackend::new(config.path.clone());
        backend.init().await?;

        Ok(Self::new(Arc::new(backend)))
    }

    /// Appends a new subscriber and returns its email.
    /// Fails with `DuplicateEmail` if the email is already stored, ignoring case.
    pub async fn subscribe(&self, email: &ValidEmail) -> Result<String> {
        let _guard = self.write_lock.lock().await;

        // A list we could not read must not be treated as empty, that would let duplicates in.
        let mut list = self.backend.load().await?;
        if list.contains(email) {
            return Err(Error::DuplicateEmail(email.as_ref().to_owned()));
        }

        let record = SubscriberRecord::new(email);
        let created = record.email.clone();
        list.push(record);
        self.backend.save(&list).await?;

        info!(subscriber_email = %created, "New subscriber");
        Ok(created)
    }

    /// Number of stored subscribers. Read failures are logged and count as an empty store.
    pub async fn count(&self) -> usize {
        match self.backend.load().await {
            Ok(list) => list.len(),
            Err(er) => {
                warn!("{:<20} - {er}", "Failed to read store");
                0
            }
        }
    }
}

// ###################################
// ->   ERROR
// ###################################
pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, strum_macros::AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("email already subscribed: {0}")]
    DuplicateEmail(String),
    #[error("persistence failure: {0}")]
    Persistence(#[from] BackendError),
}
