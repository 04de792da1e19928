pub mod serve;

// re-export
pub use serve::serve;

use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{config::AppConfig, model::SubscriberStore, Result};

// ###################################
// ->  Structs
// ###################################
pub struct App {
    pub app_state: AppState,
    pub listener: TcpListener,
}
impl App {
    pub fn new(app_state: AppState, listener: TcpListener) -> Self {
        App {
            app_state,
            listener,
        }
    }

    /// Creates the store file if needed and binds the listener.
    /// Binding port `0` lets the OS pick a free port, see `App::addr`.
    pub async fn build_from_config(config: &AppConfig) -> Result<Self> {
        let store = SubscriberStore::init(&config.store_config).await?;
        let app_state = AppState::new(store);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);
        info!("{:<20} - POST /api/subscribe", "API endpoint:");
        info!("{:<20} - GET  /api/subscribers/count", "API endpoint:");

        let app = App::new(app_state, listener);
        Ok(app)
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

pub struct InternalState {
    pub store: SubscriberStore,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(store: SubscriberStore) -> Self {
        AppState(Arc::new(InternalState { store }))
    }
}
