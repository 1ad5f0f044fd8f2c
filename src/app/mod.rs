use std::{net::SocketAddr, sync::Arc};

use derive_more::Deref;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    config::AppConfig,
    subscription_client::{BeehiivClient, SubscriptionApi},
    Result,
};

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

    /// Builds the beehiiv client from the configuration and binds the listener.
    pub async fn build_from_config(config: AppConfig) -> Result<Self> {
        let beehiiv_config = config.beehiiv_config;
        let timeout = beehiiv_config.timeout();
        let beehiiv_client = BeehiivClient::new(
            beehiiv_config.base_url,
            beehiiv_config.publication_id,
            beehiiv_config.api_key,
            timeout,
        )?;

        let app_state = AppState::new(beehiiv_client);

        let addr = SocketAddr::from((config.net_config.host, config.net_config.app_port));
        let listener = TcpListener::bind(addr).await?;
        let addr = listener.local_addr()?;
        info!("{:<20} - {}", "Listening on:", addr);

        let app = App::new(app_state, listener);
        Ok(app)
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }
}

pub struct InternalState {
    pub subscription_api: Box<dyn SubscriptionApi>,
}

/// Application state containing all global data.
/// It implements `Deref` to easily access the fields on `InternalState`
/// Uses an `Arc` so it can be cloned around.
#[derive(Clone, Deref)]
pub struct AppState(Arc<InternalState>);

impl AppState {
    pub fn new(subscription_api: impl SubscriptionApi + 'static) -> Self {
        AppState(Arc::new(InternalState {
            subscription_api: Box::new(subscription_api),
        }))
    }
}
