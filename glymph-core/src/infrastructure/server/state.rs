use crate::agent::AgentService;
use crate::application::catalog::CatalogService;
use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::model::{ClientFactory, HttpClientFactory};
use crate::store::{Store, StoreError};
use reqwest::Client;
use std::sync::Arc;

/// Services shared by every handler.
#[derive(Clone)]
pub struct ServerState {
    agents: AgentService,
    catalog: CatalogService,
    auth: AuthService,
    store: Store,
    protect_resources: bool,
    cors_origins: Vec<String>,
}

impl ServerState {
    /// Open the configured database and talk to real providers.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StoreError> {
        let store = Store::connect(&config.database).await?;
        let http = Client::new();
        let factory = Arc::new(HttpClientFactory::new(http.clone()));
        Ok(Self::new(store, factory, http, config))
    }

    pub fn new(
        store: Store,
        factory: Arc<dyn ClientFactory>,
        http: Client,
        config: &AppConfig,
    ) -> Self {
        Self {
            agents: AgentService::new(store.clone(), factory, http, config.agent.clone()),
            catalog: CatalogService::new(store.clone()),
            auth: AuthService::new(store.clone(), &config.auth),
            store,
            protect_resources: config.auth.protect_resources,
            cors_origins: config.server.cors_origins.clone(),
        }
    }

    pub fn agents(&self) -> &AgentService {
        &self.agents
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn protect_resources(&self) -> bool {
        self.protect_resources
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }
}
