//! MongoDB connection shared by the quiz and attempt stores.

use std::time::Duration;

use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use secrecy::ExposeSecret;

use crate::{config::Config, errors::AppResult};

#[derive(Clone)]
pub struct Database {
    client: Client,
    name: String,
}

/// Driver options for `config`: stable API v1 plus the configured pool bounds.
/// The connect timeout also bounds server selection, so an unreachable
/// deployment fails a request instead of hanging it.
pub async fn client_options(config: &Config) -> AppResult<ClientOptions> {
    let mut options = ClientOptions::parse(config.mongo_conn_string.expose_secret()).await?;

    let timeout = Duration::from_secs(config.mongo_connect_timeout_seconds);
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    options.max_pool_size = Some(config.mongo_max_pool_size);
    options.min_pool_size = Some(config.mongo_min_pool_size);
    options.connect_timeout = Some(timeout);
    options.server_selection_timeout = Some(timeout);

    Ok(options)
}

impl Database {
    /// Opens the pool and pings once, so a wrong connection string stops startup.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let client = Client::with_options(client_options(config).await?)?;
        let database = Self {
            client,
            name: config.mongo_db_name.clone(),
        };
        database.ping().await?;

        log::info!(
            "MongoDB database '{}' reachable (pool {}..{} connections, {}s timeout)",
            database.name,
            config.mongo_min_pool_size,
            config.mongo_max_pool_size,
            config.mongo_connect_timeout_seconds
        );
        Ok(database)
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client.database(&self.name).collection(name)
    }

    /// Backs `/health/ready`.
    pub async fn ping(&self) -> AppResult<()> {
        self.client
            .database(&self.name)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
