//! MongoDB connection management.
//!
//! A [`MongoSession`] owns one driver client for the whole run. It is
//! acquired with [`MongoSession::connect`] and released with
//! [`MongoSession::close`]; callers are expected to close on every path,
//! including after a failed listing.
//!
//! # Security Features
//! - Connection strings are redacted before they are logged
//! - Only read-only commands are issued through the session

use crate::Result;
use crate::config::ConnectionConfig;
use crate::enumeration::CatalogSource;
use crate::error::{MongoLsError, redact_connection_string};
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};

/// An open association with a MongoDB server scoped to one database.
pub struct MongoSession {
    client: Client,
    database: String,
    target: String,
}

impl std::fmt::Debug for MongoSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MongoSession")
            .field("target", &self.target)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

impl MongoSession {
    /// Validates the configuration and creates a client for it.
    ///
    /// The driver connects lazily, so an unreachable server is reported by
    /// the first command rather than here.
    ///
    /// # Errors
    /// Returns error if:
    /// - The configuration is invalid
    /// - The connection string cannot be parsed into client options
    /// - Client creation fails
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;

        let connection_string = config.connection_string();
        tracing::debug!(
            "Connecting to {} (database: {})",
            redact_connection_string(&connection_string),
            config.database
        );

        let options = Self::create_client_options(&connection_string, config).await?;

        let client = Client::with_options(options).map_err(|e| {
            MongoLsError::connection_failed(
                format!("Failed to create MongoDB client for {}", config.target()),
                e,
            )
        })?;

        Ok(Self {
            client,
            database: config.database.clone(),
            target: config.target(),
        })
    }

    /// Builds driver options from the connection string and config.
    ///
    /// Timeouts and the app name given in the connection string itself are
    /// kept; the config only fills in what the string leaves unset.
    async fn create_client_options(
        connection_string: &str,
        config: &ConnectionConfig,
    ) -> Result<ClientOptions> {
        let mut options = ClientOptions::parse(connection_string).await.map_err(|e| {
            MongoLsError::connection_failed(
                format!("Failed to parse MongoDB connection options for {}", config.target()),
                e,
            )
        })?;

        options.connect_timeout.get_or_insert(config.connect_timeout);
        options
            .server_selection_timeout
            .get_or_insert(config.server_selection_timeout);
        options
            .app_name
            .get_or_insert_with(|| config.app_name.clone());

        Ok(options)
    }

    /// Name of the selected database.
    pub fn database_name(&self) -> &str {
        &self.database
    }

    /// Handle scoped to the selected database.
    pub fn database(&self) -> Database {
        self.client.database(&self.database)
    }

    /// Credential-free description of the server.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Shuts the client down, closing its pooled connections.
    pub async fn close(self) {
        tracing::debug!("Closing connection to {}", self.target);
        self.client.shutdown().await;
    }

    /// Sorts a driver error into a connection or listing failure.
    fn classify(&self, context: String, error: mongodb::error::Error) -> MongoLsError {
        let unreachable = matches!(
            *error.kind,
            ErrorKind::ServerSelection { .. }
                | ErrorKind::Authentication { .. }
                | ErrorKind::DnsResolve { .. }
                | ErrorKind::Io(_)
        );

        if unreachable {
            MongoLsError::connection_failed(format!("{} ({})", context, self.target), error)
        } else {
            MongoLsError::listing_failed(context, error)
        }
    }
}

#[async_trait]
impl CatalogSource for MongoSession {
    async fn collection_names(&self, database: &str) -> Result<Vec<String>> {
        self.client
            .database(database)
            .list_collection_names()
            .await
            .map_err(|e| {
                tracing::debug!("Failed to list collections in {}: {}", database, e);
                self.classify(
                    format!("Failed to list collections in database '{}'", database),
                    e,
                )
            })
    }

    async fn database_names(&self) -> Result<Vec<String>> {
        self.client.list_database_names().await.map_err(|e| {
            tracing::debug!("Failed to enumerate databases: {}", e);
            self.classify("Failed to enumerate databases".to_string(), e)
        })
    }

    async fn ping(&self, database: &str) -> Result<()> {
        self.client
            .database(database)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| self.classify(format!("Ping against '{}' failed", database), e))?;
        Ok(())
    }
}
