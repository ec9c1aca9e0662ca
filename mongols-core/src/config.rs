//! Connection configuration.
//!
//! [`ConnectionConfig`] carries everything needed to reach a server and pick
//! a database. Defaults target a local server on the standard port, so a
//! bare `ConnectionConfig::default()` reproduces a plain local connection.

use crate::Result;
use crate::error::MongoLsError;
use serde::{Deserialize, Serialize};
use mongodb::options::{ConnectionString, HostInfo};
use std::time::Duration;

/// Database selected when none is configured.
pub const DEFAULT_DATABASE: &str = "quoridorn-1-0-0a57";
/// Host used when neither a host nor a URI is configured.
pub const DEFAULT_HOST: &str = "localhost";
/// Standard MongoDB port.
pub const DEFAULT_PORT: u16 = 27017;

/// Database names are limited to 63 bytes by the server.
const MAX_DATABASE_NAME_LEN: usize = 63;

/// Characters the server rejects in database names on at least one platform.
const FORBIDDEN_DATABASE_CHARS: &[char] = &[
    '/', '\\', '.', ' ', '"', '$', '*', '<', '>', ':', '|', '?', '\0',
];

/// Configuration for a single mongols run.
///
/// # Security
/// Passwords may only arrive embedded in `uri`. Neither `Display` nor any
/// log statement in this crate prints the URI unredacted.
///
/// # Example
/// ```rust
/// use mongols_core::ConnectionConfig;
///
/// let config = ConnectionConfig::default()
///     .with_host("db.internal")
///     .with_port(27018)
///     .with_database("inventory");
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.connection_string(), "mongodb://db.internal:27018/");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Server host, ignored when `uri` is set
    pub host: String,
    /// Server port, ignored when `uri` is set
    pub port: u16,
    /// Full connection string, takes precedence over host and port
    #[serde(skip_serializing)]
    pub uri: Option<String>,
    /// Database whose collections are listed
    pub database: String,
    /// Timeout for establishing a single connection
    pub connect_timeout: Duration,
    /// Timeout for finding a suitable server
    pub server_selection_timeout: Duration,
    /// Application name reported to the server
    pub app_name: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            uri: None,
            database: DEFAULT_DATABASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            server_selection_timeout: Duration::from_secs(10),
            app_name: format!("mongols-{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl std::fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConnectionConfig({}/{})", self.target(), self.database)
        // Credentials are never part of the target
    }
}

impl ConnectionConfig {
    /// Validates every field before any network activity happens.
    ///
    /// # Errors
    /// Returns a configuration error naming the first invalid field
    pub fn validate(&self) -> Result<()> {
        validate_database_name(&self.database)?;

        match &self.uri {
            Some(uri) => validate_connection_string(uri)?,
            None => {
                if self.host.trim().is_empty() {
                    return Err(MongoLsError::configuration("host cannot be empty"));
                }
                if self.port == 0 {
                    return Err(MongoLsError::configuration("port must be greater than 0"));
                }
            }
        }

        if self.connect_timeout.is_zero() {
            return Err(MongoLsError::configuration(
                "connect_timeout must be greater than 0",
            ));
        }

        if self.server_selection_timeout.is_zero() {
            return Err(MongoLsError::configuration(
                "server_selection_timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Connection string handed to the driver.
    ///
    /// May contain credentials; pass it through
    /// [`redact_connection_string`](crate::error::redact_connection_string)
    /// before logging.
    pub fn connection_string(&self) -> String {
        match &self.uri {
            Some(uri) => uri.clone(),
            None if self.host.contains(':') => format!("mongodb://[{}]:{}/", self.host, self.port),
            None => format!("mongodb://{}:{}/", self.host, self.port),
        }
    }

    /// Credential-free description of the servers being targeted: `host:port`
    /// for plain configs, the scheme and full host list for URIs.
    pub fn target(&self) -> String {
        match &self.uri {
            Some(uri) => match ConnectionString::parse(uri).map(|parsed| parsed.host_info) {
                Ok(HostInfo::HostIdentifiers(hosts)) => {
                    let hosts: Vec<String> = hosts.iter().map(ToString::to_string).collect();
                    format!("mongodb://{}", hosts.join(","))
                }
                Ok(HostInfo::DnsRecord(host)) => format!("mongodb+srv://{}", host),
                Ok(_) => "<unknown>".to_string(),
                Err(_) => "<redacted>".to_string(),
            },
            None => format!("{}:{}", self.host, self.port),
        }
    }

    /// Builder method to set the host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Builder method to set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Builder method to set a full connection string.
    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    /// Builder method to set the database.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Builder method to set the connect timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Builder method to set the server selection timeout.
    pub fn with_server_selection_timeout(mut self, timeout: Duration) -> Self {
        self.server_selection_timeout = timeout;
        self
    }

    /// Builder method to set the application name.
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }
}

/// Checks a database name against the server's naming rules.
///
/// # Errors
/// Returns a configuration error if the name is empty, too long, or
/// contains a character the server rejects
pub fn validate_database_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MongoLsError::configuration("database name cannot be empty"));
    }

    if name.len() > MAX_DATABASE_NAME_LEN {
        return Err(MongoLsError::configuration(format!(
            "database name must be at most {} bytes, got {}",
            MAX_DATABASE_NAME_LEN,
            name.len()
        )));
    }

    if let Some(c) = name.chars().find(|c| FORBIDDEN_DATABASE_CHARS.contains(c)) {
        return Err(MongoLsError::configuration(format!(
            "database name contains forbidden character {:?}",
            c
        )));
    }

    Ok(())
}

/// Validates a MongoDB connection string.
///
/// Scheme and host list are checked here so the messages stay specific;
/// everything else, including replica-set host lists and URI options, is
/// left to the driver's own parser.
///
/// # Errors
/// Returns error if the string uses a scheme other than `mongodb` or
/// `mongodb+srv`, names no host, or is rejected by the driver
pub fn validate_connection_string(uri: &str) -> Result<()> {
    parse_connection_string(uri).map(|_| ())
}

/// Extracts the default database from the path of a connection string.
///
/// The name is percent-decoded the same way the driver decodes it. Returns
/// `None` for strings without a path component or that do not parse.
pub fn database_from_uri(uri: &str) -> Option<String> {
    ConnectionString::parse(uri).ok()?.default_database
}

/// Host list of a connection string: what lies between the credentials and
/// the database path.
pub(crate) fn host_list(uri: &str) -> Option<&str> {
    let (_, rest) = uri.split_once("://")?;
    let pre_options = rest.split_once('?').map_or(rest, |(before, _)| before);
    let hosts_and_db = pre_options
        .rsplit_once('@')
        .map_or(pre_options, |(_, after)| after);
    Some(hosts_and_db.split_once('/').map_or(hosts_and_db, |(hosts, _)| hosts))
}

fn parse_connection_string(uri: &str) -> Result<ConnectionString> {
    if !(uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://")) {
        return Err(MongoLsError::configuration(
            "Connection string must use mongodb:// or mongodb+srv:// scheme",
        ));
    }

    if host_list(uri).is_none_or(|hosts| hosts.split(',').any(str::is_empty)) {
        return Err(MongoLsError::configuration(
            "Connection string must specify a host",
        ));
    }

    // Driver messages name the offending option, never the password
    ConnectionString::parse(uri).map_err(|e| {
        MongoLsError::configuration(format!("Invalid MongoDB connection string: {}", e.kind))
    })
}
