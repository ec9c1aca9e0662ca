//! Core library for mongols.
//!
//! Provides the configuration, connection lifecycle and catalog enumeration
//! behind the `mongols` binary: connect to a MongoDB server, select a
//! database, and list the names of its collections.
//!
//! # Guarantees
//! - Only read-only commands are sent (`listCollections`, `listDatabases`, `ping`)
//! - Connection strings are redacted in every log line and error message
//! - The client is released explicitly through [`MongoSession::close`]

pub mod config;
pub mod connection;
pub mod enumeration;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use config::{ConnectionConfig, DEFAULT_DATABASE, DEFAULT_HOST, DEFAULT_PORT};
pub use connection::MongoSession;
pub use enumeration::{
    CatalogSource, CollectionListing, ListOptions, SYSTEM_DATABASES, list_collections,
    list_databases,
};
pub use error::{MongoLsError, Result};
pub use logging::{LogFormat, init_logging};
