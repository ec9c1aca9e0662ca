//! Database and collection enumeration.
//!
//! The listing functions work against any [`CatalogSource`], which keeps
//! filtering and ordering independent of a live server.
//!
//! # Features
//! - List collection names of one database
//! - Hide `system.*` collections on request
//! - List database names, hiding system databases by default

use crate::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// System databases that are excluded by default when listing databases.
pub const SYSTEM_DATABASES: &[&str] = &["admin", "config", "local"];

/// Prefix shared by server-managed collections.
pub const SYSTEM_COLLECTION_PREFIX: &str = "system.";

/// Read-only catalog commands a server answers.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Names of all collections in `database`, in server order.
    async fn collection_names(&self, database: &str) -> Result<Vec<String>>;

    /// Names of all databases on the server, in server order.
    async fn database_names(&self) -> Result<Vec<String>>;

    /// Round trip to the server scoped to `database`.
    async fn ping(&self, database: &str) -> Result<()>;
}

/// Collection names found in one database at query time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionListing {
    /// Database the names belong to
    pub database: String,
    /// Collection names
    pub names: Vec<String>,
}

impl CollectionListing {
    /// Number of collections in the listing.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the database has no (matching) collections.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Controls which collection names end up in a listing and in what order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Keep `system.*` collections
    pub include_system: bool,
    /// Sort names lexicographically instead of keeping server order
    pub sort: bool,
    /// Keep only names containing this substring
    pub name_filter: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            include_system: true,
            sort: false,
            name_filter: None,
        }
    }
}

impl ListOptions {
    /// Builder method to keep or drop `system.*` collections.
    pub fn with_include_system(mut self, include_system: bool) -> Self {
        self.include_system = include_system;
        self
    }

    /// Builder method to enable sorting.
    pub fn with_sort(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Builder method to set a substring filter.
    pub fn with_name_filter(mut self, filter: impl Into<String>) -> Self {
        self.name_filter = Some(filter.into());
        self
    }

    fn keeps(&self, name: &str) -> bool {
        if !self.include_system && is_system_collection(name) {
            tracing::trace!("Skipping system collection: {}", name);
            return false;
        }
        self.name_filter
            .as_deref()
            .is_none_or(|filter| name.contains(filter))
    }
}

/// Checks if a collection name belongs to the server-managed namespace.
pub fn is_system_collection(name: &str) -> bool {
    name.starts_with(SYSTEM_COLLECTION_PREFIX)
}

/// Checks if a database is a known system database.
pub fn is_system_database(name: &str) -> bool {
    SYSTEM_DATABASES.contains(&name)
}

/// Lists the collection names of a database.
///
/// # Arguments
/// * `source` - Server (or stand-in) answering catalog commands
/// * `database` - Name of the database
/// * `options` - Filtering and ordering
///
/// # Errors
/// Propagates the source's error unchanged
pub async fn list_collections<S>(
    source: &S,
    database: &str,
    options: &ListOptions,
) -> Result<CollectionListing>
where
    S: CatalogSource + ?Sized,
{
    tracing::debug!("Listing collections in database: {}", database);

    let mut names: Vec<String> = source
        .collection_names(database)
        .await?
        .into_iter()
        .filter(|name| options.keeps(name))
        .collect();

    if options.sort {
        names.sort_unstable();
    }

    tracing::info!(
        "Listed {} collections in database '{}'",
        names.len(),
        database
    );

    Ok(CollectionListing {
        database: database.to_string(),
        names,
    })
}

/// Lists database names on the server.
///
/// # Arguments
/// * `source` - Server (or stand-in) answering catalog commands
/// * `include_system` - If true, includes admin, config and local
pub async fn list_databases<S>(source: &S, include_system: bool) -> Result<Vec<String>>
where
    S: CatalogSource + ?Sized,
{
    tracing::debug!("Listing databases (include_system: {})", include_system);

    let databases: Vec<String> = source
        .database_names()
        .await?
        .into_iter()
        .filter(|name| include_system || !is_system_database(name))
        .collect();

    tracing::info!(
        "Enumerated {} databases (include_system: {})",
        databases.len(),
        include_system
    );

    Ok(databases)
}
