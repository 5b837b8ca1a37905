//! # Connector Framework
//!
//! Core abstractions for exposing external identity directories as read-only
//! tables inside a host query engine.
//!
//! ## Architecture
//!
//! - [`TablePlugin`] - Trait every connector implements
//! - [`TableDefinition`] - Columns, key columns, and entry points of a table
//! - [`QueryContext`] - Qualifiers, limit, requested columns, and cancellation
//!   for one scan
//! - [`RowSink`] - Streams rows back to the host, honouring limit and
//!   cancellation
//!
//! ## Example
//!
//! ```ignore
//! use xavyo_connector::prelude::*;
//!
//! let connection = Connection::new("workspace", config_json);
//! let ctx = QueryContext::new()
//!     .with_qual(Qualifier::equal("customer_id", "C0123"))
//!     .with_limit(100);
//!
//! let (rows, result) = collect_rows(&plugin, &connection, "googledirectory_user", &ctx).await;
//! result?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`ids`] - Type-safe identifiers (`ConnectionName`)
//! - [`error`] - Error types with classification codes
//! - [`traits`] - The table plugin trait
//! - [`schema`] - Table and column definitions
//! - [`operation`] - Qualifiers and rows
//! - [`query`] - Query context and row sink
//! - [`config`] - Configuration trait, connection settings, and connections

pub mod config;
pub mod error;
pub mod ids;
pub mod operation;
pub mod query;
pub mod schema;
pub mod traits;

pub use query::{QueryContext, RowSink};
pub use schema::TableDefinition;
pub use traits::TablePlugin;

/// Prelude module for convenient imports.
///
/// ```
/// use xavyo_connector::prelude::*;
/// ```
pub mod prelude {
    // IDs
    pub use crate::ids::ConnectionName;

    // Error handling
    pub use crate::error::{ConnectorError, ConnectorResult};

    // Traits
    pub use crate::traits::{collect_rows, TablePlugin};

    // Schema
    pub use crate::schema::{
        ColumnDefinition, ColumnType, GetConfig, GetKeyColumns, KeyColumn, KeyRequirement,
        ListConfig, TableDefinition,
    };

    // Operations
    pub use crate::operation::{QualOperator, Qualifier, Quals, Row};

    // Query
    pub use crate::query::{QueryContext, RowReceiver, RowSink};

    // Configuration
    pub use crate::config::{Connection, ConnectionSettings, ConnectorConfig};
}

// Re-export async_trait for connector implementors
pub use async_trait::async_trait;
