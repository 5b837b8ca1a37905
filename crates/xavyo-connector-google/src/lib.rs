//! Google Workspace Directory Connector for xavyo
//!
//! Exposes the Directory API (Admin SDK) as read-only tables: users, groups,
//! group members, domains, domain aliases, organizational units, roles, role
//! assignments, privileges and mobile devices.
//!
//! # Features
//!
//! - Service account domain-wide delegation and authorized-user credentials
//! - One cached, authenticated client per connection
//! - Filter pushdown for customer, name, query and boolean qualifiers
//! - Paged streaming that honours the host's row limit and cancellation
//! - Concurrent group member listing with a configurable error policy
//!
//! # Example
//!
//! ```no_run
//! use serde_json::json;
//! use xavyo_connector::prelude::*;
//! use xavyo_connector_google::GoogleDirectoryPlugin;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let plugin = GoogleDirectoryPlugin::new();
//! let connection = Connection::new(
//!     "workspace",
//!     json!({
//!         "credentials": "~/keys/directory-reader.json",
//!         "impersonated_user_email": "admin@example.com"
//!     }),
//! );
//!
//! let ctx = QueryContext::new()
//!     .with_qual(Qualifier::equal("is_admin", true))
//!     .with_limit(50);
//! let (rows, result) = collect_rows(&plugin, &connection, "googledirectory_user", &ctx).await;
//! result?;
//! println!("{} admins", rows.len());
//! # Ok(())
//! # }
//! ```

mod auth;
mod config;
mod directory_client;
mod error;
mod ignore;
pub mod models;
mod plugin;
mod service;
pub mod tables;

// Re-exports
pub use auth::{AuthorizedUser, GoogleCredentials, ServiceAccountKey, TokenCache, DEFAULT_TOKEN_URI};
pub use config::{
    CredentialSource, GoogleDirectoryConfig, KeySource, MemberErrorPolicy, DEFAULT_BASE_URL,
    DEFAULT_SCOPES,
};
pub use directory_client::{DirectoryClient, Pager};
pub use error::{GoogleError, GoogleResult};
pub use ignore::should_ignore;
pub use models::DirectoryItem;
pub use plugin::GoogleDirectoryPlugin;
pub use service::ServiceCache;
