//! Connector Framework traits
//!
//! The seam between the host query engine and a table plugin.

use async_trait::async_trait;

use crate::config::Connection;
use crate::error::{ConnectorError, ConnectorResult};
use crate::operation::Row;
use crate::query::{QueryContext, RowSink};
use crate::schema::TableDefinition;

/// A plugin serving one or more read-only tables.
///
/// The host calls [`TablePlugin::list`] for scans and [`TablePlugin::get`]
/// for key lookups. Both receive the connection the query runs against; the
/// plugin owns any per-connection caches.
#[async_trait]
pub trait TablePlugin: Send + Sync {
    /// Name of the plugin, used as the table name prefix.
    fn name(&self) -> &str;

    /// All tables served by this plugin.
    fn tables(&self) -> Vec<TableDefinition>;

    /// Find a table definition by name.
    fn table(&self, name: &str) -> ConnectorResult<TableDefinition> {
        self.tables()
            .into_iter()
            .find(|t| t.name == name)
            .ok_or_else(|| ConnectorError::TableNotFound {
                table: name.to_string(),
            })
    }

    /// Stream the rows of a table into the sink.
    ///
    /// Rows already sent stay delivered if the call later fails.
    async fn list(
        &self,
        connection: &Connection,
        table: &str,
        ctx: &QueryContext,
        sink: &mut RowSink,
    ) -> ConnectorResult<()>;

    /// Fetch one row by its key columns.
    ///
    /// Returns `Ok(None)` when the key qualifiers are missing or blank.
    async fn get(
        &self,
        connection: &Connection,
        table: &str,
        ctx: &QueryContext,
    ) -> ConnectorResult<Option<Row>>;
}

/// Run a scan to completion and collect its rows.
///
/// Drains the receiver while the plugin is still producing, so a sink with a
/// small buffer never blocks the scan. Returns the rows received and the
/// outcome of the scan; rows streamed before a failure are kept.
pub async fn collect_rows<P: TablePlugin + ?Sized>(
    plugin: &P,
    connection: &Connection,
    table: &str,
    ctx: &QueryContext,
) -> (Vec<Row>, ConnectorResult<()>) {
    let (mut sink, mut rx) = RowSink::channel(ctx, 64);

    let produce = async move {
        let result = plugin.list(connection, table, ctx, &mut sink).await;
        drop(sink);
        result
    };

    let consume = async {
        let mut rows = Vec::new();
        while let Some(row) = rx.recv().await {
            rows.push(row);
        }
        rows
    };

    let (result, rows) = tokio::join!(produce, consume);
    (rows, result)
}
