//! The Google Workspace Directory table plugin.

use async_trait::async_trait;
use tracing::{debug, instrument};
use xavyo_connector::config::Connection;
use xavyo_connector::error::{ConnectorError, ConnectorResult};
use xavyo_connector::operation::Row;
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::TableDefinition;
use xavyo_connector::traits::TablePlugin;

use crate::ignore::should_ignore;
use crate::service::ServiceCache;
use crate::tables;

/// Serves the `googledirectory_*` tables.
#[derive(Debug, Default)]
pub struct GoogleDirectoryPlugin {
    services: ServiceCache,
}

impl GoogleDirectoryPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The per-connection client cache.
    #[must_use]
    pub fn services(&self) -> &ServiceCache {
        &self.services
    }
}

#[async_trait]
impl TablePlugin for GoogleDirectoryPlugin {
    fn name(&self) -> &str {
        "googledirectory"
    }

    fn tables(&self) -> Vec<TableDefinition> {
        tables::definitions()
    }

    #[instrument(skip(self, connection, ctx, sink), fields(connection = %connection.name))]
    async fn list(
        &self,
        connection: &Connection,
        table: &str,
        ctx: &QueryContext,
        sink: &mut RowSink,
    ) -> ConnectorResult<()> {
        let definition = self.table(table)?;
        let ignore = definition
            .list
            .map(|list| list.ignore_statuses)
            .unwrap_or_default();

        let client = self.services.get_client(connection).await?;

        match tables::list(table, &client, ctx, sink).await {
            Ok(()) => {
                debug!(rows = sink.rows_sent(), "List complete");
                Ok(())
            }
            Err(err) if should_ignore(&err, &ignore) => {
                debug!(error = %err, "Ignoring upstream error, returning no rows");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    #[instrument(skip(self, connection, ctx), fields(connection = %connection.name))]
    async fn get(
        &self,
        connection: &Connection,
        table: &str,
        ctx: &QueryContext,
    ) -> ConnectorResult<Option<Row>> {
        let definition = self.table(table)?;
        let Some(get) = definition.get else {
            return Err(ConnectorError::GetNotSupported {
                table: table.to_string(),
            });
        };

        let Some(keys) = get.key_columns.resolve(&ctx.quals) else {
            debug!("Key columns missing or blank, skipping lookup");
            return Ok(None);
        };

        let client = self.services.get_client(connection).await?;

        match tables::get(table, &client, ctx, &keys).await {
            Ok(item) => Ok(item.map(|item| item.into_row(ctx))),
            Err(err) if should_ignore(&err, &get.ignore_statuses) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
