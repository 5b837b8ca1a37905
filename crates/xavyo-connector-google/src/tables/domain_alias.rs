//! `googledirectory_domain_alias`: domain aliases of the customer account.

use xavyo_connector::operation::Row;
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::{
    ColumnDefinition, GetConfig, GetKeyColumns, KeyColumn, ListConfig, TableDefinition,
};

use super::{customer_id, echo_qual, stream_items, unix_ms_timestamp};
use crate::directory_client::DirectoryClient;
use crate::models::{DomainAlias, DomainAliasesResponse, ListResponse};
use crate::GoogleResult;

pub const TABLE: &str = "googledirectory_domain_alias";

pub fn definition() -> TableDefinition {
    TableDefinition::new(TABLE, "Domain aliases of the Google Workspace account.")
        .with_columns([
            ColumnDefinition::string("domain_alias_name", "Name of the domain alias."),
            ColumnDefinition::timestamp("creation_time", "When the alias was added."),
            ColumnDefinition::bool("verified", "Whether the alias is verified."),
            ColumnDefinition::string("customer_id", "Customer account the alias was listed from."),
            ColumnDefinition::string("etag", "ETag of the resource."),
            ColumnDefinition::string("kind", "Type of the API resource."),
            ColumnDefinition::string("parent_domain_name", "Domain the alias belongs to."),
        ])
        .with_list(ListConfig::new().with_key_column(KeyColumn::optional("customer_id")))
        .with_get(GetConfig::new(GetKeyColumns::single("domain_alias_name")))
}

pub async fn list(client: &DirectoryClient, ctx: &QueryContext, sink: &mut RowSink) -> GoogleResult<()> {
    let url = client.url(&["customer", customer_id(ctx), "domainaliases"])?;
    let (aliases, _) = client.get::<DomainAliasesResponse>(url).await?.into_page();
    stream_items(aliases, ctx, sink).await
}

pub async fn get(client: &DirectoryClient, customer: &str, alias_name: &str) -> GoogleResult<DomainAlias> {
    client
        .get(client.url(&["customer", customer, "domainaliases", alias_name])?)
        .await
}

pub(crate) fn to_row(alias: DomainAlias, ctx: &QueryContext) -> Row {
    Row::new()
        .with("domain_alias_name", alias.domain_alias_name)
        .with("creation_time", unix_ms_timestamp(alias.creation_time))
        .with("verified", alias.verified)
        .with("customer_id", echo_qual(ctx, "customer_id"))
        .with("etag", alias.etag)
        .with("kind", alias.kind)
        .with("parent_domain_name", alias.parent_domain_name)
}
