//! `googledirectory_domain`: domains of the customer account.

use xavyo_connector::operation::Row;
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::{
    ColumnDefinition, GetConfig, GetKeyColumns, KeyColumn, ListConfig, TableDefinition,
};

use super::{customer_id, echo_qual, stream_items, unix_ms_timestamp};
use crate::directory_client::DirectoryClient;
use crate::models::{Domain, DomainsResponse, ListResponse};
use crate::GoogleResult;

pub const TABLE: &str = "googledirectory_domain";

pub fn definition() -> TableDefinition {
    TableDefinition::new(TABLE, "Domains of the Google Workspace account.")
        .with_columns([
            ColumnDefinition::string("domain_name", "Name of the domain."),
            ColumnDefinition::timestamp("creation_time", "When the domain was added."),
            ColumnDefinition::bool("is_primary", "Whether this is the primary domain."),
            ColumnDefinition::bool("verified", "Whether the domain is verified."),
            ColumnDefinition::string("customer_id", "Customer account the domain was listed from."),
            ColumnDefinition::string("etag", "ETag of the resource."),
            ColumnDefinition::string("kind", "Type of the API resource."),
            ColumnDefinition::json("domain_aliases", "Aliases of the domain."),
        ])
        .with_list(ListConfig::new().with_key_column(KeyColumn::optional("customer_id")))
        .with_get(GetConfig::new(GetKeyColumns::single("domain_name")))
}

pub async fn list(client: &DirectoryClient, ctx: &QueryContext, sink: &mut RowSink) -> GoogleResult<()> {
    let url = client.url(&["customer", customer_id(ctx), "domains"])?;
    let (domains, _) = client.get::<DomainsResponse>(url).await?.into_page();
    stream_items(domains, ctx, sink).await
}

pub async fn get(client: &DirectoryClient, customer: &str, domain_name: &str) -> GoogleResult<Domain> {
    client
        .get(client.url(&["customer", customer, "domains", domain_name])?)
        .await
}

pub(crate) fn to_row(domain: Domain, ctx: &QueryContext) -> Row {
    Row::new()
        .with("domain_name", domain.domain_name)
        .with("creation_time", unix_ms_timestamp(domain.creation_time))
        .with("is_primary", domain.is_primary)
        .with("verified", domain.verified)
        .with("customer_id", echo_qual(ctx, "customer_id"))
        .with("etag", domain.etag)
        .with("kind", domain.kind)
        .with("domain_aliases", domain.domain_aliases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_creation_time_is_converted() {
        let domain: Domain = serde_json::from_value(json!({
            "domainName": "example.com",
            "creationTime": "1600000000000",
            "isPrimary": true,
            "domainAliases": [{"domainAliasName": "example.org"}]
        }))
        .unwrap();

        let row = to_row(domain, &QueryContext::new());
        assert_eq!(row.get_str("creation_time"), Some("2020-09-13T12:26:40+00:00"));
        assert_eq!(row.get("is_primary"), Some(&json!(true)));
        assert_eq!(row.get("domain_aliases").unwrap()[0]["domainAliasName"], "example.org");
    }
}
