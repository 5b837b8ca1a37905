//! `googledirectory_privilege`: privileges that roles can grant.

use xavyo_connector::operation::Row;
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::{ColumnDefinition, KeyColumn, ListConfig, TableDefinition};

use super::{customer_id, echo_qual, stream_items};
use crate::directory_client::DirectoryClient;
use crate::models::{ListResponse, Privilege, PrivilegesResponse};
use crate::GoogleResult;

pub const TABLE: &str = "googledirectory_privilege";

pub fn definition() -> TableDefinition {
    TableDefinition::new(TABLE, "Privileges available to administrator roles.")
        .with_columns([
            ColumnDefinition::string("privilege_name", "Name of the privilege."),
            ColumnDefinition::string("service_name", "Name of the service the privilege belongs to."),
            ColumnDefinition::string("service_id", "Obfuscated ID of the service."),
            ColumnDefinition::bool("is_ou_scopable", "Whether the privilege can be scoped to an organizational unit."),
            ColumnDefinition::string("customer_id", "Customer account the privileges were listed from."),
            ColumnDefinition::string("etag", "ETag of the resource."),
            ColumnDefinition::string("kind", "Type of the API resource."),
            ColumnDefinition::json("child_privileges", "Privileges nested under this one."),
        ])
        .with_list(
            ListConfig::new()
                .with_key_column(KeyColumn::optional("customer_id"))
                .ignoring(&[403, 404]),
        )
}

pub async fn list(client: &DirectoryClient, ctx: &QueryContext, sink: &mut RowSink) -> GoogleResult<()> {
    let url = client.url(&["customer", customer_id(ctx), "roles", "ALL", "privileges"])?;
    let (privileges, _) = client.get::<PrivilegesResponse>(url).await?.into_page();
    stream_items(privileges, ctx, sink).await
}

pub(crate) fn to_row(privilege: Privilege, ctx: &QueryContext) -> Row {
    Row::new()
        .with("privilege_name", privilege.privilege_name)
        .with("service_name", privilege.service_name)
        .with("service_id", privilege.service_id)
        .with("is_ou_scopable", privilege.is_ou_scopable)
        .with("customer_id", echo_qual(ctx, "customer_id"))
        .with("etag", privilege.etag)
        .with("kind", privilege.kind)
        .with("child_privileges", privilege.child_privileges)
}
