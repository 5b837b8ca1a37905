//! `googledirectory_role`: administrator roles.

use xavyo_connector::operation::Row;
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::{
    ColumnDefinition, GetConfig, GetKeyColumns, KeyColumn, ListConfig, TableDefinition,
};

use super::{customer_id, echo_qual, stream_pages, with_params};
use crate::directory_client::DirectoryClient;
use crate::models::{DirectoryItem, Role, RolesResponse};
use crate::GoogleResult;

pub const TABLE: &str = "googledirectory_role";

const MAX_PAGE_SIZE: u32 = 100;

pub fn definition() -> TableDefinition {
    TableDefinition::new(TABLE, "Administrator roles of the Google Workspace account.")
        .with_columns([
            ColumnDefinition::string("role_name", "Name of the role."),
            ColumnDefinition::string("role_id", "Unique ID of the role."),
            ColumnDefinition::bool("is_super_admin_role", "Whether this is a super administrator role."),
            ColumnDefinition::bool("is_system_role", "Whether this is a predefined system role."),
            ColumnDefinition::string("role_description", "Description of the role."),
            ColumnDefinition::string("customer_id", "Customer account the role was listed from."),
            ColumnDefinition::string("etag", "ETag of the resource."),
            ColumnDefinition::string("kind", "Type of the API resource."),
            ColumnDefinition::json("role_privileges", "Privileges granted by the role."),
        ])
        .with_list(ListConfig::new().with_key_column(KeyColumn::optional("customer_id")))
        .with_get(GetConfig::new(GetKeyColumns::single("role_id")))
}

pub async fn list(client: &DirectoryClient, ctx: &QueryContext, sink: &mut RowSink) -> GoogleResult<()> {
    let page_size = ctx.page_size(MAX_PAGE_SIZE).to_string();
    let url = with_params(
        client.url(&["customer", customer_id(ctx), "roles"])?,
        &[("maxResults", page_size.as_str())],
    );
    stream_pages::<RolesResponse, _>(client, url, ctx, sink, DirectoryItem::Role).await
}

pub async fn get(client: &DirectoryClient, customer: &str, role_id: &str) -> GoogleResult<Role> {
    client
        .get(client.url(&["customer", customer, "roles", role_id])?)
        .await
}

pub(crate) fn to_row(role: Role, ctx: &QueryContext) -> Row {
    Row::new()
        .with("role_name", role.role_name)
        .with("role_id", role.role_id)
        .with("is_super_admin_role", role.is_super_admin_role)
        .with("is_system_role", role.is_system_role)
        .with("role_description", role.role_description)
        .with("customer_id", echo_qual(ctx, "customer_id"))
        .with("etag", role.etag)
        .with("kind", role.kind)
        .with("role_privileges", role.role_privileges)
}
