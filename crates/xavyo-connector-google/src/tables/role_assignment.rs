//! `googledirectory_role_assignment`: role grants to users and groups.

use xavyo_connector::operation::Row;
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::{
    ColumnDefinition, GetConfig, GetKeyColumns, KeyColumn, ListConfig, TableDefinition,
};

use super::{customer_id, echo_qual, stream_pages, with_params};
use crate::directory_client::DirectoryClient;
use crate::models::{DirectoryItem, RoleAssignment, RoleAssignmentsResponse};
use crate::GoogleResult;

pub const TABLE: &str = "googledirectory_role_assignment";

const MAX_PAGE_SIZE: u32 = 200;

pub fn definition() -> TableDefinition {
    TableDefinition::new(TABLE, "Role assignments of the Google Workspace account.")
        .with_columns([
            ColumnDefinition::string("role_assignment_id", "Unique ID of the assignment."),
            ColumnDefinition::string("role_id", "ID of the assigned role."),
            ColumnDefinition::string("assigned_to", "Unique ID of the user or group the role is assigned to."),
            ColumnDefinition::string("assignee_type", "Whether the assignee is a user or a group."),
            ColumnDefinition::string("customer_id", "Customer account the assignment was listed from."),
            ColumnDefinition::string("user_key", "User the listing was filtered on."),
            ColumnDefinition::string("etag", "ETag of the resource."),
            ColumnDefinition::string("kind", "Type of the API resource."),
            ColumnDefinition::string("org_unit_id", "Organizational unit the assignment is scoped to."),
            ColumnDefinition::string("scope_type", "Scope of the assignment (CUSTOMER or ORG_UNIT)."),
        ])
        .with_list(
            ListConfig::new()
                .with_key_column(KeyColumn::optional("customer_id"))
                .with_key_column(KeyColumn::optional("role_id"))
                .with_key_column(KeyColumn::optional("user_key")),
        )
        .with_get(GetConfig::new(GetKeyColumns::single("role_assignment_id")))
}

pub async fn list(client: &DirectoryClient, ctx: &QueryContext, sink: &mut RowSink) -> GoogleResult<()> {
    let page_size = ctx.page_size(MAX_PAGE_SIZE).to_string();
    let mut params = vec![("maxResults", page_size.as_str())];
    if let Some(role_id) = ctx.quals.equals_non_blank("role_id") {
        params.push(("roleId", role_id));
    }
    if let Some(user_key) = ctx.quals.equals_non_blank("user_key") {
        params.push(("userKey", user_key));
    }

    let url = with_params(
        client.url(&["customer", customer_id(ctx), "roleassignments"])?,
        &params,
    );
    stream_pages::<RoleAssignmentsResponse, _>(client, url, ctx, sink, DirectoryItem::RoleAssignment)
        .await
}

pub async fn get(client: &DirectoryClient, customer: &str, assignment_id: &str) -> GoogleResult<RoleAssignment> {
    client
        .get(client.url(&["customer", customer, "roleassignments", assignment_id])?)
        .await
}

pub(crate) fn to_row(assignment: RoleAssignment, ctx: &QueryContext) -> Row {
    Row::new()
        .with("role_assignment_id", assignment.role_assignment_id)
        .with("role_id", assignment.role_id)
        .with("assigned_to", assignment.assigned_to)
        .with("assignee_type", assignment.assignee_type)
        .with("customer_id", echo_qual(ctx, "customer_id"))
        .with("user_key", echo_qual(ctx, "user_key"))
        .with("etag", assignment.etag)
        .with("kind", assignment.kind)
        .with("org_unit_id", assignment.org_unit_id)
        .with("scope_type", assignment.scope_type)
}
