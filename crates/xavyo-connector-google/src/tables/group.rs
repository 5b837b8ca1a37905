//! `googledirectory_group`: groups of the Workspace directory.

use xavyo_connector::operation::Row;
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::{
    ColumnDefinition, GetConfig, GetKeyColumns, KeyColumn, ListConfig, TableDefinition,
};

use super::{customer_id, echo_qual, query_filter, stream_pages, with_params};
use crate::directory_client::DirectoryClient;
use crate::models::{DirectoryItem, Group, GroupsResponse};
use crate::GoogleResult;

pub const TABLE: &str = "googledirectory_group";

pub(crate) const MAX_PAGE_SIZE: u32 = 200;

/// The API rejects an empty query; this one matches every group.
pub(crate) const MATCH_ALL: &str = "name:**";

pub fn definition() -> TableDefinition {
    TableDefinition::new(TABLE, "Groups defined in the Google Workspace directory.")
        .with_columns([
            ColumnDefinition::string("name", "Display name of the group."),
            ColumnDefinition::string("id", "Unique ID of the group."),
            ColumnDefinition::string("email", "Email address of the group."),
            ColumnDefinition::bool("admin_created", "Whether an administrator created the group."),
            ColumnDefinition::string("customer_id", "Customer account the group was listed from."),
            ColumnDefinition::string("description", "Description of the group."),
            ColumnDefinition::int("direct_members_count", "Number of direct members."),
            ColumnDefinition::string("etag", "ETag of the resource."),
            ColumnDefinition::string("kind", "Type of the API resource."),
            ColumnDefinition::string("query", "Directory search query used to filter groups."),
            ColumnDefinition::json("aliases", "Alias email addresses of the group."),
            ColumnDefinition::json("non_editable_aliases", "Non-editable alias email addresses."),
        ])
        .with_list(
            ListConfig::new()
                .with_key_column(KeyColumn::optional("customer_id"))
                .with_key_column(KeyColumn::optional("name"))
                .with_key_column(KeyColumn::optional("query"))
                .ignoring(&[404]),
        )
        .with_get(GetConfig::new(GetKeyColumns::any(&["id", "email"])))
}

/// The group search query of a scan: `query`, else `name`, else match-all.
pub(crate) fn group_query(ctx: &QueryContext) -> String {
    let terms = ctx
        .quals
        .equals_str("name")
        .map(|name| vec![format!("name='{name}'")])
        .unwrap_or_default();
    query_filter(ctx, terms).unwrap_or_else(|| MATCH_ALL.to_string())
}

/// URL of a group listing.
pub(crate) fn list_url(client: &DirectoryClient, ctx: &QueryContext, page_size: u32) -> GoogleResult<url::Url> {
    let page_size = page_size.to_string();
    let query = group_query(ctx);
    Ok(with_params(
        client.url(&["groups"])?,
        &[
            ("customer", customer_id(ctx)),
            ("query", query.as_str()),
            ("maxResults", page_size.as_str()),
        ],
    ))
}

pub async fn list(client: &DirectoryClient, ctx: &QueryContext, sink: &mut RowSink) -> GoogleResult<()> {
    let url = list_url(client, ctx, ctx.page_size(MAX_PAGE_SIZE))?;
    stream_pages::<GroupsResponse, _>(client, url, ctx, sink, DirectoryItem::Group).await
}

/// `group_key` is the group's ID or email.
pub async fn get(client: &DirectoryClient, group_key: &str) -> GoogleResult<Group> {
    client.get(client.url(&["groups", group_key])?).await
}

pub(crate) fn to_row(group: Group, ctx: &QueryContext) -> Row {
    Row::new()
        .with("name", group.name)
        .with("id", group.id)
        .with("email", group.email)
        .with("admin_created", group.admin_created)
        .with("customer_id", echo_qual(ctx, "customer_id"))
        .with("description", group.description)
        .with("direct_members_count", group.direct_members_count)
        .with("etag", group.etag)
        .with("kind", group.kind)
        .with("query", echo_qual(ctx, "query"))
        .with("aliases", group.aliases)
        .with("non_editable_aliases", group.non_editable_aliases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xavyo_connector::operation::Qualifier;

    #[test]
    fn test_group_query() {
        assert_eq!(group_query(&QueryContext::new()), "name:**");

        let ctx = QueryContext::new().with_qual(Qualifier::equal("name", "Engineering"));
        assert_eq!(group_query(&ctx), "name='Engineering'");

        let ctx = ctx.with_qual(Qualifier::equal("query", "email:eng*"));
        assert_eq!(group_query(&ctx), "email:eng*");

        let ctx = QueryContext::new().with_qual(Qualifier::equal("query", ""));
        assert_eq!(group_query(&ctx), "name:**");
    }

    #[test]
    fn test_to_row_echoes_qualifiers() {
        let group: Group = serde_json::from_value(serde_json::json!({
            "id": "g1", "email": "eng@example.com", "directMembersCount": "3"
        }))
        .unwrap();
        let ctx = QueryContext::new().with_qual(Qualifier::equal("customer_id", "C01"));

        let row = to_row(group, &ctx);
        assert_eq!(row.get_str("customer_id"), Some("C01"));
        assert_eq!(row.get("direct_members_count"), Some(&serde_json::json!(3)));
        assert_eq!(row.get("query"), Some(&serde_json::Value::Null));
    }
}
