//! `googledirectory_org_unit`: organizational units.

use xavyo_connector::operation::Row;
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::{
    ColumnDefinition, GetConfig, GetKeyColumns, KeyColumn, ListConfig, TableDefinition,
};

use super::{customer_id, echo_qual, stream_items, with_params};
use crate::directory_client::DirectoryClient;
use crate::models::{ListResponse, OrgUnit, OrgUnitsResponse};
use crate::GoogleResult;

pub const TABLE: &str = "googledirectory_org_unit";

pub fn definition() -> TableDefinition {
    TableDefinition::new(TABLE, "Organizational units of the Google Workspace account.")
        .with_columns([
            ColumnDefinition::string("name", "Name of the organizational unit."),
            ColumnDefinition::string("org_unit_id", "Unique ID of the organizational unit."),
            ColumnDefinition::string("org_unit_path", "Full path of the organizational unit."),
            ColumnDefinition::bool("block_inheritance", "Whether settings inheritance is blocked."),
            ColumnDefinition::string("customer_id", "Customer account the unit was listed from."),
            ColumnDefinition::string("description", "Description of the organizational unit."),
            ColumnDefinition::string("etag", "ETag of the resource."),
            ColumnDefinition::string("kind", "Type of the API resource."),
            ColumnDefinition::string("parent_org_unit_id", "ID of the parent organizational unit."),
            ColumnDefinition::string("parent_org_unit_path", "Path of the parent organizational unit."),
        ])
        .with_list(ListConfig::new().with_key_column(KeyColumn::optional("customer_id")))
        .with_get(GetConfig::new(GetKeyColumns::any(&["org_unit_id", "org_unit_path"])))
}

pub async fn list(client: &DirectoryClient, ctx: &QueryContext, sink: &mut RowSink) -> GoogleResult<()> {
    let url = with_params(
        client.url(&["customer", customer_id(ctx), "orgunits"])?,
        &[("type", "all")],
    );
    let (units, _) = client.get::<OrgUnitsResponse>(url).await?.into_page();
    stream_items(units, ctx, sink).await
}

/// `org_unit` is an ID (`id:...`) or a path; a path spans several URL
/// segments. The root path `/` names no unit and yields `None`.
pub async fn get(
    client: &DirectoryClient,
    customer: &str,
    org_unit: &str,
) -> GoogleResult<Option<OrgUnit>> {
    let Some(segments) = unit_segments(customer, org_unit) else {
        return Ok(None);
    };
    Ok(Some(client.get(client.url(&segments)?).await?))
}

fn unit_segments<'a>(customer: &'a str, org_unit: &'a str) -> Option<Vec<&'a str>> {
    let unit: Vec<&str> = org_unit.split('/').filter(|s| !s.trim().is_empty()).collect();
    if unit.is_empty() {
        return None;
    }
    let mut segments = vec!["customer", customer, "orgunits"];
    segments.extend(unit);
    Some(segments)
}

pub(crate) fn to_row(unit: OrgUnit, ctx: &QueryContext) -> Row {
    Row::new()
        .with("name", unit.name)
        .with("org_unit_id", unit.org_unit_id)
        .with("org_unit_path", unit.org_unit_path)
        .with("block_inheritance", unit.block_inheritance)
        .with("customer_id", echo_qual(ctx, "customer_id"))
        .with("description", unit.description)
        .with("etag", unit.etag)
        .with("kind", unit.kind)
        .with("parent_org_unit_id", unit.parent_org_unit_id)
        .with("parent_org_unit_path", unit.parent_org_unit_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_segments() {
        assert_eq!(
            unit_segments("my_customer", "/Sales/EMEA"),
            Some(vec!["customer", "my_customer", "orgunits", "Sales", "EMEA"])
        );
        assert_eq!(
            unit_segments("C01", "id:03ph8a2z1"),
            Some(vec!["customer", "C01", "orgunits", "id:03ph8a2z1"])
        );
    }

    #[test]
    fn test_root_path_names_no_unit() {
        assert_eq!(unit_segments("my_customer", "/"), None);
        assert_eq!(unit_segments("my_customer", "//"), None);
    }
}
