//! Directory resources exposed as tables.
//!
//! Each submodule owns one table: its definition, list and get calls, and
//! the mapping of its resource to a row.

pub mod domain;
pub mod domain_alias;
pub mod group;
pub mod group_member;
pub mod mobile_device;
pub mod org_unit;
pub mod privilege;
pub mod role;
pub mod role_assignment;
pub mod user;

use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use url::Url;
use xavyo_connector::operation::Row;
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::TableDefinition;

use crate::directory_client::DirectoryClient;
use crate::models::{DirectoryItem, ListResponse};
use crate::GoogleResult;

/// Customer ID alias of the account the credentials belong to.
pub const MY_CUSTOMER: &str = "my_customer";

/// Every table, in a stable order.
pub fn definitions() -> Vec<TableDefinition> {
    vec![
        domain::definition(),
        domain_alias::definition(),
        group::definition(),
        group_member::definition(),
        mobile_device::definition(),
        org_unit::definition(),
        privilege::definition(),
        role::definition(),
        role_assignment::definition(),
        user::definition(),
    ]
}

/// Customer a scan runs against.
pub(crate) fn customer_id(ctx: &QueryContext) -> &str {
    ctx.quals.equals_non_blank("customer_id").unwrap_or(MY_CUSTOMER)
}

/// Value of an equality qualifier, echoed back into its column.
pub(crate) fn echo_qual(ctx: &QueryContext, column: &str) -> Value {
    ctx.quals.equals(column).cloned().unwrap_or(Value::Null)
}

/// A query filter from the `query` qualifier, or else from derived terms.
pub(crate) fn query_filter(ctx: &QueryContext, terms: Vec<String>) -> Option<String> {
    if let Some(query) = ctx.quals.equals_non_blank("query") {
        return Some(query.to_string());
    }
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

pub(crate) fn with_params(mut url: Url, params: &[(&str, &str)]) -> Url {
    if !params.is_empty() {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            pairs.append_pair(key, value);
        }
    }
    url
}

/// Unix milliseconds as an RFC 3339 timestamp.
pub(crate) fn unix_ms_timestamp(ms: Option<i64>) -> Value {
    ms.and_then(chrono::DateTime::from_timestamp_millis)
        .map_or(Value::Null, |t| Value::String(t.to_rfc3339()))
}

/// Streams every page of a list endpoint.
///
/// Stops fetching once the sink is done; a host cancellation also aborts an
/// in-flight page request.
pub(crate) async fn stream_pages<R, F>(
    client: &DirectoryClient,
    url: Url,
    ctx: &QueryContext,
    sink: &mut RowSink,
    mut wrap: F,
) -> GoogleResult<()>
where
    R: ListResponse,
    F: FnMut(R::Item) -> DirectoryItem + Send,
{
    let mut pager = client.pager::<R>(url);

    loop {
        if sink.is_done() {
            debug!(rows = sink.rows_sent(), "Scan finished early");
            return Ok(());
        }

        let page = tokio::select! {
            biased;
            () = ctx.cancellation.cancelled() => return Ok(()),
            page = pager.next_page() => page?,
        };
        let Some(items) = page else {
            return Ok(());
        };

        for item in items {
            if !sink.send(wrap(item).into_row(ctx)).await {
                return Ok(());
            }
        }
    }
}

/// Streams the items of a single, unpaged response.
pub(crate) async fn stream_items<T>(
    items: Vec<T>,
    ctx: &QueryContext,
    sink: &mut RowSink,
) -> GoogleResult<()>
where
    T: Into<DirectoryItem>,
{
    sink.send_all(items.into_iter().map(|item| item.into().into_row(ctx)))
        .await;
    Ok(())
}

/// Lists a table into the sink.
pub(crate) async fn list(
    table: &str,
    client: &Arc<DirectoryClient>,
    ctx: &QueryContext,
    sink: &mut RowSink,
) -> GoogleResult<()> {
    match table {
        domain::TABLE => domain::list(client, ctx, sink).await,
        domain_alias::TABLE => domain_alias::list(client, ctx, sink).await,
        group::TABLE => group::list(client, ctx, sink).await,
        group_member::TABLE => group_member::list(client, ctx, sink).await,
        mobile_device::TABLE => mobile_device::list(client, ctx, sink).await,
        org_unit::TABLE => org_unit::list(client, ctx, sink).await,
        privilege::TABLE => privilege::list(client, ctx, sink).await,
        role::TABLE => role::list(client, ctx, sink).await,
        role_assignment::TABLE => role_assignment::list(client, ctx, sink).await,
        user::TABLE => user::list(client, ctx, sink).await,
        _ => Ok(()),
    }
}

/// Fetches one item by its resolved key columns.
pub(crate) async fn get(
    table: &str,
    client: &DirectoryClient,
    ctx: &QueryContext,
    keys: &[(&str, &str)],
) -> GoogleResult<Option<DirectoryItem>> {
    let key = |column: &str| keys.iter().find(|(c, _)| *c == column).map(|(_, v)| *v);
    let Some(&(_, first)) = keys.first() else {
        return Ok(None);
    };
    let customer = customer_id(ctx);

    let item: DirectoryItem = match table {
        domain::TABLE => domain::get(client, customer, first).await?.into(),
        domain_alias::TABLE => domain_alias::get(client, customer, first).await?.into(),
        group::TABLE => group::get(client, first).await?.into(),
        group_member::TABLE => {
            let (Some(group_id), Some(member_id)) = (key("group_id"), key("id")) else {
                return Ok(None);
            };
            group_member::get(client, group_id, member_id).await?.into()
        }
        mobile_device::TABLE => mobile_device::get(client, customer, first).await?.into(),
        org_unit::TABLE => match org_unit::get(client, customer, first).await? {
            Some(unit) => unit.into(),
            None => return Ok(None),
        },
        role::TABLE => role::get(client, customer, first).await?.into(),
        role_assignment::TABLE => role_assignment::get(client, customer, first).await?.into(),
        user::TABLE => user::get(client, first).await?.into(),
        _ => return Ok(None),
    };
    Ok(Some(item))
}

impl DirectoryItem {
    /// Maps the item onto its table's columns.
    pub fn into_row(self, ctx: &QueryContext) -> Row {
        match self {
            DirectoryItem::User(item) => user::to_row(item, ctx),
            DirectoryItem::Group(item) => group::to_row(item, ctx),
            DirectoryItem::Member(item) => group_member::to_row(item, ctx),
            DirectoryItem::Domain(item) => domain::to_row(item, ctx),
            DirectoryItem::DomainAlias(item) => domain_alias::to_row(item, ctx),
            DirectoryItem::OrgUnit(item) => org_unit::to_row(item, ctx),
            DirectoryItem::Role(item) => role::to_row(item, ctx),
            DirectoryItem::RoleAssignment(item) => role_assignment::to_row(item, ctx),
            DirectoryItem::Privilege(item) => privilege::to_row(item, ctx),
            DirectoryItem::MobileDevice(item) => mobile_device::to_row(item, ctx),
        }
    }
}
