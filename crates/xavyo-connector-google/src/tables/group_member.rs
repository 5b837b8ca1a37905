//! `googledirectory_group_member`: members of every matching group.
//!
//! Listing runs in two phases. The matching groups are listed first (same
//! filters as `googledirectory_group`), then the members of each group are
//! fetched concurrently on a bounded worker pool. All member pages are
//! collected before any row is streamed, so a failing group never leaves a
//! partial result behind.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, instrument, warn};
use xavyo_connector::operation::Row;
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::{
    ColumnDefinition, GetConfig, GetKeyColumns, KeyColumn, ListConfig, TableDefinition,
};

use super::{echo_qual, group, with_params};
use crate::config::MemberErrorPolicy;
use crate::directory_client::DirectoryClient;
use crate::ignore::should_ignore;
use crate::models::{GroupMembership, GroupsResponse, Member, MembersResponse};
use crate::{GoogleError, GoogleResult};

pub const TABLE: &str = "googledirectory_group_member";

const MAX_PAGE_SIZE: u32 = 200;

pub fn definition() -> TableDefinition {
    TableDefinition::new(TABLE, "Members of the groups in the Google Workspace directory.")
        .with_columns([
            ColumnDefinition::string("group_id", "ID of the group the member belongs to."),
            ColumnDefinition::string("name", "Group name the listing was filtered on."),
            ColumnDefinition::string("customer_id", "Customer account the groups were listed from."),
            ColumnDefinition::string("query", "Directory search query used to filter groups."),
            ColumnDefinition::string("id", "Unique ID of the member."),
            ColumnDefinition::string("email", "Email address of the member."),
            ColumnDefinition::string("role", "Role of the member in the group (OWNER, MANAGER or MEMBER)."),
            ColumnDefinition::string("status", "Status of the member."),
            ColumnDefinition::string("delivery_settings", "How the member receives group messages."),
            ColumnDefinition::string("etag", "ETag of the resource."),
            ColumnDefinition::string("kind", "Type of the API resource."),
            ColumnDefinition::string("type", "Type of the member (USER, GROUP or CUSTOMER)."),
        ])
        .with_list(
            ListConfig::new()
                .with_key_column(KeyColumn::optional("group_id"))
                .with_key_column(KeyColumn::optional("role"))
                .with_key_column(KeyColumn::optional("customer_id"))
                .with_key_column(KeyColumn::optional("name"))
                .with_key_column(KeyColumn::optional("query"))
                .ignoring(&[404]),
        )
        .with_get(GetConfig::new(GetKeyColumns::all(&["group_id", "id"])))
}

#[instrument(skip_all)]
pub async fn list(
    client: &Arc<DirectoryClient>,
    ctx: &QueryContext,
    sink: &mut RowSink,
) -> GoogleResult<()> {
    let mut groups = list_group_ids(client, ctx).await?;

    if let Some(group_id) = ctx.quals.equals_non_blank("group_id") {
        groups.retain(|g| g == group_id);
        if groups.is_empty() {
            debug!(group_id, "Group not in listing, nothing to fetch");
            return Ok(());
        }
    }

    let mut memberships = fetch_members(client, groups, ctx).await?;

    if ctx.wants_column("delivery_settings") {
        if let Some(remaining) = sink.rows_remaining() {
            memberships.truncate(usize::try_from(remaining).unwrap_or(usize::MAX));
        }
        memberships = hydrate_delivery_settings(client, memberships, ctx).await?;
    }

    sink.send_all(memberships.into_iter().map(|m| to_row(m, ctx)))
        .await;
    Ok(())
}

/// IDs of the groups matching the scan's group filters, in listing order.
async fn list_group_ids(client: &DirectoryClient, ctx: &QueryContext) -> GoogleResult<Vec<String>> {
    let url = group::list_url(client, ctx, group::MAX_PAGE_SIZE)?;
    let groups = client.pager::<GroupsResponse>(url).collect().await?;
    Ok(groups.into_iter().filter_map(|g| g.id).collect())
}

/// Fans out one member listing per group.
///
/// Results come back in group order whatever order the workers finish in.
async fn fetch_members(
    client: &Arc<DirectoryClient>,
    groups: Vec<String>,
    ctx: &QueryContext,
) -> GoogleResult<Vec<GroupMembership>> {
    let config = client.config();
    let policy = config.member_error_policy;
    let semaphore = Arc::new(Semaphore::new(config.member_concurrency.max(1)));
    let role = ctx.quals.equals_non_blank("role").map(str::to_string);
    let page_size = ctx.page_size(MAX_PAGE_SIZE);

    debug!(
        groups = groups.len(),
        workers = config.member_concurrency,
        ?policy,
        "Listing group members"
    );

    let mut workers = JoinSet::new();
    for (index, group_id) in groups.iter().enumerate() {
        let client = Arc::clone(client);
        let semaphore = Arc::clone(&semaphore);
        let role = role.clone();
        let group_id = group_id.clone();
        workers.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (index, Ok(Vec::new()));
            };
            let result = list_group_members(&client, &group_id, role.as_deref(), page_size).await;
            (index, result)
        });
    }

    let mut results: Vec<Option<Vec<Member>>> = vec![None; groups.len()];
    let mut failures: Vec<(usize, String)> = Vec::new();

    loop {
        let joined = tokio::select! {
            biased;
            () = ctx.cancellation.cancelled() => {
                debug!("Scan cancelled, aborting member workers");
                workers.abort_all();
                return Ok(Vec::new());
            }
            joined = workers.join_next() => joined,
        };
        let Some(joined) = joined else {
            break;
        };

        let (index, result) = match joined {
            Ok(output) => output,
            Err(e) => {
                workers.abort_all();
                return Err(GoogleError::GroupMemberFanOut {
                    failures: vec![("<worker>".to_string(), e.to_string())],
                });
            }
        };

        match result {
            Ok(members) => results[index] = Some(members),
            Err(err) if should_ignore(&err, &[404]) => {
                debug!(group_id = %groups[index], "Group vanished during listing");
                results[index] = Some(Vec::new());
            }
            Err(err) => match policy {
                MemberErrorPolicy::FailFast => {
                    warn!(group_id = %groups[index], error = %err, "Member listing failed, aborting");
                    workers.abort_all();
                    return Err(err);
                }
                MemberErrorPolicy::CollectAll => {
                    warn!(group_id = %groups[index], error = %err, "Member listing failed");
                    failures.push((index, err.to_string()));
                }
            },
        }
    }

    if !failures.is_empty() {
        failures.sort_by_key(|(index, _)| *index);
        return Err(GoogleError::GroupMemberFanOut {
            failures: failures
                .into_iter()
                .map(|(index, err)| (groups[index].clone(), err))
                .collect(),
        });
    }

    Ok(groups
        .into_iter()
        .zip(results)
        .flat_map(|(group_id, members)| {
            members.unwrap_or_default().into_iter().map(move |member| GroupMembership {
                group_id: group_id.clone(),
                member,
            })
        })
        .collect())
}

/// Every member of one group, all pages.
async fn list_group_members(
    client: &DirectoryClient,
    group_id: &str,
    role: Option<&str>,
    page_size: u32,
) -> GoogleResult<Vec<Member>> {
    let page_size = page_size.to_string();
    let mut params = vec![("maxResults", page_size.as_str())];
    if let Some(role) = role {
        params.push(("roles", role));
    }
    let url = with_params(client.url(&["groups", group_id, "members"])?, &params);
    client.pager::<MembersResponse>(url).collect().await
}

/// Delivery settings are only returned by the single-member call.
///
/// Runs on the same bounded worker pool as the member listing and keeps the
/// input order. A member that vanished in between keeps its listed fields.
async fn hydrate_delivery_settings(
    client: &Arc<DirectoryClient>,
    mut memberships: Vec<GroupMembership>,
    ctx: &QueryContext,
) -> GoogleResult<Vec<GroupMembership>> {
    let semaphore = Arc::new(Semaphore::new(client.config().member_concurrency.max(1)));
    let mut workers = JoinSet::new();

    for (index, membership) in memberships.iter().enumerate() {
        if membership.member.delivery_settings.is_some() {
            continue;
        }
        let Some(member_id) = membership.member.id.clone() else {
            continue;
        };
        let client = Arc::clone(client);
        let semaphore = Arc::clone(&semaphore);
        let group_id = membership.group_id.clone();
        workers.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (index, Ok(None));
            };
            let result = match get(&client, &group_id, &member_id).await {
                Ok(full) => Ok(full.member.delivery_settings),
                Err(err) if should_ignore(&err, &[404]) => Ok(None),
                Err(err) => Err(err),
            };
            (index, result)
        });
    }

    debug!(lookups = workers.len(), "Hydrating delivery settings");

    loop {
        let joined = tokio::select! {
            biased;
            () = ctx.cancellation.cancelled() => {
                workers.abort_all();
                return Ok(Vec::new());
            }
            joined = workers.join_next() => joined,
        };
        let Some(joined) = joined else {
            break;
        };

        let (index, result) = match joined {
            Ok(output) => output,
            Err(e) => {
                workers.abort_all();
                return Err(GoogleError::GroupMemberFanOut {
                    failures: vec![("<worker>".to_string(), e.to_string())],
                });
            }
        };
        match result {
            Ok(settings) => memberships[index].member.delivery_settings = settings,
            Err(err) => {
                workers.abort_all();
                return Err(err);
            }
        }
    }

    Ok(memberships)
}

pub async fn get(client: &DirectoryClient, group_id: &str, member_id: &str) -> GoogleResult<GroupMembership> {
    let member: Member = client
        .get(client.url(&["groups", group_id, "members", member_id])?)
        .await?;
    Ok(GroupMembership {
        group_id: group_id.to_string(),
        member,
    })
}

pub(crate) fn to_row(membership: GroupMembership, ctx: &QueryContext) -> Row {
    let GroupMembership { group_id, member } = membership;
    Row::new()
        .with("group_id", group_id)
        .with("name", echo_qual(ctx, "name"))
        .with("customer_id", echo_qual(ctx, "customer_id"))
        .with("query", echo_qual(ctx, "query"))
        .with("id", member.id)
        .with("email", member.email)
        .with("role", member.role)
        .with("status", member.status)
        .with("delivery_settings", member.delivery_settings)
        .with("etag", member.etag)
        .with("kind", member.kind)
        .with("type", member.member_type)
}
