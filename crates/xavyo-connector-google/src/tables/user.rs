//! `googledirectory_user`: accounts of the Workspace directory.

use xavyo_connector::operation::{QualOperator, Quals, Row};
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::{
    ColumnDefinition, GetConfig, GetKeyColumns, KeyColumn, ListConfig, TableDefinition,
};

use super::{customer_id, echo_qual, query_filter, stream_pages, with_params};
use crate::directory_client::DirectoryClient;
use crate::models::{DirectoryItem, User, UsersResponse};
use crate::GoogleResult;

pub const TABLE: &str = "googledirectory_user";

const MAX_PAGE_SIZE: u32 = 500;

/// String columns pushed down as `field='value'`.
const STRING_FILTERS: [(&str, &str); 3] = [
    ("full_name", "name"),
    ("family_name", "familyName"),
    ("given_name", "givenName"),
];

/// Boolean columns pushed down as `field=bool`; `<>` is folded into `=`.
const BOOL_FILTERS: [(&str, &str); 3] = [
    ("is_admin", "isAdmin"),
    ("is_delegated_admin", "isDelegatedAdmin"),
    ("suspended", "isSuspended"),
];

pub fn definition() -> TableDefinition {
    let bool_ops = [QualOperator::Eq, QualOperator::NotEq];

    TableDefinition::new(TABLE, "Users defined in the Google Workspace directory.")
        .with_columns([
            ColumnDefinition::string("full_name", "Full name formed from the given and family names."),
            ColumnDefinition::string("id", "Unique ID of the user."),
            ColumnDefinition::string("primary_email", "Primary email address of the user."),
            ColumnDefinition::string("customer_id", "ID of the customer account the user belongs to."),
            ColumnDefinition::timestamp("creation_time", "When the account was created."),
            ColumnDefinition::bool("is_admin", "Whether the user has super administrator privileges."),
            ColumnDefinition::bool("is_delegated_admin", "Whether the user is a delegated administrator."),
            ColumnDefinition::bool("suspended", "Whether the user is suspended."),
            ColumnDefinition::bool("agreed_to_terms", "Whether the user accepted the Terms of Service."),
            ColumnDefinition::bool("archived", "Whether the user is archived."),
            ColumnDefinition::bool("change_password_at_next_login", "Whether a password change is forced at next login."),
            ColumnDefinition::timestamp("deletion_time", "When the account was deleted."),
            ColumnDefinition::string("etag", "ETag of the resource."),
            ColumnDefinition::string("family_name", "Last name of the user."),
            ColumnDefinition::json("gender", "Gender of the user."),
            ColumnDefinition::string("given_name", "First name of the user."),
            ColumnDefinition::string("hash_function", "Hash format of the password property."),
            ColumnDefinition::bool("include_in_global_address_list", "Whether the profile is visible in the global address list."),
            ColumnDefinition::bool("ip_whitelisted", "Whether the user's IP address is allow-listed."),
            ColumnDefinition::bool("is_enforced_in_2sv", "Whether 2-step verification is enforced."),
            ColumnDefinition::bool("is_enrolled_in_2sv", "Whether the user is enrolled in 2-step verification."),
            ColumnDefinition::bool("is_mailbox_setup", "Whether the Google mailbox is created."),
            ColumnDefinition::string("kind", "Type of the API resource."),
            ColumnDefinition::timestamp("last_login_time", "Last time the user logged in."),
            ColumnDefinition::string("org_unit_path", "Path of the organizational unit the user belongs to."),
            ColumnDefinition::string("recovery_email", "Recovery email of the user."),
            ColumnDefinition::string("recovery_phone", "Recovery phone of the user."),
            ColumnDefinition::string("suspension_reason", "Why the account was suspended."),
            ColumnDefinition::string("thumbnail_photo_etag", "ETag of the user's photo."),
            ColumnDefinition::string("thumbnail_photo_url", "URL of the user's photo."),
            ColumnDefinition::string("query", "Directory search query used to filter users."),
            ColumnDefinition::json("addresses", "Addresses of the user."),
            ColumnDefinition::json("aliases", "Alias email addresses."),
            ColumnDefinition::json("custom_schemas", "Custom fields of the user."),
            ColumnDefinition::json("emails", "Email addresses of the user."),
            ColumnDefinition::json("external_ids", "External IDs such as an employee ID."),
            ColumnDefinition::json("ims", "Instant messaging accounts."),
            ColumnDefinition::json("keywords", "Keywords of the user."),
            ColumnDefinition::json("languages", "Languages of the user."),
            ColumnDefinition::json("locations", "Locations of the user."),
            ColumnDefinition::json("non_editable_aliases", "Non-editable alias email addresses."),
            ColumnDefinition::json("notes", "Notes on the user."),
            ColumnDefinition::json("organizations", "Organizations the user belongs to."),
            ColumnDefinition::json("phones", "Phone numbers of the user."),
            ColumnDefinition::json("posix_accounts", "POSIX account information."),
            ColumnDefinition::json("relations", "Relationships to other users."),
            ColumnDefinition::json("ssh_public_keys", "SSH public keys of the user."),
            ColumnDefinition::json("websites", "Websites of the user."),
        ])
        .with_list(
            ListConfig::new()
                .with_key_column(KeyColumn::optional("customer_id"))
                .with_key_column(KeyColumn::optional("full_name"))
                .with_key_column(KeyColumn::optional("family_name"))
                .with_key_column(KeyColumn::optional("given_name"))
                .with_key_column(KeyColumn::optional("is_admin").with_operators(&bool_ops))
                .with_key_column(KeyColumn::optional("is_delegated_admin").with_operators(&bool_ops))
                .with_key_column(KeyColumn::optional("suspended").with_operators(&bool_ops))
                .with_key_column(KeyColumn::optional("query"))
                .ignoring(&[404]),
        )
        .with_get(GetConfig::new(GetKeyColumns::any(&["id", "primary_email"])))
}

/// Search terms derived from the qualifiers, in a stable order.
pub(crate) fn filter_terms(quals: &Quals) -> Vec<String> {
    let strings = STRING_FILTERS.iter().filter_map(|(column, field)| {
        quals
            .equals_str(column)
            .map(|value| format!("{field}='{value}'"))
    });
    let bools = BOOL_FILTERS.iter().filter_map(|(column, field)| {
        quals
            .bool_restriction(column)
            .map(|value| format!("{field}={value}"))
    });
    strings.chain(bools).collect()
}

pub async fn list(client: &DirectoryClient, ctx: &QueryContext, sink: &mut RowSink) -> GoogleResult<()> {
    let page_size = ctx.page_size(MAX_PAGE_SIZE).to_string();
    let mut params = vec![("customer", customer_id(ctx)), ("maxResults", page_size.as_str())];
    let query = query_filter(ctx, filter_terms(&ctx.quals));
    if let Some(query) = query.as_deref() {
        params.push(("query", query));
    }

    let url = with_params(client.url(&["users"])?, &params);
    stream_pages::<UsersResponse, _>(client, url, ctx, sink, DirectoryItem::User).await
}

/// `user_key` is the user's ID or primary email.
pub async fn get(client: &DirectoryClient, user_key: &str) -> GoogleResult<User> {
    client.get(client.url(&["users", user_key])?).await
}

pub(crate) fn to_row(user: User, ctx: &QueryContext) -> Row {
    let name = user.name.unwrap_or_default();

    Row::new()
        .with("full_name", name.full_name)
        .with("id", user.id)
        .with("primary_email", user.primary_email)
        .with("customer_id", user.customer_id)
        .with("creation_time", user.creation_time)
        .with("is_admin", user.is_admin)
        .with("is_delegated_admin", user.is_delegated_admin)
        .with("suspended", user.suspended)
        .with("agreed_to_terms", user.agreed_to_terms)
        .with("archived", user.archived)
        .with("change_password_at_next_login", user.change_password_at_next_login)
        .with("deletion_time", user.deletion_time.filter(|t| !t.is_empty()))
        .with("etag", user.etag)
        .with("family_name", name.family_name)
        .with("gender", user.gender)
        .with("given_name", name.given_name)
        .with("hash_function", user.hash_function)
        .with("include_in_global_address_list", user.include_in_global_address_list)
        .with("ip_whitelisted", user.ip_whitelisted)
        .with("is_enforced_in_2sv", user.is_enforced_in2_sv)
        .with("is_enrolled_in_2sv", user.is_enrolled_in2_sv)
        .with("is_mailbox_setup", user.is_mailbox_setup)
        .with("kind", user.kind)
        .with("last_login_time", user.last_login_time)
        .with("org_unit_path", user.org_unit_path)
        .with("recovery_email", user.recovery_email)
        .with("recovery_phone", user.recovery_phone)
        .with("suspension_reason", user.suspension_reason)
        .with("thumbnail_photo_etag", user.thumbnail_photo_etag)
        .with("thumbnail_photo_url", user.thumbnail_photo_url)
        .with("query", echo_qual(ctx, "query"))
        .with("addresses", user.addresses)
        .with("aliases", user.aliases)
        .with("custom_schemas", user.custom_schemas)
        .with("emails", user.emails)
        .with("external_ids", user.external_ids)
        .with("ims", user.ims)
        .with("keywords", user.keywords)
        .with("languages", user.languages)
        .with("locations", user.locations)
        .with("non_editable_aliases", user.non_editable_aliases)
        .with("notes", user.notes)
        .with("organizations", user.organizations)
        .with("phones", user.phones)
        .with("posix_accounts", user.posix_accounts)
        .with("relations", user.relations)
        .with("ssh_public_keys", user.ssh_public_keys)
        .with("websites", user.websites)
}
