//! Directory API resource types.
//!
//! Decoded straight from the upstream JSON (camelCase wire names). Fields the
//! API may omit are optional; nested substructures stay as raw JSON.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The API encodes int64 fields as JSON strings; accept both forms.
fn string_or_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(n)) => Ok(Some(n)),
        Some(Raw::Str(s)) if s.is_empty() => Ok(None),
        Some(Raw::Str(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Identifiers typed as int64 upstream but exposed as strings.
fn string_or_i64_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::Int(n)) => Some(n.to_string()),
        Some(Raw::Str(s)) => Some(s),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserName {
    pub full_name: Option<String>,
    pub family_name: Option<String>,
    pub given_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: Option<String>,
    pub primary_email: Option<String>,
    pub name: Option<UserName>,
    pub customer_id: Option<String>,
    pub creation_time: Option<String>,
    pub is_admin: Option<bool>,
    pub is_delegated_admin: Option<bool>,
    pub suspended: Option<bool>,
    pub agreed_to_terms: Option<bool>,
    pub archived: Option<bool>,
    pub change_password_at_next_login: Option<bool>,
    pub deletion_time: Option<String>,
    pub etag: Option<String>,
    pub gender: Option<Value>,
    pub hash_function: Option<String>,
    pub include_in_global_address_list: Option<bool>,
    pub ip_whitelisted: Option<bool>,
    pub is_enforced_in2_sv: Option<bool>,
    pub is_enrolled_in2_sv: Option<bool>,
    pub is_mailbox_setup: Option<bool>,
    pub kind: Option<String>,
    pub last_login_time: Option<String>,
    pub org_unit_path: Option<String>,
    pub recovery_email: Option<String>,
    pub recovery_phone: Option<String>,
    pub suspension_reason: Option<String>,
    pub thumbnail_photo_etag: Option<String>,
    pub thumbnail_photo_url: Option<String>,
    pub addresses: Option<Value>,
    pub aliases: Option<Value>,
    pub custom_schemas: Option<Value>,
    pub emails: Option<Value>,
    pub external_ids: Option<Value>,
    pub ims: Option<Value>,
    pub keywords: Option<Value>,
    pub languages: Option<Value>,
    pub locations: Option<Value>,
    pub non_editable_aliases: Option<Value>,
    pub notes: Option<Value>,
    pub organizations: Option<Value>,
    pub phones: Option<Value>,
    pub posix_accounts: Option<Value>,
    pub relations: Option<Value>,
    pub ssh_public_keys: Option<Value>,
    pub websites: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub admin_created: Option<bool>,
    pub description: Option<String>,
    #[serde(deserialize_with = "string_or_i64")]
    pub direct_members_count: Option<i64>,
    pub etag: Option<String>,
    pub kind: Option<String>,
    pub aliases: Option<Value>,
    pub non_editable_aliases: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Member {
    pub id: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub member_type: Option<String>,
    pub delivery_settings: Option<String>,
    pub etag: Option<String>,
    pub kind: Option<String>,
}

/// A member together with the group it was listed under.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMembership {
    pub group_id: String,
    pub member: Member,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Domain {
    pub domain_name: Option<String>,
    /// Unix milliseconds.
    #[serde(deserialize_with = "string_or_i64")]
    pub creation_time: Option<i64>,
    pub is_primary: Option<bool>,
    pub verified: Option<bool>,
    pub etag: Option<String>,
    pub kind: Option<String>,
    pub domain_aliases: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomainAlias {
    pub domain_alias_name: Option<String>,
    /// Unix milliseconds.
    #[serde(deserialize_with = "string_or_i64")]
    pub creation_time: Option<i64>,
    pub verified: Option<bool>,
    pub etag: Option<String>,
    pub kind: Option<String>,
    pub parent_domain_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrgUnit {
    pub name: Option<String>,
    pub org_unit_id: Option<String>,
    pub org_unit_path: Option<String>,
    pub block_inheritance: Option<bool>,
    pub description: Option<String>,
    pub etag: Option<String>,
    pub kind: Option<String>,
    pub parent_org_unit_id: Option<String>,
    pub parent_org_unit_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Role {
    pub role_name: Option<String>,
    #[serde(deserialize_with = "string_or_i64_as_string")]
    pub role_id: Option<String>,
    pub is_super_admin_role: Option<bool>,
    pub is_system_role: Option<bool>,
    pub role_description: Option<String>,
    pub etag: Option<String>,
    pub kind: Option<String>,
    pub role_privileges: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleAssignment {
    #[serde(deserialize_with = "string_or_i64_as_string")]
    pub role_assignment_id: Option<String>,
    #[serde(deserialize_with = "string_or_i64_as_string")]
    pub role_id: Option<String>,
    pub assigned_to: Option<String>,
    pub assignee_type: Option<String>,
    pub etag: Option<String>,
    pub kind: Option<String>,
    pub org_unit_id: Option<String>,
    pub scope_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Privilege {
    pub privilege_name: Option<String>,
    pub service_name: Option<String>,
    pub service_id: Option<String>,
    pub is_ou_scopable: Option<bool>,
    pub etag: Option<String>,
    pub kind: Option<String>,
    pub child_privileges: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MobileDevice {
    pub resource_id: Option<String>,
    pub device_id: Option<String>,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub imei: Option<String>,
    pub adb_status: Option<bool>,
    pub baseband_version: Option<String>,
    pub bootloader_version: Option<String>,
    pub build_number: Option<String>,
    pub default_language: Option<String>,
    pub developer_options_status: Option<bool>,
    pub device_compromised_status: Option<String>,
    pub device_password_status: Option<String>,
    pub encryption_status: Option<String>,
    pub etag: Option<String>,
    pub first_sync: Option<String>,
    pub hardware: Option<String>,
    pub hardware_id: Option<String>,
    pub kernel_version: Option<String>,
    pub kind: Option<String>,
    pub last_sync: Option<String>,
    pub managed_account_is_on_owner_profile: Option<bool>,
    pub manufacturer: Option<String>,
    pub meid: Option<String>,
    pub network_operator: Option<String>,
    pub os: Option<String>,
    pub privilege: Option<String>,
    pub release_version: Option<String>,
    #[serde(deserialize_with = "string_or_i64")]
    pub security_patch_level: Option<i64>,
    pub serial_number: Option<String>,
    pub status: Option<String>,
    pub supports_work_profile: Option<bool>,
    #[serde(rename = "type")]
    pub device_type: Option<String>,
    pub unknown_sources_status: Option<bool>,
    pub user_agent: Option<String>,
    pub wifi_mac_address: Option<String>,
    pub applications: Option<Value>,
    pub email: Option<Value>,
    pub name: Option<Value>,
    pub other_accounts_info: Option<Value>,
}

/// One decoded Directory API object, of any table's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryItem {
    User(User),
    Group(Group),
    Member(GroupMembership),
    Domain(Domain),
    DomainAlias(DomainAlias),
    OrgUnit(OrgUnit),
    Role(Role),
    RoleAssignment(RoleAssignment),
    Privilege(Privilege),
    MobileDevice(MobileDevice),
}

macro_rules! impl_from_item {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for DirectoryItem {
                fn from(item: $ty) -> Self {
                    DirectoryItem::$variant(item)
                }
            }
        )*
    };
}

impl_from_item!(
    User => User,
    Group => Group,
    GroupMembership => Member,
    Domain => Domain,
    DomainAlias => DomainAlias,
    OrgUnit => OrgUnit,
    Role => Role,
    RoleAssignment => RoleAssignment,
    Privilege => Privilege,
    MobileDevice => MobileDevice,
);

/// A list response: the items of one page and the continuation token.
pub trait ListResponse: serde::de::DeserializeOwned + Send {
    type Item: Send;

    fn into_page(self) -> (Vec<Self::Item>, Option<String>);
}

macro_rules! list_response {
    ($name:ident, $item:ty, $field:literal) => {
        #[derive(Debug, Default, Deserialize)]
        #[serde(rename_all = "camelCase", default)]
        pub struct $name {
            #[serde(rename = $field)]
            pub items: Vec<$item>,
            pub next_page_token: Option<String>,
        }

        impl ListResponse for $name {
            type Item = $item;

            fn into_page(self) -> (Vec<$item>, Option<String>) {
                let token = self.next_page_token.filter(|t| !t.is_empty());
                (self.items, token)
            }
        }
    };
}

list_response!(UsersResponse, User, "users");
list_response!(GroupsResponse, Group, "groups");
list_response!(MembersResponse, Member, "members");
list_response!(DomainsResponse, Domain, "domains");
list_response!(DomainAliasesResponse, DomainAlias, "domainAliases");
list_response!(OrgUnitsResponse, OrgUnit, "organizationUnits");
list_response!(RolesResponse, Role, "items");
list_response!(RoleAssignmentsResponse, RoleAssignment, "items");
list_response!(PrivilegesResponse, Privilege, "items");
list_response!(MobileDevicesResponse, MobileDevice, "mobiledevices");
