//! `googledirectory_mobile_device`: mobile devices managed by the account.
//!
//! Reading devices needs the
//! `https://www.googleapis.com/auth/admin.directory.device.mobile.readonly`
//! scope, which is not requested unless the connection's `scopes` adds it.

use xavyo_connector::operation::Row;
use xavyo_connector::query::{QueryContext, RowSink};
use xavyo_connector::schema::{
    ColumnDefinition, GetConfig, GetKeyColumns, KeyColumn, ListConfig, TableDefinition,
};

use super::{customer_id, echo_qual, stream_pages, with_params};
use crate::directory_client::DirectoryClient;
use crate::models::{DirectoryItem, MobileDevice, MobileDevicesResponse};
use crate::GoogleResult;

pub const TABLE: &str = "googledirectory_mobile_device";

const MAX_PAGE_SIZE: u32 = 100;

pub fn definition() -> TableDefinition {
    TableDefinition::new(TABLE, "Mobile devices of the Google Workspace account.")
        .with_columns([
            ColumnDefinition::string("model", "Model of the device."),
            ColumnDefinition::string("resource_id", "Unique ID of the device resource."),
            ColumnDefinition::string("device_id", "Serial number of the device."),
            ColumnDefinition::string("brand", "Brand of the device."),
            ColumnDefinition::string("imei", "IMEI number of the device."),
            ColumnDefinition::bool("adb_status", "Whether adb (USB debugging) is enabled."),
            ColumnDefinition::string("baseband_version", "Baseband version of the device."),
            ColumnDefinition::string("bootloader_version", "Bootloader version of the device."),
            ColumnDefinition::string("build_number", "Build number of the device."),
            ColumnDefinition::string("customer_id", "Customer account the device was listed from."),
            ColumnDefinition::string("default_language", "Default locale of the device."),
            ColumnDefinition::bool("developer_options_status", "Whether developer options are enabled."),
            ColumnDefinition::string("device_compromised_status", "Whether the device is compromised."),
            ColumnDefinition::string("device_password_status", "Password status of the device."),
            ColumnDefinition::string("encryption_status", "Encryption status of the device."),
            ColumnDefinition::string("etag", "ETag of the resource."),
            ColumnDefinition::string("first_sync", "First time the device synced."),
            ColumnDefinition::string("hardware", "Hardware of the device."),
            ColumnDefinition::string("hardware_id", "Hardware ID of the device."),
            ColumnDefinition::string("kernel_version", "Kernel version of the device."),
            ColumnDefinition::string("kind", "Type of the API resource."),
            ColumnDefinition::string("last_sync", "Last time the device synced."),
            ColumnDefinition::bool("managed_account_is_on_owner_profile", "Whether the managed account is on the owner profile."),
            ColumnDefinition::string("manufacturer", "Manufacturer of the device."),
            ColumnDefinition::string("meid", "MEID number of the device."),
            ColumnDefinition::string("network_operator", "Mobile network operator."),
            ColumnDefinition::string("os", "Operating system of the device."),
            ColumnDefinition::string("privilege", "DM agent permission."),
            ColumnDefinition::string("release_version", "OS release version."),
            ColumnDefinition::int("security_patch_level", "OS security patch level, in Unix milliseconds."),
            ColumnDefinition::string("serial_number", "Serial number of the device."),
            ColumnDefinition::string("status", "Status of the device."),
            ColumnDefinition::bool("supports_work_profile", "Whether the device supports a work profile."),
            ColumnDefinition::string("type", "Type of the device."),
            ColumnDefinition::bool("unknown_sources_status", "Whether installing apps from unknown sources is enabled."),
            ColumnDefinition::string("user_agent", "User agent of the device."),
            ColumnDefinition::string("wifi_mac_address", "Wi-Fi MAC address of the device."),
            ColumnDefinition::json("applications", "Applications installed on the device."),
            ColumnDefinition::json("email", "Email addresses of the device owners."),
            ColumnDefinition::json("name", "Names of the device owners."),
            ColumnDefinition::json("other_accounts_info", "Other accounts on the device."),
        ])
        .with_list(ListConfig::new().with_key_column(KeyColumn::optional("customer_id")))
        .with_get(GetConfig::new(GetKeyColumns::single("resource_id")))
}

pub async fn list(client: &DirectoryClient, ctx: &QueryContext, sink: &mut RowSink) -> GoogleResult<()> {
    let page_size = ctx.page_size(MAX_PAGE_SIZE).to_string();
    let url = with_params(
        client.url(&["customer", customer_id(ctx), "devices", "mobile"])?,
        &[("maxResults", page_size.as_str())],
    );
    stream_pages::<MobileDevicesResponse, _>(client, url, ctx, sink, DirectoryItem::MobileDevice).await
}

pub async fn get(client: &DirectoryClient, customer: &str, resource_id: &str) -> GoogleResult<MobileDevice> {
    client
        .get(client.url(&["customer", customer, "devices", "mobile", resource_id])?)
        .await
}

pub(crate) fn to_row(device: MobileDevice, ctx: &QueryContext) -> Row {
    Row::new()
        .with("model", device.model)
        .with("resource_id", device.resource_id)
        .with("device_id", device.device_id)
        .with("brand", device.brand)
        .with("imei", device.imei)
        .with("adb_status", device.adb_status)
        .with("baseband_version", device.baseband_version)
        .with("bootloader_version", device.bootloader_version)
        .with("build_number", device.build_number)
        .with("customer_id", echo_qual(ctx, "customer_id"))
        .with("default_language", device.default_language)
        .with("developer_options_status", device.developer_options_status)
        .with("device_compromised_status", device.device_compromised_status)
        .with("device_password_status", device.device_password_status)
        .with("encryption_status", device.encryption_status)
        .with("etag", device.etag)
        .with("first_sync", device.first_sync)
        .with("hardware", device.hardware)
        .with("hardware_id", device.hardware_id)
        .with("kernel_version", device.kernel_version)
        .with("kind", device.kind)
        .with("last_sync", device.last_sync)
        .with("managed_account_is_on_owner_profile", device.managed_account_is_on_owner_profile)
        .with("manufacturer", device.manufacturer)
        .with("meid", device.meid)
        .with("network_operator", device.network_operator)
        .with("os", device.os)
        .with("privilege", device.privilege)
        .with("release_version", device.release_version)
        .with("security_patch_level", device.security_patch_level)
        .with("serial_number", device.serial_number)
        .with("status", device.status)
        .with("supports_work_profile", device.supports_work_profile)
        .with("type", device.device_type)
        .with("unknown_sources_status", device.unknown_sources_status)
        .with("user_agent", device.user_agent)
        .with("wifi_mac_address", device.wifi_mac_address)
        .with("applications", device.applications)
        .with("email", device.email)
        .with("name", device.name)
        .with("other_accounts_info", device.other_accounts_info)
}
