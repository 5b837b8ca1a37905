//! Upstream errors that a table treats as an empty result.

use regex::Regex;
use std::sync::LazyLock;

use crate::GoogleError;

/// A disabled API answers 403 with this message. Other 403s are real
/// permission problems and always propagate.
static API_DISABLED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\S+ API has not been used in project \d+ before or it is disabled\.")
        .expect("API_DISABLED is a valid regex pattern")
});

/// Whether `err` should become "no rows" given a table's allow-list.
///
/// Only Directory API responses can match; transport, credential and
/// configuration errors never do.
pub fn should_ignore(err: &GoogleError, statuses: &[u16]) -> bool {
    let GoogleError::DirectoryApi {
        status, message, ..
    } = err
    else {
        return false;
    };

    if !statuses.contains(status) {
        return false;
    }

    if *status == 403 {
        return API_DISABLED.is_match(message);
    }

    true
}
