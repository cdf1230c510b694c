use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::warn;

/// Builds the extra request headers from configuration. Entries that are not
/// valid HTTP header names or values are logged and left out.
pub fn header_map(headers: &BTreeMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::new();

    for (key, value) in headers {
        let name = match HeaderName::from_str(&key.trim().to_lowercase()) {
            Ok(name) => name,
            Err(e) => {
                warn!("Ignoring header '{}': {}", key, e);
                continue;
            }
        };
        let value = match HeaderValue::from_str(value.trim()) {
            Ok(value) => value,
            Err(e) => {
                warn!("Ignoring value of header '{}': {}", key, e);
                continue;
            }
        };
        map.insert(name, value);
    }

    map
}
