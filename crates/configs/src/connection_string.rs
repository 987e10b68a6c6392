//! Storage connection string parsing.
//!
//! Accepts the Azure-style `Key=Value;Key=Value` form. Only the keys the
//! local backends need are interpreted; everything else (e.g. `AccountKey`)
//! is ignored.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

const DEFAULT_DATA_ROOT: &str = "data/storage";
const DEV_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConnection {
    /// Root directory of the local table/blob/queue/file backends.
    pub data_root: PathBuf,
    /// Base address used to build canonical blob URLs.
    pub blob_endpoint: String,
}

impl StorageConnection {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut pairs: HashMap<String, String> = HashMap::new();
        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            // 只按第一个 '=' 切分，AccountKey 等 base64 值可能包含 '='
            let (key, value) = segment
                .split_once('=')
                .ok_or_else(|| anyhow!("malformed connection string segment: {segment}"))?;
            pairs.insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }

        let data_root = pairs
            .get("dataroot")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT));

        let dev = pairs
            .get("usedevelopmentstorage")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let blob_endpoint = if dev {
            DEV_BLOB_ENDPOINT.to_string()
        } else if let Some(ep) = pairs.get("blobendpoint").filter(|v| !v.is_empty()) {
            ep.trim_end_matches('/').to_string()
        } else if let Some(account) = pairs.get("accountname").filter(|v| !v.is_empty()) {
            let protocol = pairs.get("defaultendpointsprotocol").map(String::as_str).unwrap_or("https");
            let suffix = pairs.get("endpointsuffix").map(String::as_str).unwrap_or("core.windows.net");
            format!("{protocol}://{account}.blob.{suffix}")
        } else {
            DEV_BLOB_ENDPOINT.to_string()
        };

        Ok(Self { data_root, blob_endpoint })
    }
}
