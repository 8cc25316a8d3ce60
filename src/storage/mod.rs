use anyhow::{anyhow, Context, Result};
use opendal::{Operator, Scheme};
use std::collections::HashMap;
use std::str::FromStr;
use url::Url;

mod collection;

pub use collection::StoreClient;

/// Builds the operator that backs [`StoreClient`] collections.
///
/// - `memory://` keeps everything in process (tests, demos)
/// - `file:///var/lib/console` stores one JSON file per record
/// - `s3://bucket/prefix` reads credentials from the environment
pub fn create_operator_from_uri(uri: &str) -> Result<Operator> {
    let url = Url::parse(uri).with_context(|| format!("Invalid storage URI: {uri}"))?;

    let (scheme, options) = match url.scheme() {
        "memory" => (Scheme::Memory, HashMap::new()),
        "file" => {
            let mut options = HashMap::new();
            options.insert("root".to_string(), url.path().to_string());
            (Scheme::Fs, options)
        }
        "s3" => {
            let bucket = url
                .host_str()
                .ok_or_else(|| anyhow!("S3 URI missing bucket: {uri}"))?;
            let mut options = HashMap::new();
            options.insert("bucket".to_string(), bucket.to_string());
            options.insert("region".to_string(), "auto".to_string());
            let root = url.path();
            if !root.is_empty() && root != "/" {
                options.insert("root".to_string(), root.to_string());
            }
            (Scheme::S3, options)
        }
        other => {
            let scheme = Scheme::from_str(other)
                .map_err(|_| anyhow!("Unsupported storage scheme: {other}"))?;
            return Err(anyhow!("Storage scheme {scheme} is not enabled"));
        }
    };

    Operator::via_iter(scheme, options)
        .with_context(|| format!("Failed to open storage at {uri}"))
}
