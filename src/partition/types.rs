use anyhow::Result;
use std::fmt;
use std::str::FromStr;

/// Logical name of the backend service, e.g. `fabric:/VotingApplication/VotingData`.
///
/// Only the absolute path part takes part in routing; the scheme and any authority
/// are kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceIdentity {
    uri: String,
    path: String,
}

impl ServiceIdentity {
    pub fn parse(raw: &str) -> Result<Self> {
        let uri = raw.trim();
        let path = match uri.find(":/") {
            Some(idx) if !uri[..idx].contains('/') => &uri[idx + 1..],
            _ => uri,
        };
        // `scheme://authority/path` routes on the path alone
        let path = match path.strip_prefix("//") {
            Some(rest) => rest.find('/').map_or("", |idx| &rest[idx..]),
            None => path,
        };

        if !path.starts_with('/') {
            return Err(anyhow::anyhow!(
                "Service name must be an absolute path or URI: {:?}",
                raw
            ));
        }

        let path = path.trim_end_matches('/');
        if path.is_empty() {
            return Err(anyhow::anyhow!("Service name has an empty path: {:?}", raw));
        }

        Ok(Self {
            uri: uri.trim_end_matches('/').to_string(),
            path: path.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }

    /// Absolute path of the service, e.g. `/VotingApplication/VotingData`.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|segment| !segment.is_empty())
    }

    /// First path segment (`VotingApplication`).
    pub fn application_id(&self) -> &str {
        self.segments().next().unwrap_or_default()
    }

    /// Path segments joined with `~` (`VotingApplication~VotingData`), the form cluster
    /// management endpoints expect.
    pub fn service_id(&self) -> String {
        self.segments().collect::<Vec<_>>().join("~")
    }
}

impl FromStr for ServiceIdentity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ServiceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

/// One partition of the backend service: an inclusive ordinal range and its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionDescriptor {
    pub id: String,
    pub low_key: i64,
    pub high_key: i64,
}

impl PartitionDescriptor {
    pub fn new(id: impl Into<String>, low_key: i64, high_key: i64) -> Self {
        Self {
            id: id.into(),
            low_key,
            high_key,
        }
    }

    pub fn contains(&self, ordinal: i64) -> bool {
        self.low_key <= ordinal && ordinal <= self.high_key
    }
}
