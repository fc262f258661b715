use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::PushlogConfig;
use crate::error::{PushlogError, PushlogResult};
use crate::transport::{PushlogTransport, UreqTransport};

/// Who pushed a revision, and when
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushInfo {
    /// Key of the push in the pushlog
    pub push_id: String,
    /// Seconds since the Unix epoch, as reported by the server
    pub push_date: i64,
    pub user: String,
}

impl PushInfo {
    /// Push date as a UTC timestamp, if representable
    pub fn pushed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.push_date, 0)
    }
}

#[derive(Debug, Deserialize)]
struct PushlogResponse {
    pushes: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct PushEntry {
    date: i64,
    user: String,
}

/// URL of the pushlog entry for the push containing `revision`
pub fn pushlog_url(repository: &str, revision: &str) -> String {
    format!(
        "{}/json-pushes?version=2&changeset={}&tipsonly=1&full=1",
        repository, revision
    )
}

/// Resolves revisions to [`PushInfo`] through a pushlog transport
#[derive(Debug, Clone)]
pub struct PushlogClient<T = UreqTransport> {
    transport: T,
    config: PushlogConfig,
}

impl PushlogClient<UreqTransport> {
    pub fn new(config: PushlogConfig) -> Self {
        Self::with_transport(UreqTransport::new(config.timeout()), config)
    }
}

impl Default for PushlogClient<UreqTransport> {
    fn default() -> Self {
        Self::new(PushlogConfig::default())
    }
}

impl<T: PushlogTransport> PushlogClient<T> {
    pub fn with_transport(transport: T, config: PushlogConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &PushlogConfig {
        &self.config
    }

    /// Find the push that introduced `revision` into `repository`.
    ///
    /// The HTTP query is retried per the configured policy on any failure.
    /// Exactly one push must come back.
    pub fn find_push_info(&self, repository: &str, revision: &str) -> PushlogResult<PushInfo> {
        let url = pushlog_url(repository, revision);
        let body = self.config.retry.run(|| self.transport.get(&url))?;

        let invalid = |source: serde_json::Error| PushlogError::InvalidResponse {
            url: url.clone(),
            source,
        };
        let response: PushlogResponse = serde_json::from_str(&body).map_err(invalid)?;

        let ambiguous = |pushes: Map<String, Value>| PushlogError::AmbiguousPushInfo {
            repository: repository.to_string(),
            revision: revision.to_string(),
            pushes: Value::Object(pushes).to_string(),
        };
        if response.pushes.len() != 1 {
            return Err(ambiguous(response.pushes));
        }

        let (push_id, entry) = response
            .pushes
            .into_iter()
            .next()
            .ok_or_else(|| ambiguous(Map::new()))?;
        let entry: PushEntry = serde_json::from_value(entry).map_err(invalid)?;
        debug!(revision, push_id = %push_id, "resolved push info");

        Ok(PushInfo {
            push_id,
            push_date: entry.date,
            user: entry.user,
        })
    }
}

/// Find the push containing `revision` using the default pushlog settings.
pub fn find_push_info(repository: &str, revision: &str) -> PushlogResult<PushInfo> {
    PushlogClient::default().find_push_info(repository, revision)
}
