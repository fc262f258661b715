use std::time::Duration;

use tracing::debug;

use crate::error::{PushlogError, PushlogResult};

/// Fetches a URL and returns the response body.
///
/// Any transport failure or non-2xx status is an error.
pub trait PushlogTransport {
    fn get(&self, url: &str) -> PushlogResult<String>;
}

/// Blocking HTTP transport backed by a ureq agent
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl PushlogTransport for UreqTransport {
    fn get(&self, url: &str) -> PushlogResult<String> {
        debug!(url, "querying pushlog");

        let response = match self.agent.get(url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(status, _)) => {
                return Err(PushlogError::Status {
                    url: url.to_string(),
                    status,
                })
            }
            Err(e) => {
                return Err(PushlogError::Http {
                    url: url.to_string(),
                    source: Box::new(e),
                })
            }
        };

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(PushlogError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.into_string()?)
    }
}
