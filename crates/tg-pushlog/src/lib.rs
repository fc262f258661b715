//! Pushlog lookups.
//!
//! Resolves a revision of a hosted repository to the push that introduced it
//! (push id, date and user) by querying the server's `json-pushes` endpoint,
//! retrying transient failures with a fixed delay.

pub mod config;
pub mod error;
pub mod push_info;
pub mod retry;
pub mod transport;

pub use config::PushlogConfig;
pub use error::{PushlogError, PushlogResult};
pub use push_info::{find_push_info, pushlog_url, PushInfo, PushlogClient};
pub use retry::RetryPolicy;
pub use transport::{PushlogTransport, UreqTransport};
