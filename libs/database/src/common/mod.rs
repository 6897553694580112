//! Error classification and retry helpers shared by the connectors.

pub mod error;
pub mod retry;

pub use error::{classify_sqlstate, DatabaseError, DatabaseResult};
pub use retry::{retry_if, retry_with_backoff, RetryConfig};
