//! Breach lookups against a k-anonymity range service.
//!
//! Only the first five hex characters of a password's SHA-1 hash leave the
//! machine. The service answers with every `SUFFIX:COUNT` line sharing that
//! prefix and the match happens locally.

mod pwned;

pub use pwned::{BreachChecker, PwnedPasswordsApi, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT};

use crate::error::Result;
use async_trait::async_trait;
use sha1::{Digest, Sha1};

/// Length of the hash prefix sent to the range service.
pub const PREFIX_LEN: usize = 5;

/// Raw answer from a range service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeResponse {
    /// HTTP 200 with the newline-separated `SUFFIX:COUNT` body.
    Body(String),
    /// Any other HTTP status.
    Status(u16),
}

/// Transport for range queries.
#[async_trait]
pub trait RangeSource: Send + Sync {
    fn name(&self) -> &'static str;

    /// Fetches all hash suffixes sharing `prefix`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request could not be completed at all.
    async fn fetch_range(&self, prefix: &str) -> Result<RangeResponse>;
}

/// SHA-1 of a password as lowercase hex.
pub fn sha1_hex(password: &str) -> String {
    hex::encode(Sha1::digest(password.as_bytes()))
}
