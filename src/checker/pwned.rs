use super::{RangeResponse, RangeSource, PREFIX_LEN};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::LookupResult;
use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use std::time::Duration;
use tracing::{debug, warn};

/// Range endpoint of the Pwned Passwords API.
pub const DEFAULT_ENDPOINT: &str = "https://api.pwnedpasswords.com/range";

/// Identifies this client to the service.
pub const DEFAULT_USER_AGENT: &str = "1passpwnedcheck";

/// reqwest-backed [`RangeSource`] for `api.pwnedpasswords.com`.
pub struct PwnedPasswordsApi {
    client: reqwest::Client,
    endpoint: String,
    user_agent: String,
}

impl PwnedPasswordsApi {
    pub fn new() -> Result<Self> {
        Self::from_config(&Config::default())
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            user_agent: config.user_agent.clone(),
        })
    }

    fn range_url(&self, prefix: &str) -> String {
        format!("{}/{}", self.endpoint.trim_end_matches('/'), prefix)
    }
}

#[async_trait]
impl RangeSource for PwnedPasswordsApi {
    fn name(&self) -> &'static str {
        "Pwned Passwords"
    }

    async fn fetch_range(&self, prefix: &str) -> Result<RangeResponse> {
        let url = self.range_url(prefix);

        let response = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Ok(RangeResponse::Status(status.as_u16()));
        }

        Ok(RangeResponse::Body(response.text().await?))
    }
}

/// Checks password hashes against a [`RangeSource`].
///
/// Holds no mutable state: the same prefix and response always give the
/// same [`LookupResult`].
pub struct BreachChecker<S> {
    source: S,
}

impl<S: RangeSource> BreachChecker<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Looks up a 40-character SHA-1 hex digest.
    ///
    /// A service that cannot be reached or answers with anything but 200
    /// yields a not-pwned result marked unavailable. No retry is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidHash`] if `sha1_hex` is not 40 hex characters.
    pub async fn check(&self, sha1_hex: &str) -> Result<LookupResult> {
        if sha1_hex.len() != 40 || !sha1_hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidHash(format!(
                "Expected 40 character SHA-1 hex digest, got {:?}",
                sha1_hex
            )));
        }

        let hash = sha1_hex.to_lowercase();
        let (prefix, suffix) = hash.split_at(PREFIX_LEN);

        let body = match self.source.fetch_range(prefix).await {
            Ok(RangeResponse::Body(body)) => body,
            Ok(RangeResponse::Status(code)) => {
                warn!("{} returned HTTP {} for prefix {}", self.source.name(), code, prefix);
                return Ok(LookupResult::unavailable(format!("HTTP {}", code)));
            }
            Err(e) => {
                warn!("{} lookup failed for prefix {}: {}", self.source.name(), prefix, e);
                return Ok(LookupResult::unavailable(e.to_string()));
            }
        };

        Ok(find_suffix(&body, suffix))
    }
}

/// First line containing `suffix` (case-insensitive) wins.
fn find_suffix(body: &str, suffix: &str) -> LookupResult {
    let body = body.to_lowercase();
    let suffix = suffix.to_lowercase();

    let Some(line) = body.split('\n').find(|line| line.contains(&suffix)) else {
        return LookupResult::clean();
    };

    let line = line.trim();
    let (matched, count) = line.split_once(':').unwrap_or((line, ""));
    let count = count.trim().parse::<u64>().unwrap_or_else(|_| {
        warn!("Unparsable count in range line {:?}", line);
        0
    });

    debug!("Matched suffix {} ({} occurrences)", matched, count);
    LookupResult::pwned(count, matched)
}
