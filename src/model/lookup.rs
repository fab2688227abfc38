use serde::{Deserialize, Serialize};

/// Whether the range service actually answered a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum LookupStatus {
    /// A successful response was searched for the hash suffix.
    Checked,
    /// The service could not be consulted (non-200 or transport failure).
    Unavailable { reason: String },
}

/// Outcome of checking one password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResult {
    pub pwned: bool,
    pub count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_suffix: Option<String>,
    #[serde(flatten)]
    pub status: LookupStatus,
}

impl LookupResult {
    pub fn pwned(count: u64, matched_suffix: impl Into<String>) -> Self {
        Self {
            pwned: true,
            count,
            matched_suffix: Some(matched_suffix.into()),
            status: LookupStatus::Checked,
        }
    }

    pub fn clean() -> Self {
        Self {
            pwned: false,
            count: 0,
            matched_suffix: None,
            status: LookupStatus::Checked,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            pwned: false,
            count: 0,
            matched_suffix: None,
            status: LookupStatus::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self.status, LookupStatus::Unavailable { .. })
    }
}
