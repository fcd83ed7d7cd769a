//! App access tokens as plain values.
//!
//! Nothing here caches: the caller keeps the current token and passes it to
//! [`refresh_if_needed`] before each send.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::api::SeaTalkApi;
use crate::error::Result;

/// Tokens this close to expiry, in seconds, are refreshed.
pub const REFRESH_MARGIN_SECS: i64 = 300;

/// A bearer credential and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            expires_at,
        }
    }

    /// Whether the token expires within [`REFRESH_MARGIN_SECS`] of `now`.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

/// Return `current` if still usable at `now`, otherwise fetch a new token.
pub async fn refresh_if_needed(
    api: &SeaTalkApi,
    current: Option<AccessToken>,
    now: DateTime<Utc>,
) -> Result<AccessToken> {
    match current {
        Some(token) if !token.needs_refresh(now) => Ok(token),
        _ => {
            debug!("Fetching SeaTalk app access token");
            api.fetch_token().await
        }
    }
}
