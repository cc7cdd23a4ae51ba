use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::response::SuccessTokenResponse;

/// The access token record owned by the client session after a successful
/// exchange. Persisted under [`crate::KEY_ACCESS_TOKEN`] for the remainder of
/// the session and only ever transmitted as a bearer credential.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TokenData {
    /// Allows access to resources requiring authentication unless expired.
    pub access_token: String,

    pub token_type: String,

    /// Scopes the token was granted, space-delimited.
    pub scope: String,

    /// Kept as received. Refreshing is not performed by this crate.
    pub refresh_token: String,

    /// Point in time when the `access_token` expires, derived from the
    /// relative `expires_in` at receipt.
    #[serde(with = "time::serde::rfc3339")]
    pub access_token_expires_at: OffsetDateTime,

    /// Point in time this token data was received. May be used to calculate
    /// an estimated lifetime of the access token.
    #[serde(with = "time::serde::rfc3339")]
    pub time_received: OffsetDateTime,
}

impl TokenData {
    pub fn access_token_time_left(&self) -> Duration {
        self.access_token_expires_at - OffsetDateTime::now_utc()
    }

    /// Whether `expires_in` has elapsed. The flow itself never refuses an
    /// expired token; consumers decide what to do with one.
    pub fn is_expired(&self) -> bool {
        self.access_token_time_left() <= Duration::ZERO
    }
}

impl From<SuccessTokenResponse> for TokenData {
    fn from(value: SuccessTokenResponse) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            access_token: value.access_token,
            token_type: value.token_type,
            scope: value.scope,
            refresh_token: value.refresh_token,
            access_token_expires_at: now + Duration::seconds(value.expires_in),
            time_received: now,
        }
    }
}
