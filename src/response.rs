use serde::{Deserialize, Serialize};

/// An enumeration representing the response of the backend's token-exchange
/// endpoint: Spotify's relayed token payload on success, or the backend's
/// own error payload (which it may return even with an HTTP 200 when the
/// upstream response could not be parsed).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub(crate) enum TokenResponse {
    Success(SuccessTokenResponse),
    Error(ErrorResponse),
}

/// A structure representing a successful token response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub(crate) struct SuccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub scope: String,
    pub expires_in: i64,
    pub refresh_token: String,
}

/// Error payload returned by the Moodify backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}

/// Sentiment analysis of the free-text mood input. Read-only pass-through
/// data; never mutated by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Prediction {
    pub emotion: String,
    pub intent: String,
    pub context: String,
    pub status: String,
}

/// A single recommended track.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Recommendation {
    pub name: String,
    pub artist: String,
    pub url: String,
    pub mood: String,
    pub intent: String,
    pub context: String,
    pub preview_url: Option<String>,
    pub album_art: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecommendationResponse {
    pub recommendation: Recommendation,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertr::prelude::*;

    #[test]
    fn token_response_deserializes_success_variant() {
        let parsed = serde_json::from_str::<TokenResponse>(
            r#"{
                "access_token": "at",
                "token_type": "Bearer",
                "scope": "user-read-private",
                "expires_in": 3600,
                "refresh_token": "rt"
            }"#,
        )
        .unwrap();
        assert_that(parsed).is_equal_to(TokenResponse::Success(SuccessTokenResponse {
            access_token: "at".to_owned(),
            token_type: "Bearer".to_owned(),
            scope: "user-read-private".to_owned(),
            expires_in: 3600,
            refresh_token: "rt".to_owned(),
        }));
    }

    #[test]
    fn token_response_deserializes_error_variant() {
        let parsed = serde_json::from_str::<TokenResponse>(
            r#"{"error": "Failed to parse token response", "details": "boom"}"#,
        )
        .unwrap();
        assert_that(parsed).is_equal_to(TokenResponse::Error(ErrorResponse {
            error: "Failed to parse token response".to_owned(),
            details: Some("boom".to_owned()),
        }));
    }
}
