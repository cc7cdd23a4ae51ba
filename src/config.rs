use std::time::Duration;
use url::Url;

/// Client configuration for one registered OAuth application.
#[derive(Debug, Clone)]
pub struct AuthOptions {
    /// The identity provider's authorization endpoint,
    /// e.g. "https://accounts.spotify.com/authorize".
    pub authorization_endpoint: Url,

    /// The client id issued by the provider for this application.
    pub client_id: String,

    /// Url to which the provider redirects back after login.
    pub redirect_uri: Url,

    /// Requested scopes. Joined space-delimited into the `scope` parameter.
    pub scopes: Vec<String>,

    pub advanced: AdvancedOptions,
}

impl AuthOptions {
    /// Options preset for Spotify with the scopes Moodify needs.
    pub fn spotify(client_id: impl Into<String>, redirect_uri: Url) -> Self {
        Self {
            authorization_endpoint: Url::parse("https://accounts.spotify.com/authorize")
                .expect("static Spotify authorization endpoint to parse"),
            client_id: client_id.into(),
            redirect_uri,
            scopes: [
                "user-read-private",
                "user-read-email",
                "user-top-read",
                "user-library-read",
            ]
            .map(str::to_owned)
            .to_vec(),
            advanced: AdvancedOptions::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdvancedOptions {
    /// Maximum age of a stored authorization attempt. A callback arriving for
    /// an older attempt is rejected as stale.
    /// Defaults to `Duration::from_secs(60 * 10)`.
    pub login_attempt_max_age: Duration,
}

impl Default for AdvancedOptions {
    fn default() -> Self {
        Self {
            login_attempt_max_age: Duration::from_secs(60 * 10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assertr::prelude::*;

    #[test]
    fn spotify_preset_carries_upstream_endpoint_and_scopes() {
        let options = AuthOptions::spotify(
            "some-client-id",
            Url::parse("https://example.com/callback").unwrap(),
        );
        assert_that(options.authorization_endpoint.as_str())
            .is_equal_to("https://accounts.spotify.com/authorize");
        assert_that(options.client_id.as_str()).is_equal_to("some-client-id");
        assert_that(options.scopes.len()).is_equal_to(4);
    }
}
