use crate::code_verifier::CodeChallenge;
use crate::config::AuthOptions;
use crate::state_token::StateToken;
use itertools::Itertools;
use std::borrow::Cow;
use url::Url;

/// Compose the authorization URL the user navigates to.
///
/// Pure construction. Persisting the {verifier, state} tuple must already
/// have happened: the browser context is torn down on navigation.
pub(crate) fn create_authorization_url(
    options: &AuthOptions,
    code_challenge: &CodeChallenge,
    state: &StateToken,
) -> Url {
    let scope = match options.scopes.len() {
        0 => Cow::Borrowed(""),
        _ => Cow::Owned(options.scopes.iter().map(|it| it.trim()).join(" ")),
    };

    let mut authorize_url = options.authorization_endpoint.clone();
    authorize_url
        .query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &options.client_id)
        .append_pair("scope", &scope)
        .append_pair("redirect_uri", options.redirect_uri.as_str())
        .append_pair("state", state.as_str())
        .append_pair(
            "code_challenge_method",
            code_challenge.code_challenge_method().as_str(),
        )
        .append_pair("code_challenge", code_challenge.code_challenge());
    authorize_url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code_verifier::CodeVerifier;
    use assertr::prelude::*;
    use std::collections::HashMap;

    fn query_map(url: &Url) -> HashMap<String, String> {
        url.query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }

    #[test]
    fn authorization_url_carries_all_required_parameters() {
        let options = AuthOptions::spotify(
            "my-client",
            Url::parse("https://example.com/callback").unwrap(),
        );
        let verifier = CodeVerifier::<128>::generate();
        let challenge = verifier.to_code_challenge();
        let state = StateToken::new();

        let url = create_authorization_url(&options, &challenge, &state);
        let query = query_map(&url);

        assert_that(url.as_str().starts_with("https://accounts.spotify.com/authorize?"))
            .is_true();
        assert_that(query["response_type"].as_str()).is_equal_to("code");
        assert_that(query["client_id"].as_str()).is_equal_to("my-client");
        assert_that(query["scope"].as_str())
            .is_equal_to("user-read-private user-read-email user-top-read user-library-read");
        assert_that(query["redirect_uri"].as_str()).is_equal_to("https://example.com/callback");
        assert_that(query["state"].as_str()).is_equal_to(state.as_str());
        assert_that(query["code_challenge_method"].as_str()).is_equal_to("S256");
        assert_that(query["code_challenge"].as_str())
            .is_equal_to(challenge.code_challenge());
    }

    #[test]
    fn scopes_are_trimmed_and_space_delimited() {
        let mut options = AuthOptions::spotify(
            "my-client",
            Url::parse("https://example.com/callback").unwrap(),
        );
        options.scopes = vec![" a ".to_owned(), "b".to_owned()];

        let verifier = CodeVerifier::<128>::generate();
        let url =
            create_authorization_url(&options, &verifier.to_code_challenge(), &StateToken::new());

        assert_that(query_map(&url)["scope"].as_str()).is_equal_to("a b");
    }
}
