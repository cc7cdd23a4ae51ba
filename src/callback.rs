use url::Url;

/// Query parameters the identity provider appends to the redirect URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CallbackResponse {
    Success(SuccessCallback),
    Error(ErrorCallback),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SuccessCallback {
    pub(crate) code: String,
    pub(crate) state: String,
}

/// Error relayed by the provider, e.g. `error=access_denied` when the user
/// refused consent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ErrorCallback {
    pub(crate) error: String,
    pub(crate) error_description: Option<String>,
}

impl CallbackResponse {
    /// `None` when the query holds neither a code/state pair nor an error.
    /// This is the expected outcome for URLs unrelated to the callback.
    pub(crate) fn from_url(url: &Url) -> Option<Self> {
        let param = |name: &str| {
            url.query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned())
        };

        if let Some(error) = param("error") {
            return Some(Self::Error(ErrorCallback {
                error,
                error_description: param("error_description"),
            }));
        }

        match (param("code"), param("state")) {
            (Some(code), Some(state)) => Some(Self::Success(SuccessCallback { code, state })),
            _ => None,
        }
    }
}
