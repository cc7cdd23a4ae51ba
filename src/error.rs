use crate::request::RequestError;
use snafu::Snafu;

/// Why a provider callback was rejected before reaching the exchange step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackRejection {
    /// The callback query carried neither a code/state pair nor an error.
    MalformedCallback,

    /// The identity provider returned an error callback, e.g. because the
    /// user denied consent.
    ProviderError,

    /// No {verifier, state} tuple was stored: the attempt was never started,
    /// was already consumed, or its persisted data was lost.
    NoPendingAttempt,

    /// The state echoed by the provider differs from the stored one.
    StateMismatch,

    /// The stored attempt is older than the configured maximum age.
    StaleAttempt,
}

impl std::fmt::Display for CallbackRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CallbackRejection::MalformedCallback => "malformed callback",
            CallbackRejection::ProviderError => "provider returned an error",
            CallbackRejection::NoPendingAttempt => "no pending authorization attempt",
            CallbackRejection::StateMismatch => "state mismatch",
            CallbackRejection::StaleAttempt => "stale authorization attempt",
        })
    }
}

/// An enumeration representing various authentication-related errors.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AuthError {
    #[snafu(display("AuthError: client_id is missing or empty"))]
    MissingClientId,

    #[snafu(display("AuthError: callback rejected: {rejection}"))]
    CallbackRejected { rejection: CallbackRejection },

    #[snafu(display("AuthError: token exchange failed"))]
    Exchange { source: RequestError },

    #[snafu(display("AuthError: could not serialize or deserialize session data: {source}"))]
    Persistence { source: serde_json::Error },
}
