use snafu::ResultExt;
use url::Url;

use crate::callback::{CallbackResponse, SuccessCallback};
use crate::config::AuthOptions;
use crate::error::{
    AuthError, CallbackRejectedSnafu, CallbackRejection, ExchangeSnafu, MissingClientIdSnafu,
};
use crate::login::create_authorization_url;
use crate::request::ApiClient;
use crate::session::{AuthSession, KEY_STATE, SessionStore, store_access_token};
use crate::token::TokenData;

/// Steps of a single authorization attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStage {
    Idle,
    AwaitingCallback,
    Validating,
    Exchanging,
    Complete,
    Invalid,
}

/// Drives one authorization attempt over a [`SessionStore`].
///
/// Construct it fresh on every page load. The persisted {verifier, state}
/// tuple is the only state carried across the redirect boundary, which keeps
/// the "exactly one live attempt" invariant enforceable: [`Self::begin`]
/// overwrites any orphaned tuple, [`Self::complete`] consumes the live one
/// exactly once.
pub struct LoginFlow<'s, S: SessionStore> {
    store: &'s mut S,
    stage: FlowStage,
}

impl<'s, S: SessionStore> LoginFlow<'s, S> {
    pub fn new(store: &'s mut S) -> Self {
        let stage = match store.get(KEY_STATE) {
            Some(_) => FlowStage::AwaitingCallback,
            None => FlowStage::Idle,
        };
        Self { store, stage }
    }

    pub fn stage(&self) -> FlowStage {
        self.stage
    }

    /// Generate a fresh {verifier, state} tuple, persist it and hand out the
    /// authorization URL to navigate to.
    ///
    /// Persistence happens before the URL leaves this function: navigation
    /// tears down the calling context, and anything not stored by then is
    /// lost. Fails without persisting anything when the client id is empty.
    pub fn begin(&mut self, options: &AuthOptions) -> Result<Url, AuthError> {
        if options.client_id.trim().is_empty() {
            return MissingClientIdSnafu.fail();
        }

        let session = AuthSession::generate();
        let code_challenge = session.code_verifier.to_code_challenge();
        session.persist(self.store)?;

        let authorize_url = create_authorization_url(options, &code_challenge, &session.state);
        self.stage = FlowStage::AwaitingCallback;
        tracing::debug!("Authorization attempt started.");
        Ok(authorize_url)
    }

    /// Validate the provider callback and exchange the code for a token.
    ///
    /// The stored tuple is consumed no matter the outcome, so replaying the
    /// same callback URL fails validation instead of re-exchanging. On
    /// success the token record is persisted and returned.
    pub async fn complete(
        &mut self,
        api: &ApiClient,
        options: &AuthOptions,
        callback_url: &Url,
    ) -> Result<TokenData, AuthError> {
        let result = self.validate_and_exchange(api, options, callback_url).await;
        match &result {
            Ok(_) => {
                self.stage = FlowStage::Complete;
                tracing::debug!("Authorization attempt completed.");
            }
            Err(err) => {
                self.stage = FlowStage::Invalid;
                tracing::warn!(%err, "Authorization attempt failed.");
            }
        }
        result
    }

    async fn validate_and_exchange(
        &mut self,
        api: &ApiClient,
        options: &AuthOptions,
        callback_url: &Url,
    ) -> Result<TokenData, AuthError> {
        self.stage = FlowStage::Validating;

        // Read and remove in one step, before any comparison. Replays and
        // double-fired callback effects must find nothing.
        let session = AuthSession::take(self.store);

        let SuccessCallback { code, state } = match CallbackResponse::from_url(callback_url) {
            Some(CallbackResponse::Success(success)) => success,
            Some(CallbackResponse::Error(error)) => {
                tracing::warn!(
                    error = %error.error,
                    error_description = ?error.error_description,
                    "Identity provider returned an error callback."
                );
                return CallbackRejectedSnafu {
                    rejection: CallbackRejection::ProviderError,
                }
                .fail();
            }
            None => {
                return CallbackRejectedSnafu {
                    rejection: CallbackRejection::MalformedCallback,
                }
                .fail();
            }
        };

        let Some(session) = session else {
            return CallbackRejectedSnafu {
                rejection: CallbackRejection::NoPendingAttempt,
            }
            .fail();
        };

        // Mandatory anti-CSRF check. No constant-time comparison needed: the
        // stored state is already gone, an attacker gets no second try.
        if state != session.state.as_str() {
            return CallbackRejectedSnafu {
                rejection: CallbackRejection::StateMismatch,
            }
            .fail();
        }

        if session.age() > options.advanced.login_attempt_max_age {
            return CallbackRejectedSnafu {
                rejection: CallbackRejection::StaleAttempt,
            }
            .fail();
        }

        self.stage = FlowStage::Exchanging;
        let token = api
            .exchange_code_for_token(&code, session.code_verifier.code_verifier())
            .await
            .context(ExchangeSnafu)?;

        store_access_token(self.store, &token)?;
        Ok(token)
    }
}
