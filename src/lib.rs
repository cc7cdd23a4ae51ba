//! Client-side Spotify authorization for Moodify, built on the OAuth 2.0
//! Authorization Code flow with PKCE (RFC 7636), plus a thin typed client for
//! the Moodify backend's token-exchange, prediction and recommendation
//! endpoints.
//!
//! The flow spans two page loads. Before the redirect, [`LoginFlow::begin`]
//! generates a code verifier and an anti-CSRF state token, persists both
//! through a [`SessionStore`], and hands out the authorization URL. After the
//! provider redirects back, [`LoginFlow::complete`] validates the echoed
//! state against the stored one, consumes the stored tuple (so a replayed
//! callback is rejected), exchanges the code and verifier for an access
//! token, and persists the token record.
//!
//! ```no_run
//! use moodify_client::url::Url;
//! use moodify_client::{ApiClient, AuthOptions, LoginFlow, MemorySessionStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = AuthOptions::spotify(
//!     "my-client-id",
//!     Url::parse("https://example.com/callback")?,
//! );
//! let mut store = MemorySessionStore::default();
//!
//! // Before the redirect: persist the attempt, then navigate to this URL.
//! let authorize_url = LoginFlow::new(&mut store).begin(&options)?;
//!
//! // After the provider redirects back:
//! let api = ApiClient::new(Url::parse("https://moodify-backend.example.com")?);
//! let callback_url = Url::parse("https://example.com/callback?code=abc&state=xyz")?;
//! let token = LoginFlow::new(&mut store)
//!     .complete(&api, &options, &callback_url)
//!     .await?;
//!
//! // Downstream feature calls attach the token as a bearer credential.
//! let prediction = api.predict("feeling great today").await?;
//! let recommendation = api.recommend("feeling great today", &token.access_token).await?;
//! # Ok(())
//! # }
//! ```

mod callback;
mod code_verifier;
mod config;
mod error;
mod flow;
mod login;
mod request;
mod response;
mod session;
mod state_token;
mod token;

pub use code_verifier::{CodeChallenge, CodeChallengeMethod, CodeVerifier};
pub use config::{AdvancedOptions, AuthOptions};
pub use error::{AuthError, CallbackRejection};
pub use flow::{FlowStage, LoginFlow};
pub use request::{ApiClient, RequestError};
pub use response::{ErrorResponse, Prediction, Recommendation, RecommendationResponse};
pub use session::{
    KEY_ACCESS_TOKEN, KEY_CODE_VERIFIER, KEY_STATE, MemorySessionStore, SessionStore,
    stored_access_token,
};
pub use state_token::StateToken;
pub use token::TokenData;

pub mod url {
    pub use url::Url;
}
