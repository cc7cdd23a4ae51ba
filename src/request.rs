use http::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use snafu::{ResultExt, Snafu};
use url::Url;

use crate::response::{ErrorResponse, Prediction, RecommendationResponse, TokenResponse};
use crate::token::TokenData;

#[derive(Debug, Snafu)]
pub enum RequestError {
    #[snafu(display("RequestError: Invalid request URL"))]
    InvalidUrl { source: url::ParseError },

    #[snafu(display("RequestError: Could not send request"))]
    Send { source: reqwest::Error },

    #[snafu(display("RequestError: Received status {status}"))]
    Status { status: StatusCode },

    #[snafu(display("RequestError: Could not decode payload"))]
    Decode { source: reqwest::Error },

    #[snafu(display("RequestError: Received an error response"))]
    ErrResponse { error_response: ErrorResponse },
}

/// Thin transport to the Moodify backend. No retries; failures surface to the
/// caller as a [`RequestError`] distinguishing network errors, non-2xx
/// statuses and malformed bodies.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// POST a JSON body to `path`, optionally attaching a bearer credential.
    /// Request bodies never reach the logs; they may carry secrets.
    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<T, RequestError> {
        let url = self.base_url.join(path).context(InvalidUrlSnafu)?;

        let mut request = self.client.post(url).json(body);
        if let Some(access_token) = bearer {
            request = request.bearer_auth(access_token);
        }

        let response = request.send().await.context(SendSnafu)?;
        let status = response.status();
        if !status.is_success() {
            return StatusSnafu { status }.fail();
        }
        response.json::<T>().await.context(DecodeSnafu)
    }

    /// Redeem the authorization code at the backend's token-exchange
    /// endpoint. The verifier is sent here and nowhere else.
    pub async fn exchange_code_for_token(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<TokenData, RequestError> {
        #[derive(Serialize)]
        struct ExchangeRequest<'a> {
            code: &'a str,
            code_verifier: &'a str,
        }

        match self
            .post::<_, TokenResponse>("/callback", &ExchangeRequest { code, code_verifier }, None)
            .await?
        {
            TokenResponse::Success(success) => Ok(success.into()),
            TokenResponse::Error(error_response) => ErrResponseSnafu { error_response }.fail(),
        }
    }

    /// Sentiment prediction for free-text mood input. Unauthenticated.
    pub async fn predict(&self, text: &str) -> Result<Prediction, RequestError> {
        #[derive(Serialize)]
        struct PredictRequest<'a> {
            text: &'a str,
        }

        self.post("/predict", &PredictRequest { text }, None).await
    }

    /// Personalized recommendation for free-text mood input, authorized with
    /// the stored access token as bearer credential.
    pub async fn recommend(
        &self,
        text: &str,
        access_token: &str,
    ) -> Result<RecommendationResponse, RequestError> {
        #[derive(Serialize)]
        struct RecommendRequest<'a> {
            text: &'a str,
        }

        self.post("/recommend", &RecommendRequest { text }, Some(access_token))
            .await
    }
}
