//! Typed client of the Lexx backend HTTP API.

mod auth;
mod cases;
mod chat;
mod docs;
mod documents;
mod drafts;
mod user;

pub use auth::{Credentials, SessionStatus};
pub use cases::{CaseDoc, CaseParties, CaseStub, Outcome, SearchFilters, SearchMode};
pub use chat::{ChatAnswer, ChatMessage, ChatSummary, MAX_PROMPT_TOKENS};
pub use docs::{GeneratedDraft, TemplateSuggestion};
pub use documents::{ProcessedFile, SummaryLength};
pub use user::Profile;

use crate::service::session::BearerToken;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Clone, Debug, serde::Deserialize)]
pub struct Configuration {
    #[serde(default = "Configuration::default_base_url")]
    pub base_url: Url,
    /// Request timeout, in seconds.
    #[serde(default = "Configuration::default_timeout")]
    pub timeout: u64,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout: Self::default_timeout(),
        }
    }
}

impl Configuration {
    fn default_base_url() -> Url {
        Url::parse("http://localhost:8000").expect("default base url is hardcoded and valid")
    }

    fn default_timeout() -> u64 {
        120
    }

    pub fn build(&self) -> Result<ApiClient, Error> {
        tracing::debug!("building api client for {}", self.base_url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout))
            .build()
            .map_err(Error::ClientBuildFailed)?;
        Ok(ApiClient::new(client, self.base_url.clone()))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to build http client: {0}")]
    ClientBuildFailed(reqwest::Error),
    #[error("unable to build url for {path}: {source}")]
    UrlInvalid {
        path: String,
        source: url::ParseError,
    },
    #[error("not logged in, run `lexx auth login` first")]
    MissingToken,
    #[error("the prompt is {tokens} tokens long, above {}, summarize it first with `lexx summarize`", chat::MAX_PROMPT_TOKENS)]
    PromptTooLong { tokens: u64 },
    #[error("unable to reach the server: {0}")]
    RequestFailed(reqwest::Error),
    #[error("authentication rejected: {0}")]
    Unauthorized(String),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("server responded with {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("unable to read server response: {0}")]
    ResponseInvalid(reqwest::Error),
    #[error("unable to read file {path}: {source}")]
    FileReadFailed {
        path: String,
        source: std::io::Error,
    },
}

/// Error body returned by the backend, `detail` for validation and http
/// errors, `message` for some not found replies.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

impl ErrorBody {
    fn message(body: String) -> String {
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(ErrorBody {
                detail: Some(serde_json::Value::String(detail)),
                ..
            }) => detail,
            Ok(ErrorBody {
                detail: Some(detail),
                ..
            }) => detail.to_string(),
            Ok(ErrorBody {
                message: Some(message),
                ..
            }) => message,
            _ => body,
        }
    }
}

/// Reply of the endpoints that only acknowledge a change.
#[derive(Debug, Default, serde::Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: Url,
    token: Option<BearerToken>,
}

impl ApiClient {
    pub fn new(client: reqwest::Client, mut base_url: Url) -> Self {
        // relative joins only keep the base path when it ends with a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            client,
            base_url,
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<BearerToken>) -> Self {
        self.token = token;
        self
    }

    pub fn set_token(&mut self, token: Option<BearerToken>) {
        self.token = token;
    }

    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| {
                tracing::error!("unable to build url for {path}: {source:?}");
                Error::UrlInvalid {
                    path: path.to_string(),
                    source,
                }
            })
    }

    /// Builds a request, carrying the token when there is one.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        let builder = self.client.request(method, self.url(path)?);
        Ok(match self.token {
            Some(ref token) => builder.bearer_auth(token.as_str()),
            None => builder,
        })
    }

    /// Same as `request` but refuses to go further without a token.
    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder, Error> {
        if self.token.is_none() {
            return Err(Error::MissingToken);
        }
        self.request(method, path)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<reqwest::Response, Error> {
        let res = builder.send().await.map_err(|err| {
            metrics::counter!("api_error", "reason" => "request").increment(1);
            tracing::error!("unable to execute request: {:?}", err);
            Error::RequestFailed(err)
        })?;
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let url = res.url().to_string();
        let message = ErrorBody::message(res.text().await.unwrap_or_default());
        metrics::counter!("api_error", "reason" => "status", "status" => status.as_u16().to_string())
            .increment(1);
        tracing::debug!("{url} responded with {status}: {message}");
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(message),
            StatusCode::NOT_FOUND => Error::NotFound(message),
            _ => Error::Status { status, message },
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, Error> {
        let res = self.execute(builder).await?;
        res.json().await.map_err(|err| {
            metrics::counter!("api_error", "reason" => "response").increment(1);
            tracing::error!("unable to parse response: {:?}", err);
            Error::ResponseInvalid(err)
        })
    }
}
