//! Client layer: orchestrates transport calls and maps transport ↔ domain.

mod account;
mod connector;
#[cfg(test)]
mod fake;
mod message;
mod number;

use std::env;
use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::domain::{AccountId, ApiKey, ApiSecret, BearerToken, QueryParams, ValidationError};
use crate::transport::{TransportError, decode_error_message, sign_request};

const DEFAULT_BASE_URL: &str = "https://api.vivialconnect.net/api/v1.0/";
const JSON_MEDIA_TYPE: &str = "application/json";

const ENV_ACCOUNT_ID: &str = "VIVIALCONNECT_ACCOUNT_ID";
const ENV_API_KEY: &str = "VIVIALCONNECT_API_KEY";
const ENV_API_SECRET: &str = "VIVIALCONNECT_API_SECRET";
const ENV_BASE_URL: &str = "VIVIALCONNECT_API_BASE_URL";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpRequest {
    method: Method,
    url: Url,
    headers: Vec<(&'static str, String)>,
    body: Option<Vec<u8>>,
}

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let mut builder = self.client.request(request.method, request.url);
            for (name, value) in request.headers {
                builder = builder.header(name, value);
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone)]
/// Authentication credentials for Vivial Connect API calls.
///
/// [`Auth::hmac`] signs every request with the account's API key and secret and is
/// what the service expects by default. [`Auth::basic`] and [`Auth::bearer`] cover
/// deployments that accept HTTP Basic credentials or an OAuth access token.
pub enum Auth {
    /// HMAC-SHA256 request signing.
    Hmac {
        api_key: ApiKey,
        api_secret: ApiSecret,
    },
    /// HTTP Basic with the API key as user name and the secret as password.
    Basic {
        api_key: ApiKey,
        api_secret: ApiSecret,
    },
    /// `Authorization: Bearer <token>`.
    Bearer(BearerToken),
}

impl Auth {
    /// Create [`Auth::Hmac`] and validate that both parts are non-empty.
    pub fn hmac(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::Hmac {
            api_key: ApiKey::new(api_key)?,
            api_secret: ApiSecret::new(api_secret)?,
        })
    }

    /// Create [`Auth::Basic`] and validate that both parts are non-empty.
    pub fn basic(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self::Basic {
            api_key: ApiKey::new(api_key)?,
            api_secret: ApiSecret::new(api_secret)?,
        })
    }

    /// Create [`Auth::Bearer`] and validate that the token is non-empty.
    pub fn bearer(token: impl Into<String>) -> Result<Self, ValidationError> {
        Ok(Self::Bearer(BearerToken::new(token)?))
    }

    fn authorize(
        &self,
        request: &mut HttpRequest,
        now: DateTime<Utc>,
    ) -> Result<(), TransportError> {
        match self {
            Self::Hmac {
                api_key,
                api_secret,
            } => {
                let signed = sign_request(
                    api_key,
                    api_secret,
                    request.method.as_str(),
                    &request.url,
                    request.body.as_deref().unwrap_or_default(),
                    now,
                )?;
                request.headers.push(("Date", signed.date));
                request.headers.push(("X-Auth-Date", signed.auth_date));
                request
                    .headers
                    .push(("X-Auth-SignedHeaders", signed.signed_headers.to_owned()));
                request.headers.push(("Authorization", signed.authorization));
            }
            Self::Basic {
                api_key,
                api_secret,
            } => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", api_key.as_str(), api_secret.as_str()));
                request
                    .headers
                    .push(("Authorization", format!("Basic {credentials}")));
            }
            Self::Bearer(token) => {
                request
                    .headers
                    .push(("Authorization", format!("Bearer {}", token.as_str())));
            }
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`VivialClient`].
///
/// This error preserves:
/// - HTTP-level failures (non-2xx status or transport failures),
/// - API-level failures (non-2xx status with an error message in the body),
/// - validation/parse/configuration failures.
pub enum VivialError {
    /// HTTP client / transport failure (DNS, TLS, timeouts, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// Non-successful HTTP status with an `error` or `message` in the JSON body.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed as the expected format.
    #[error("parse error: {0}")]
    Parse(#[source] Box<dyn StdError + Send + Sync>),

    /// The server answered `204 No Content` where a resource was expected.
    #[error("server returned no content")]
    NoContent,

    /// The client is misconfigured (base URL, environment, credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
/// Builder for [`VivialClient`].
///
/// Use this when you need to customize the base URL, timeout, or user-agent.
pub struct VivialClientBuilder {
    account_id: AccountId,
    auth: Auth,
    base_url: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl VivialClientBuilder {
    /// Create a builder with the default base URL and no timeout/user-agent override.
    pub fn new(account_id: AccountId, auth: Auth) -> Self {
        Self {
            account_id,
            auth,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the API base URL (defaults to `https://api.vivialconnect.net/api/v1.0/`).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`VivialClient`].
    pub fn build(self) -> Result<VivialClient, VivialError> {
        let base_url = normalize_base_url(&self.base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| VivialError::Transport(Box::new(err)))?;

        Ok(VivialClient {
            account_id: self.account_id,
            auth: self.auth,
            base_url,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level Vivial Connect client.
///
/// Every operation is scoped to one account: resource URLs take the form
/// `{base}accounts/{account_id}/{resource}.json`. Instance operations take the
/// resource by `&mut` and copy the server's response back into it.
pub struct VivialClient {
    account_id: AccountId,
    auth: Auth,
    base_url: String,
    http: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for VivialClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VivialClient")
            .field("account_id", &self.account_id)
            .field("auth", &self.auth)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl VivialClient {
    /// Create a client using the default base URL.
    ///
    /// For more customization, use [`VivialClient::builder`].
    pub fn new(account_id: AccountId, auth: Auth) -> Self {
        Self {
            account_id,
            auth,
            base_url: DEFAULT_BASE_URL.to_owned(),
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder(account_id: AccountId, auth: Auth) -> VivialClientBuilder {
        VivialClientBuilder::new(account_id, auth)
    }

    /// Build an HMAC-authenticated client from the environment.
    ///
    /// Reads `VIVIALCONNECT_ACCOUNT_ID`, `VIVIALCONNECT_API_KEY`,
    /// `VIVIALCONNECT_API_SECRET` and, optionally, `VIVIALCONNECT_API_BASE_URL`.
    pub fn from_env() -> Result<Self, VivialError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, VivialError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| VivialError::Config(format!("{name} is not set")))
        };

        let account_id = required(ENV_ACCOUNT_ID)?
            .trim()
            .parse::<u32>()
            .map_err(|err| VivialError::Config(format!("{ENV_ACCOUNT_ID}: {err}")))?;
        let auth = Auth::hmac(required(ENV_API_KEY)?, required(ENV_API_SECRET)?)?;

        let mut builder = Self::builder(AccountId::new(account_id)?, auth);
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|value| !value.trim().is_empty()) {
            builder = builder.base_url(base_url);
        }
        builder.build()
    }

    /// Account every request is scoped to.
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url, VivialError> {
        Url::parse(&self.base_url)
            .and_then(|base| base.join(path))
            .map_err(|err| VivialError::Config(format!("invalid request URL `{path}`: {err}")))
    }

    fn account_url(&self) -> Result<Url, VivialError> {
        self.url(&format!("accounts/{}.json", self.account_id))
    }

    fn resource_url(&self, resource: &str, suffix: Option<&str>) -> Result<Url, VivialError> {
        match suffix {
            Some(suffix) => self.url(&format!(
                "accounts/{}/{resource}/{suffix}.json",
                self.account_id
            )),
            None => self.url(&format!("accounts/{}/{resource}.json", self.account_id)),
        }
    }

    /// Issue one authenticated JSON request and classify the response.
    async fn request(
        &self,
        method: Method,
        mut url: Url,
        query: &QueryParams,
        body: Option<Value>,
    ) -> Result<Reply, VivialError> {
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        let body = body
            .map(|value| serde_json::to_vec(&value))
            .transpose()
            .map_err(|err| VivialError::Parse(Box::new(err)))?;

        let mut headers = vec![("Accept", JSON_MEDIA_TYPE.to_owned())];
        if body.is_some() {
            headers.push(("Content-Type", JSON_MEDIA_TYPE.to_owned()));
        }
        let mut request = HttpRequest {
            method,
            url,
            headers,
            body,
        };
        self.auth
            .authorize(&mut request, Utc::now())
            .map_err(|err| VivialError::Config(err.to_string()))?;

        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self
            .http
            .send(request)
            .await
            .map_err(VivialError::Transport)?;
        debug!(status = response.status, "received response");

        if !(200..=299).contains(&response.status) {
            warn!(status = response.status, "request failed");
            return Err(error_from_response(response));
        }
        if response.status == 204 {
            return Ok(Reply::NoContent);
        }
        Ok(Reply::Content(response.body))
    }

    async fn get(&self, url: Url, query: &QueryParams) -> Result<Reply, VivialError> {
        self.request(Method::GET, url, query, None).await
    }

    async fn send_json(
        &self,
        method: Method,
        url: Url,
        body: Value,
    ) -> Result<Reply, VivialError> {
        self.request(method, url, &QueryParams::new(), Some(body))
            .await
    }

    /// `204 No Content` means the resource was removed.
    async fn delete(&self, url: Url) -> Result<bool, VivialError> {
        let reply = self
            .request(Method::DELETE, url, &QueryParams::new(), None)
            .await?;
        Ok(matches!(reply, Reply::NoContent))
    }

    async fn count(&self, url: Url) -> Result<u64, VivialError> {
        self.get(url, &QueryParams::new())
            .await?
            .decode(crate::transport::decode_count)
    }
}

#[derive(Debug)]
enum Reply {
    Content(String),
    NoContent,
}

impl Reply {
    fn decode<T>(
        self,
        decode: fn(&str) -> Result<T, TransportError>,
    ) -> Result<T, VivialError> {
        match self {
            Self::Content(body) => decode(&body).map_err(|err| VivialError::Parse(Box::new(err))),
            Self::NoContent => Err(VivialError::NoContent),
        }
    }
}

fn error_from_response(response: HttpResponse) -> VivialError {
    if let Some(message) = decode_error_message(&response.body) {
        return VivialError::Api {
            status: response.status,
            message,
        };
    }
    let body = if response.body.trim().is_empty() {
        None
    } else {
        Some(response.body)
    };
    VivialError::HttpStatus {
        status: response.status,
        body,
    }
}

fn normalize_base_url(base_url: &str) -> Result<String, VivialError> {
    let mut base_url = base_url.trim().to_owned();
    if !base_url.ends_with('/') {
        base_url.push('/');
    }
    let parsed = Url::parse(&base_url)
        .map_err(|err| VivialError::Config(format!("invalid base URL `{base_url}`: {err}")))?;
    if parsed.cannot_be_a_base() {
        return Err(VivialError::Config(format!(
            "base URL `{base_url}` cannot be used as a base"
        )));
    }
    Ok(base_url)
}
