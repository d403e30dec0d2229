use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

use super::TransportError;
use crate::domain::{ApiKey, ApiSecret};

type HmacSha256 = Hmac<Sha256>;

const ACCEPT: &str = "application/json";
const SIGNED_HEADERS: &str = "accept;date;host";

/// Header values produced by [`sign_request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    /// `Date` header (IMF-fixdate).
    pub date: String,
    /// `X-Auth-Date` header (`%Y%m%dT%H%M%SZ`).
    pub auth_date: String,
    /// `X-Auth-SignedHeaders` header.
    pub signed_headers: &'static str,
    /// `Authorization` header, `HMAC <api_key>:<hex signature>`.
    pub authorization: String,
}

/// Sign a request with the account's API key and secret.
///
/// The signature is HMAC-SHA256 over the newline-joined canonical request:
/// method, request timestamp, path, canonical query, canonical headers,
/// signed header names, and the hex SHA-256 of the body.
pub fn sign_request(
    api_key: &ApiKey,
    api_secret: &ApiSecret,
    method: &str,
    url: &Url,
    body: &[u8],
    now: DateTime<Utc>,
) -> Result<SignedHeaders, TransportError> {
    let auth_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%a, %d %b %Y %H:%M:%S GMT").to_string();

    let canonical = canonical_request(method, url, body, &auth_date, &date);
    let mut mac = HmacSha256::new_from_slice(api_secret.as_str().as_bytes())
        .map_err(|err| TransportError::Signing(err.to_string()))?;
    mac.update(canonical.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(SignedHeaders {
        date,
        auth_date,
        signed_headers: SIGNED_HEADERS,
        authorization: format!("HMAC {}:{signature}", api_key.as_str()),
    })
}

fn canonical_request(
    method: &str,
    url: &Url,
    body: &[u8],
    auth_date: &str,
    date: &str,
) -> String {
    let method = method.to_ascii_uppercase();
    let query = canonical_query(url);
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_owned(),
        (None, _) => String::new(),
    };
    let canonical_headers = format!("accept:{ACCEPT}\ndate:{date}\nhost:{host}");
    let body_hash = hex::encode(Sha256::digest(body));

    [
        method.as_str(),
        auth_date,
        url.path(),
        query.as_str(),
        canonical_headers.as_str(),
        SIGNED_HEADERS,
        body_hash.as_str(),
    ]
    .join("\n")
}

fn canonical_query(url: &Url) -> String {
    let mut pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
    pairs.sort();
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish()
}
