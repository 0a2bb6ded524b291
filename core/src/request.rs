use std::str::FromStr;

use crate::utils::Redact;
use crate::{Error, Result};
use http::header::{HeaderName, HeaderValue};
use http::uri::{Authority, PathAndQuery};
use http::{HeaderMap, Method};

/// Signing context for a request.
///
/// This is the normalized input of every signer: the request fields that
/// participate in the signature, already resolved to owned values. It is
/// constructed and dropped within a single signing call.
#[derive(Debug, Clone)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP authority, the target host of the request.
    ///
    /// A request without an authority cannot be signed; both constructors
    /// reject it.
    pub authority: Authority,
    /// HTTP path.
    pub path: String,
    /// HTTP query parameters, percent-decoded.
    ///
    /// Keys are unique per request; duplicate keys are not modeled.
    pub query: Vec<(String, String)>,
    /// HTTP headers.
    ///
    /// Names compare case-insensitively and are stored lowercased. Two
    /// inserts whose names differ only by case collapse to one entry, last
    /// write wins.
    pub headers: HeaderMap,
    /// Fully buffered request body text.
    pub body: String,
}

impl SigningRequest {
    /// Build a signing request from `http::request::Parts` and its buffered body.
    ///
    /// The authority is taken from the request URI; a URI without one fails
    /// with [`ErrorKind::MissingHost`](crate::ErrorKind::MissingHost). The
    /// body must be representable as text.
    pub fn build(parts: &http::request::Parts, body: &[u8]) -> Result<Self> {
        let uri = parts.uri.clone().into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        let body = std::str::from_utf8(body)
            .map_err(|e| {
                Error::unsupported_body("request body has no deterministic textual form")
                    .with_source(e)
            })?
            .to_string();

        Ok(SigningRequest {
            method: parts.method.clone(),
            authority: uri
                .authority
                .ok_or_else(|| Error::missing_host("request without authority cannot be signed"))?,
            path: paq.path().to_string(),
            query: paq
                .query()
                .map(|v| {
                    form_urlencoded::parse(v.as_bytes())
                        .map(|(k, v)| (k.into_owned(), v.into_owned()))
                        .collect()
                })
                .unwrap_or_default(),
            headers: parts.headers.clone(),
            body,
        })
    }

    /// Create a signing request from its parts.
    ///
    /// The method is case-insensitive. The host is required; an empty or
    /// unparsable host fails with
    /// [`ErrorKind::MissingHost`](crate::ErrorKind::MissingHost).
    pub fn new(method: &str, host: &str, path: &str) -> Result<Self> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
        let authority = Authority::from_str(host).map_err(|e| {
            Error::missing_host(format!("`{host}` is not a resolvable host")).with_source(e)
        })?;

        Ok(SigningRequest {
            method,
            authority,
            path: path.to_string(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: String::new(),
        })
    }

    /// Push a new query pair into query list.
    #[inline]
    pub fn query_push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    /// Insert a header, replacing any existing header with the same
    /// case-insensitive name.
    pub fn header_insert(&mut self, name: &str, value: &str) -> Result<()> {
        let name = HeaderName::from_str(name)?;
        let value = HeaderValue::from_str(value)?;
        self.headers.insert(name, value);

        Ok(())
    }

    /// Set the request body.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// Diagnostic artifacts of a signing call.
///
/// Exposed as plain text for logging and audit. Consuming them must never
/// alter signing behavior: the values are write-once per call, hashed into
/// the signature before the result is returned.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// The canonical request the signature was computed over.
    pub canonical_request: String,
    /// The string that was signed with the derived signing key.
    pub string_to_sign: String,
}

/// The outcome of a signing call.
///
/// Either a complete, internally consistent result is produced or the call
/// fails; no partial results exist.
#[derive(Clone)]
pub struct SigningResult {
    /// The assembled `Authorization` header value.
    pub authorization: String,
    /// The signing timestamp, the same value used in the canonical request.
    pub timestamp: String,
    /// Headers to attach to the outgoing request before transmission.
    pub headers: HeaderMap,
    /// Diagnostic artifacts.
    pub diagnostics: Diagnostics,
}

impl std::fmt::Debug for SigningResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningResult")
            .field("authorization", &Redact::from(&self.authorization))
            .field("timestamp", &self.timestamp)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .finish()
    }
}
