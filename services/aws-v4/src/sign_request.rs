use crate::constants::{
    AWS_QUERY_ENCODE_SET, AWS_URI_ENCODE_SET, X_AMZ_DATE, X_AMZ_SECURITY_TOKEN,
};
use crate::Credential;
use awsig_core::hash::{hex_hmac_sha256, hex_sha256, hmac_sha256};
use awsig_core::time::{apply_clock_offset, format_date, format_iso8601, DateTime};
use awsig_core::{
    Context, Diagnostics, Error, Result, SignRequest, SigningCredential, SigningRequest,
    SigningResult,
};
use http::{header, HeaderMap, HeaderValue};
use log::debug;
use percent_encoding::{percent_decode_str, utf8_percent_encode};
use std::fmt::Write;

/// RequestSigner that implements AWS SigV4, header variant.
///
/// - [Signature Version 4 signing process](https://docs.aws.amazon.com/general/latest/gr/signature-version-4.html)
#[derive(Debug)]
pub struct RequestSigner {
    service: String,
    region: String,

    clock_offset_millis: i64,
}

impl RequestSigner {
    /// Create a new AWS V4 signer for the given service and region.
    pub fn new(service: &str, region: &str) -> Self {
        Self {
            service: service.into(),
            region: region.into(),

            clock_offset_millis: 0,
        }
    }

    /// Account for skew between the local clock and the service's clock.
    ///
    /// The offset is added to every clock reading before the signing
    /// timestamp is derived.
    pub fn with_clock_offset(mut self, offset_millis: i64) -> Self {
        self.clock_offset_millis = offset_millis;
        self
    }
}

impl SignRequest for RequestSigner {
    type Credential = Credential;

    fn sign_request(
        &self,
        ctx: &Context,
        req: &SigningRequest,
        credential: &Self::Credential,
    ) -> Result<SigningResult> {
        if !credential.is_valid() {
            return Err(Error::missing_credentials(
                "access key id or secret access key resolved empty",
            ));
        }

        let now = apply_clock_offset(ctx.now(), self.clock_offset_millis);
        let timestamp = format_iso8601(now);

        // The signed header set is the caller's headers plus the request's
        // actual target host. Host is always authoritative: a caller-supplied
        // value is overridden, never signed.
        let mut headers = req.headers.clone();
        headers.insert(header::HOST, HeaderValue::from_str(req.authority.as_str())?);

        // Build canonical request and string to sign.
        let creq = canonical_request_string(req, &headers)?;
        let encoded_req = hex_sha256(creq.as_bytes());
        debug!("calculated canonical request: {creq}");

        // Scope: "19821217/<region>/<service>/aws4_request"
        let scope = format!(
            "{}/{}/{}/aws4_request",
            format_date(now),
            self.region,
            self.service
        );
        debug!("calculated scope: {scope}");

        // StringToSign:
        //
        // AWS4-HMAC-SHA256
        // 19821217T000000Z
        // 19821217/<region>/<service>/aws4_request
        // <hashed_canonical_request>
        let string_to_sign = {
            let mut f = String::new();
            writeln!(f, "AWS4-HMAC-SHA256")?;
            writeln!(f, "{timestamp}")?;
            writeln!(f, "{scope}")?;
            write!(f, "{encoded_req}")?;
            f
        };
        debug!("calculated string to sign: {string_to_sign}");

        let signing_key = generate_signing_key(
            &credential.secret_access_key,
            now,
            &self.region,
            &self.service,
        );
        let signature = hex_hmac_sha256(&signing_key, string_to_sign.as_bytes());

        let authorization = format!(
            "AWS4-HMAC-SHA256 Credential={}/{}, SignedHeaders={}, Signature={}",
            credential.access_key_id,
            scope,
            header_name_to_vec_sorted(&headers).join(";"),
            signature
        );

        // Headers for the caller to attach before transmitting. The date and
        // token travel with the request but are not part of the signed set.
        let mut out = HeaderMap::new();
        let mut value = HeaderValue::from_str(&authorization)?;
        value.set_sensitive(true);
        out.insert(header::AUTHORIZATION, value);
        out.insert(X_AMZ_DATE, HeaderValue::from_str(&timestamp)?);
        if let Some(token) = &credential.session_token {
            let mut value = HeaderValue::from_str(token)?;
            value.set_sensitive(true);
            out.insert(X_AMZ_SECURITY_TOKEN, value);
        }

        Ok(SigningResult {
            authorization,
            timestamp,
            headers: out,
            diagnostics: Diagnostics {
                canonical_request: creq,
                string_to_sign,
            },
        })
    }
}

fn canonical_request_string(req: &SigningRequest, headers: &HeaderMap) -> Result<String> {
    // 256 is specially chosen to avoid reallocation for most requests.
    let mut f = String::with_capacity(256);

    // Insert method
    writeln!(f, "{}", req.method.as_str().to_uppercase())?;
    // Insert encoded path. Decoding first keeps already-escaped sequences
    // from being encoded twice.
    let path = percent_decode_str(&req.path).decode_utf8().map_err(|e| {
        Error::request_invalid("path is not valid percent-encoded utf-8").with_source(e)
    })?;
    writeln!(f, "{}", utf8_percent_encode(&path, &AWS_URI_ENCODE_SET))?;
    // Insert query, sorted ascending by raw key byte order.
    let mut query = req.query.clone();
    query.sort();
    writeln!(
        f,
        "{}",
        query
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(k, &AWS_QUERY_ENCODE_SET),
                    utf8_percent_encode(v, &AWS_QUERY_ENCODE_SET)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    )?;
    // Insert canonical headers, values exactly as supplied.
    let signed_headers = header_name_to_vec_sorted(headers);
    for name in signed_headers.iter() {
        writeln!(f, "{}:{}", name, headers[*name].to_str()?)?;
    }
    writeln!(f)?;
    // Insert signed headers
    writeln!(f, "{}", signed_headers.join(";"))?;
    // Insert body hash
    write!(f, "{}", hex_sha256(req.body.as_bytes()))?;

    Ok(f)
}

fn header_name_to_vec_sorted(headers: &HeaderMap) -> Vec<&str> {
    let mut h = headers.keys().map(|k| k.as_str()).collect::<Vec<&str>>();
    h.sort_unstable();

    h
}

fn generate_signing_key(secret: &str, time: DateTime, region: &str, service: &str) -> Vec<u8> {
    // Each step's output keys the next; message and key are not symmetric.
    let secret = format!("AWS4{secret}");
    // Sign date
    let sign_date = hmac_sha256(secret.as_bytes(), format_date(time).as_bytes());
    // Sign region
    let sign_region = hmac_sha256(sign_date.as_slice(), region.as_bytes());
    // Sign service
    let sign_service = hmac_sha256(sign_region.as_slice(), service.as_bytes());
    // Sign request
    hmac_sha256(sign_service.as_slice(), "aws4_request".as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use awsig_core::{ErrorKind, FixedClock};
    use chrono::TimeZone;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn test_context() -> Context {
        let _ = env_logger::builder().is_test(true).try_init();

        let time = Utc.with_ymd_and_hms(1982, 12, 17, 0, 0, 0).unwrap();
        Context::new().with_clock(FixedClock(time))
    }

    fn test_credential() -> Credential {
        Credential {
            access_key_id: "5678".to_string(),
            secret_access_key: "1234".to_string(),
            session_token: None,
        }
    }

    fn test_request() -> SigningRequest {
        SigningRequest::new("get", "test.com", "/test")
            .expect("request must be valid")
            .with_body("body")
    }

    fn test_signer() -> RequestSigner {
        RequestSigner::new("invoke-api", "mars-east-1")
    }

    #[test]
    fn test_timestamp() {
        let result = test_signer()
            .sign_request(&test_context(), &test_request(), &test_credential())
            .unwrap();

        assert_eq!(result.timestamp, "19821217T000000Z");
        assert_eq!(result.headers[X_AMZ_DATE], "19821217T000000Z");
    }

    #[test_case(0, "19821217T000000Z"; "no offset")]
    #[test_case(1500, "19821217T000001Z"; "positive offset rolls seconds")]
    #[test_case(-86_400_000, "19821216T000000Z"; "negative offset rolls the date")]
    fn test_clock_offset(offset_millis: i64, expected: &str) {
        let result = test_signer()
            .with_clock_offset(offset_millis)
            .sign_request(&test_context(), &test_request(), &test_credential())
            .unwrap();

        assert_eq!(result.timestamp, expected);
    }

    #[test]
    fn test_sign_empty_headers() {
        let result = test_signer()
            .sign_request(&test_context(), &test_request(), &test_credential())
            .unwrap();

        assert_eq!(
            result.authorization,
            "AWS4-HMAC-SHA256 Credential=5678/19821217/mars-east-1/invoke-api/aws4_request, SignedHeaders=host, Signature=360f2899628fa984738ab0247bcc795539d1c199f1ba74a0697e0c8e12fcd854"
        );
        assert_eq!(
            result.headers[header::AUTHORIZATION].to_str().unwrap(),
            result.authorization
        );
    }

    #[test]
    fn test_sign_with_headers() {
        let mut req = test_request();
        req.header_insert("test1", "some value").unwrap();
        req.header_insert("test2", "another value").unwrap();

        let result = test_signer()
            .sign_request(&test_context(), &req, &test_credential())
            .unwrap();

        assert_eq!(
            result.authorization,
            "AWS4-HMAC-SHA256 Credential=5678/19821217/mars-east-1/invoke-api/aws4_request, SignedHeaders=host;test1;test2, Signature=1f7ecf94467208b809ddb0011cd30e5540590d220a563b71c6a23b5a2ff5f84d"
        );
    }

    #[test]
    fn test_sign_with_query() {
        let mut req = test_request();
        req.query_push("test1", "some value");
        req.query_push("test2", "another value");

        let result = test_signer()
            .sign_request(&test_context(), &req, &test_credential())
            .unwrap();

        assert_eq!(
            result.authorization,
            "AWS4-HMAC-SHA256 Credential=5678/19821217/mars-east-1/invoke-api/aws4_request, SignedHeaders=host, Signature=6c11a8f9fcd18a942efde4d43c388d4d3d97a057a8d40bc5b1dd977fcf620f18"
        );
    }

    #[test]
    fn test_canonical_request_structure() {
        let mut req = test_request();
        req.header_insert("test1", "some value").unwrap();
        req.header_insert("test2", "another value").unwrap();
        req.query_push("param1", "some value");
        req.query_push("param2", "another value");

        let result = test_signer()
            .sign_request(&test_context(), &req, &test_credential())
            .unwrap();

        assert_eq!(
            result.diagnostics.canonical_request.split('\n').collect::<Vec<_>>(),
            vec![
                "GET",
                "/test",
                "param1=some%20value&param2=another%20value",
                "host:test.com",
                "test1:some value",
                "test2:another value",
                "",
                "host;test1;test2",
                "230d8358dc8e8890b4c58deeb62912ee2f20357ae92a5cc861b98e68fe31acb5",
            ]
        );
        assert_eq!(
            result.diagnostics.string_to_sign.split('\n').collect::<Vec<_>>(),
            vec![
                "AWS4-HMAC-SHA256",
                "19821217T000000Z",
                "19821217/mars-east-1/invoke-api/aws4_request",
                "d6fda0e19cac2768282950d4fbd7922ae15b9197231d18095cac2cbc41f9ff44",
            ]
        );
    }

    #[test]
    fn test_sign_is_deterministic() {
        let signer = test_signer();
        let first = signer
            .sign_request(&test_context(), &test_request(), &test_credential())
            .unwrap();
        let second = signer
            .sign_request(&test_context(), &test_request(), &test_credential())
            .unwrap();

        assert_eq!(first.authorization, second.authorization);
        assert_eq!(first.timestamp, second.timestamp);
        assert_eq!(
            first.diagnostics.canonical_request,
            second.diagnostics.canonical_request
        );
        assert_eq!(
            first.diagnostics.string_to_sign,
            second.diagnostics.string_to_sign
        );
    }

    #[test]
    fn test_sign_is_input_order_invariant() {
        let mut forward = test_request();
        forward.header_insert("test1", "some value").unwrap();
        forward.header_insert("test2", "another value").unwrap();
        forward.query_push("param1", "some value");
        forward.query_push("param2", "another value");

        let mut reverse = test_request();
        reverse.query_push("param2", "another value");
        reverse.query_push("param1", "some value");
        reverse.header_insert("test2", "another value").unwrap();
        reverse.header_insert("test1", "some value").unwrap();

        let signer = test_signer();
        let l = signer
            .sign_request(&test_context(), &forward, &test_credential())
            .unwrap();
        let r = signer
            .sign_request(&test_context(), &reverse, &test_credential())
            .unwrap();

        assert_eq!(
            l.diagnostics.canonical_request,
            r.diagnostics.canonical_request
        );
        assert_eq!(l.authorization, r.authorization);
    }

    #[test]
    fn test_caller_host_header_is_overridden() {
        let mut req = test_request();
        req.header_insert("Host", "spoofed.example.com").unwrap();

        let result = test_signer()
            .sign_request(&test_context(), &req, &test_credential())
            .unwrap();

        assert!(result
            .diagnostics
            .canonical_request
            .contains("host:test.com"));
        assert!(!result
            .diagnostics
            .canonical_request
            .contains("spoofed.example.com"));
        // Identical to a request that never set host at all.
        assert_eq!(
            result.authorization,
            test_signer()
                .sign_request(&test_context(), &test_request(), &test_credential())
                .unwrap()
                .authorization
        );
    }

    #[test]
    fn test_session_token_is_attached_but_not_signed() {
        let credential = Credential {
            session_token: Some("session_token".to_string()),
            ..test_credential()
        };

        let result = test_signer()
            .sign_request(&test_context(), &test_request(), &credential)
            .unwrap();

        assert_eq!(result.headers[X_AMZ_SECURITY_TOKEN], "session_token");
        assert!(result.authorization.contains("SignedHeaders=host,"));
    }

    #[test]
    fn test_session_token_absent_when_not_supplied() {
        let result = test_signer()
            .sign_request(&test_context(), &test_request(), &test_credential())
            .unwrap();

        assert!(result.headers.get(X_AMZ_SECURITY_TOKEN).is_none());
    }

    #[test]
    fn test_empty_body_hashes_as_empty_string() {
        let req = test_request().with_body("");
        let result = test_signer()
            .sign_request(&test_context(), &req, &test_credential())
            .unwrap();

        assert!(result.diagnostics.canonical_request.ends_with(
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        ));
    }

    #[test]
    fn test_path_is_not_double_encoded() {
        let escaped = SigningRequest::new("GET", "test.com", "/a%20b").unwrap();
        let raw = SigningRequest::new("GET", "test.com", "/a b").unwrap();

        let signer = test_signer();
        let l = signer
            .sign_request(&test_context(), &escaped, &test_credential())
            .unwrap();
        let r = signer
            .sign_request(&test_context(), &raw, &test_credential())
            .unwrap();

        assert!(l.diagnostics.canonical_request.contains("\n/a%20b\n"));
        assert_eq!(
            l.diagnostics.canonical_request,
            r.diagnostics.canonical_request
        );
    }

    #[test]
    fn test_query_uses_strict_rfc3986_encoding() {
        let mut req = test_request();
        req.query_push("q", "it's (a) *test*!");

        let result = test_signer()
            .sign_request(&test_context(), &req, &test_credential())
            .unwrap();

        assert!(result
            .diagnostics
            .canonical_request
            .contains("q=it%27s%20%28a%29%20%2Atest%2A%21"));
    }

    #[test]
    fn test_sign_with_empty_credential() {
        let err = test_signer()
            .sign_request(&test_context(), &test_request(), &Credential::default())
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingCredentials);
    }
}
