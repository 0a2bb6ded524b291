//! Compute AWS SigV4 authorization headers for outbound HTTP requests.
//!
//! This crate re-exports the awsig workspace: the core abstractions of
//! [`awsig_core`] at the root, and the SigV4 implementation of
//! [`awsig_aws_v4`] under [`aws`].
//!
//! ## Example
//!
//! ```no_run
//! use awsig::aws::{RequestSigner, StaticCredentialProvider};
//! use awsig::{Context, Result, Signer, SigningRequest};
//!
//! # async fn example() -> Result<()> {
//! let signer = Signer::new(
//!     Context::new(),
//!     StaticCredentialProvider::new("access_key_id", "secret_access_key"),
//!     RequestSigner::new("execute-api", "us-east-1"),
//! );
//!
//! let req = SigningRequest::new("POST", "api.example.com", "/invoke")?
//!     .with_body(r#"{"hello":"world"}"#);
//! let result = signer.sign(&req).await?;
//!
//! // Attach result.headers to the outgoing request before sending it:
//! // authorization, x-amz-date, and x-amz-security-token when a session
//! // token is in play.
//! for (name, value) in result.headers.iter() {
//!     println!("{name}: {value:?}");
//! }
//! # Ok(())
//! # }
//! ```

pub use awsig_core::*;

/// AWS SigV4 signing.
pub mod aws {
    pub use awsig_aws_v4::*;
}
