//! Core components for computing request signatures.
//!
//! This crate provides the foundational types and traits for the awsig
//! workspace. The signature computation itself lives in service crates
//! (such as `awsig-aws-v4`); this crate defines the pieces they share:
//!
//! - **Context**: a container for the injected capabilities a signer may
//!   consult: the environment and the clock. Environment access is a no-op
//!   unless explicitly configured; the clock defaults to the system clock
//!   and can be replaced for deterministic tests.
//! - **Traits**: [`ProvideCredential`] for resolving credentials and
//!   [`SignRequest`] for computing a signature over a request. Credential
//!   resolution may be asynchronous; the signature computation never is.
//! - **Signer**: the caller-side orchestrator that resolves a credential
//!   through a provider and hands it to a signature builder.
//!
//! ## Example
//!
//! ```no_run
//! use awsig_core::{
//!     Context, ProvideCredential, Result, SignRequest, Signer, SigningCredential,
//!     SigningRequest, SigningResult,
//! };
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct MyCredential {
//!     key: String,
//!     secret: String,
//! }
//!
//! impl SigningCredential for MyCredential {
//!     fn is_valid(&self) -> bool {
//!         !self.key.is_empty() && !self.secret.is_empty()
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MyProvider;
//!
//! #[async_trait]
//! impl ProvideCredential for MyProvider {
//!     type Credential = MyCredential;
//!
//!     async fn provide_credential(&self, _: &Context) -> Result<Option<Self::Credential>> {
//!         Ok(Some(MyCredential {
//!             key: "my-access-key".to_string(),
//!             secret: "my-secret-key".to_string(),
//!         }))
//!     }
//! }
//!
//! #[derive(Debug)]
//! struct MySigner;
//!
//! impl SignRequest for MySigner {
//!     type Credential = MyCredential;
//!
//!     fn sign_request(
//!         &self,
//!         _ctx: &Context,
//!         _req: &SigningRequest,
//!         _credential: &Self::Credential,
//!     ) -> Result<SigningResult> {
//!         // Compute the signature here.
//!         todo!()
//!     }
//! }
//!
//! # async fn example() -> Result<()> {
//! let ctx = Context::new();
//! let signer = Signer::new(ctx, MyProvider, MySigner);
//!
//! let req = SigningRequest::new("GET", "example.com", "/")?;
//! let _result = signer.sign(&req).await?;
//! # Ok(())
//! # }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod clock;
pub use clock::{Clock, FixedClock, SystemClock};
mod context;
pub use context::{Context, Env, NoopEnv, OsEnv, StaticEnv};
mod error;
pub use error::{Error, ErrorKind, Result};

mod api;
pub use api::{ProvideCredential, SignRequest, SigningCredential};
mod request;
pub use request::{Diagnostics, SigningRequest, SigningResult};
mod signer;
pub use signer::Signer;
