//! AWS SigV4 request signing, header variant.

mod constants;

mod credential;
pub use credential::Credential;

mod provide_credential;
pub use provide_credential::EnvCredentialProvider;
pub use provide_credential::ProvideCredentialChain;
pub use provide_credential::StaticCredentialProvider;

mod sign_request;
pub use sign_request::RequestSigner;
