use crate::{Context, Result, SigningRequest, SigningResult};
use std::fmt::Debug;

/// SigningCredential is the resolved credential a signer computes with.
pub trait SigningCredential: Clone + Debug + Send + Sync + Unpin + 'static {
    /// Check if the credential is valid.
    ///
    /// A credential whose required fields resolve to empty must report
    /// itself invalid here; signers refuse to sign with such a credential
    /// instead of silently signing with empty strings.
    fn is_valid(&self) -> bool;
}

impl<T: SigningCredential> SigningCredential for Option<T> {
    fn is_valid(&self) -> bool {
        let Some(cred) = self else {
            return false;
        };

        cred.is_valid()
    }
}

/// ProvideCredential is the trait used by signer to resolve the credential.
///
/// Resolution may involve I/O (environment, files, a metadata endpoint), so
/// it is asynchronous. Services require different credentials: AWS requires
/// an access key and secret key, other services may require a token.
#[async_trait::async_trait]
pub trait ProvideCredential: Debug + Send + Sync + Unpin + 'static {
    /// Credential returned by this provider.
    type Credential: SigningCredential;

    /// Resolve a credential from the given context.
    ///
    /// Returns `Ok(None)` when this provider has nothing to offer; the
    /// caller decides whether that is fatal.
    async fn provide_credential(&self, ctx: &Context) -> Result<Option<Self::Credential>>;
}

/// SignRequest is the trait used by signer to compute the signature.
///
/// The computation is a pure, synchronous function of its inputs: it must
/// not perform or await I/O. Given identical request, credential, and clock
/// reading, implementations must return byte-identical results.
pub trait SignRequest: Debug + Send + Sync + Unpin + 'static {
    /// Credential used by this signer.
    type Credential: SigningCredential;

    /// Compute the signature for the given request.
    fn sign_request(
        &self,
        ctx: &Context,
        req: &SigningRequest,
        credential: &Self::Credential,
    ) -> Result<SigningResult>;
}
