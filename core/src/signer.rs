use crate::{
    Context, Error, ProvideCredential, Result, SignRequest, SigningCredential, SigningRequest,
    SigningResult,
};
use std::sync::{Arc, Mutex};

/// Signer is the caller-side orchestrator for signing requests.
///
/// It resolves a credential through the configured provider and hands it,
/// together with the request, to the configured signature builder. The held
/// credential is reused while valid; this is the only state that persists
/// across calls, and it lives here rather than in the computation core.
#[derive(Clone, Debug)]
pub struct Signer<K: SigningCredential> {
    ctx: Context,
    provider: Arc<dyn ProvideCredential<Credential = K>>,
    builder: Arc<dyn SignRequest<Credential = K>>,
    credential: Arc<Mutex<Option<K>>>,
}

impl<K: SigningCredential> Signer<K> {
    /// Create a new signer.
    ///
    /// The credential provider is an explicit capability: there is no
    /// ambient default source.
    pub fn new(
        ctx: Context,
        provider: impl ProvideCredential<Credential = K>,
        builder: impl SignRequest<Credential = K>,
    ) -> Self {
        Self {
            ctx,

            provider: Arc::new(provider),
            builder: Arc::new(builder),
            credential: Arc::new(Mutex::new(None)),
        }
    }

    /// Sign the request.
    ///
    /// Fails with
    /// [`ErrorKind::MissingCredentials`](crate::ErrorKind::MissingCredentials)
    /// when the provider resolves no usable credential, before any
    /// cryptographic work is attempted. Signing is deterministic, so the
    /// failure is never retried internally; refresh the credential source
    /// and call again.
    pub async fn sign(&self, req: &SigningRequest) -> Result<SigningResult> {
        let credential = self.credential.lock().expect("lock poisoned").clone();
        let credential = if credential.is_valid() {
            credential
        } else {
            let credential = self.provider.provide_credential(&self.ctx).await?;
            *self.credential.lock().expect("lock poisoned") = credential.clone();
            credential
        };

        let Some(credential) = credential.filter(|c| c.is_valid()) else {
            return Err(Error::missing_credentials(
                "credential provider returned no usable credential",
            ));
        };

        self.builder.sign_request(&self.ctx, req, &credential)
    }
}
