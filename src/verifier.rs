//! Offline verification of public-function calls

use crate::artifact::Artifact;
use crate::backend::{ScriptBackend, VerifyResult};
use crate::builder::{build_offline_instance_with, OfflineInstance};
use crate::config::BuilderConfig;
use crate::data::DataMap;
use crate::error::VerifyError;
use tracing::debug;

/// Verifier bound to a backend and builder settings
///
/// # Examples
///
/// ```ignore
/// use preflight::{Artifact, DataMap, OfflineVerifier};
///
/// let verifier = OfflineVerifier::new(backend);
/// let result = verifier.verify(&artifact, &data, "transfer", Some(&tx))?;
/// assert!(result.success);
/// ```
pub struct OfflineVerifier<B: ScriptBackend> {
    backend: B,
    config: BuilderConfig,
}

impl<B: ScriptBackend> OfflineVerifier<B> {
    /// Create a verifier with default builder settings
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: BuilderConfig::default(),
        }
    }

    /// Replace the builder settings
    #[must_use]
    pub fn config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    /// The wrapped backend
    #[must_use]
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Build an offline instance using this verifier's settings
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be coerced or the backend
    /// cannot build the instance.
    pub fn build(&self, artifact: &Artifact, data: &DataMap) -> Result<OfflineInstance<B>, VerifyError> {
        Ok(build_offline_instance_with(&self.backend, artifact, data, &self.config)?)
    }

    /// Encode a call to `method` and interpret it against the contract
    ///
    /// A method with no supplied data is called with an empty argument list.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::UnknownMethod`] if the artifact declares no
    /// public function named `method`, and propagates build and backend
    /// errors. A script that fails its conditions is not an error; it is
    /// reported through [`VerifyResult::success`].
    pub fn verify(
        &self,
        artifact: &Artifact,
        data: &DataMap,
        method: &str,
        tx_context: Option<&B::TxContext>,
    ) -> Result<VerifyResult, VerifyError> {
        let built = self.build(artifact, data)?;
        self.verify_instance(artifact, &built, method, tx_context)
    }

    /// Verify a call against an instance that was already built
    ///
    /// # Errors
    ///
    /// Same as [`OfflineVerifier::verify`], minus the build step.
    pub fn verify_instance(
        &self,
        artifact: &Artifact,
        built: &OfflineInstance<B>,
        method: &str,
        tx_context: Option<&B::TxContext>,
    ) -> Result<VerifyResult, VerifyError> {
        if artifact.function(method).is_none() {
            return Err(VerifyError::UnknownMethod(method.to_string()));
        }

        let args = built.args(method);
        let unlocking = self
            .backend
            .encode_call(&built.class, &built.instance, method, args)?;
        let result = self.backend.verify_script(
            &built.class,
            &built.instance,
            &unlocking,
            tx_context,
        )?;

        debug!(
            contract = %artifact.contract,
            %method,
            args = args.len(),
            success = result.success,
            "offline verification finished"
        );
        Ok(result)
    }
}

/// Build an instance and verify one call with default settings
///
/// # Errors
///
/// Same as [`OfflineVerifier::verify`].
pub fn offline_verify<B: ScriptBackend>(
    backend: &B,
    artifact: &Artifact,
    data: &DataMap,
    method: &str,
    tx_context: Option<&B::TxContext>,
) -> Result<VerifyResult, VerifyError> {
    OfflineVerifier::new(backend).verify(artifact, data, method, tx_context)
}
