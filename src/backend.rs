//! Abstract interface to the contract-scripting backend

use crate::artifact::Artifact;
use crate::error::BackendError;
use crate::value::Arg;
use serde::{Deserialize, Serialize};

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Outcome of interpreting an unlocking script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyResult {
    /// A passing verification
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// A failing verification with diagnostic detail
    #[must_use]
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Abstract interface for compiling, encoding and interpreting contracts
///
/// Everything that needs a script compiler or interpreter lives behind this
/// trait, so the parameter builder and verifier work with any backend,
/// including test doubles.
pub trait ScriptBackend {
    /// Callable contract template built from an artifact
    type Class;
    /// Contract bound to constructor arguments
    type Instance;
    /// Encoded public-function call
    type Unlocking;
    /// Spending transaction data for context-dependent conditions
    type TxContext;

    /// Build a contract template from an artifact
    fn construct_class(&self, artifact: &Artifact) -> BackendResult<Self::Class>;

    /// Bind constructor arguments, in declaration order
    fn instantiate(&self, class: &Self::Class, args: &[Arg]) -> BackendResult<Self::Instance>;

    /// Validate and normalize a hex string
    ///
    /// The default accepts surrounding whitespace, an even number of hex
    /// digits in either case, and the empty string; it returns lowercase hex.
    fn validate_bytes(&self, raw: &str) -> BackendResult<String> {
        validate_hex(raw)
    }

    /// Encode a call to `method` into an unlocking script
    fn encode_call(
        &self,
        class: &Self::Class,
        instance: &Self::Instance,
        method: &str,
        args: &[Arg],
    ) -> BackendResult<Self::Unlocking>;

    /// Interpret an unlocking script against the instance's locking conditions
    fn verify_script(
        &self,
        class: &Self::Class,
        instance: &Self::Instance,
        unlocking: &Self::Unlocking,
        tx_context: Option<&Self::TxContext>,
    ) -> BackendResult<VerifyResult>;
}

impl<B: ScriptBackend + ?Sized> ScriptBackend for &B {
    type Class = B::Class;
    type Instance = B::Instance;
    type Unlocking = B::Unlocking;
    type TxContext = B::TxContext;

    fn construct_class(&self, artifact: &Artifact) -> BackendResult<Self::Class> {
        (**self).construct_class(artifact)
    }

    fn instantiate(
        &self,
        class: &Self::Class,
        args: &[Arg],
    ) -> BackendResult<Self::Instance> {
        (**self).instantiate(class, args)
    }

    fn validate_bytes(&self, raw: &str) -> BackendResult<String> {
        (**self).validate_bytes(raw)
    }

    fn encode_call(
        &self,
        class: &Self::Class,
        instance: &Self::Instance,
        method: &str,
        args: &[Arg],
    ) -> BackendResult<Self::Unlocking> {
        (**self).encode_call(class, instance, method, args)
    }

    fn verify_script(
        &self,
        class: &Self::Class,
        instance: &Self::Instance,
        unlocking: &Self::Unlocking,
        tx_context: Option<&Self::TxContext>,
    ) -> BackendResult<VerifyResult> {
        (**self).verify_script(class, instance, unlocking, tx_context)
    }
}

/// Validate a hex string and return its canonical lowercase form
///
/// # Examples
///
/// ```
/// use preflight::backend::validate_hex;
///
/// assert_eq!(validate_hex(" 00FF ").unwrap(), "00ff");
/// assert_eq!(validate_hex("").unwrap(), "");
/// assert!(validate_hex("abc").is_err());
/// assert!(validate_hex("zz").is_err());
/// ```
///
/// # Errors
///
/// Returns [`BackendError::InvalidHex`] for odd lengths or non-hex characters.
pub fn validate_hex(raw: &str) -> BackendResult<String> {
    let trimmed = raw.trim();
    if trimmed.len() % 2 != 0 {
        return Err(BackendError::InvalidHex(format!(
            "`{trimmed}` should have even length"
        )));
    }
    hex::decode(trimmed).map_err(|e| BackendError::InvalidHex(format!("`{trimmed}`: {e}")))?;
    Ok(trimmed.to_ascii_lowercase())
}
