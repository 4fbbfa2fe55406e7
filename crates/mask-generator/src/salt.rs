//! Run-wide secret salt.

use crate::generator::GeneratorError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use std::sync::Arc;

/// Length of salts produced by [`Salt::generate`].
pub const SALT_LEN: usize = 32;

/// Secret mixed into every keyed hash of a run.
///
/// The bytes are immutable once constructed; clones share the same
/// allocation. Anyone holding the salt can brute-force known inputs against
/// masked outputs, so `Debug` never prints it.
#[derive(Clone, PartialEq, Eq)]
pub struct Salt(Arc<[u8]>);

/// Error decoding a transported salt.
#[derive(Debug, thiserror::Error)]
#[error("Invalid base64 salt: {0}")]
pub struct SaltDecodeError(#[from] base64::DecodeError);

impl Salt {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(Arc::from(bytes))
    }

    /// Decode a base64-encoded salt.
    pub fn from_base64(encoded: &str) -> Result<Self, SaltDecodeError> {
        Ok(Self::from_bytes(STANDARD.decode(encoded.trim())?))
    }

    /// Draw a fresh salt from the OS entropy source.
    pub fn generate() -> Result<Self, GeneratorError> {
        let mut bytes = vec![0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| GeneratorError::Entropy(e.to_string()))?;
        Ok(Self::from_bytes(bytes))
    }

    /// Encode for transport.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Raw salt bytes.
    pub fn expose(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl Default for Salt {
    fn default() -> Self {
        Self::from_bytes(Vec::new())
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt([REDACTED; {} bytes])", self.0.len())
    }
}
