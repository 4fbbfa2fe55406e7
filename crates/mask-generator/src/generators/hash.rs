//! Keyed hash generator.

use crate::generator::{Generator, GeneratorError};
use crate::salt::Salt;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::str::FromStr;

/// Hash primitive used by [`KeyedHash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashFunction {
    #[default]
    Sha256,
    Sha512,
    Blake3,
}

impl HashFunction {
    /// Natural digest size in bytes.
    pub fn digest_size(&self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
            Self::Blake3 => blake3::OUT_LEN,
        }
    }
}

impl FromStr for HashFunction {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sha256" => Ok(Self::Sha256),
            "sha512" => Ok(Self::Sha512),
            "blake3" => Ok(Self::Blake3),
            other => Err(GeneratorError::UnknownHashFunction(other.to_string())),
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sha256 => f.write_str("sha256"),
            Self::Sha512 => f.write_str("sha512"),
            Self::Blake3 => f.write_str("blake3"),
        }
    }
}

/// Generator computing `H(salt || input)`.
///
/// Output is a pure function of the salt and the input, so the same value
/// masks to the same bytes in every run that shares the salt.
#[derive(Debug, Clone)]
pub struct KeyedHash {
    salt: Salt,
    function: HashFunction,
}

impl KeyedHash {
    pub fn new(salt: Salt, function: HashFunction) -> Self {
        Self { salt, function }
    }
}

impl Generator for KeyedHash {
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GeneratorError> {
        let salt = self.salt.expose();
        let digest = match self.function {
            HashFunction::Sha256 => Sha256::new()
                .chain_update(salt)
                .chain_update(input)
                .finalize()
                .to_vec(),
            HashFunction::Sha512 => Sha512::new()
                .chain_update(salt)
                .chain_update(input)
                .finalize()
                .to_vec(),
            HashFunction::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                hasher.update(salt);
                hasher.update(input);
                hasher.finalize().as_bytes().to_vec()
            }
        };
        Ok(digest)
    }

    fn size(&self) -> usize {
        self.function.digest_size()
    }
}
