//! Output-size projection.

use crate::generator::{Generator, GeneratorError};

/// Output sizes a projector can produce.
pub const PROJECTOR_SIZES: [usize; 3] = [4, 8, 16];

/// Domain-separation context for the projection hash. Changing it changes
/// every projected output, so it is part of the masking format.
const PROJECTOR_CONTEXT: &str = "noise-mask 2024 projector v1";

/// Maps a base generator's digest to exactly 4, 8, or 16 bytes.
///
/// The digest is fed through BLAKE3 in derive-key mode, which is keyed
/// independently of the base hash, and the extendable output is read up to
/// the target size.
pub struct Projector<G> {
    base: G,
    size: usize,
}

impl<G: Generator> Projector<G> {
    /// Wrap `base`, producing `size` bytes per call.
    pub fn new(base: G, size: usize) -> Result<Self, GeneratorError> {
        if !PROJECTOR_SIZES.contains(&size) {
            return Err(GeneratorError::UnsupportedProjection { size });
        }
        Ok(Self { base, size })
    }
}

impl<G: Generator> Generator for Projector<G> {
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GeneratorError> {
        let digest = self.base.generate(input)?;
        let mut hasher = blake3::Hasher::new_derive_key(PROJECTOR_CONTEXT);
        hasher.update(&digest);
        let mut out = vec![0u8; self.size];
        hasher.finalize_xof().fill(&mut out);
        Ok(out)
    }

    fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stand-in for a 20-byte digest primitive.
    struct Fixed20;

    impl Generator for Fixed20 {
        fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GeneratorError> {
            let mut out = vec![0u8; 20];
            for (i, b) in input.iter().enumerate() {
                out[i % 20] ^= *b;
            }
            Ok(out)
        }

        fn size(&self) -> usize {
            20
        }
    }

    #[test]
    fn test_projection_is_pure() {
        let mut projector = Projector::new(Fixed20, 8).unwrap();
        let first = projector.generate(b"customer-17").unwrap();
        let second = projector.generate(b"customer-17").unwrap();
        assert_eq!(first.len(), 8);
        assert_eq!(first, second);
    }

    #[test]
    fn test_projection_sizes() {
        for size in PROJECTOR_SIZES {
            let mut projector = Projector::new(Fixed20, size).unwrap();
            assert_eq!(projector.size(), size);
            assert_eq!(projector.generate(b"x").unwrap().len(), size);
        }
    }

    #[test]
    fn test_shorter_output_is_prefix() {
        let mut short = Projector::new(Fixed20, 4).unwrap();
        let mut long = Projector::new(Fixed20, 16).unwrap();
        let short_out = short.generate(b"x").unwrap();
        let long_out = long.generate(b"x").unwrap();
        assert_eq!(short_out[..], long_out[..4]);
    }

    #[test]
    fn test_unsupported_size() {
        for size in [0, 3, 20, 32] {
            assert!(matches!(
                Projector::new(Fixed20, size),
                Err(GeneratorError::UnsupportedProjection { .. })
            ));
        }
    }

    #[test]
    fn test_different_inputs_differ() {
        let mut projector = Projector::new(Fixed20, 16).unwrap();
        assert_ne!(
            projector.generate(b"a").unwrap(),
            projector.generate(b"b").unwrap()
        );
    }
}
