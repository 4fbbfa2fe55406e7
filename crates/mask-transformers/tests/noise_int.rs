//! Behavioural tests for the NoiseInt column adapter.

use mask_core::{ColumnBinding, IntWidth, Record, UniversalValue};
use mask_generator::{Generator, GeneratorError, HashFunction, KeyedHash, Projector, Salt, SeededRandom};
use mask_transformers::{
    Limiter, NoiseBand, NoiseEngine, NoiseIntTransformer, Transformer, NOISE_BYTE_LENGTH,
};
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Counts calls and delegates to a seeded RNG.
struct CountingGenerator {
    calls: Arc<AtomicUsize>,
    inner: SeededRandom,
}

impl Generator for CountingGenerator {
    fn generate(&mut self, input: &[u8]) -> Result<Vec<u8>, GeneratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.generate(input)
    }

    fn size(&self) -> usize {
        self.inner.size()
    }
}

fn binding(width: IntWidth) -> ColumnBinding {
    ColumnBinding {
        index: 0,
        name: "value".to_string(),
        width,
    }
}

fn fit(width: IntWidth, raw: i64) -> i64 {
    match width {
        IntWidth::Int16 => raw as i16 as i64,
        IntWidth::Int32 => raw as i32 as i64,
        IntWidth::Int64 => raw,
    }
}

fn width_strategy() -> impl Strategy<Value = IntWidth> {
    prop_oneof![
        Just(IntWidth::Int16),
        Just(IntWidth::Int32),
        Just(IntWidth::Int64),
    ]
}

fn transformer(width: IntWidth, limiter: Limiter, generator: Box<dyn Generator>) -> NoiseIntTransformer {
    let band = NoiseBand::new(0.05, 0.2).unwrap();
    let engine = NoiseEngine::new(band, generator).unwrap();
    let column = binding(width);
    let affected = BTreeMap::from([(column.index, column.name.clone())]);
    let mut transformer = NoiseIntTransformer::new(column, affected, engine, limiter, None);
    transformer.finalize().unwrap();
    transformer
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Output always lands inside the limiter, whatever the input.
    #[test]
    fn prop_output_within_limiter(
        width in width_strategy(),
        a in any::<i64>(),
        b in any::<i64>(),
        v in any::<i64>(),
        seed in any::<u64>(),
    ) {
        let (a, b, v) = (fit(width, a), fit(width, b), fit(width, v));
        let limiter = Limiter::new(a.min(b), a.max(b), width).unwrap();
        let mut transformer = transformer(
            width,
            limiter,
            Box::new(SeededRandom::with_seed(seed, NOISE_BYTE_LENGTH)),
        );

        let mut record = Record::new("t", 0, vec![UniversalValue::int(width, v).unwrap()]);
        transformer.transform(&mut record, &CancellationToken::new()).unwrap();

        let stored = record.get(0).unwrap();
        prop_assert_eq!(stored.int_width(), Some(width));
        let out = stored.as_i64().unwrap();
        prop_assert!(
            out >= limiter.min() && out <= limiter.max(),
            "value {} -> {} outside [{}, {}] ({})",
            v, out, limiter.min(), limiter.max(), width
        );
    }

    /// Same salt and input give the same output in independent instances.
    #[test]
    fn prop_keyed_hash_reproducible(v in any::<i32>(), salt in proptest::collection::vec(any::<u8>(), 1..32)) {
        let salt = Salt::from_bytes(salt);
        let build = || {
            let hash = KeyedHash::new(salt.clone(), HashFunction::Sha256);
            let projector = Projector::new(hash, NOISE_BYTE_LENGTH).unwrap();
            transformer(IntWidth::Int32, Limiter::for_width(IntWidth::Int32), Box::new(projector))
        };
        let cancel = CancellationToken::new();

        let mut first = Record::new("t", 0, vec![UniversalValue::Int32(v)]);
        let mut second = first.clone();
        build().transform(&mut first, &cancel).unwrap();
        build().transform(&mut second, &cancel).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_null_never_invokes_generator() {
    let calls = Arc::new(AtomicUsize::new(0));
    let generator = CountingGenerator {
        calls: Arc::clone(&calls),
        inner: SeededRandom::with_seed(3, NOISE_BYTE_LENGTH),
    };
    let mut transformer = transformer(
        IntWidth::Int64,
        Limiter::for_width(IntWidth::Int64),
        Box::new(generator),
    );
    let cancel = CancellationToken::new();

    let mut record = Record::new("t", 0, vec![UniversalValue::Null]);
    transformer.transform(&mut record, &cancel).unwrap();
    assert_eq!(record.get(0), Some(&UniversalValue::Null));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let mut record = Record::new("t", 1, vec![UniversalValue::Int64(500)]);
    transformer.transform(&mut record, &cancel).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_large_magnitudes_saturate() {
    let cancel = CancellationToken::new();
    for (width, value) in [
        (IntWidth::Int16, UniversalValue::Int16(i16::MAX)),
        (IntWidth::Int32, UniversalValue::Int32(i32::MIN)),
        (IntWidth::Int64, UniversalValue::Int64(i64::MAX)),
    ] {
        let mut transformer = transformer(
            width,
            Limiter::for_width(width),
            Box::new(SeededRandom::with_seed(11, NOISE_BYTE_LENGTH)),
        );
        for _ in 0..50 {
            let mut record = Record::new("t", 0, vec![value.clone()]);
            transformer.transform(&mut record, &cancel).unwrap();
            let out = record.get(0).and_then(|v| v.as_i64()).unwrap();
            assert!(width.contains(out), "{width}: {out}");
        }
    }
}
