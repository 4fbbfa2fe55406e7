//! `NoiseInt`: adds bounded percentage noise to an integer column.
//!
//! Setup scans the parameters, builds the generator and, for static bounds,
//! the [`Limiter`]. [`Transformer::finalize`] then picks the dispatch once:
//! a fixed limiter, or a [`DynamicRangeResolver`] that reads `min`/`max`
//! from the row. Null values pass through untouched.

use crate::definition::{
    ColumnProperties, DynamicModeProperties, ParameterDefinition, Parameters,
};
use crate::dynamic::{BoundSource, DynamicRangeResolver};
use crate::error::{SetupError, TransformError};
use crate::limiter::Limiter;
use crate::noise::{NoiseBand, NoiseEngine, NOISE_BYTE_LENGTH};
use crate::registry::TransformerDefinition;
use crate::transformer::{Built, SetupContext, Transformer};
use crate::validation::{ValidationWarning, ValidationWarnings};
use mask_core::{ColumnBinding, Parameter, RowAccess, UniversalType};
use mask_generator::{build_generator, Engine, GeneratorError};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

pub const NAME: &str = "NoiseInt";

const DEFAULT_MIN_RATIO: f64 = 0.05;
const DEFAULT_MAX_RATIO: f64 = 0.2;

fn int_types() -> Vec<UniversalType> {
    vec![UniversalType::Int16, UniversalType::Int32, UniversalType::Int64]
}

/// Registry entry for `NoiseInt`.
pub fn definition() -> TransformerDefinition {
    TransformerDefinition {
        name: NAME,
        description: "Add a random percentage of the original value, up or down",
        parameters: vec![
            ParameterDefinition::new("column", "integer column to mask")
                .required()
                .with_column(ColumnProperties {
                    affected: true,
                    allowed_types: int_types(),
                }),
            ParameterDefinition::new("min_ratio", "smallest share of the value added as noise")
                .with_default(DEFAULT_MIN_RATIO),
            ParameterDefinition::new("max_ratio", "largest share of the value added as noise")
                .with_default(DEFAULT_MAX_RATIO),
            ParameterDefinition::new("min", "lowest allowed result").with_dynamic_mode(
                DynamicModeProperties {
                    compatible_types: int_types(),
                },
            ),
            ParameterDefinition::new("max", "highest allowed result").with_dynamic_mode(
                DynamicModeProperties {
                    compatible_types: int_types(),
                },
            ),
            ParameterDefinition::new("engine", "random or hash").with_default("random"),
        ],
        factory: build,
    }
}

fn build(ctx: &SetupContext<'_>, params: &Parameters) -> Result<Built, SetupError> {
    let mut warnings = ValidationWarnings::new();

    let column_name: String = params.get("column")?.scan_required()?;
    let column = ColumnBinding::resolve(ctx.columns, &column_name).map_err(|e| {
        SetupError::Validation(
            [ValidationWarning::error(e.to_string())
                .with_meta("ParameterName", "column")
                .with_meta("ColumnName", &column_name)]
            .into_iter()
            .collect(),
        )
    })?;

    let engine_name: String = params.get("engine")?.scan_required()?;
    let engine = match engine_name.parse::<Engine>() {
        Ok(engine) => Some(engine),
        Err(e) => {
            warnings.push(
                ValidationWarning::error(e.to_string())
                    .with_meta("ParameterName", "engine")
                    .with_meta("ParameterValue", &engine_name),
            );
            None
        }
    };

    let min_ratio: f64 = params.get("min_ratio")?.scan_required()?;
    let max_ratio: f64 = params.get("max_ratio")?.scan_required()?;
    for (name, ratio) in [("min_ratio", min_ratio), ("max_ratio", max_ratio)] {
        if !(ratio > 0.0 && ratio <= 1.0) {
            warnings.push(
                ValidationWarning::error("ratio must be greater than 0 and at most 1")
                    .with_meta("ParameterName", name)
                    .with_meta("ParameterValue", ratio),
            );
        }
    }
    if min_ratio > max_ratio {
        warnings.push(
            ValidationWarning::error("min_ratio cannot be greater than max_ratio")
                .with_meta("min_ratio", min_ratio)
                .with_meta("max_ratio", max_ratio),
        );
    }

    let min = bound_source(params.get("min")?, "min", &column, &mut warnings)?;
    let max = bound_source(params.get("max")?, "max", &column, &mut warnings)?;

    let mut limiter = Limiter::for_width(column.width);
    let mut resolver = None;
    match (&min, &max) {
        (BoundSource::Static(lo), BoundSource::Static(hi)) if !warnings.is_fatal() => {
            match Limiter::new(*lo, *hi, column.width) {
                Ok(l) => limiter = l,
                Err(e) => warnings.push(
                    ValidationWarning::error(e.to_string()).with_meta("ColumnName", &column.name),
                ),
            }
        }
        (BoundSource::Static(_), BoundSource::Static(_)) => {}
        _ => resolver = Some(DynamicRangeResolver::new(column.width, min, max)),
    }

    if engine == Some(Engine::Hash) && ctx.salt.is_none() {
        warnings.push(
            ValidationWarning::warning("hash engine without a salt is reproducible by anyone")
                .with_meta("ColumnName", &column.name),
        );
    }

    let (Some(engine), false) = (engine, warnings.is_fatal()) else {
        return Err(SetupError::Validation(warnings));
    };

    let generator = match build_generator(engine, NOISE_BYTE_LENGTH, ctx.salt, ctx.hash_function) {
        Ok(generator) => generator,
        Err(e @ GeneratorError::UnsupportedProjection { .. }) => {
            warnings.push(
                ValidationWarning::error(e.to_string())
                    .with_meta("ColumnName", &column.name)
                    .with_meta("HashFunction", ctx.hash_function),
            );
            return Err(SetupError::Validation(warnings));
        }
        Err(e) => return Err(SetupError::Generation(e)),
    };

    let band = match NoiseBand::new(min_ratio, max_ratio) {
        Ok(band) => band,
        Err(e) => {
            warnings.push(ValidationWarning::error(e.to_string()));
            return Err(SetupError::Validation(warnings));
        }
    };
    let noise = NoiseEngine::new(band, generator)?;

    tracing::debug!(
        "Configured {} on column '{}' ({}): engine={}, ratio=[{}, {}), dynamic bounds={}",
        NAME,
        column.name,
        column.width,
        engine,
        min_ratio,
        max_ratio,
        resolver.is_some()
    );

    Ok(Built {
        transformer: Box::new(NoiseIntTransformer::new(
            column,
            params.affected_columns().clone(),
            noise,
            limiter,
            resolver,
        )),
        warnings,
    })
}

/// Static bounds default to the column width's natural limits.
fn bound_source(
    param: &Parameter,
    bound: &'static str,
    column: &ColumnBinding,
    warnings: &mut ValidationWarnings,
) -> Result<BoundSource, SetupError> {
    if param.is_dynamic() {
        return Ok(BoundSource::Dynamic(param.clone()));
    }
    let natural = match bound {
        "min" => column.width.min_value(),
        _ => column.width.max_value(),
    };
    let value = param.scan::<i64>()?.unwrap_or(natural);
    if !column.width.contains(value) {
        warnings.push(
            ValidationWarning::error(format!(
                "{bound} value is out of range of {}",
                column.width
            ))
            .with_meta("ParameterName", bound)
            .with_meta("ParameterValue", value)
            .with_meta("ColumnName", &column.name),
        );
    }
    Ok(BoundSource::Static(value))
}

/// Per-row range selection, fixed at finalize.
#[derive(Debug, Clone)]
enum Dispatch {
    Static(Limiter),
    Dynamic(DynamicRangeResolver),
}

enum State {
    Configured {
        limiter: Limiter,
        resolver: Option<DynamicRangeResolver>,
    },
    Ready(Dispatch),
}

/// Column adapter driving a [`NoiseEngine`] over one integer column.
pub struct NoiseIntTransformer {
    column: ColumnBinding,
    affected: BTreeMap<usize, String>,
    engine: NoiseEngine,
    state: State,
}

impl NoiseIntTransformer {
    /// `affected` is the declared write-set; `limiter` is used when
    /// `resolver` is `None`.
    pub fn new(
        column: ColumnBinding,
        affected: BTreeMap<usize, String>,
        engine: NoiseEngine,
        limiter: Limiter,
        resolver: Option<DynamicRangeResolver>,
    ) -> Self {
        Self {
            column,
            affected,
            engine,
            state: State::Configured { limiter, resolver },
        }
    }

}

impl Transformer for NoiseIntTransformer {
    fn name(&self) -> &str {
        NAME
    }

    fn affected_columns(&self) -> &BTreeMap<usize, String> {
        &self.affected
    }

    fn finalize(&mut self) -> Result<(), TransformError> {
        let State::Configured { limiter, resolver } = &mut self.state else {
            return Ok(());
        };
        let dispatch = match resolver.take() {
            Some(resolver) => Dispatch::Dynamic(resolver),
            None => Dispatch::Static(*limiter),
        };
        tracing::debug!("{} on '{}' dispatch: {:?}", NAME, self.column.name, dispatch);
        self.state = State::Ready(dispatch);
        Ok(())
    }

    fn transform(
        &mut self,
        row: &mut dyn RowAccess,
        cancel: &CancellationToken,
    ) -> Result<(), TransformError> {
        let State::Ready(dispatch) = &self.state else {
            return Err(TransformError::NotFinalized(NAME.to_string()));
        };
        let column = &self.column;
        let record_error = |source| TransformError::Record {
            column: column.name.clone(),
            source,
        };

        let Some(value) = row.scan_int(column.index).map_err(record_error)? else {
            return Ok(());
        };

        let limiter = match dispatch {
            Dispatch::Static(limiter) => *limiter,
            Dispatch::Dynamic(resolver) => {
                resolver
                    .resolve(&*row)
                    .map_err(|e| TransformError::Range {
                        column: column.name.clone(),
                        row: row.row_id(),
                        message: e.to_string(),
                    })?
            }
        };

        if cancel.is_cancelled() {
            return Err(TransformError::Cancelled);
        }
        let noised = self
            .engine
            .transform(value, &limiter)
            .map_err(|source| TransformError::Generation {
                column: column.name.clone(),
                source,
            })?;
        if cancel.is_cancelled() {
            return Err(TransformError::Cancelled);
        }

        row.set_int(column.index, noised).map_err(record_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::TransformerConfig;
    use crate::validation::Severity;
    use mask_core::{ColumnDefinition, Record, TableDefinition, UniversalValue};
    use mask_generator::Salt;

    fn table() -> TableDefinition {
        TableDefinition::new(
            "payments",
            vec![
                ColumnDefinition::new("id", UniversalType::Int64),
                ColumnDefinition::nullable("amount", UniversalType::Int32),
                ColumnDefinition::new("small", UniversalType::Int16),
                ColumnDefinition::new("ceiling", UniversalType::Int64),
            ],
        )
    }

    fn config(yaml: &str) -> TransformerConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn instantiate(yaml: &str) -> Result<Built, SetupError> {
        let table = table();
        definition().instantiate(&SetupContext::new(&table), &config(yaml))
    }

    fn validation_message(yaml: &str) -> String {
        match instantiate(yaml) {
            Err(SetupError::Validation(warnings)) => {
                assert!(warnings.is_fatal());
                warnings.to_string()
            }
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("expected validation failure"),
        }
    }

    fn row(amount: UniversalValue) -> Record {
        Record::new(
            "payments",
            0,
            vec![
                UniversalValue::Int64(1),
                amount,
                UniversalValue::Int16(5),
                UniversalValue::Int64(1500),
            ],
        )
        .with_id("1")
    }

    #[test]
    fn test_static_transform_within_bounds() {
        let mut built = instantiate(
            "name: NoiseInt\nparams:\n  column: amount\n  min: 900\n  max: 1100\n",
        )
        .unwrap();
        assert!(built.warnings.is_empty());
        let transformer = built.transformer.as_mut();
        assert_eq!(
            transformer.affected_columns(),
            &BTreeMap::from([(1, "amount".to_string())])
        );
        transformer.finalize().unwrap();

        let cancel = CancellationToken::new();
        for _ in 0..200 {
            let mut record = row(UniversalValue::Int32(1000));
            transformer.transform(&mut record, &cancel).unwrap();
            let value = record.get(1).and_then(|v| v.as_i64()).unwrap();
            assert!((900..=1100).contains(&value), "value {value}");
            assert_ne!(value, 1000);
            assert!(matches!(record.get(1), Some(UniversalValue::Int32(_))));
        }
    }

    #[test]
    fn test_transform_before_finalize() {
        let mut built = instantiate("name: NoiseInt\nparams:\n  column: amount\n").unwrap();
        let mut record = row(UniversalValue::Int32(10));
        let err = built
            .transformer
            .transform(&mut record, &CancellationToken::new())
            .unwrap_err();
        assert!(matches!(err, TransformError::NotFinalized(_)));
    }

    #[test]
    fn test_null_passes_through() {
        let mut built = instantiate("name: NoiseInt\nparams:\n  column: amount\n").unwrap();
        built.transformer.finalize().unwrap();
        let mut record = row(UniversalValue::Null);
        built
            .transformer
            .transform(&mut record, &CancellationToken::new())
            .unwrap();
        assert_eq!(record.get(1), Some(&UniversalValue::Null));
    }

    #[test]
    fn test_dynamic_max_from_column() {
        let mut built = instantiate(
            "name: NoiseInt\nparams:\n  column: amount\n  min: 0\ndynamic_params:\n  max:\n    column: ceiling\n",
        )
        .unwrap();
        built.transformer.finalize().unwrap();

        let cancel = CancellationToken::new();
        for _ in 0..100 {
            let mut record = row(UniversalValue::Int32(1400));
            built.transformer.transform(&mut record, &cancel).unwrap();
            let value = record.get(1).and_then(|v| v.as_i64()).unwrap();
            assert!(value <= 1500, "value {value}");
        }
    }

    #[test]
    fn test_dynamic_bound_out_of_width_fails_row() {
        let mut built = instantiate(
            "name: NoiseInt\nparams:\n  column: small\ndynamic_params:\n  max:\n    column: ceiling\n",
        )
        .unwrap();
        built.transformer.finalize().unwrap();

        let mut record = row(UniversalValue::Int32(1));
        record.values[3] = UniversalValue::Int64(40_000);
        let err = built
            .transformer
            .transform(&mut record, &CancellationToken::new())
            .unwrap_err();
        assert!(err.is_row_scoped());
        match err {
            TransformError::Range { column, row, .. } => {
                assert_eq!(column, "small");
                assert_eq!(row.as_deref(), Some("1"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(record.get(2), Some(&UniversalValue::Int16(5)));
    }

    #[test]
    fn test_invalid_configuration() {
        assert!(validation_message(
            "name: NoiseInt\nparams:\n  column: amount\n  min: 10\n  max: 5\n"
        )
        .contains("greater than max"));
        assert!(validation_message(
            "name: NoiseInt\nparams:\n  column: small\n  min: -40000\n  max: 40000\n"
        )
        .contains("out of range of int16"));
        assert!(validation_message(
            "name: NoiseInt\nparams:\n  column: amount\n  min_ratio: 0.5\n  max_ratio: 0.1\n"
        )
        .contains("min_ratio cannot be greater than max_ratio"));
        assert!(validation_message(
            "name: NoiseInt\nparams:\n  column: amount\n  max_ratio: 1.5\n"
        )
        .contains("ParameterName=max_ratio"));
        assert!(validation_message(
            "name: NoiseInt\nparams:\n  column: amount\n  min_ratio: 0\n"
        )
        .contains("ParameterName=min_ratio"));
        assert!(validation_message(
            "name: NoiseInt\nparams:\n  column: amount\n  engine: md5\n"
        )
        .contains("ParameterValue=md5"));
    }

    #[test]
    fn test_hash_without_salt_is_advisory() {
        let built =
            instantiate("name: NoiseInt\nparams:\n  column: amount\n  engine: hash\n").unwrap();
        assert!(!built.warnings.is_fatal());
        assert_eq!(built.warnings.len(), 1);
        assert!(built
            .warnings
            .iter()
            .all(|w| w.severity == Severity::Warning));
    }

    #[test]
    fn test_hash_engine_is_reproducible() {
        let table = table();
        let salt = Salt::from_bytes(b"shared secret".to_vec());
        let ctx = SetupContext::new(&table).with_salt(Some(&salt));
        let cfg = config("name: NoiseInt\nparams:\n  column: amount\n  engine: hash\n");

        let run = || {
            let mut built = definition().instantiate(&ctx, &cfg).unwrap();
            assert!(built.warnings.is_empty());
            built.transformer.finalize().unwrap();
            let mut record = row(UniversalValue::Int32(123_456));
            built
                .transformer
                .transform(&mut record, &CancellationToken::new())
                .unwrap();
            record.get(1).cloned()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_cancelled_leaves_row_unmodified() {
        let mut built = instantiate("name: NoiseInt\nparams:\n  column: amount\n").unwrap();
        built.transformer.finalize().unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut record = row(UniversalValue::Int32(1000));
        let err = built.transformer.transform(&mut record, &cancel).unwrap_err();
        assert!(matches!(err, TransformError::Cancelled));
        assert_eq!(record.get(1), Some(&UniversalValue::Int32(1000)));
    }
}
