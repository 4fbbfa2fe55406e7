//! JSON object ↔ [`Record`] conversion.
//!
//! Conversion is driven by the table definition: each column's declared type
//! decides how the JSON value is read. Keys missing from the object read as
//! null; keys not present in the table are ignored.

use crate::schema::TableDefinition;
use crate::types::UniversalType;
use crate::values::{Record, UniversalValue};

/// Error type for JSON row conversion.
#[derive(Debug, thiserror::Error)]
pub enum JsonRowError {
    /// JSON value cannot be represented in the column type
    #[error("Column '{column}': cannot convert {value} to {column_type}")]
    Incompatible {
        column: String,
        column_type: UniversalType,
        value: serde_json::Value,
    },
}

/// Build a record from a JSON object.
pub fn record_from_object(
    table: &TableDefinition,
    index: u64,
    object: &serde_json::Map<String, serde_json::Value>,
) -> Result<Record, JsonRowError> {
    let values = table
        .columns
        .iter()
        .map(|column| {
            let json = object.get(&column.name).unwrap_or(&serde_json::Value::Null);
            json_to_value(json, column.column_type).ok_or_else(|| JsonRowError::Incompatible {
                column: column.name.clone(),
                column_type: column.column_type,
                value: json.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut record = Record::new(table.name.clone(), index, values);
    if let Some(pk) = &table.primary_key {
        if let Some(id) = object.get(pk).filter(|v| !v.is_null()) {
            record.id = Some(match id {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        }
    }
    Ok(record)
}

/// Render a record back into a JSON object in column order.
pub fn record_to_object(
    table: &TableDefinition,
    record: &Record,
) -> serde_json::Map<String, serde_json::Value> {
    table
        .columns
        .iter()
        .zip(record.values.iter())
        .map(|(column, value)| (column.name.clone(), value_to_json(value)))
        .collect()
}

fn json_to_value(json: &serde_json::Value, column_type: UniversalType) -> Option<UniversalValue> {
    use serde_json::Value;

    match (column_type, json) {
        (_, Value::Null) => Some(UniversalValue::Null),
        (UniversalType::Bool, Value::Bool(b)) => Some(UniversalValue::Bool(*b)),
        (UniversalType::Int16 | UniversalType::Int32 | UniversalType::Int64, Value::Number(n)) => {
            let width = column_type.int_width()?;
            UniversalValue::int(width, n.as_i64()?)
        }
        (UniversalType::Float64, Value::Number(n)) => n.as_f64().map(UniversalValue::Float64),
        (UniversalType::Text, Value::String(s)) => Some(UniversalValue::Text(s.clone())),
        _ => None,
    }
}

fn value_to_json(value: &UniversalValue) -> serde_json::Value {
    use serde_json::Value;

    match value {
        UniversalValue::Null => Value::Null,
        UniversalValue::Bool(b) => Value::Bool(*b),
        UniversalValue::Int16(i) => Value::from(*i),
        UniversalValue::Int32(i) => Value::from(*i),
        UniversalValue::Int64(i) => Value::from(*i),
        UniversalValue::Float64(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        UniversalValue::Text(s) => Value::String(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ColumnDefinition;
    use serde_json::json;

    fn table() -> TableDefinition {
        TableDefinition::new(
            "orders",
            vec![
                ColumnDefinition::new("id", UniversalType::Int64),
                ColumnDefinition::new("qty", UniversalType::Int16),
                ColumnDefinition::nullable("note", UniversalType::Text),
                ColumnDefinition::new("paid", UniversalType::Bool),
            ],
        )
        .with_primary_key("id")
    }

    fn object(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_record_from_object() {
        let record = record_from_object(
            &table(),
            3,
            &object(json!({"id": 17, "qty": 5, "paid": true})),
        )
        .unwrap();
        assert_eq!(record.index, 3);
        assert_eq!(record.id.as_deref(), Some("17"));
        assert_eq!(
            record.values,
            vec![
                UniversalValue::Int64(17),
                UniversalValue::Int16(5),
                UniversalValue::Null,
                UniversalValue::Bool(true),
            ]
        );
    }

    #[test]
    fn test_out_of_width_rejected() {
        let err = record_from_object(&table(), 0, &object(json!({"id": 1, "qty": 40000})))
            .unwrap_err();
        assert!(err.to_string().contains("qty"));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        assert!(record_from_object(&table(), 0, &object(json!({"id": "abc"}))).is_err());
    }

    #[test]
    fn test_record_to_object() {
        let input = object(json!({"id": 1, "qty": 2, "note": "n", "paid": false}));
        let record = record_from_object(&table(), 0, &input).unwrap();
        let output = record_to_object(&table(), &record);
        assert_eq!(serde_json::Value::Object(output), serde_json::Value::Object(input));
    }
}
