//! End-to-end JSONL masking tests.

use mask_generator::Salt;
use mask_transformers::TransformerRegistry;
use noise_mask::{mask_path, mask_stream, MaskConfig, MaskOptions, MaskPipeline};
use serde_json::Value;
use std::io::Cursor;
use tokio_util::sync::CancellationToken;

const CONFIG: &str = r#"
table:
  name: payments
  primary_key: id
  columns:
    - name: id
      type: big_int
    - name: amount
      type: int
      nullable: true
    - name: limit
      type: small_int
      nullable: true
transformers:
  - name: NoiseInt
    params:
      column: amount
      engine: hash
      min: 0
    dynamic_params:
      max:
        column: limit
        default: 30000
"#;

const INPUT: &str = r#"{"id": 1, "amount": 1000, "limit": 2000, "note": "keep me"}
{"id": 2, "amount": null, "limit": 10}

{"id": 3, "amount": 500, "limit": -5}
{"id": 4, "amount": 250}
"#;

fn pipeline(salt: Option<&Salt>) -> MaskPipeline {
    let config = MaskConfig::from_yaml(CONFIG).unwrap();
    MaskPipeline::build(&TransformerRegistry::with_defaults(), &config, salt).unwrap()
}

fn run(options: MaskOptions, salt: &Salt) -> anyhow::Result<(noise_mask::MaskStats, Vec<Value>)> {
    let mut output = Vec::new();
    let stats = mask_stream(
        &mut pipeline(Some(salt)),
        Cursor::new(INPUT),
        &mut output,
        options,
        &CancellationToken::new(),
    )?;
    let rows = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    Ok((stats, rows))
}

#[test]
fn test_row_error_aborts_by_default() {
    let salt = Salt::from_bytes(b"test-salt".to_vec());
    let err = run(MaskOptions::default(), &salt).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("line 4"), "{message}");
    assert!(message.contains("row 3"), "{message}");
}

#[test]
fn test_skip_failed_rows() {
    let salt = Salt::from_bytes(b"test-salt".to_vec());
    let options = MaskOptions {
        skip_failed_rows: true,
    };
    let (stats, rows) = run(options, &salt).unwrap();
    assert_eq!(stats.rows_read, 4);
    assert_eq!(stats.rows_written, 3);
    assert_eq!(stats.rows_skipped, 1);

    // Extra keys survive, masked value stays inside [0, limit]
    assert_eq!(rows[0]["note"], "keep me");
    let amount = rows[0]["amount"].as_i64().unwrap();
    assert!((0..=2000).contains(&amount) && amount != 1000, "{amount}");

    // Null passes through
    assert_eq!(rows[1]["amount"], Value::Null);

    // Failed row 3 is never written, unmasked or otherwise
    assert!(rows.iter().all(|row| row["id"] != 3));

    // Missing limit falls back to the default bound; key stays absent
    assert_eq!(rows[2]["id"], 4);
    assert!(rows[2].get("limit").is_none());
}

#[test]
fn test_same_salt_same_output() {
    let options = MaskOptions {
        skip_failed_rows: true,
    };
    let salt = Salt::from_bytes(b"shared".to_vec());
    let (_, first) = run(options, &salt).unwrap();
    let (_, second) = run(options, &salt).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_cancelled_stream_stops() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut output = Vec::new();
    let result = mask_stream(
        &mut pipeline(None),
        Cursor::new(INPUT),
        &mut output,
        MaskOptions::default(),
        &cancel,
    );
    assert!(result.is_err());
    assert!(output.is_empty());
}

#[tokio::test]
async fn test_mask_path_files() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("rows.jsonl");
    let output = dir.path().join("masked.jsonl");
    std::fs::write(&input, "{\"id\": 7, \"amount\": 100, \"limit\": 200}\n").unwrap();

    let salt = Salt::from_bytes(b"file-salt".to_vec());
    let stats = mask_path(
        pipeline(Some(&salt)),
        Some(input),
        Some(output.clone()),
        MaskOptions::default(),
        CancellationToken::new(),
    )
    .await
    .unwrap();
    assert_eq!(stats.rows_written, 1);

    let written = std::fs::read_to_string(&output).unwrap();
    let row: Value = serde_json::from_str(written.trim()).unwrap();
    let amount = row["amount"].as_i64().unwrap();
    assert!((0..=200).contains(&amount), "{amount}");
}

fn mask_lines(config: &str, input: &str) -> anyhow::Result<Vec<Value>> {
    let config = MaskConfig::from_yaml(config).unwrap();
    let mut pipeline =
        MaskPipeline::build(&TransformerRegistry::with_defaults(), &config, None).unwrap();
    let mut output = Vec::new();
    mask_stream(
        &mut pipeline,
        Cursor::new(input),
        &mut output,
        MaskOptions::default(),
        &CancellationToken::new(),
    )?;
    Ok(String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect())
}

#[test]
fn test_unmasked_columns_keep_their_literals() {
    let config = r#"
table:
  name: prices
  columns:
    - name: id
      type: big_int
    - name: price
      type: double
    - name: amount
      type: int
transformers:
  - name: NoiseInt
    params:
      column: amount
      min: 0
      max: 5000
"#;
    let rows = mask_lines(config, "{\"id\":1,\"price\":3,\"amount\":1000}\n").unwrap();
    assert_eq!(rows.len(), 1);

    // A double column read as 3.0 is not written back as 3.0
    assert!(rows[0]["price"].is_i64(), "{}", rows[0]["price"]);
    assert_eq!(rows[0]["price"].as_i64(), Some(3));
    assert_eq!(rows[0]["id"].as_i64(), Some(1));
    let amount = rows[0]["amount"].as_i64().unwrap();
    assert!((0..=5000).contains(&amount), "{amount}");
}

#[test]
fn test_row_without_key_named_by_line_number() {
    let config = r#"
table:
  name: payments
  columns:
    - name: amount
      type: int
    - name: limit
      type: small_int
transformers:
  - name: NoiseInt
    params:
      column: amount
      min: 0
    dynamic_params:
      max:
        column: limit
"#;
    let input = "{\"amount\":10,\"limit\":100}\n{\"amount\":20,\"limit\":100}\n\n{\"amount\":30,\"limit\":-5}\n";
    let err = mask_lines(config, input).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("line 4"), "{message}");
    assert!(message.contains("row #4"), "{message}");
}
