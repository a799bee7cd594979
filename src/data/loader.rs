use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{ListingDataset, ListingRecord, MarketData};

// ---------------------------------------------------------------------------
// Schema errors
// ---------------------------------------------------------------------------

/// A shard file that does not match the expected listing schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("column '{column}': expected {expected}, got {actual}")]
    ColumnType {
        column: &'static str,
        expected: &'static str,
        actual: String,
    },
    #[error("column '{column}', row {row}: {detail}")]
    BadValue {
        column: &'static str,
        row: usize,
        detail: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load one shard file of listing records. Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – scalar columns; `time` as Date32 or ISO-8601 text
/// * `.json`    – `[{ "time": "2024-03-01", "region": "...", ... }, ...]`
/// * `.csv`     – header row with the listing columns
pub fn load_file(path: &Path) -> Result<Vec<ListingRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Load every shard of one category in the given order and concatenate.
///
/// All rows are kept; overlapping shards are NOT deduplicated, so a row
/// present in two shards is counted twice downstream.
pub fn load_category(paths: &[PathBuf]) -> Result<Vec<ListingRecord>> {
    let mut records = Vec::new();
    for path in paths {
        let shard = load_file(path)
            .with_context(|| format!("loading shard {}", path.display()))?;
        log::debug!("Shard {}: {} records", path.display(), shard.len());
        records.extend(shard);
    }
    Ok(records)
}

/// Load a whole data directory into the session's `MarketData`.
///
/// Shards are recognized by file stem prefix (`sale*` / `rent*`) and
/// loaded in file-name order. Any unreadable shard, or a category with
/// no shards at all, is fatal: the dashboard cannot render without both
/// categories.
pub fn load_market_data(dir: &Path) -> Result<MarketData> {
    let sale_paths = shard_paths(dir, "sale")?;
    let rent_paths = shard_paths(dir, "rent")?;

    if sale_paths.is_empty() {
        bail!("no sale shards (sale*.parquet/json/csv) in {}", dir.display());
    }
    if rent_paths.is_empty() {
        bail!("no rent shards (rent*.parquet/json/csv) in {}", dir.display());
    }

    let sale = ListingDataset::from_records(load_category(&sale_paths)?);
    let rent = ListingDataset::from_records(load_category(&rent_paths)?);
    if sale.is_empty() || rent.is_empty() {
        log::warn!("A category loaded zero records; its charts will be empty");
    }

    log::info!(
        "Loaded {} sale records ({} shards), {} rent records ({} shards) from {}",
        sale.len(),
        sale_paths.len(),
        rent.len(),
        rent_paths.len(),
        dir.display()
    );

    Ok(MarketData { sale, rent })
}

/// Shard files in `dir` whose stem starts with `prefix`, sorted by name.
fn shard_paths(dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("reading data directory {}", dir.display()))?
    {
        let path = entry.context("reading directory entry")?.path();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        if stem.starts_with(prefix) && matches!(ext.as_str(), "parquet" | "pq" | "json" | "csv") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   {
///     "time": "2024-03-01",
///     "region": "Centre",
///     "floor": 3,
///     "rooms": 2,
///     "square_m": 54.5,
///     "price_per_square_m": 1820.0
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<ListingRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let records: Vec<ListingRecord> =
        serde_json::from_str(&text).context("parsing JSON listing records")?;
    Ok(records)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV with a header row naming the listing columns; `time` is an
/// ISO-8601 date.
fn load_csv(path: &Path) -> Result<Vec<ListingRecord>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<ListingRecord>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Expected Parquet schema:
/// - `time`: Date32 or Utf8 (ISO-8601)
/// - `region`: Utf8
/// - `floor`, `rooms`: Int32 or Int64
/// - `square_m`, `price_per_square_m`: Float64, Float32, or integer
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<ListingRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let time_col = required_column(&batch, "time")?;
        let region_col = required_column(&batch, "region")?;
        let floor_col = required_column(&batch, "floor")?;
        let rooms_col = required_column(&batch, "rooms")?;
        let square_col = required_column(&batch, "square_m")?;
        let price_col = required_column(&batch, "price_per_square_m")?;

        for row in 0..batch.num_rows() {
            records.push(ListingRecord {
                time: extract_date(time_col, row, "time")?,
                region: extract_string(region_col, row, "region")?,
                floor: extract_u32(floor_col, row, "floor")?,
                rooms: extract_u32(rooms_col, row, "rooms")?,
                square_m: extract_f64(square_col, row, "square_m")?,
                price_per_square_m: extract_f64(price_col, row, "price_per_square_m")?,
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn required_column<'a>(
    batch: &'a arrow::record_batch::RecordBatch,
    name: &'static str,
) -> Result<&'a Arc<dyn Array>, SchemaError> {
    batch
        .schema()
        .index_of(name)
        .map(|i| batch.column(i))
        .map_err(|_| SchemaError::MissingColumn(name))
}

fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)
        .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days as i64)))
}

fn extract_date(
    col: &Arc<dyn Array>,
    row: usize,
    name: &'static str,
) -> Result<NaiveDate, SchemaError> {
    if col.is_null(row) {
        return Err(SchemaError::BadValue {
            column: name,
            row,
            detail: "null date".to_string(),
        });
    }
    match col.data_type() {
        DataType::Date32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Date32Array>()
                .ok_or_else(|| type_error(name, "Date32", col))?;
            date_from_epoch_days(arr.value(row)).ok_or_else(|| SchemaError::BadValue {
                column: name,
                row,
                detail: format!("out-of-range epoch days {}", arr.value(row)),
            })
        }
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .ok_or_else(|| type_error(name, "Utf8", col))?;
            let text = arr.value(row);
            text.parse::<NaiveDate>().map_err(|e| SchemaError::BadValue {
                column: name,
                row,
                detail: format!("'{text}' is not an ISO-8601 date: {e}"),
            })
        }
        _ => Err(type_error(name, "Date32 or Utf8", col)),
    }
}

fn extract_string(
    col: &Arc<dyn Array>,
    row: usize,
    name: &'static str,
) -> Result<String, SchemaError> {
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
                Ok(arr.value(row).to_string())
            } else {
                use arrow::array::AsArray;
                Ok(col.as_string::<i64>().value(row).to_string())
            }
        }
        _ => Err(type_error(name, "Utf8", col)),
    }
}

fn extract_u32(col: &Arc<dyn Array>, row: usize, name: &'static str) -> Result<u32, SchemaError> {
    let value: i64 = match col.data_type() {
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .ok_or_else(|| type_error(name, "Int32", col))?;
            arr.value(row) as i64
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .ok_or_else(|| type_error(name, "Int64", col))?;
            arr.value(row)
        }
        _ => return Err(type_error(name, "Int32 or Int64", col)),
    };
    u32::try_from(value).map_err(|_| SchemaError::BadValue {
        column: name,
        row,
        detail: format!("{value} does not fit in u32"),
    })
}

fn extract_f64(col: &Arc<dyn Array>, row: usize, name: &'static str) -> Result<f64, SchemaError> {
    match col.data_type() {
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .ok_or_else(|| type_error(name, "Float64", col))?;
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .ok_or_else(|| type_error(name, "Float32", col))?;
            Ok(arr.value(row) as f64)
        }
        DataType::Int32 | DataType::Int64 => extract_u32(col, row, name).map(|v| v as f64),
        _ => Err(type_error(name, "Float64, Float32, or integer", col)),
    }
}

fn type_error(column: &'static str, expected: &'static str, col: &Arc<dyn Array>) -> SchemaError {
    SchemaError::ColumnType {
        column,
        expected,
        actual: format!("{:?}", col.data_type()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_round_trips_the_record_schema() {
        let text = r#"[
            {"time":"2024-03-01","region":"Centre","floor":3,"rooms":2,
             "square_m":54.5,"price_per_square_m":1820.0},
            {"time":"2024-03-02","region":"Teika","floor":1,"rooms":3,
             "square_m":70.0,"price_per_square_m":1500.0}
        ]"#;
        let records: Vec<ListingRecord> = serde_json::from_str(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region, "Centre");
        assert_eq!(
            records[1].time,
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = load_file(Path::new("sale_data.pkl")).unwrap_err();
        assert!(err.to_string().contains(".pkl"));
    }

    #[test]
    fn epoch_day_conversion() {
        assert_eq!(
            date_from_epoch_days(0),
            NaiveDate::from_ymd_opt(1970, 1, 1)
        );
        assert_eq!(
            date_from_epoch_days(19_723),
            NaiveDate::from_ymd_opt(2024, 1, 1)
        );
    }

    #[test]
    fn concatenation_keeps_overlapping_rows() {
        let dir = std::env::temp_dir().join("flatboard_loader_test");
        std::fs::create_dir_all(&dir).unwrap();
        let shard = r#"[{"time":"2024-03-01","region":"Centre","floor":3,"rooms":2,
                         "square_m":54.5,"price_per_square_m":1820.0}]"#;
        let a = dir.join("sale_hist_1.json");
        let b = dir.join("sale_hist_2.json");
        std::fs::write(&a, shard).unwrap();
        std::fs::write(&b, shard).unwrap();

        let records = load_category(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], records[1]);

        std::fs::remove_file(a).ok();
        std::fs::remove_file(b).ok();
    }
}
