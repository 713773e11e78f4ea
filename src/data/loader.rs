use std::fs::File;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, RawDataset, RawRow};
use crate::error::DatasetError;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row + one record per line
/// * `.json`    – `[{ "Part": "A-1", "Branch": "X", ... }, ...]`
/// * `.parquet` – flat scalar columns
///
/// A file with a header and no data rows is reported as
/// [`DatasetError::Empty`].
pub fn load_file(path: &Path) -> Result<RawDataset, DatasetError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DatasetError::UnsupportedFormat(other.to_string())),
    };

    if dataset.is_empty() {
        return Err(DatasetError::Empty(path.to_path_buf()));
    }
    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        dataset.len(),
        dataset.columns,
        path.display()
    );
    Ok(dataset)
}

/// Run [`load_file`] on a worker thread.
pub fn load_in_background(path: PathBuf) -> JoinHandle<Result<RawDataset, DatasetError>> {
    thread::spawn(move || load_file(&path))
}

fn open(path: &Path) -> Result<File, DatasetError> {
    File::open(path).map_err(|source| DatasetError::Load {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Comma-delimited, header row, blank lines skipped. Rows with a different
/// number of fields than the header are a parse failure.
fn load_csv(path: &Path) -> Result<RawDataset, DatasetError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| DatasetError::parse("CSV", format!("reading headers: {e}")))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DatasetError::parse("CSV", format!("row {row_no}: {e}")))?;
        let row: RawRow = columns
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_cell_type(value)))
            .collect();
        rows.push(row);
    }

    Ok(RawDataset { columns, rows })
}

/// Dynamic typing of a CSV cell. Integer-looking text with a leading zero
/// stays text so part numbers such as `0042` keep their spelling.
fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    let digits = s.strip_prefix('-').unwrap_or(s);
    let leading_zero = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");
    if leading_zero {
        return CellValue::String(s.to_string());
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON: a top-level array of flat objects. Columns are
/// the union of keys in first-seen order.
fn load_json(path: &Path) -> Result<RawDataset, DatasetError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatasetError::Load {
        path: path.to_path_buf(),
        source,
    })?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| DatasetError::parse("JSON", e))?;
    let records = root
        .as_array()
        .ok_or_else(|| DatasetError::parse("JSON", "expected a top-level array"))?;

    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| DatasetError::parse("JSON", format!("row {i} is not an object")))?;
        let mut row = RawRow::new();
        for (key, val) in obj {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
            row.insert(key.clone(), json_to_cell(val));
        }
        rows.push(row);
    }

    Ok(RawDataset { columns, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per dataset column.
fn load_parquet(path: &Path) -> Result<RawDataset, DatasetError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)
        .map_err(|e| DatasetError::parse("Parquet", format!("reading metadata: {e}")))?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder
        .build()
        .map_err(|e| DatasetError::parse("Parquet", format!("building reader: {e}")))?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| DatasetError::parse("Parquet", e))?;
        for row in 0..batch.num_rows() {
            let raw: RawRow = columns
                .iter()
                .zip(batch.columns())
                .map(|(name, col)| (name.clone(), extract_cell(col, row)))
                .collect();
            rows.push(raw);
        }
    }

    Ok(RawDataset { columns, rows })
}

/// Extract a single value from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let typed = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|a| CellValue::String(a.value(row).to_string())),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| CellValue::Bool(a.value(row))),
        _ => None,
    };
    typed.unwrap_or_else(|| match array_value_to_string(col.as_ref(), row) {
        Ok(s) => CellValue::String(s),
        Err(_) => CellValue::Null,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Arc;

    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use crate::error::FailureKind;

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn csv_cells_are_dynamically_typed() {
        let file = write_temp(
            ".csv",
            "Part,Branch,Difference,Flag\nA,X,10,true\n\n0042,Y,-2.5,\nB,Z,abc,false\n",
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.columns, vec!["Part", "Branch", "Difference", "Flag"]);
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.rows[0]["Difference"], CellValue::Integer(10));
        assert_eq!(ds.rows[0]["Flag"], CellValue::Bool(true));
        assert_eq!(ds.rows[1]["Part"], CellValue::String("0042".into()));
        assert_eq!(ds.rows[1]["Difference"], CellValue::Float(-2.5));
        assert_eq!(ds.rows[1]["Flag"], CellValue::Null);
        assert_eq!(ds.rows[2]["Difference"], CellValue::String("abc".into()));
    }

    #[test]
    fn header_only_csv_is_empty_not_parse_failure() {
        let file = write_temp(".csv", "Part,Branch,Difference\n");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Empty);
    }

    #[test]
    fn ragged_csv_is_parse_failure() {
        let file = write_temp(".csv", "Part,Branch\nA,X,extra\n");
        let err = load_file(file.path()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Parse);
    }

    #[test]
    fn missing_file_is_load_failure() {
        let err = load_file(Path::new("/nonexistent/dir/counts.csv")).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Load);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let file = write_temp(".xlsx", "");
        assert!(matches!(
            load_file(file.path()),
            Err(DatasetError::UnsupportedFormat(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn json_keeps_key_order_and_types() {
        let file = write_temp(
            ".json",
            r#"[{"Part":"A","Branch":"X","Difference":4},{"Part":"A","Planner":"kim","Difference":1.5}]"#,
        );
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.columns, vec!["Part", "Branch", "Difference", "Planner"]);
        assert_eq!(ds.rows[1]["Difference"], CellValue::Float(1.5));
        assert!(!ds.rows[1].contains_key("Branch"));
    }

    #[test]
    fn json_empty_array_is_empty() {
        let file = write_temp(".json", "[]");
        assert_eq!(load_file(file.path()).unwrap_err().kind(), FailureKind::Empty);
    }

    #[test]
    fn json_non_array_is_parse_failure() {
        let file = write_temp(".json", r#"{"Part":"A"}"#);
        assert_eq!(load_file(file.path()).unwrap_err().kind(), FailureKind::Parse);
    }

    #[test]
    fn parquet_scalar_columns_round_into_cells() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Part", DataType::Utf8, false),
            Field::new("Difference", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["A", "B"])),
                Arc::new(Float64Array::from(vec![Some(3.0), None])),
            ],
        )
        .unwrap();
        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.as_file().try_clone().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.columns, vec!["Part", "Difference"]);
        assert_eq!(ds.rows[0]["Part"], CellValue::String("A".into()));
        assert_eq!(ds.rows[0]["Difference"], CellValue::Float(3.0));
        assert_eq!(ds.rows[1]["Difference"], CellValue::Null);
    }

    #[test]
    fn background_load_returns_result() {
        let file = write_temp(".csv", "Part,Branch\nA,X\n");
        let handle = load_in_background(file.path().to_path_buf());
        let ds = handle.join().unwrap().unwrap();
        assert_eq!(ds.len(), 1);
    }
}
