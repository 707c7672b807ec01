use std::collections::HashMap;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{can_cast_types, cast};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{Column, Dataset, Record};

/// File names expected inside a CSV folder source.
pub const HAPPINESS_CSV: &str = "world_happiness.csv";
pub const COUNTRIES_CSV: &str = "countries_data.csv";

/// Query run against the embedded database; the joins are built upstream.
#[cfg(feature = "duckdb")]
pub const JOINED_QUERY: &str = "SELECT * \
     FROM world_happiness AS wh \
     INNER JOIN countries_data AS cd \
     USING (Country)";

// ---------------------------------------------------------------------------
// Data sources
// ---------------------------------------------------------------------------

/// Where the pre-joined table lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    /// One CSV file holding the joined table.
    Csv(PathBuf),
    /// A folder with `world_happiness.csv` and `countries_data.csv`.
    CsvFolder(PathBuf),
    /// Records-oriented JSON array.
    Json(PathBuf),
    /// Parquet file.
    Parquet(PathBuf),
    /// Embedded DuckDB file.
    #[cfg(feature = "duckdb")]
    DuckDb(PathBuf),
}

impl DataSource {
    /// Pick the source kind from the path: directories are CSV folders,
    /// files dispatch by extension.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::NotFound(path.to_path_buf()));
        }
        if path.is_dir() {
            return Ok(DataSource::CsvFolder(path.to_path_buf()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(DataSource::Csv(path.to_path_buf())),
            "json" => Ok(DataSource::Json(path.to_path_buf())),
            "parquet" | "pq" => Ok(DataSource::Parquet(path.to_path_buf())),
            #[cfg(feature = "duckdb")]
            "ddb" | "duckdb" | "db" => Ok(DataSource::DuckDb(path.to_path_buf())),
            #[cfg(not(feature = "duckdb"))]
            "ddb" | "duckdb" | "db" => Err(LoadError::UnsupportedFormat(format!(
                "{} (built without the `duckdb` feature)",
                path.display()
            ))),
            other => Err(LoadError::UnsupportedFormat(format!(".{other}"))),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            DataSource::Csv(p)
            | DataSource::CsvFolder(p)
            | DataSource::Json(p)
            | DataSource::Parquet(p) => p,
            #[cfg(feature = "duckdb")]
            DataSource::DuckDb(p) => p,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read the backing table once and build the immutable [`Dataset`].
pub fn load(source: &DataSource) -> Result<Dataset, LoadError> {
    let table = match source {
        DataSource::Csv(path) => read_csv(path)?,
        DataSource::CsvFolder(dir) => load_csv_folder(dir)?,
        DataSource::Json(path) => read_json(path)?,
        DataSource::Parquet(path) => read_parquet(path)?,
        #[cfg(feature = "duckdb")]
        DataSource::DuckDb(path) => read_duckdb(path)?,
    };

    let dataset = build_dataset(table)?;
    log::info!(
        "Loaded {} records ({} countries, {} years) with columns {:?} from {}",
        dataset.len(),
        dataset.countries().len(),
        dataset.years().len(),
        dataset.columns().iter().map(|c| c.header()).collect::<Vec<_>>(),
        source.path().display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Raw table: what every reader produces
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as read from the source.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Null,
}

impl CellValue {
    fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            CellValue::Text(_) | CellValue::Null => None,
            CellValue::Integer(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(f.to_string()),
        }
    }

    /// Numeric interpretation; `Err(())` means "present but not a finite
    /// number".
    fn as_f64(&self) -> Result<Option<f64>, ()> {
        match self {
            CellValue::Null => Ok(None),
            CellValue::Integer(i) => Ok(Some(*i as f64)),
            CellValue::Float(f) if f.is_nan() => Ok(None),
            CellValue::Float(f) if f.is_infinite() => Err(()),
            CellValue::Float(f) => Ok(Some(*f)),
            CellValue::Text(s) => {
                let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
                if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("nan") {
                    return Ok(None);
                }
                // "inf" and overflowing literals such as "1e400" are rejected.
                match cleaned.parse::<f64>() {
                    Ok(v) if v.is_finite() => Ok(Some(v)),
                    _ => Err(()),
                }
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Integer(i) => i.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Null => String::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    fn column_index(&self, wanted: Column) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| Column::from_header(h) == Some(wanted))
    }

    /// `self INNER JOIN other USING (key)`: keeps the left row order and
    /// drops the key column from the right side.
    pub(crate) fn inner_join(self, other: RawTable, key: Column) -> Result<RawTable, LoadError> {
        let left_key = self
            .column_index(key)
            .ok_or(LoadError::MissingColumn(key.header()))?;
        let right_key = other
            .column_index(key)
            .ok_or(LoadError::MissingColumn(key.header()))?;

        let mut by_key: HashMap<String, Vec<&Vec<CellValue>>> = HashMap::new();
        for row in &other.rows {
            if let Some(k) = row.get(right_key).and_then(CellValue::as_text) {
                by_key.entry(k).or_default().push(row);
            }
        }

        let mut headers = self.headers.clone();
        headers.extend(
            other
                .headers
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != right_key)
                .map(|(_, h)| h.clone()),
        );

        let mut rows = Vec::with_capacity(self.rows.len());
        for left in &self.rows {
            let Some(k) = left.get(left_key).and_then(CellValue::as_text) else {
                continue;
            };
            let Some(matches) = by_key.get(&k) else {
                continue;
            };
            for right in matches {
                let mut row = left.clone();
                row.extend(
                    right
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != right_key)
                        .map(|(_, c)| c.clone()),
                );
                rows.push(row);
            }
        }

        Ok(RawTable { headers, rows })
    }
}

/// Map a raw table onto typed records.
pub(crate) fn build_dataset(table: RawTable) -> Result<Dataset, LoadError> {
    // Resolve each source column once; the first source column wins when two
    // spellings map to the same field.
    let mut mapping: Vec<(usize, Column)> = Vec::new();
    for (idx, header) in table.headers.iter().enumerate() {
        match Column::from_header(header) {
            Some(col) if mapping.iter().all(|(_, c)| *c != col) => mapping.push((idx, col)),
            Some(_) => log::debug!("Ignoring duplicate column '{header}'"),
            None => log::debug!("Ignoring unrecognised column '{header}'"),
        }
    }

    if !mapping.iter().any(|(_, c)| *c == Column::Country) {
        return Err(LoadError::MissingColumn("Country"));
    }
    if !mapping.iter().any(|(_, c)| *c == Column::Year) {
        return Err(LoadError::MissingColumn("Year"));
    }

    let mut records = Vec::with_capacity(table.rows.len());
    for (row_no, row) in table.rows.iter().enumerate() {
        let mut record = Record::default();
        for &(idx, col) in &mapping {
            let cell = row.get(idx).unwrap_or(&CellValue::Null);
            let invalid = || LoadError::InvalidValue {
                row: row_no,
                column: table.headers[idx].clone(),
                value: cell.describe(),
            };
            match col {
                Column::Country => record.country = cell.as_text().ok_or_else(invalid)?,
                Column::Region => record.region = cell.as_text(),
                Column::Subregion => record.subregion = cell.as_text(),
                Column::Year => {
                    let year = cell.as_f64().ok().flatten().ok_or_else(invalid)?;
                    if year.fract() != 0.0 {
                        return Err(invalid());
                    }
                    record.year = year as i32;
                }
                Column::Indicator(ind) => {
                    *record.value_mut(ind) = cell.as_f64().map_err(|_| invalid())?;
                }
            }
        }
        records.push(record);
    }

    let columns = mapping.into_iter().map(|(_, c)| c).collect();
    Dataset::new(records, columns)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
fn read_csv(path: &Path) -> Result<RawTable, LoadError> {
    let malformed = |e: csv::Error| LoadError::Malformed {
        path: path.to_path_buf(),
        format: "CSV",
        message: e.to_string(),
    };

    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let mut reader = csv::Reader::from_path(path).map_err(malformed)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(malformed)?;
        rows.push(record.iter().map(csv_cell).collect());
    }

    Ok(RawTable { headers, rows })
}

fn load_csv_folder(dir: &Path) -> Result<RawTable, LoadError> {
    let happiness = read_csv(&dir.join(HAPPINESS_CSV))?;
    let countries = read_csv(&dir.join(COUNTRIES_CSV))?;
    happiness.inner_join(countries, Column::Country)
}

/// CSV cells stay text until the target column is known, so "007" in a
/// name column is not re-rendered as a number.
fn csv_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Country": "Finland", "Year": 2024, "Happiness": 7.74, "Region": "Europe" },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<RawTable, LoadError> {
    let malformed = |message: String| LoadError::Malformed {
        path: path.to_path_buf(),
        format: "JSON",
        message,
    };

    let text = std::fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    let root: JsonValue = serde_json::from_str(&text).map_err(|e| malformed(e.to_string()))?;
    let records = root
        .as_array()
        .ok_or_else(|| malformed("expected top-level JSON array".to_string()))?;

    let mut headers: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| malformed(format!("row {i} is not a JSON object")))?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(JsonValue::as_object)
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the joined table (one row per country-year).
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable, LoadError> {
    let malformed = |message: String| LoadError::Malformed {
        path: path.to_path_buf(),
        format: "Parquet",
        message,
    };

    let file = std::fs::File::open(path).map_err(|source| io_error(path, source))?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| malformed(e.to_string()))?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    // Only columns that map onto a dataset field are converted; the rest may
    // hold any Arrow type.
    let mapped: Vec<bool> = headers
        .iter()
        .map(|h| Column::from_header(h).is_some())
        .collect();
    let reader = builder.build().map_err(|e| malformed(e.to_string()))?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.map_err(|e| malformed(e.to_string()))?;
        let columns: Vec<Vec<CellValue>> = batch
            .columns()
            .iter()
            .zip(&mapped)
            .map(|(col, &keep)| {
                if keep {
                    column_cells(col)
                } else {
                    Ok(vec![CellValue::Null; col.len()])
                }
            })
            .collect::<Result<_, _>>()
            .map_err(malformed)?;

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col[row].clone()).collect());
        }
    }

    Ok(RawTable { headers, rows })
}

/// Convert one Arrow column to cells, normalising integer, float and string
/// widths through a cast.
fn column_cells(col: &ArrayRef) -> Result<Vec<CellValue>, String> {
    let cast_to = |ty: &DataType| cast(col.as_ref(), ty).map_err(|e| e.to_string());

    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {
            let arr = cast_to(&DataType::Utf8)?;
            Ok(arr
                .as_string::<i32>()
                .iter()
                .map(|v| v.map_or(CellValue::Null, |s| CellValue::Text(s.to_string())))
                .collect())
        }
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => {
            let arr = cast_to(&DataType::Int64)?;
            Ok(arr
                .as_primitive::<Int64Type>()
                .iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::Integer))
                .collect())
        }
        DataType::UInt64
        | DataType::Float16
        | DataType::Float32
        | DataType::Float64
        | DataType::Decimal128(_, _)
        | DataType::Decimal256(_, _) => {
            let arr = cast_to(&DataType::Float64)?;
            Ok(arr
                .as_primitive::<Float64Type>()
                .iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::Float))
                .collect())
        }
        DataType::Null => Ok(vec![CellValue::Null; col.len()]),
        // Dictionary-encoded (pandas categorical), boolean, date ... columns
        // are read through their text rendering.
        other if can_cast_types(other, &DataType::Utf8) => {
            let arr = cast_to(&DataType::Utf8)?;
            Ok(arr
                .as_string::<i32>()
                .iter()
                .map(|v| v.map_or(CellValue::Null, |s| CellValue::Text(s.to_string())))
                .collect())
        }
        other => Err(format!("unsupported column type {other:?}")),
    }
}

// ---------------------------------------------------------------------------
// DuckDB loader
// ---------------------------------------------------------------------------

#[cfg(feature = "duckdb")]
fn read_duckdb(path: &Path) -> Result<RawTable, LoadError> {
    use duckdb::{AccessMode, Config, Connection};

    let config = Config::default().access_mode(AccessMode::ReadOnly)?;
    let conn = Connection::open_with_flags(path, config)?;
    let mut stmt = conn.prepare(JOINED_QUERY)?;
    let mut rows = stmt.query([])?;
    let headers = rows.as_ref().map(|s| s.column_names()).unwrap_or_default();

    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        let mut cells = Vec::with_capacity(headers.len());
        for i in 0..headers.len() {
            cells.push(duckdb_cell(row.get_ref(i)?));
        }
        out.push(cells);
    }

    Ok(RawTable { headers, rows: out })
}

#[cfg(feature = "duckdb")]
fn duckdb_cell(value: duckdb::types::ValueRef<'_>) -> CellValue {
    use duckdb::types::ValueRef;

    match value {
        ValueRef::Null => CellValue::Null,
        ValueRef::TinyInt(v) => CellValue::Integer(v.into()),
        ValueRef::SmallInt(v) => CellValue::Integer(v.into()),
        ValueRef::Int(v) => CellValue::Integer(v.into()),
        ValueRef::BigInt(v) => CellValue::Integer(v),
        ValueRef::UTinyInt(v) => CellValue::Integer(v.into()),
        ValueRef::USmallInt(v) => CellValue::Integer(v.into()),
        ValueRef::UInt(v) => CellValue::Integer(v.into()),
        ValueRef::UBigInt(v) => CellValue::Float(v as f64),
        ValueRef::HugeInt(v) => CellValue::Float(v as f64),
        ValueRef::Float(v) => CellValue::Float(v.into()),
        ValueRef::Double(v) => CellValue::Float(v),
        ValueRef::Decimal(d) => CellValue::Text(d.to_string()),
        ValueRef::Text(bytes) => CellValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        other => CellValue::Text(format!("{other:?}")),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> LoadError {
    if source.kind() == std::io::ErrorKind::NotFound {
        LoadError::NotFound(path.to_path_buf())
    } else {
        LoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::Indicator;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_joined_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "joined.csv",
            "Country,Year,Happiness,Region,Subregion,GDP per capita,Population,Flag_URL\n\
             Finland,2024,7.74,Europe,Northern Europe,\"53,189\",5545475,http://x\n\
             Kenya,2024,,Africa,Eastern Africa,2099,55100586,http://y\n",
        );

        let ds = load(&DataSource::from_path(&path).unwrap()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.columns(),
            &[
                Column::Country,
                Column::Year,
                Column::Indicator(Indicator::Happiness),
                Column::Region,
                Column::Subregion,
                Column::Indicator(Indicator::GdpPerCapita),
                Column::Indicator(Indicator::Population),
            ]
        );
        let finland = &ds.records()[0];
        assert_eq!(finland.year, 2024);
        assert_eq!(finland.gdp_per_capita, Some(53189.0));
        assert_eq!(finland.subregion.as_deref(), Some("Northern Europe"));
        assert_eq!(ds.records()[1].happiness, None);
    }

    #[test]
    fn joins_csv_folder_on_country() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            HAPPINESS_CSV,
            "Country,Year,Index\nFinland,2023,7.8\nFinland,2024,7.74\nAtlantis,2024,9.9\n",
        );
        write_file(
            dir.path(),
            COUNTRIES_CSV,
            "Country,Region,Subregion,Med_Age\nFinland,Europe,Northern Europe,43\n",
        );

        let ds = load(&DataSource::from_path(dir.path()).unwrap()).unwrap();
        assert_eq!(ds.len(), 2);
        assert!(ds.records().iter().all(|r| r.country == "Finland"));
        assert_eq!(ds.records()[1].happiness, Some(7.74));
        assert_eq!(ds.records()[0].median_age, Some(43.0));
    }

    #[test]
    fn loads_records_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "joined.json",
            r#"[{"Country":"Chile","Year":2024,"Happiness":6.36,"Region":null},
                {"Country":"Peru","Year":2024,"Happiness":5.84,"Region":"Americas"}]"#,
        );

        let ds = load(&DataSource::Json(path)).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].region, None);
        assert_eq!(ds.records()[1].region.as_deref(), Some("Americas"));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = DataSource::from_path(&dir.path().join("countries.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));

        let err = load(&DataSource::CsvFolder(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn unparsable_number_reports_row_and_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "bad.csv",
            "Country,Year,Pollution\nChile,2024,45.1\nPeru,2024,very high\n",
        );

        let err = load(&DataSource::Csv(path)).unwrap_err();
        match err {
            LoadError::InvalidValue { row, column, value } => {
                assert_eq!(row, 1);
                assert_eq!(column, "Pollution");
                assert_eq!(value, "very high");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn infinite_numbers_are_invalid() {
        let dir = tempfile::tempdir().unwrap();
        for value in ["inf", "-Infinity", "1e400"] {
            let path = write_file(
                dir.path(),
                "inf.csv",
                &format!("Country,Year,Pollution\nChile,2024,{value}\n"),
            );
            let err = load(&DataSource::Csv(path)).unwrap_err();
            assert!(
                matches!(err, LoadError::InvalidValue { row: 0, .. }),
                "{value}: {err}"
            );
        }
    }

    #[test]
    fn numeric_looking_names_keep_their_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "codes.csv",
            "Country,Year,Region,Subregion,Happiness\n007,2024,1e5,01,5.5\n",
        );
        let ds = load(&DataSource::Csv(path)).unwrap();
        let record = &ds.records()[0];
        assert_eq!(record.country, "007");
        assert_eq!(record.region.as_deref(), Some("1e5"));
        assert_eq!(record.subregion.as_deref(), Some("01"));
        assert_eq!(record.year, 2024);
        assert_eq!(record.happiness, Some(5.5));
    }

    #[test]
    fn loads_parquet_with_extra_column_types() {
        use std::sync::Arc;

        use arrow::array::{BooleanArray, DictionaryArray, Float64Array, Int32Array, StringArray};
        use arrow::datatypes::{Field, Int32Type, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("Country", DataType::Utf8, false),
            Field::new("Year", DataType::Int32, false),
            Field::new("Happiness", DataType::Float64, true),
            Field::new(
                "Region",
                DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8)),
                true,
            ),
            Field::new("Landlocked", DataType::Boolean, true),
        ]));
        let region: DictionaryArray<Int32Type> = vec!["Europe", "Americas"].into_iter().collect();
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Finland", "Bolivia"])),
                Arc::new(Int32Array::from(vec![2024, 2024])),
                Arc::new(Float64Array::from(vec![Some(7.74), None])),
                Arc::new(region),
                Arc::new(BooleanArray::from(vec![false, true])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("joined.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load(&DataSource::from_path(&path).unwrap()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(
            ds.columns(),
            &[
                Column::Country,
                Column::Year,
                Column::Indicator(Indicator::Happiness),
                Column::Region,
            ]
        );
        let finland = &ds.records()[0];
        assert_eq!(finland.year, 2024);
        assert_eq!(finland.happiness, Some(7.74));
        assert_eq!(finland.region.as_deref(), Some("Europe"));
        assert_eq!(ds.records()[1].happiness, None);
        assert_eq!(ds.records()[1].region.as_deref(), Some("Americas"));
    }

    #[test]
    fn requires_country_and_year() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "no_year.csv", "Country,Happiness\nChile,6.3\n");
        let err = load(&DataSource::Csv(path)).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("Year")));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "table.xlsx", "");
        let err = DataSource::from_path(&path).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }
}
