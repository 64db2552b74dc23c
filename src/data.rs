//! CSV loading with type inference using DuckDB

use crate::error::{RegressionError, Result};
use crate::table::{Column, ColumnKind, Scalar, Table};
use duckdb::types::ValueRef;
use duckdb::Connection;
use std::path::Path;

/// Reads snapshot files into typed tables
pub struct DataProcessor {
    connection: Connection,
}

impl DataProcessor {
    pub fn new() -> Result<Self> {
        let connection = Connection::open_in_memory()?;
        connection.execute("SET enable_progress_bar=false", [])?;
        Ok(Self { connection })
    }

    /// Load a CSV file with a header row.
    ///
    /// Column kinds come from DuckDB's type sniffing; see [`build_column`]
    /// for how NULL cells affect the final kind.
    pub fn load_csv(&self, file_path: &Path) -> Result<Table> {
        if !file_path.is_file() {
            return Err(RegressionError::invalid_input(format!(
                "File not found: {}",
                file_path.display()
            )));
        }

        let content = std::fs::read(file_path)?;
        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Table::new());
        }

        let create_view_sql = format!(
            "CREATE OR REPLACE VIEW snapshot_view AS SELECT * FROM read_csv('{}', header = true)",
            escape_literal(&file_path.to_string_lossy())
        );
        self.connection
            .execute(&create_view_sql, [])
            .map_err(|e| self.convert_duckdb_error(e, file_path))?;

        let schema = self.describe()?;
        if schema.is_empty() {
            return Ok(Table::new());
        }

        let select_list = schema
            .iter()
            .map(|(name, kind)| {
                let ident = quote_identifier(name);
                if *kind == ColumnKind::Object {
                    format!("CAST({} AS VARCHAR) AS {}", ident, ident)
                } else {
                    ident
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        let mut stmt = self
            .connection
            .prepare(&format!("SELECT {} FROM snapshot_view", select_list))
            .map_err(|e| {
                RegressionError::invalid_snapshot(
                    file_path,
                    format!("Failed to prepare data extraction query: {}", e),
                )
            })?;

        let column_count = schema.len();
        let rows = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(column_count);
                for i in 0..column_count {
                    values.push(value_to_scalar(row.get_ref(i)?));
                }
                Ok(values)
            })
            .map_err(|e| self.convert_duckdb_error(e, file_path))?;

        let mut column_values: Vec<Vec<Scalar>> = vec![Vec::new(); column_count];
        for row in rows {
            let row = row.map_err(|e| self.convert_duckdb_error(e, file_path))?;
            for (values, value) in column_values.iter_mut().zip(row) {
                values.push(value);
            }
        }

        let table: Table = schema
            .into_iter()
            .zip(column_values)
            .map(|((name, kind), values)| (name, build_column(kind, values)))
            .collect();

        log::debug!(
            "Loaded {} columns x {} rows from {}",
            table.num_columns(),
            table.num_rows(),
            file_path.display()
        );
        Ok(table)
    }

    /// Column names and kinds of the current view, in file order
    fn describe(&self) -> Result<Vec<(String, ColumnKind)>> {
        let mut stmt = self.connection.prepare("DESCRIBE snapshot_view")?;
        let rows = stmt.query_map([], |row| {
            let name: String = row.get(0)?;
            let sql_type: String = row.get(1)?;
            Ok((name, kind_for_sql_type(&sql_type)))
        })?;

        let mut columns = Vec::new();
        for row in rows {
            columns.push(row?);
        }
        Ok(columns)
    }

    fn convert_duckdb_error(&self, error: duckdb::Error, file_path: &Path) -> RegressionError {
        let error_msg = error.to_string();

        if error_msg.contains("CSV Error")
            || error_msg.contains("Could not convert")
            || error_msg.contains("Unterminated quoted field")
        {
            RegressionError::invalid_snapshot(file_path, format!("Malformed CSV: {}", error_msg))
        } else if error_msg.contains("No files found") || error_msg.contains("does not exist") {
            RegressionError::invalid_input(format!("File not found: {}", file_path.display()))
        } else if error_msg.contains("UTF-8") || error_msg.contains("encoding") {
            RegressionError::invalid_snapshot(file_path, format!("File encoding error: {}", error_msg))
        } else {
            RegressionError::DuckDb(error)
        }
    }
}

/// Map a DuckDB logical type name onto a column kind
pub fn kind_for_sql_type(sql_type: &str) -> ColumnKind {
    let upper = sql_type.trim().to_uppercase();
    match upper.as_str() {
        "BOOLEAN" | "BOOL" => ColumnKind::Bool,
        "TINYINT" | "SMALLINT" | "INTEGER" | "BIGINT" | "HUGEINT" | "UTINYINT" | "USMALLINT"
        | "UINTEGER" | "UBIGINT" => ColumnKind::Int,
        "FLOAT" | "REAL" | "DOUBLE" => ColumnKind::Float,
        t if t.starts_with("DECIMAL") => ColumnKind::Float,
        _ => ColumnKind::Object,
    }
}

fn value_to_scalar(value: ValueRef<'_>) -> Scalar {
    match value {
        ValueRef::Null => Scalar::Missing,
        ValueRef::Boolean(b) => Scalar::Bool(b),
        ValueRef::TinyInt(i) => Scalar::Int(i64::from(i)),
        ValueRef::SmallInt(i) => Scalar::Int(i64::from(i)),
        ValueRef::Int(i) => Scalar::Int(i64::from(i)),
        ValueRef::BigInt(i) => Scalar::Int(i),
        ValueRef::HugeInt(i) => i64::try_from(i)
            .map(Scalar::Int)
            .unwrap_or(Scalar::Float(i as f64)),
        ValueRef::UTinyInt(i) => Scalar::Int(i64::from(i)),
        ValueRef::USmallInt(i) => Scalar::Int(i64::from(i)),
        ValueRef::UInt(i) => Scalar::Int(i64::from(i)),
        ValueRef::UBigInt(i) => i64::try_from(i)
            .map(Scalar::Int)
            .unwrap_or(Scalar::Float(i as f64)),
        ValueRef::Float(f) => Scalar::Float(f64::from(f)),
        ValueRef::Double(f) => Scalar::Float(f),
        ValueRef::Decimal(d) => {
            let text = d.to_string();
            text.parse::<f64>()
                .map(Scalar::Float)
                .unwrap_or(Scalar::Text(text))
        }
        ValueRef::Text(s) => Scalar::Text(String::from_utf8_lossy(s).into_owned()),
        _ => Scalar::Text("<unknown>".to_string()),
    }
}

/// Turn loaded values into a typed column.
///
/// Integer columns with NULLs become floats with NaN, boolean columns with
/// NULLs become generic, and a column with no value at all is a float column
/// of NaN.
pub fn build_column(kind: ColumnKind, values: Vec<Scalar>) -> Column {
    let total = values.len();
    let missing = values.iter().filter(|v| v.is_missing()).count();
    if total > 0 && missing == total {
        return Column::Float(vec![f64::NAN; total]);
    }

    match kind {
        ColumnKind::Bool if missing == 0 => {
            let bools: Option<Vec<bool>> = values
                .iter()
                .map(|v| match v {
                    Scalar::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            bools.map(Column::Bool).unwrap_or(Column::Object(values))
        }
        ColumnKind::Int if missing == 0 => {
            let ints: Option<Vec<i64>> = values
                .iter()
                .map(|v| match v {
                    Scalar::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();
            match ints {
                Some(ints) => Column::Int(ints),
                None => to_float_column(&values),
            }
        }
        ColumnKind::Int | ColumnKind::Float => to_float_column(&values),
        ColumnKind::Bool | ColumnKind::Object => Column::Object(values),
    }
}

fn to_float_column(values: &[Scalar]) -> Column {
    Column::Float(
        values
            .iter()
            .map(|v| v.as_f64().unwrap_or(f64::NAN))
            .collect(),
    )
}

fn escape_literal(s: &str) -> String {
    s.replace('\'', "''")
}

fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
