//! Tabular loader
//!
//! Reads a delimited file with a header row and writes it into the
//! `patients` relation of a SQLite store. Loading always replaces the
//! relation wholesale; prior rows are discarded.

use crate::errors::{PipelineError, Result};
use crate::store::{RelationHandle, PATIENTS_RELATION};
use csv::StringRecord;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;
use tracing::{debug, info};

/// Storage class inferred for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAffinity {
    Integer,
    Real,
    Text,
}

impl ColumnAffinity {
    fn as_sql(&self) -> &'static str {
        match self {
            ColumnAffinity::Integer => "INTEGER",
            ColumnAffinity::Real => "REAL",
            ColumnAffinity::Text => "TEXT",
        }
    }

    /// Infer the affinity from every non-empty cell of a column
    pub fn infer<'a>(cells: impl Iterator<Item = &'a str>) -> Self {
        let mut affinity = ColumnAffinity::Integer;
        for cell in cells.map(str::trim).filter(|c| !c.is_empty()) {
            if affinity == ColumnAffinity::Integer && cell.parse::<i64>().is_err() {
                affinity = ColumnAffinity::Real;
            }
            if affinity == ColumnAffinity::Real && cell.parse::<f64>().is_err() {
                return ColumnAffinity::Text;
            }
        }
        affinity
    }

    fn to_value(self, cell: &str) -> Value {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        match self {
            ColumnAffinity::Integer => trimmed
                .parse()
                .map(Value::Integer)
                .unwrap_or_else(|_| Value::Text(cell.to_string())),
            ColumnAffinity::Real => trimmed
                .parse()
                .map(Value::Real)
                .unwrap_or_else(|_| Value::Text(cell.to_string())),
            ColumnAffinity::Text => Value::Text(cell.to_string()),
        }
    }
}

/// Parsed delimited file: header plus rows
#[derive(Debug)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl Table {
    /// Read a delimited file with a header row
    pub fn read(source_path: &Path) -> Result<Self> {
        let load_err = |reason: String| PipelineError::Load {
            path: source_path.display().to_string(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(source_path)
            .map_err(|e| load_err(e.to_string()))?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| load_err(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        if columns.is_empty() || columns.iter().all(String::is_empty) {
            return Err(load_err("missing header row".to_string()));
        }

        let rows = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| load_err(e.to_string()))?;

        Ok(Self { columns, rows })
    }

    pub fn affinities(&self) -> Vec<ColumnAffinity> {
        (0..self.columns.len())
            .map(|i| ColumnAffinity::infer(self.rows.iter().filter_map(|r| r.get(i))))
            .collect()
    }
}

/// Load `source_path` into the `patients` relation of the store at `store_path`
///
/// The store is created if absent. Any existing `patients` relation is
/// dropped and recreated inside one transaction.
pub fn load(source_path: &Path, store_path: &Path) -> Result<RelationHandle> {
    let table = Table::read(source_path)?;

    let store_err = |e: rusqlite::Error| PipelineError::Load {
        path: store_path.display().to_string(),
        reason: e.to_string(),
    };

    let mut conn = Connection::open(store_path).map_err(store_err)?;
    let rows = replace_relation(&mut conn, PATIENTS_RELATION, &table).map_err(store_err)?;

    info!(
        source = %source_path.display(),
        store = %store_path.display(),
        rows,
        "Loaded data into '{}'", PATIENTS_RELATION
    );

    Ok(RelationHandle::new(conn, store_path.to_path_buf(), PATIENTS_RELATION))
}

/// Drop and recreate `relation` from `table`, returning the number of rows written
pub fn replace_relation(
    conn: &mut Connection,
    relation: &str,
    table: &Table,
) -> rusqlite::Result<usize> {
    let affinities = table.affinities();
    let column_defs = table
        .columns
        .iter()
        .zip(&affinities)
        .map(|(name, affinity)| format!("{} {}", quote_ident(name), affinity.as_sql()))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; table.columns.len()].join(", ");

    let tx = conn.transaction()?;
    tx.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(relation)), [])?;
    tx.execute(
        &format!("CREATE TABLE {} ({})", quote_ident(relation), column_defs),
        [],
    )?;
    debug!(relation, columns = %column_defs, "Created relation");

    {
        let mut insert = tx.prepare(&format!(
            "INSERT INTO {} VALUES ({})",
            quote_ident(relation),
            placeholders
        ))?;
        for row in &table.rows {
            let values = row
                .iter()
                .zip(&affinities)
                .map(|(cell, affinity)| affinity.to_value(cell));
            insert.execute(params_from_iter(values))?;
        }
    }

    tx.commit()?;
    Ok(table.rows.len())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
