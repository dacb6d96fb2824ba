//! Relation verifier

use crate::errors::{PipelineError, Result};
use crate::store::RelationHandle;
use rusqlite::OptionalExtension;
use tracing::{info, warn};

/// Confirm the handle's relation exists and holds rows, returning the row count
pub fn verify(handle: &RelationHandle) -> Result<u64> {
    let relation = handle.relation();
    let conn = handle.connection();
    let query_err = |e: rusqlite::Error| PipelineError::Load {
        path: handle.store_path().display().to_string(),
        reason: e.to_string(),
    };

    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [relation],
            |row| row.get(0),
        )
        .optional()
        .map_err(query_err)?;

    if found.is_none() {
        return Err(PipelineError::MissingRelation(relation.to_string()));
    }

    let rows: i64 = conn
        .query_row(
            &format!("SELECT COUNT(*) FROM \"{}\"", relation.replace('"', "\"\"")),
            [],
            |row| row.get(0),
        )
        .map_err(query_err)?;

    info!(relation, rows, "Number of rows in '{}'", relation);

    if rows == 0 {
        warn!(relation, "Relation is empty");
        return Err(PipelineError::EmptyRelation(relation.to_string()));
    }

    Ok(rows as u64)
}
