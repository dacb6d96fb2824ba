//! Local relational store
//!
//! The tabular loader fills the `patients` relation from a delimited file
//! and the verifier confirms it is usable for training before any
//! platform call is made.

pub mod loader;
pub mod verifier;

pub use loader::{load, ColumnAffinity, Table};
pub use verifier::verify;

use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Relation the training query reads from
pub const PATIENTS_RELATION: &str = "patients";

/// Open connection to a store plus the relation that was loaded into it
#[derive(Debug)]
pub struct RelationHandle {
    conn: Connection,
    store_path: PathBuf,
    relation: String,
}

impl RelationHandle {
    pub fn new(conn: Connection, store_path: PathBuf, relation: &str) -> Self {
        Self {
            conn,
            store_path,
            relation: relation.to_string(),
        }
    }

    /// Open an existing store without loading anything
    pub fn open(store_path: &Path, relation: &str) -> rusqlite::Result<Self> {
        let conn = Connection::open(store_path)?;
        Ok(Self::new(conn, store_path.to_path_buf(), relation))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// Close the underlying connection
    pub fn close(self) -> rusqlite::Result<()> {
        self.conn.close().map_err(|(_, e)| e)
    }
}
