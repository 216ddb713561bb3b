use std::collections::BTreeSet;
use std::path::PathBuf;

use rusqlite::Connection;
use tracing::debug;

use super::store::{CandidateStore, StoreError};
use crate::scoring::{Datatype, RawCandidate};

/// Candidate store backed by an EPPO Bayer SQLite dump.
///
/// Matches tokens as substrings against active name records (`t_codes` joined
/// with `t_names`, both `status = 'A'`). Each lookup opens a fresh read-only
/// connection inside `spawn_blocking`; lookups are infrequent enough that
/// connection pooling would buy nothing.
#[derive(Debug, Clone)]
pub struct SqliteCandidateStore {
    path: PathBuf,
}

impl SqliteCandidateStore {
    /// Creates a store for the database at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the database path.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn query_rows(path: &PathBuf, tokens: &[String]) -> Result<Vec<RawCandidate>, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        )
        .map_err(|e| StoreError::OpenFailed {
            message: e.to_string(),
        })?;

        let placeholders = tokens
            .iter()
            .map(|_| "n.fullname LIKE ?")
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT DISTINCT c.eppocode, c.dtcode, n.fullname \
             FROM t_codes c \
             JOIN t_names n ON c.codeid = n.codeid \
             WHERE c.status = 'A' AND n.status = 'A' AND ({placeholders})"
        );
        let patterns: Vec<String> = tokens.iter().map(|t| format!("%{t}%")).collect();

        let mut stmt = conn.prepare(&sql).map_err(|e| StoreError::QueryFailed {
            message: e.to_string(),
        })?;

        let rows = stmt
            .query_map(rusqlite::params_from_iter(patterns.iter()), |row| {
                let eppocode: String = row.get(0)?;
                let dtcode: String = row.get(1)?;
                let fullname: String = row.get(2)?;
                Ok(RawCandidate::new(
                    eppocode,
                    Datatype::from_code(&dtcode),
                    fullname,
                ))
            })
            .map_err(|e| StoreError::QueryFailed {
                message: e.to_string(),
            })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::QueryFailed {
                message: e.to_string(),
            })?;

        Ok(rows)
    }
}

impl CandidateStore for SqliteCandidateStore {
    async fn lookup(&self, tokens: &BTreeSet<String>) -> Result<Vec<RawCandidate>, StoreError> {
        if tokens.is_empty() {
            return Ok(Vec::new());
        }
        if !self.path.exists() {
            return Err(StoreError::DatabaseNotFound {
                path: self.path.clone(),
            });
        }

        let path = self.path.clone();
        let tokens: Vec<String> = tokens.iter().cloned().collect();

        let rows = tokio::task::spawn_blocking(move || Self::query_rows(&path, &tokens))
            .await
            .map_err(|e| StoreError::TaskFailed {
                message: e.to_string(),
            })??;

        debug!(rows = rows.len(), "SQLite candidate lookup complete");
        Ok(rows)
    }
}
