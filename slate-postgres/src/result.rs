use slate_core::{ResultSet, RowLabeled, RowNames};
use std::{slice, vec};

/// What the server sent back for one execution, before decoding.
pub struct PostgresNativeResult {
    pub(crate) labels: RowNames,
    pub(crate) rows: Vec<tokio_postgres::Row>,
    pub(crate) rows_affected: u64,
}

/// Decoded result of a statement execution.
#[derive(Debug, Clone, Default)]
pub struct PostgresResult {
    labels: RowNames,
    rows: Vec<RowLabeled>,
    rows_affected: u64,
}

impl PostgresResult {
    pub fn new(labels: RowNames, rows: Vec<RowLabeled>, rows_affected: u64) -> Self {
        Self {
            labels,
            rows,
            rows_affected,
        }
    }
    pub fn columns(&self) -> &[String] {
        &self.labels
    }
    pub fn rows(&self) -> &[RowLabeled] {
        &self.rows
    }
    pub fn get(&self, index: usize) -> Option<&RowLabeled> {
        self.rows.get(index)
    }
    pub fn iter(&self) -> slice::Iter<'_, RowLabeled> {
        self.rows.iter()
    }
}

impl ResultSet for PostgresResult {
    fn count(&self) -> usize {
        self.rows.len()
    }
    fn field_count(&self) -> usize {
        self.labels.len()
    }
    fn affected_rows(&self) -> u64 {
        self.rows_affected
    }
}

impl IntoIterator for PostgresResult {
    type Item = RowLabeled;
    type IntoIter = vec::IntoIter<RowLabeled>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl<'a> IntoIterator for &'a PostgresResult {
    type Item = &'a RowLabeled;
    type IntoIter = slice::Iter<'a, RowLabeled>;
    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
