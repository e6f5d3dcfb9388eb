use crate::Value;
use std::sync::Arc;

/// Portable view of the outcome of an executed statement.
pub trait ResultSet {
    /// Number of rows returned.
    fn count(&self) -> usize;
    /// Number of columns returned.
    fn field_count(&self) -> usize;
    /// Rows inserted, updated or deleted.
    fn affected_rows(&self) -> u64;
    /// True when the statement returns rows (even zero of them).
    fn is_query_result(&self) -> bool {
        self.field_count() > 0
    }
    /// Value generated by the backend for the last inserted row, when available.
    fn generated_value(&self) -> Option<&Value> {
        None
    }
}

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone, PartialEq)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(names: RowNames, values: Row) -> Self {
        Self {
            labels: names,
            values,
        }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values()[i])
    }
}

impl From<RowLabeled> for Row {
    fn from(value: RowLabeled) -> Self {
        value.values
    }
}
