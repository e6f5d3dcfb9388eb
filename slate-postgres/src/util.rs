use crate::ValueHolder;
use slate_core::{Error, Row};

pub(crate) fn row_to_slate_row(row: tokio_postgres::Row) -> slate_core::Result<Row> {
    (0..row.len())
        .map(|i| match row.try_get::<_, ValueHolder>(i) {
            Ok(v) => Ok(v.0),
            Err(..) => {
                let col = &row.columns()[i];
                Err(Error::msg(format!(
                    "Could not deserialize column {} `{}`: {}",
                    i,
                    col.name(),
                    col.type_()
                )))
            }
        })
        .collect::<slate_core::Result<Row>>()
}

/// Message of a driver error: the server's own message when the server reported it.
pub(crate) fn error_message(error: &tokio_postgres::Error) -> String {
    match error.as_db_error() {
        Some(e) => format!("ERROR:  {}", e.message()),
        None => error.to_string(),
    }
}
