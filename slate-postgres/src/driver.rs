use crate::{
    PostgresConnection, PostgresNativeResult, PostgresResult, PostgresStatement,
    util::row_to_slate_row,
};
use slate_core::{
    Driver, POSITIONAL_PLACEHOLDER, PrepareType, Profiler, ProfilerAware, Result, RowLabeled,
    SharedConnection, Statement,
};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct PostgresDriver {
    pub(crate) profiler: Option<Arc<dyn Profiler>>,
}

impl PostgresDriver {
    pub const fn new() -> Self {
        Self { profiler: None }
    }

    /// Create a statement running on `connection`, it will report to the profiler of this driver.
    pub async fn create_statement(
        &self,
        connection: SharedConnection<PostgresConnection>,
        sql: impl Into<String>,
    ) -> Result<PostgresStatement> {
        let mut statement = PostgresStatement::new(self.clone());
        if let Some(profiler) = &self.profiler {
            statement.set_profiler(profiler.clone());
        }
        statement.initialize(connection).await?.set_sql(sql);
        Ok(statement)
    }
}

impl ProfilerAware for PostgresDriver {
    fn set_profiler(&mut self, profiler: Arc<dyn Profiler>) -> &mut Self {
        self.profiler = Some(profiler);
        self
    }
    fn profiler(&self) -> Option<&Arc<dyn Profiler>> {
        self.profiler.as_ref()
    }
}

impl Driver for PostgresDriver {
    type Connection = PostgresConnection;
    type Result = PostgresResult;

    const NAME: &'static str = "postgres";

    fn create_result(&self, native: PostgresNativeResult) -> Result<PostgresResult> {
        let rows = native
            .rows
            .into_iter()
            .map(|row| {
                Ok(RowLabeled::new(
                    native.labels.clone(),
                    row_to_slate_row(row)?,
                ))
            })
            .collect::<Result<Vec<_>>>()
            .map_err(|e| {
                log::error!("{:#}", e);
                e
            })?;
        Ok(PostgresResult::new(native.labels, rows, native.rows_affected))
    }

    fn prepare_type(&self) -> PrepareType {
        PrepareType::Positional
    }

    fn format_parameter_name(&self, _name: &str) -> String {
        POSITIONAL_PLACEHOLDER.into()
    }
}
