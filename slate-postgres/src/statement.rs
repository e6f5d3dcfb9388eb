use crate::PostgresDriver;
use slate_core::{
    Driver, Error, NativeConnection, ParameterContainer, Parameters, Profiler, ProfilerAware,
    Result, SharedConnection, Statement, StatementContainer, StatementError, Value,
    next_statement_name, rewrite_positional_placeholders, truncate_long,
};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

type Handle<D> = <<D as Driver>::Connection as NativeConnection>::Handle;

/// Server side prepared statement with a generated name.
///
/// Queries use the generic positional placeholder `$#`, which is numbered
/// into `$1`, `$2`, ... when preparing. The connection is shared, never owned:
/// the statement locks it for the duration of each native call.
///
/// ```rust,ignore
/// let mut statement = PostgresStatement::new(PostgresDriver::new());
/// statement
///     .initialize(connection.clone())
///     .await?
///     .set_sql("SELECT * FROM users WHERE id = $# AND active = $#");
/// let result = statement.execute(Some(vec![1i32.as_value(), true.as_value()].into())).await?;
/// ```
pub struct PostgresStatement<D: Driver = PostgresDriver> {
    pub(crate) driver: D,
    pub(crate) connection: Option<SharedConnection<D::Connection>>,
    pub(crate) profiler: Option<Arc<dyn Profiler>>,
    pub(crate) sql: String,
    pub(crate) statement_name: String,
    pub(crate) prepared: Option<Handle<D>>,
    pub(crate) parameter_container: Option<ParameterContainer>,
}

impl<D: Driver> PostgresStatement<D> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            connection: None,
            profiler: None,
            sql: Default::default(),
            statement_name: Default::default(),
            prepared: None,
            parameter_container: None,
        }
    }

    /// Attach the connection after checking it is still open.
    pub async fn initialize(
        &mut self,
        connection: SharedConnection<D::Connection>,
    ) -> Result<&mut Self> {
        if connection.lock().await.is_closed() {
            let error = Error::new(StatementError::Configuration(format!(
                "the {} connection is closed",
                D::NAME
            )));
            log::error!("{:#}", error);
            return Err(error);
        }
        self.connection = Some(connection);
        Ok(self)
    }

    pub fn set_connection(&mut self, connection: SharedConnection<D::Connection>) -> &mut Self {
        self.connection = Some(connection);
        self
    }

    pub fn connection(&self) -> Option<&SharedConnection<D::Connection>> {
        self.connection.as_ref()
    }

    pub fn set_driver(&mut self, driver: D) -> &mut Self {
        self.driver = driver;
        self
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Server side name, empty until the first preparation.
    pub fn statement_name(&self) -> &str {
        &self.statement_name
    }

    /// Native handle of the prepared statement.
    pub fn resource(&self) -> Option<&Handle<D>> {
        self.prepared.as_ref()
    }

    fn require_connection(&self) -> Result<SharedConnection<D::Connection>> {
        self.connection.clone().ok_or_else(|| {
            let error = Error::new(StatementError::Configuration(format!(
                "no {} connection was provided to the statement",
                D::NAME
            )));
            log::error!("{:#}", error);
            error
        })
    }

    /// Merge `parameters` with the attached container and return the values to bind.
    fn resolve_arguments(&mut self, parameters: Option<Parameters>) -> Vec<Value> {
        let parameters = match parameters {
            Some(Parameters::Container(container)) if self.parameter_container.is_none() => {
                self.parameter_container = Some(container);
                None
            }
            parameters => parameters,
        };
        let container = self.parameter_container.get_or_insert_with(Default::default);
        let mut arguments = match parameters {
            Some(Parameters::Positional(values)) => {
                container.set_from_values(values.iter().cloned());
                values
            }
            Some(Parameters::Named(values)) => {
                container.set_from_array(values.iter().cloned());
                values.into_iter().map(|(_, v)| v).collect()
            }
            Some(Parameters::Container(container)) => container.positional_array(),
            None => Vec::new(),
        };
        if !container.is_empty() {
            arguments = container.positional_array();
        }
        arguments
    }
}

impl<D: Driver> StatementContainer for PostgresStatement<D> {
    fn sql(&self) -> &str {
        &self.sql
    }
    fn parameter_container(&self) -> Option<&ParameterContainer> {
        self.parameter_container.as_ref()
    }
}

impl<D: Driver> Statement for PostgresStatement<D> {
    type Result = D::Result;

    /// Replace the query, a different text discards the prepared statement.
    fn set_sql(&mut self, sql: impl Into<String>) -> &mut Self {
        let sql = sql.into();
        if sql != self.sql {
            self.prepared = None;
        }
        self.sql = sql;
        self
    }

    fn set_parameter_container(&mut self, container: ParameterContainer) -> &mut Self {
        self.parameter_container = Some(container);
        self
    }

    async fn prepare(&mut self, sql: Option<&str>) -> Result<()> {
        let connection = self.require_connection()?;
        let sql = match sql {
            Some(sql) if !sql.is_empty() => sql,
            _ => self.sql.as_str(),
        };
        self.sql = rewrite_positional_placeholders(sql);
        self.statement_name = next_statement_name();
        self.prepared = None;
        let mut connection = connection.lock().await;
        log::debug!(
            "Preparing `{}`:\n{}",
            self.statement_name,
            truncate_long!(self.sql)
        );
        match connection.prepare_named(&self.statement_name, &self.sql).await {
            Some(handle) => {
                self.prepared = Some(handle);
                Ok(())
            }
            None => {
                let error = Error::new(StatementError::QueryPreparation(
                    connection.last_error().unwrap_or_default(),
                ))
                .context(format!(
                    "While preparing the statement `{}`:\n{}",
                    self.statement_name,
                    truncate_long!(self.sql)
                ));
                log::error!("{:#}", error);
                Err(error)
            }
        }
    }

    fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }

    async fn execute(&mut self, parameters: Option<Parameters>) -> Result<D::Result> {
        if !self.is_prepared() {
            self.prepare(None).await?;
        }
        let arguments = self.resolve_arguments(parameters);
        let connection = self.require_connection()?;
        let mut connection = connection.lock().await;
        log::debug!(
            "Executing `{}` with {} parameters",
            self.statement_name,
            arguments.len()
        );
        if let Some(profiler) = &self.profiler {
            profiler.profiler_start(&*self);
        }
        let result = connection
            .execute_named(&self.statement_name, arguments)
            .await;
        if let Some(profiler) = &self.profiler {
            profiler.profiler_finish();
        }
        let Some(result) = result else {
            let error = Error::new(StatementError::QueryExecution(
                connection.last_error().unwrap_or_default(),
            ))
            .context(format!(
                "While executing the statement `{}`:\n{}",
                self.statement_name,
                truncate_long!(self.sql)
            ));
            log::error!("{:#}", error);
            return Err(error);
        };
        drop(connection);
        self.driver.create_result(result)
    }
}

impl<D: Driver> ProfilerAware for PostgresStatement<D> {
    fn set_profiler(&mut self, profiler: Arc<dyn Profiler>) -> &mut Self {
        self.profiler = Some(profiler);
        self
    }
    fn profiler(&self) -> Option<&Arc<dyn Profiler>> {
        self.profiler.as_ref()
    }
}

impl<D: Driver> Display for PostgresStatement<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.statement_name.is_empty() {
            write!(f, "{}", truncate_long!(self.sql))
        } else {
            write!(f, "{}: {}", self.statement_name, truncate_long!(self.sql))
        }
    }
}
