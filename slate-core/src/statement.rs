use crate::{ParameterContainer, Profiler, Result, ResultSet, Value};
use std::{
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

static STATEMENT_INDEX: AtomicU64 = AtomicU64::new(0);

/// Fresh server side statement name: `statement1`, `statement2`, ...
///
/// The counter is process wide, it is never reset and never reuses a name,
/// even across different connections.
pub fn next_statement_name() -> String {
    format!(
        "statement{}",
        STATEMENT_INDEX.fetch_add(1, Ordering::Relaxed) + 1
    )
}

/// Parameters handed to [`Statement::execute`].
#[derive(Debug, Clone, PartialEq)]
pub enum Parameters {
    Container(ParameterContainer),
    /// Values bound by position.
    Positional(Vec<Value>),
    /// `(name, value)` pairs, bound in the given order.
    Named(Vec<(String, Value)>),
}

impl From<ParameterContainer> for Parameters {
    fn from(value: ParameterContainer) -> Self {
        Parameters::Container(value)
    }
}

impl From<Vec<Value>> for Parameters {
    fn from(value: Vec<Value>) -> Self {
        Parameters::Positional(value)
    }
}

impl From<Vec<(String, Value)>> for Parameters {
    fn from(value: Vec<(String, Value)>) -> Self {
        Parameters::Named(value)
    }
}

impl From<Vec<(&str, Value)>> for Parameters {
    fn from(value: Vec<(&str, Value)>) -> Self {
        Parameters::Named(value.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Read access to what a statement is about to run, this is what a
/// [`Profiler`] gets to see.
pub trait StatementContainer {
    fn sql(&self) -> &str;
    fn parameter_container(&self) -> Option<&ParameterContainer>;
}

/// The portable prepared statement contract.
///
/// Lifecycle: a statement starts unprepared, `prepare` (or the first
/// `execute`) moves it to prepared. Preparing again allocates a new server
/// side statement. Each `execute` produces one result.
///
/// Setters return `&mut Self` for fluent chaining:
/// ```rust,ignore
/// statement.set_sql("SELECT * FROM t WHERE a = $#").prepare(None).await?;
/// ```
pub trait Statement: StatementContainer + Send {
    type Result: ResultSet;

    fn set_sql(&mut self, sql: impl Into<String>) -> &mut Self;

    fn set_parameter_container(&mut self, container: ParameterContainer) -> &mut Self;

    /// Prepare `sql`, or the current sql when `None`.
    fn prepare(&mut self, sql: Option<&str>) -> impl Future<Output = Result<()>> + Send;

    fn is_prepared(&self) -> bool;

    /// Execute, preparing first if needed.
    ///
    /// When the attached parameter container is not empty, its positional
    /// values are the ones bound, raw `parameters` are loaded into it first.
    fn execute(
        &mut self,
        parameters: Option<Parameters>,
    ) -> impl Future<Output = Result<Self::Result>> + Send;
}

/// Statements that can report to a [`Profiler`].
pub trait ProfilerAware {
    fn set_profiler(&mut self, profiler: Arc<dyn Profiler>) -> &mut Self;
    fn profiler(&self) -> Option<&Arc<dyn Profiler>>;
}
