mod errors;
mod parameters;
mod profiler;
mod simple;
mod types;

use crate::{
    errors::errors, parameters::parameters, profiler::profiler, simple::simple, types::types,
};
use log::LevelFilter;
use slate::{Parameters, ProfilerAware, Result, RowLabeled, Statement};
use std::env;

#[doc(hidden)]
pub use log;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run the whole suite, `create` must return a statement on a live connection
/// with the given sql already set.
pub async fn execute_tests<S, F>(mut create: F)
where
    S: Statement + ProfilerAware,
    S::Result: IntoIterator<Item = RowLabeled>,
    F: AsyncFnMut(String) -> Result<S>,
{
    simple(&mut create).await;
    types(&mut create).await;
    parameters(&mut create).await;
    errors(&mut create).await;
    profiler(&mut create).await;
}

/// Create a statement for `sql` and execute it once.
pub(crate) async fn execute<S, F>(
    create: &mut F,
    sql: &str,
    parameters: Option<Parameters>,
) -> Result<S::Result>
where
    S: Statement,
    F: AsyncFnMut(String) -> Result<S>,
{
    let mut statement = create(sql.to_string()).await?;
    statement.execute(parameters).await
}

/// Run the code with the logger disabled, evaluates to the value of the code.
#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = $crate::log::max_level();
        $crate::log::set_max_level($crate::log::LevelFilter::Off);
        let result = { $($code)+ };
        $crate::log::set_max_level(level);
        result
    }};
}
