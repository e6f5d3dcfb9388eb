use crate::{NativeConnection, Result, ResultSet};

/// How a backend addresses the parameters of a prepared statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrepareType {
    Positional,
    Named,
}

pub trait Driver: Send + Sync {
    type Connection: NativeConnection;
    type Result: ResultSet;

    const NAME: &'static str;

    /// Wrap the native result of an execution into the portable result.
    fn create_result(
        &self,
        native: <Self::Connection as NativeConnection>::NativeResult,
    ) -> Result<Self::Result>;

    fn prepare_type(&self) -> PrepareType {
        PrepareType::Positional
    }

    /// Placeholder to write in the query for the parameter `name`.
    fn format_parameter_name(&self, name: &str) -> String;
}
