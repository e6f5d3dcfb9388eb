use crate::Value;
use std::{future::Future, sync::Arc};
use tokio::sync::Mutex;

/// Connection shared by the statements that run on it.
///
/// The backend protocols are request/response: a statement holds the lock for
/// the whole native call, including the read of the last error message.
pub type SharedConnection<C> = Arc<Mutex<C>>;

/// The native client operations a statement is built upon.
///
/// Failures are signaled by returning `None`, the message of the failure is
/// then available through [`NativeConnection::last_error`] until the next
/// operation.
pub trait NativeConnection: Send {
    /// Backend handle of a prepared statement.
    type Handle: Clone + Send + Sync;
    /// Backend result of an execution, consumed exactly once by the driver.
    type NativeResult: Send;

    /// Prepare `sql` on the server under the given name.
    fn prepare_named(
        &mut self,
        name: &str,
        sql: &str,
    ) -> impl Future<Output = Option<Self::Handle>> + Send;

    /// Execute the statement previously prepared under `name`, binding `parameters` by position.
    fn execute_named(
        &mut self,
        name: &str,
        parameters: Vec<Value>,
    ) -> impl Future<Output = Option<Self::NativeResult>> + Send;

    /// Message of the last failure reported by the backend.
    fn last_error(&self) -> Option<String>;

    /// True when the link to the server is gone.
    fn is_closed(&self) -> bool;

    fn shared(self) -> SharedConnection<Self>
    where
        Self: Sized,
    {
        Arc::new(Mutex::new(self))
    }
}
