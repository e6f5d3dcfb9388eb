mod as_value;
mod connection;
mod driver;
mod error;
mod parameter_container;
mod profiler;
mod result;
mod statement;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use connection::*;
pub use driver::*;
pub use error::*;
pub use parameter_container::*;
pub use profiler::*;
pub use result::*;
pub use statement::*;
pub use util::*;
pub use value::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
