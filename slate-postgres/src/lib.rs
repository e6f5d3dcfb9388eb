mod connection;
mod driver;
mod result;
mod statement;
mod util;
mod value_holder;

pub use connection::*;
pub use driver::*;
pub use result::*;
pub use statement::*;
pub(crate) use value_holder::*;
