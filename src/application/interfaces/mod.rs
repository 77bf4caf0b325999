mod connector;
mod session;

pub use connector::*;
pub use session::*;
