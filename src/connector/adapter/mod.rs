mod in_memory_session;
mod stream_connector;
mod table_connector;

pub use in_memory_session::*;
pub use stream_connector::*;
pub use table_connector::*;
