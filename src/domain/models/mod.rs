mod database;
mod datasource;
mod filter;

pub use database::*;
pub use datasource::*;
pub use filter::*;
