//! # Connector Layer
//!
//! Concrete implementations behind the application interfaces:
//! - Datasource connectors (SQL tables, streams)
//! - An in-memory session for tests and embedded use
//! - The catalog that assembles a registry from startup configuration

pub mod adapter;
pub mod catalog;

pub use adapter::*;
pub use catalog::*;
