//! # Domain Layer
//!
//! Core models and error types for datasource dispatch.
//! This layer is independent of any concrete connector or storage backend.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
