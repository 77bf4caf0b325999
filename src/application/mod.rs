//! # Application Layer
//!
//! The connector registry and the trait seams it dispatches through.

pub mod interfaces;
pub mod registry;

pub use interfaces::*;
pub use registry::*;
