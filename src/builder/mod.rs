//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder, the serde-backed configuration it
//! consumes and a macro for declaring `static` state hierarchies with
//! minimal boilerplate.

pub mod config;
pub mod machine;
pub mod macros;

pub use config::HsmConfig;
pub use machine::HsmBuilder;
