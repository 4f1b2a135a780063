//! Configuration module
//!
//! Grid options, formatting settings and column definitions read from a
//! TOML file.

pub mod config;

pub use config::{ColumnSpec, Config};
