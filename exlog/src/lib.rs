//! Glue between Rust programs and [`exception_format`]: capturing Rust errors,
//! loading render settings, and sending rendered errors to the log.

pub mod capture;
pub mod config;
pub mod logging;
