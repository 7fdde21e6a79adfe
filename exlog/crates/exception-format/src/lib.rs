//! Render an error, along with everything that caused it, as an indented block
//! of text suitable for a single log record.
//!
//! The output for an error with one cause looks like this (with `\n` as the
//! line separator):
//!
//! ```text
//! Could not restart the monitored process
//! monitor::RestartError: the process has already exited
//! HRESULT: 0x80004005
//!    at monitor::restart (src/monitor.rs:88)
//! 	std::io::Error: Access is denied. (os error 5)
//! 	HRESULT: 0x80070005
//! ```
//!
//! Two shapes of error are understood:
//!
//! - *chains*, where each error has at most one cause, rendered one indent
//!   level deeper per hop;
//! - *aggregates*, where an error contains several independent failures, each
//!   rendered as its own chain one level below the aggregate.
//!
//! Anything that implements [`ErrorNode`] can be rendered. [`Exception`] is an
//! owned implementation for callers without an error graph of their own.

mod exception;
pub mod hresult;
pub mod lines;
mod node;
mod render;

pub use exception::{Exception, Inner};
pub use node::ErrorNode;
pub use render::{render, render_with_header, Renderer, DEFAULT_MAX_DEPTH};
