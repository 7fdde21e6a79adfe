//! Turn Rust errors into [`Exception`]s so they can be rendered.
//!
//! `std::error::Error` knows nothing about type names or result codes, so
//! some of this is best effort:
//!
//! - The outermost error is named after its static type. Anything reached via
//!   `source()` is only known as a trait object, so it is named after the
//!   handful of types recognized by downcasting, or [`UNNAMED_SOURCE`].
//! - `std::io::Error`s carrying an OS error number get the matching Win32
//!   HRESULT. Everything else gets [`hresult::E_FAIL`].
//! - An [`Exception`] found anywhere in the chain is copied whole, aggregates
//!   and all, and ends the walk.

use std::backtrace::BacktraceStatus;
use std::collections::HashSet;
use std::error::Error as StdError;

use exception_format::{hresult, Exception};

pub const UNNAMED_SOURCE: &str = "dyn core::error::Error";

/// Capture `error` and its `source()` chain.
///
/// `max_depth` should match the [`Renderer`](exception_format::Renderer) the
/// result is headed for. The walk keeps one source past it, so the renderer can
/// still say that the rest was left out. `None` walks the whole chain.
pub fn from_error<E>(error: &E, max_depth: Option<usize>) -> Exception
where
   E: StdError + 'static,
{
   let error: &(dyn StdError + 'static) = error;
   if let Some(exception) = error.downcast_ref::<Exception>() {
      return exception.clone();
   }

   let type_name = known_type_name(error).unwrap_or_else(std::any::type_name::<E>);
   let root = Exception::new(type_name, error.to_string()).with_hresult(result_code(error));
   with_sources(root, error, max_depth)
}

/// Capture `error` and its `source()` chain when the concrete type is unknown.
pub fn from_dyn(error: &(dyn StdError + 'static), max_depth: Option<usize>) -> Exception {
   match error.downcast_ref::<Exception>() {
      Some(exception) => exception.clone(),
      None => with_sources(describe(error), error, max_depth),
   }
}

/// Capture an `anyhow::Error`, including its backtrace if one was captured.
pub fn from_anyhow(error: &anyhow::Error, max_depth: Option<usize>) -> Exception {
   let root: &(dyn StdError + 'static) = error.as_ref();

   let mut exception =
      Exception::new("anyhow::Error", root.to_string()).with_hresult(result_code(root));

   let backtrace = error.backtrace();
   if backtrace.status() == BacktraceStatus::Captured {
      exception = exception.with_stack_trace(backtrace.to_string());
   }

   with_sources(exception, root, max_depth)
}

fn with_sources(
   root: Exception,
   error: &(dyn StdError + 'static),
   max_depth: Option<usize>,
) -> Exception {
   let mut seen: HashSet<*const (dyn StdError + 'static)> = HashSet::from([error as *const _]);
   let mut sources = Vec::new();
   let mut next = error.source();
   while let Some(source) = next {
      // A source chain which loops back on itself ends at the repeat.
      if !seen.insert(source) {
         break;
      }

      if let Some(exception) = source.downcast_ref::<Exception>() {
         sources.push(exception.clone());
         break;
      }

      sources.push(describe(source));
      if max_depth.is_some_and(|max_depth| sources.len() > max_depth) {
         break;
      }

      next = source.source();
   }

   let causes = sources
      .into_iter()
      .rev()
      .reduce(|cause, error| error.caused_by(cause));

   match causes {
      Some(cause) => root.caused_by(cause),
      None => root,
   }
}

fn describe(error: &(dyn StdError + 'static)) -> Exception {
   let type_name = known_type_name(error).unwrap_or(UNNAMED_SOURCE);
   Exception::new(type_name, error.to_string()).with_hresult(result_code(error))
}

// `type_name` would report these by their defining module (`std::io::error::Error`)
// rather than the path people write.
fn known_type_name(error: &(dyn StdError + 'static)) -> Option<&'static str> {
   if error.is::<std::io::Error>() {
      Some("std::io::Error")
   } else if error.is::<std::fmt::Error>() {
      Some("std::fmt::Error")
   } else if error.is::<std::num::ParseIntError>() {
      Some("std::num::ParseIntError")
   } else if error.is::<std::str::Utf8Error>() {
      Some("std::str::Utf8Error")
   } else {
      None
   }
}

fn result_code(error: &(dyn StdError + 'static)) -> i32 {
   error
      .downcast_ref::<std::io::Error>()
      .and_then(std::io::Error::raw_os_error)
      .map(hresult::from_win32)
      .unwrap_or(hresult::E_FAIL)
}
