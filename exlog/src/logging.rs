use std::error::Error as StdError;

use exception_format::{ErrorNode, Renderer};
use log::{Level, LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode};

use crate::capture;

/// Send log records to stderr, keeping stdout free for rendered output.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
   let config = ConfigBuilder::new()
      .set_target_level(LevelFilter::Off)
      .set_thread_level(LevelFilter::Off)
      .build();

   TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)
}

/// Render `error` and emit it as a single log record at `level`.
pub fn log_exception(level: Level, error: &dyn ErrorNode, header: &str, renderer: &Renderer) {
   if !log::log_enabled!(level) {
      return;
   }

   let rendered = renderer.render(Some(error), header);
   log::log!(level, "{}", for_record(&rendered, renderer));
}

pub fn log_error(error: &dyn ErrorNode, header: &str, renderer: &Renderer) {
   log_exception(Level::Error, error, header, renderer);
}

/// Capture a Rust error and render it, for places which print rather than log.
pub fn report<E>(error: &E, header: &str, renderer: &Renderer) -> String
where
   E: StdError + 'static,
{
   let exception = capture::from_error(error, renderer.max_depth());
   renderer.render(Some(&exception), header)
}

// The logger terminates every record itself.
fn for_record<'r>(rendered: &'r str, renderer: &Renderer) -> &'r str {
   rendered
      .strip_suffix(renderer.line_separator())
      .unwrap_or(rendered)
}
