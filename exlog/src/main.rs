//! Render error descriptions from the command line.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use exception_format::Exception;
use log::{debug, trace};

use cli::{Cli, Command, Error, RenderArgs};
use exlog::config::Config;
use exlog::logging;

mod cli;

fn main() -> ExitCode {
   let cli = Cli::parse();

   let config = match load_config(&cli) {
      Ok(config) => config,
      Err(e) => return fail(&e, &Config::default()),
   };

   match run(cli, &config) {
      Ok(()) => ExitCode::SUCCESS,
      Err(e) => fail(&e, &config),
   }
}

fn load_config(cli: &Cli) -> Result<Config, Error> {
   let cwd = std::env::current_dir().map_err(|source| Error::CurrentDir { source })?;
   Ok(Config::discover(cli.config.as_deref(), &cwd)?)
}

fn fail(error: &Error, config: &Config) -> ExitCode {
   eprint!("{}", logging::report(error, "exlog failed", &config.renderer()));
   ExitCode::FAILURE
}

fn run(cli: Cli, config: &Config) -> Result<(), Error> {
   logging::init(config.log_level)?;
   debug!("settings: {config:?}");

   match cli.command {
      Command::Render(args) => render(&args, config, &mut std::io::stdout().lock()),
      Command::Completions => Cli::completions(),
   }
}

/// Print the rendered error to `out`, or send it to the logger with `--log`.
fn render(args: &RenderArgs, config: &Config, out: &mut impl Write) -> Result<(), Error> {
   let data = std::fs::read_to_string(&args.file).map_err(|source| Error::ReadInput {
      path: args.file.clone(),
      source,
   })?;

   // YAML is a superset of JSON, so this covers both.
   let exception: Exception =
      serde_yaml::from_str(&data).map_err(|source| Error::ParseInput {
         path: args.file.clone(),
         source,
      })?;
   trace!("loaded {}: {exception}", args.file.display());

   let renderer = args.renderer(config);
   if args.log {
      logging::log_error(&exception, &args.header, &renderer);
      return Ok(());
   }

   let rendered = renderer.render(Some(&exception), &args.header);
   out.write_all(rendered.as_bytes())
      .map_err(|source| Error::WriteOutput { source })
}
