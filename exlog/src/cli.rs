use std::path::PathBuf;

use clap::{crate_version, Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate_to, shells::Fish};
use exception_format::Renderer;
use thiserror::Error;

use exlog::config::{self, Config};

#[derive(Parser, Debug)]
#[clap(
   name = "exlog",
   about = "Render errors and their causes the way the process monitor logs them",
   version = crate_version!()
)]
#[command(author, version, about, arg_required_else_help(true))]
pub struct Cli {
   #[command(subcommand)]
   pub command: Command,

   /// Settings file to use instead of `exlog.yaml` in the current directory.
   #[arg(long, global = true)]
   pub config: Option<PathBuf>,
}

impl Cli {
   pub(crate) fn completions() -> Result<(), Error> {
      let mut config_dir = dirs::home_dir().ok_or(Error::NoHomeDir)?;
      config_dir.extend([".config", "fish", "completions"]);
      let mut cmd = Self::command();
      generate_to(Fish, &mut cmd, "exlog", config_dir)
         .map(|_| ())
         .map_err(|source| Error::Completions { source })
   }
}

#[derive(Subcommand, Debug, PartialEq, Clone)]
pub enum Command {
   #[command(about = "Render an error described in a YAML or JSON file.")]
   Render(RenderArgs),

   #[command(about = "🐟 Install fish completions.")]
   Completions,
}

#[derive(Args, Debug, PartialEq, Clone)]
pub struct RenderArgs {
   /// The error description to render.
   pub file: PathBuf,

   /// First line of the output.
   #[arg(long, default_value = "Unhandled error")]
   pub header: String,

   /// Line separator; understands `\n`, `\r`, `\t` and `\\`.
   #[arg(long, value_parser = unescape)]
   pub separator: Option<String>,

   /// Number of tabs in front of the outermost error.
   #[arg(long)]
   pub indent: Option<usize>,

   /// How many causes deep to go before giving up.
   #[arg(long, conflicts_with = "unbounded")]
   pub max_depth: Option<usize>,

   /// Follow causes however deep they go.
   #[arg(long)]
   pub unbounded: bool,

   /// Emit through the logger at error level instead of printing.
   #[arg(long)]
   pub log: bool,
}

impl RenderArgs {
   /// Configured settings, overridden by whatever was given on the command line.
   pub fn renderer(&self, config: &Config) -> Renderer {
      let mut renderer = config.renderer();

      if let Some(separator) = &self.separator {
         renderer = Renderer::new(separator.as_str())
            .with_indent(renderer.indent())
            .with_max_depth(renderer.max_depth());
      }

      if let Some(indent) = self.indent {
         renderer = renderer.with_indent(indent);
      }

      if self.unbounded {
         renderer = renderer.unbounded();
      } else if let Some(max_depth) = self.max_depth {
         renderer = renderer.with_max_depth(Some(max_depth));
      }

      renderer
   }
}

/// Turn the escapes people can type in a shell into the characters they mean.
pub fn unescape(raw: &str) -> Result<String, String> {
   let mut out = String::with_capacity(raw.len());
   let mut chars = raw.chars();

   while let Some(c) = chars.next() {
      if c != '\\' {
         out.push(c);
         continue;
      }

      match chars.next() {
         Some('n') => out.push('\n'),
         Some('r') => out.push('\r'),
         Some('t') => out.push('\t'),
         Some('\\') => out.push('\\'),
         Some(other) => return Err(format!("unsupported escape '\\{other}'")),
         None => return Err(String::from("trailing '\\' does not escape anything")),
      }
   }

   Ok(out)
}

#[derive(Error, Debug)]
pub enum Error {
   #[error("could not find a home directory to put completions in")]
   NoHomeDir,

   #[error("could not write completions")]
   Completions { source: std::io::Error },

   #[error("could not determine the current directory")]
   CurrentDir { source: std::io::Error },

   #[error("could not load settings")]
   Config {
      #[from]
      source: config::Error,
   },

   #[error("could not start logging")]
   Logger {
      #[from]
      source: log::SetLoggerError,
   },

   #[error("could not read error description '{path}'")]
   ReadInput {
      path: PathBuf,
      source: std::io::Error,
   },

   #[error("could not parse error description '{path}'")]
   ParseInput {
      path: PathBuf,
      source: serde_yaml::Error,
   },

   #[error("could not write to stdout")]
   WriteOutput { source: std::io::Error },
}

#[cfg(test)]
mod tests {
   use super::*;

   fn parse(args: &[&str]) -> Cli {
      Cli::try_parse_from(std::iter::once("exlog").chain(args.iter().copied())).unwrap()
   }

   fn render_args(args: &[&str]) -> RenderArgs {
      match parse(args).command {
         Command::Render(render) => render,
         other => panic!("expected render, got {other:?}"),
      }
   }

   #[test]
   fn unescapes_separators() {
      assert_eq!(unescape(r"\r\n").unwrap(), "\r\n");
      assert_eq!(unescape(r"<\t>").unwrap(), "<\t>");
      assert_eq!(unescape(r"a\\b").unwrap(), "a\\b");
      assert_eq!(unescape("plain").unwrap(), "plain");
   }

   #[test]
   fn reports_error_with_bad_escapes() {
      assert_eq!(unescape(r"\x").unwrap_err(), "unsupported escape '\\x'");
      assert!(unescape("oops\\").is_err());
   }

   #[test]
   fn parses_render_with_defaults() {
      let args = render_args(&["render", "error.yaml"]);
      assert_eq!(args.file, PathBuf::from("error.yaml"));
      assert_eq!(args.header, "Unhandled error");
      assert_eq!(args.separator, None);
      assert!(!args.log);
   }

   #[test]
   fn parses_global_config_after_the_subcommand() {
      let cli = parse(&["render", "error.yaml", "--config", "settings.yaml"]);
      assert_eq!(cli.config, Some(PathBuf::from("settings.yaml")));
   }

   #[test]
   fn command_line_overrides_config() {
      let args = render_args(&[
         "render",
         "error.yaml",
         "--separator",
         r"\r\n",
         "--indent",
         "2",
         "--max-depth",
         "4",
      ]);
      let config = Config {
         line_separator: String::from("|"),
         initial_indent: 7,
         ..Default::default()
      };

      let renderer = args.renderer(&config);
      assert_eq!(renderer.line_separator(), "\r\n");
      assert_eq!(renderer.indent(), 2);
      assert_eq!(renderer.max_depth(), Some(4));
   }

   #[test]
   fn config_applies_when_nothing_is_overridden() {
      let args = render_args(&["render", "error.yaml"]);
      let config = Config {
         line_separator: String::from("|"),
         initial_indent: 7,
         max_depth: Some(3),
         ..Default::default()
      };

      assert_eq!(args.renderer(&config), config.renderer());
   }

   #[test]
   fn unbounded_removes_the_limit() {
      let args = render_args(&["render", "error.yaml", "--unbounded"]);
      assert_eq!(args.renderer(&Config::default()).max_depth(), None);
   }

   #[test]
   fn unbounded_conflicts_with_max_depth() {
      let result = Cli::try_parse_from([
         "exlog",
         "render",
         "error.yaml",
         "--unbounded",
         "--max-depth",
         "3",
      ]);
      assert!(result.is_err());
   }
}
