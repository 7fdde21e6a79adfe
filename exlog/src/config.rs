use std::path::{Path, PathBuf};
use std::str::FromStr;

use exception_format::{Renderer, DEFAULT_MAX_DEPTH};
use log::LevelFilter;
use serde::{de, Deserialize, Deserializer};
use thiserror::Error;

/// Render and logging settings, read from `exlog.yaml`.
///
/// Every field is optional:
///
/// ```yaml
/// line_separator: "\r\n"
/// initial_indent: 1
/// max_depth: 32       # `null` removes the limit
/// log_level: debug
/// ```
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
   pub line_separator: String,
   pub initial_indent: usize,
   pub max_depth: Option<usize>,
   #[serde(deserialize_with = "level_from_str")]
   pub log_level: LevelFilter,
}

impl Default for Config {
   fn default() -> Config {
      Config {
         line_separator: String::from("\n"),
         initial_indent: 0,
         max_depth: Some(DEFAULT_MAX_DEPTH),
         log_level: LevelFilter::Info,
      }
   }
}

impl Config {
   pub const DEFAULT_FILE_NAME: &'static str = "exlog.yaml";

   pub fn from_file(path: &Path) -> Result<Config, Error> {
      let data = std::fs::read_to_string(path).map_err(|source| Error::Read {
         path: path.to_owned(),
         source,
      })?;

      Config::from_yaml(&data).map_err(|source| Error::Parse {
         path: path.to_owned(),
         source,
      })
   }

   pub fn from_yaml(data: &str) -> Result<Config, serde_yaml::Error> {
      serde_yaml::from_str(data)
   }

   /// Use `explicit` if it was given; otherwise `exlog.yaml` in `dir` if there
   /// is one; otherwise the defaults.
   pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Config, Error> {
      if let Some(path) = explicit {
         return Config::from_file(path);
      }

      // Called before logging is set up: nothing here may log.
      let path = dir.join(Self::DEFAULT_FILE_NAME);
      if path.is_file() {
         Config::from_file(&path)
      } else {
         Ok(Config::default())
      }
   }

   pub fn renderer(&self) -> Renderer {
      Renderer::new(self.line_separator.as_str())
         .with_indent(self.initial_indent)
         .with_max_depth(self.max_depth)
   }
}

fn level_from_str<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
   D: Deserializer<'de>,
{
   let s = String::deserialize(deserializer)?;
   LevelFilter::from_str(&s)
      .map_err(|_| de::Error::custom(format!("unknown log level '{s}'")))
}

#[derive(Error, Debug)]
pub enum Error {
   #[error("could not read config file '{path}'")]
   Read {
      path: PathBuf,
      source: std::io::Error,
   },

   #[error("could not parse config file '{path}'")]
   Parse {
      path: PathBuf,
      source: serde_yaml::Error,
   },
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn empty_mapping_is_all_defaults() {
      assert_eq!(Config::from_yaml("{}").unwrap(), Config::default());
   }

   #[test]
   fn reads_every_field() {
      let config = Config::from_yaml(
         r#"
line_separator: "\r\n"
initial_indent: 2
max_depth: 8
log_level: Debug
"#,
      )
      .unwrap();

      assert_eq!(
         config,
         Config {
            line_separator: String::from("\r\n"),
            initial_indent: 2,
            max_depth: Some(8),
            log_level: LevelFilter::Debug,
         }
      );
   }

   #[test]
   fn null_max_depth_removes_the_limit() {
      let config = Config::from_yaml("max_depth: null").unwrap();
      assert_eq!(config.max_depth, None);
      assert_eq!(config.renderer().max_depth(), None);
   }

   #[test]
   fn renderer_uses_the_settings() {
      let config = Config {
         line_separator: String::from("|"),
         initial_indent: 3,
         ..Default::default()
      };

      let renderer = config.renderer();
      assert_eq!(renderer.line_separator(), "|");
      assert_eq!(renderer.indent(), 3);
      assert_eq!(renderer.max_depth(), Some(DEFAULT_MAX_DEPTH));
   }

   #[test]
   fn reports_error_with_unknown_level() {
      let err = Config::from_yaml("log_level: chatty").unwrap_err();
      assert!(err.to_string().contains("unknown log level 'chatty'"));
   }

   #[test]
   fn reports_error_with_unknown_field() {
      assert!(Config::from_yaml("colour: true").is_err());
   }

   #[test]
   fn missing_explicit_file_is_an_error() {
      let path = Path::new("definitely/not/here/exlog.yaml");
      match Config::from_file(path) {
         Err(Error::Read { path: reported, .. }) => assert_eq!(reported, path),
         other => panic!("expected a read error, got {other:?}"),
      }
   }

   #[test]
   fn discovery_without_a_file_uses_defaults() {
      let config = Config::discover(None, Path::new("definitely/not/here")).unwrap();
      assert_eq!(config, Config::default());
   }
}
