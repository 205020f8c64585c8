//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Query a hierarchical configuration document
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path
    #[arg(short = 'C', long, global = true, default_value = "config.json", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Registered format used to parse the config file
    #[arg(short, long, global = true, default_value = "json")]
    pub format: String,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Read a single value, e.g. `database::port`
    #[command(visible_alias = "g")]
    Get {
        /// `::`-delimited key
        key: String,

        /// Type to coerce the value to
        #[arg(short = 'a', long = "as", value_enum, default_value_t = ValueType::Raw)]
        value_type: ValueType,

        /// Value printed when the key is missing or cannot be coerced
        #[arg(short, long)]
        default: Option<String>,
    },

    /// Print a sub-tree as JSON (the whole document when KEY is omitted)
    #[command(visible_alias = "s")]
    Sub {
        /// `::`-delimited key of a mapping
        key: Option<String>,
    },

    /// Print a top-level mapping of strings as `key = value` lines
    Section {
        /// Name of a top-level mapping
        name: String,
    },

    /// Print the whole document as JSON
    #[command(visible_alias = "d")]
    Dump {
        /// Override a top-level string entry before printing (repeatable)
        #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
}

/// Target type of `get --as`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Raw,
    Bool,
    Int,
    Int64,
    Float,
    String,
    Strings,
}

impl ValueType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int64 => "int64",
            Self::Float => "float",
            Self::String => "string",
            Self::Strings => "strings",
        }
    }
}

/// Split `KEY=VALUE` at the first `=`.
fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("empty key in `{raw}`")),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_get() {
        let cli = Cli::try_parse_from([
            "cfgtree", "-C", "app.json", "get", "db::port", "--as", "int", "--default", "5432",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("app.json"));
        assert_eq!(cli.format, "json");
        match cli.command {
            Commands::Get {
                key,
                value_type,
                default,
            } => {
                assert_eq!(key, "db::port");
                assert_eq!(value_type, ValueType::Int);
                assert_eq!(default.as_deref(), Some("5432"));
            }
            other => panic!("expected get, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_dump_assignments() {
        let cli =
            Cli::try_parse_from(["cfgtree", "dump", "--set", "a=1", "-s", "b=x=y", "-v"]).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Dump { set } => assert_eq!(
                set,
                vec![
                    ("a".to_string(), "1".to_string()),
                    ("b".to_string(), "x=y".to_string())
                ]
            ),
            other => panic!("expected dump, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_assignment_errors() {
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=value").is_err());
        assert_eq!(
            parse_assignment("key=").unwrap(),
            ("key".to_string(), String::new())
        );
    }
}
