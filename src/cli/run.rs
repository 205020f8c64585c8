//! Command execution.
//!
//! Each command renders to a `String`; `run` prints it to stdout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cfgtree::{Container, Node, Registry, debug, debug_do, log};

use super::args::{Cli, Commands, ValueType};

/// Load the configured document and execute the selected command.
pub fn run(cli: &Cli) -> Result<()> {
    let registry = Registry::with_defaults();
    let container = load(&registry, &cli.format, &expand_path(&cli.config))?;
    let output = execute(&cli.command, &container)?;
    println!("{output}");
    Ok(())
}

/// Expand a leading `~` in a user-supplied path.
fn expand_path(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(raw) => PathBuf::from(shellexpand::tilde(raw).into_owned()),
        None => path.to_path_buf(),
    }
}

/// Read `path` and parse it with the format registered as `format`.
pub fn load(registry: &Registry, format: &str, path: &Path) -> Result<Container> {
    debug!("load"; "reading {} as {format}", path.display());
    let bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let container = registry
        .parse(format, &bytes)
        .with_context(|| format!("failed to parse {}", path.display()))?;

    debug_do! {
        let keys = container.root().keys();
        debug!("load"; "top-level keys: {}", keys.join(", "));
    }
    Ok(container)
}

/// Execute `command` against `container` and return what should be printed.
pub fn execute(command: &Commands, container: &Container) -> Result<String> {
    match command {
        Commands::Get {
            key,
            value_type,
            default,
        } => render_value(container, key, *value_type, default.as_deref()),
        Commands::Sub { key } => {
            let sub = container.sub(key.as_deref().unwrap_or_default())?;
            render_json(&sub)
        }
        Commands::Section { name } => {
            let section = container.section(name)?;
            let lines: Vec<_> = section
                .iter()
                .map(|(key, value)| format!("{key} = {value}"))
                .collect();
            Ok(lines.join("\n"))
        }
        Commands::Dump { set } => {
            for (key, value) in set {
                log!("set"; "{key} = {value}");
                container.set(key, value.as_str());
            }
            render_json(container)
        }
    }
}

fn render_json(container: &Container) -> Result<String> {
    let bytes = container.to_json_pretty()?;
    String::from_utf8(bytes).context("rendered JSON is not UTF-8")
}

/// Read `key` as `value_type`, falling back on `default` when one is given.
fn render_value(
    container: &Container,
    key: &str,
    value_type: ValueType,
    default: Option<&str>,
) -> Result<String> {
    let rendered = match (value_type, default) {
        (ValueType::Raw, None) => serde_json::to_string_pretty(&container.raw(key)?)?,
        (ValueType::Raw, Some(raw)) => {
            let fallback = serde_json::from_str::<serde_json::Value>(raw)
                .map_or_else(|_| Node::from(raw), Node::from);
            serde_json::to_string_pretty(&container.default_raw(key, fallback))?
        }
        (ValueType::Bool, None) => container.bool(key)?.to_string(),
        (ValueType::Bool, Some(raw)) => {
            let Some(fallback) = cfgtree::parse_bool(&Node::from(raw)) else {
                bail!("invalid --default `{raw}` for bool");
            };
            container.default_bool(key, fallback).to_string()
        }
        (ValueType::Int, None) => container.int(key)?.to_string(),
        (ValueType::Int, Some(raw)) => container
            .default_int(key, parse_default(raw, value_type)?)
            .to_string(),
        (ValueType::Int64, None) => container.int64(key)?.to_string(),
        (ValueType::Int64, Some(raw)) => container
            .default_int64(key, parse_default(raw, value_type)?)
            .to_string(),
        (ValueType::Float, None) => container.float(key)?.to_string(),
        (ValueType::Float, Some(raw)) => container
            .default_float(key, parse_default(raw, value_type)?)
            .to_string(),
        (ValueType::String, None) => container.string(key),
        (ValueType::String, Some(raw)) => container.default_string(key, raw),
        (ValueType::Strings, None) => container.strings(key).unwrap_or_default().join("\n"),
        (ValueType::Strings, Some(raw)) => {
            let fallback = raw.split(';').map(str::to_string).collect();
            container.default_strings(key, fallback).join("\n")
        }
    };
    Ok(rendered)
}

fn parse_default<T>(raw: &str, value_type: ValueType) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse()
        .with_context(|| format!("invalid --default `{raw}` for {}", value_type.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const DOCUMENT: &str = r#"{
        "name": "svc",
        "port": 8080,
        "tags": "a;b",
        "db": {"host": "localhost", "user": "root"},
        "limits": {"max": 10}
    }"#;

    fn document() -> Container {
        cfgtree::JsonFormat::parse_document(DOCUMENT.as_bytes()).unwrap()
    }

    fn get(key: &str, value_type: ValueType, default: Option<&str>) -> Result<String> {
        let command = Commands::Get {
            key: key.to_string(),
            value_type,
            default: default.map(str::to_string),
        };
        execute(&command, &document())
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path(Path::new("conf/app.json")), PathBuf::from("conf/app.json"));
        assert_eq!(expand_path(Path::new("/etc/app.json")), PathBuf::from("/etc/app.json"));
        assert!(expand_path(Path::new("~/app.json")).ends_with("app.json"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(DOCUMENT.as_bytes()).unwrap();

        let container = load(&Registry::with_defaults(), "json", file.path()).unwrap();
        assert_eq!(container.string("db::host"), "localhost");
    }

    #[test]
    fn test_load_errors_carry_context() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = load(&Registry::with_defaults(), "json", &missing).unwrap_err();
        assert!(format!("{err}").starts_with("failed to read"));

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        let err = load(&Registry::with_defaults(), "json", file.path()).unwrap_err();
        assert!(format!("{err}").starts_with("failed to parse"));

        let err = load(&Registry::with_defaults(), "yaml", file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown document format `yaml`"));
    }

    #[test]
    fn test_get_typed() {
        assert_eq!(get("port", ValueType::Int, None).unwrap(), "8080");
        assert_eq!(get("port", ValueType::Float, None).unwrap(), "8080");
        assert_eq!(get("name", ValueType::String, None).unwrap(), "svc");
        assert_eq!(get("tags", ValueType::Strings, None).unwrap(), "a\nb");
        assert_eq!(get("name", ValueType::Raw, None).unwrap(), "\"svc\"");
        assert!(get("name", ValueType::Bool, None).is_err());
        assert!(get("missing", ValueType::Int, None).is_err());
    }

    #[test]
    fn test_get_with_default() {
        assert_eq!(get("missing", ValueType::Int, Some("42")).unwrap(), "42");
        assert_eq!(get("name", ValueType::Int64, Some("-1")).unwrap(), "-1");
        assert_eq!(get("missing", ValueType::Bool, Some("on")).unwrap(), "true");
        assert_eq!(get("missing", ValueType::String, Some("x")).unwrap(), "x");
        assert_eq!(get("missing", ValueType::Strings, Some("x;y")).unwrap(), "x\ny");
        assert_eq!(get("missing", ValueType::Raw, Some("[1]")).unwrap(), "[\n  1\n]");
        assert_eq!(get("missing", ValueType::Raw, Some("text")).unwrap(), "\"text\"");
        assert!(get("missing", ValueType::Int, Some("many")).is_err());
        assert!(get("missing", ValueType::Bool, Some("maybe")).is_err());
    }

    #[test]
    fn test_sub_and_section() {
        let container = document();
        let sub = execute(&Commands::Sub { key: Some("limits".into()) }, &container).unwrap();
        assert_eq!(sub, "{\n  \"max\": 10\n}");

        let section = execute(&Commands::Section { name: "db".into() }, &container).unwrap();
        assert_eq!(section, "host = localhost\nuser = root");

        assert!(execute(&Commands::Section { name: "limits".into() }, &container).is_err());
        assert!(execute(&Commands::Sub { key: Some("name".into()) }, &container).is_err());
    }

    #[test]
    fn test_dump_applies_overrides() {
        let container = document();
        let command = Commands::Dump {
            set: vec![("name".into(), "other".into()), ("extra".into(), "1".into())],
        };
        let output = execute(&command, &container).unwrap();
        assert!(output.contains("\"name\": \"other\""));
        assert!(output.contains("\"extra\": \"1\""));
        assert_eq!(container.int("extra").unwrap(), 1);
    }
}
