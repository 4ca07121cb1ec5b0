use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::Context;
use bridge_map::{Arguments, EngineConfig, ReadableArray, ReadableMap, Value};
use colored::Colorize;
use tracing::debug;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let arguments = Arguments::with_config(config);
    let result = match cli.command {
        Command::Materialize(args) => cmd_materialize(&arguments, &args)?,
        Command::Merge(args) => cmd_merge(&arguments, &args)?,
    };
    print!("{}", render(&result, cli.format)?);
    Ok(())
}

/// Engine configuration from a TOML file, or the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config: EngineConfig = toml::from_str(&text)
        .with_context(|| format!("invalid config {}", path.display()))?;
    debug!(path = %path.display(), ?config, "loaded engine config");
    Ok(config)
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn load_map(arguments: &Arguments, path: &Path) -> anyhow::Result<bridge_map::WritableMap> {
    let json = read_json(path)?;
    arguments
        .map_from_json(&json)
        .with_context(|| format!("cannot build a map from {}", path.display()))
}

fn cmd_materialize(arguments: &Arguments, args: &MaterializeArgs) -> anyhow::Result<ReadableMap> {
    let map = load_map(arguments, &args.file)?;
    Ok(map.seal()?)
}

fn cmd_merge(arguments: &Arguments, args: &MergeArgs) -> anyhow::Result<ReadableMap> {
    let mut target = load_map(arguments, &args.target)?;
    let source = load_map(arguments, &args.source)?.seal()?;
    target
        .merge(&source)
        .with_context(|| format!("cannot merge {}", args.source.display()))?;
    let merged = target.seal()?;
    debug!(entries = merged.len(), "merged maps");
    Ok(merged)
}

pub fn render(map: &ReadableMap, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(map)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Text => {
            let mut out = String::new();
            if map.is_empty() {
                writeln!(out, "{}", "(empty map)".dimmed())?;
            }
            write_map(&mut out, map, 0)?;
            Ok(out)
        }
    }
}

fn write_map(out: &mut String, map: &ReadableMap, depth: usize) -> std::fmt::Result {
    let indent = "  ".repeat(depth);
    for (key, value) in map.iter() {
        match value {
            Value::Map(inner) => {
                writeln!(out, "{indent}{}:", key.bold())?;
                write_map(out, inner, depth + 1)?;
            }
            Value::Array(items) => {
                writeln!(out, "{indent}{}:", key.bold())?;
                write_array(out, items, depth + 1)?;
            }
            scalar => writeln!(out, "{indent}{}: {}", key.bold(), scalar_text(scalar))?,
        }
    }
    Ok(())
}

fn write_array(out: &mut String, items: &ReadableArray, depth: usize) -> std::fmt::Result {
    let indent = "  ".repeat(depth);
    for value in items.iter() {
        match value {
            Value::Map(inner) => {
                writeln!(out, "{indent}-")?;
                write_map(out, inner, depth + 1)?;
            }
            Value::Array(nested) => {
                writeln!(out, "{indent}-")?;
                write_array(out, nested, depth + 1)?;
            }
            scalar => writeln!(out, "{indent}- {}", scalar_text(scalar))?,
        }
    }
    Ok(())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "null".dimmed().to_string(),
        Value::Boolean(b) => b.to_string().yellow().to_string(),
        Value::Int(i) => i.to_string().cyan().to_string(),
        Value::Double(d) => format!("{d:?}").cyan().to_string(),
        Value::String(s) => format!("{s:?}").green().to_string(),
        Value::Map(_) | Value::Array(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_map::{BridgeError, KeyPolicy};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    // ------------------------------------------------------------------
    // Config
    // ------------------------------------------------------------------

    #[test]
    fn missing_config_path_gives_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn config_from_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "engine.toml", "key_policy = \"lenient\"\nmax_depth = 3\n");
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.key_policy, KeyPolicy::Lenient);
        assert_eq!(config.max_depth, 3);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "engine.toml", "max_depth = 8\n");
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.key_policy, KeyPolicy::Strict);
        assert_eq!(config.max_depth, 8);
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "engine.toml", "key_policy = \"sometimes\"\n");
        assert!(load_config(Some(&path)).is_err());
    }

    // ------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------

    #[test]
    fn materialize_file() {
        let dir = TempDir::new().unwrap();
        let file = write(
            &dir,
            "doc.json",
            r#"{"name":"Jo","age":30,"tags":["a",null],"address":{"city":"Oslo"}}"#,
        );
        let map = cmd_materialize(&Arguments::in_memory(), &MaterializeArgs { file }).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["name", "age", "tags", "address"]);
        assert_eq!(map.get_map("address").unwrap().get_string("city").unwrap(), "Oslo");
        assert!(map.get_array("tags").unwrap().is_null(1));
    }

    #[test]
    fn materialize_rejects_non_object() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "doc.json", "[1, 2]");
        let err = cmd_materialize(&Arguments::in_memory(), &MaterializeArgs { file }).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BridgeError>(),
            Some(BridgeError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn materialize_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "doc.json", "{ not json");
        let err = cmd_materialize(&Arguments::in_memory(), &MaterializeArgs { file }).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn materialize_honours_max_depth() {
        let dir = TempDir::new().unwrap();
        let file = write(&dir, "doc.json", r#"{"a":{"b":{"c":1}}}"#);
        let arguments = Arguments::with_config(EngineConfig {
            max_depth: 2,
            ..EngineConfig::default()
        });
        let err = cmd_materialize(&arguments, &MaterializeArgs { file }).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BridgeError>(),
            Some(BridgeError::InvalidArgument(_))
        ));
    }

    #[test]
    fn merge_files_source_wins() {
        let dir = TempDir::new().unwrap();
        let target = write(&dir, "a.json", r#"{"a":1,"b":2}"#);
        let source = write(&dir, "b.json", r#"{"b":20,"c":30}"#);
        let map = cmd_merge(&Arguments::in_memory(), &MergeArgs { target, source }).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(map.get_int("b").unwrap(), 20);
        assert_eq!(map.get_int("c").unwrap(), 30);
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn sample() -> ReadableMap {
        let json = serde_json::json!({"name": "Jo", "score": 1.5, "nested": {"ok": true}});
        Arguments::in_memory().map_from_json(&json).unwrap().seal().unwrap()
    }

    #[test]
    fn render_json_round_trips_entries() {
        let out = render(&sample(), OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, sample().to_json());
    }

    #[test]
    fn render_text_lists_every_key() {
        let out = render(&sample(), OutputFormat::Text).unwrap();
        assert_eq!(out.lines().count(), 4);
        assert!(out.contains("name"));
        assert!(out.contains("\"Jo\""));
        assert!(out.contains("1.5"));
        assert!(out.contains("  "));
    }

    #[test]
    fn render_text_empty_map() {
        let out = render(&ReadableMap::new(), OutputFormat::Text).unwrap();
        assert!(out.contains("(empty map)"));
    }
}
