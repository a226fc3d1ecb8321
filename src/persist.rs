//! Settings persistence: load and save JSON or TOML files.
//!
//! Saving merges into the existing file rather than replacing it, so keys the
//! settings type doesn't know about and the file's existing key order survive
//! a round trip. New keys are appended. Creates parent directories as needed.
//!
//! TOML has no null, so absent nullable values are left out of TOML files and
//! a missing key reads back as "leave unchanged".

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::SettingsError;
use crate::settings::Settings;

/// On-disk format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    #[cfg(feature = "toml")]
    Toml,
}

impl Format {
    /// `.toml` files are TOML (with the `toml` feature); everything else is
    /// JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            #[cfg(feature = "toml")]
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Format::Toml,
            _ => Format::Json,
        }
    }
}

/// Parse file content into a document node. Blank content is an empty object.
pub fn parse_document(content: &str, format: Format, path: &Path) -> Result<Value, SettingsError> {
    if content.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    match format {
        Format::Json => serde_json::from_str(content).map_err(|e| SettingsError::Json {
            path: path.to_path_buf(),
            source: e,
        }),
        #[cfg(feature = "toml")]
        Format::Toml => {
            let table: toml::Table =
                content.parse().map_err(|e| SettingsError::TomlParse {
                    path: path.to_path_buf(),
                    source: e,
                })?;
            Ok(from_toml(toml::Value::Table(table)))
        }
    }
}

/// Render a document node as file content.
pub fn render_document(node: Value, format: Format, path: &Path) -> Result<String, SettingsError> {
    match format {
        Format::Json => {
            let mut out = serde_json::to_string_pretty(&node).map_err(|e| SettingsError::Json {
                path: path.to_path_buf(),
                source: e,
            })?;
            out.push('\n');
            Ok(out)
        }
        #[cfg(feature = "toml")]
        Format::Toml => {
            let mut node = node;
            crate::document::strip_nulls(&mut node);
            toml::to_string_pretty(&node).map_err(|e| SettingsError::TomlWrite {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }
}

#[cfg(feature = "toml")]
fn from_toml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number),
        toml::Value::Boolean(b) => Value::Bool(b),
        // Temporal scalars read their string form.
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(from_toml).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, from_toml(v)))
                .collect(),
        ),
    }
}

/// Pure function: merge `settings` into existing file content.
///
/// If `content` is `None` (file doesn't exist yet), starts from an empty
/// document. Returns the new file content.
pub fn merge_into_content<T: Settings>(
    settings: &T,
    content: Option<&str>,
    format: Format,
    path: &Path,
) -> Result<String, SettingsError> {
    let existing = match content {
        Some(c) => Some(parse_document(c, format, path)?),
        None => None,
    };
    let node = settings.write_document(existing)?;
    render_document(node, format, path)
}

/// Read `path` into `settings`.
///
/// Returns `false`, leaving `settings` untouched, if the file does not exist.
/// Keys the file doesn't mention keep their current values.
pub fn load_file<T: Settings>(settings: &mut T, path: &Path) -> Result<bool, SettingsError> {
    let Some(content) = read_optional(path)? else {
        tracing::debug!(path = %path.display(), "no settings file");
        return Ok(false);
    };
    let node = parse_document(&content, Format::from_path(path), path)?;
    settings.read_document(&node)?;
    tracing::debug!(path = %path.display(), "loaded settings file");
    Ok(true)
}

/// I/O wrapper: reads the file (if it exists), merges `settings` into it,
/// writes it back. Creates parent directories if needed.
pub fn save_file<T: Settings>(settings: &T, path: &Path) -> Result<(), SettingsError> {
    let content = read_optional(path)?;
    let new_content =
        merge_into_content(settings, content.as_deref(), Format::from_path(path), path)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SettingsError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    std::fs::write(path, &new_content).map_err(|e| SettingsError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "saved settings file");
    Ok(())
}

/// `{platform config dir}/{file_name}` for `app_name`, e.g.
/// `~/.config/myapp/settings.json` on Linux.
///
/// Returns `None` if no home directory can be determined.
pub fn platform_file(app_name: &str, file_name: &str) -> Option<PathBuf> {
    let proj = directories::ProjectDirs::from("", "", app_name)?;
    Some(proj.config_dir().join(file_name))
}

fn read_optional(path: &Path) -> Result<Option<String>, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(c) => Ok(Some(c)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
