use std::path::PathBuf;
use thiserror::Error;

/// A mistake in a settings declaration.
///
/// These are programming errors, not runtime conditions. They are detected the
/// first time a settings type is used and cached, so every later use of the
/// type reports the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Invalid default for '{type_name}.{property}': {reason}")]
    InvalidDefault {
        type_name: &'static str,
        property: String,
        reason: String,
    },

    #[error("Default value given for {kind} property '{type_name}.{property}'")]
    DefaultOnNonScalar {
        type_name: &'static str,
        property: String,
        kind: &'static str,
    },

    #[error("Duplicate document name '{name}' in {type_name}")]
    DuplicateName {
        type_name: &'static str,
        name: String,
    },

    #[error("Cyclic settings nesting: {}", .path.join(" -> "))]
    Cycle { path: Vec<&'static str> },
}

/// A literal or document node that is not valid for its target type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConversionError(pub String);

impl ConversionError {
    pub fn new(reason: impl std::fmt::Display) -> Self {
        ConversionError(reason.to_string())
    }

    /// Attach the document path of the offending value.
    pub fn at(self, path: &str) -> SettingsError {
        SettingsError::Conversion {
            path: path.to_string(),
            reason: self.0,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid value for '{path}': {reason}")]
    Conversion { path: String, reason: String },

    #[error("Expected {expected} at '{path}', found {found}")]
    Shape {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[cfg(feature = "toml")]
    #[error("Failed to parse {path}: {source}")]
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[cfg(feature = "toml")]
    #[error("Failed to write {path}: {source}")]
    TomlWrite {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

impl SettingsError {
    /// Prefix the document path of a conversion or shape error with the
    /// property that contains it.
    ///
    /// Collection indices (`[2]`) attach without a separating dot.
    pub(crate) fn within(self, parent: &str) -> Self {
        match self {
            SettingsError::Conversion { path, reason } => SettingsError::Conversion {
                path: join_path(parent, &path),
                reason,
            },
            SettingsError::Shape {
                path,
                expected,
                found,
            } => SettingsError::Shape {
                path: join_path(parent, &path),
                expected,
                found,
            },
            other => other,
        }
    }
}

fn join_path(parent: &str, child: &str) -> String {
    if child.is_empty() {
        parent.to_string()
    } else if parent.is_empty() || child.starts_with('[') {
        format!("{parent}{child}")
    } else {
        format!("{parent}.{child}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_default_formats_correctly() {
        let err = ConfigurationError::InvalidDefault {
            type_name: "Server",
            property: "port".into(),
            reason: "invalid digit found in string".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Server.port"));
        assert!(msg.contains("invalid digit"));
    }

    #[test]
    fn cycle_lists_the_path() {
        let err = ConfigurationError::Cycle {
            path: vec!["A", "B", "A"],
        };
        assert_eq!(err.to_string(), "Cyclic settings nesting: A -> B -> A");
    }

    #[test]
    fn configuration_error_is_transparent() {
        let err: SettingsError = ConfigurationError::DuplicateName {
            type_name: "Server",
            name: "port".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Duplicate document name 'port' in Server");
    }

    #[test]
    fn within_builds_dotted_paths() {
        let err = SettingsError::Conversion {
            path: "port".into(),
            reason: "bad".into(),
        }
        .within("[1]")
        .within("servers");
        match err {
            SettingsError::Conversion { path, .. } => assert_eq!(path, "servers[1].port"),
            other => panic!("Expected Conversion, got {other:?}"),
        }
    }

    #[test]
    fn within_fills_empty_shape_path() {
        let err = SettingsError::Shape {
            path: String::new(),
            expected: "an object",
            found: "a string",
        }
        .within("database");
        assert!(err.to_string().contains("'database'"));
    }
}
