use std::path::PathBuf;
use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A problem with the files under `.smarttask/`.
///
/// Every variant carries the offending path.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not valid TOML: {source}", path.display())]
    TomlParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{} is not valid YAML: {source}", path.display())]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Agent definition without usable front matter.
    #[error("Bad agent definition {}: {reason}", path.display())]
    MarkdownParse { path: PathBuf, reason: String },

    #[error("Cannot list {}: {source}", path.display())]
    DirectoryWalk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// Files that parse but contradict each other, such as a routing rule
    /// naming an agent that is not defined.
    #[error("Invalid configuration in {}: {reason}", path.display())]
    InvalidConfig { path: PathBuf, reason: String },
}
