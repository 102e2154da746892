use super::configs::*;
use super::{ConfigError, ConfigInstance};
use crate::Stream;
use serde::Deserialize;

/// Configuration ids supported by [`ConfigBuilder`].
static CONFIGS: &[&str] = &[
    "AppendConfig",
    "CachingConfig",
    "FileConfig",
    #[cfg(feature = "inflate")]
    "InflateConfig",
    "LimitConfig",
    "MemoryConfig",
    "MultipartConfig",
    "NoSeekConfig",
];

enum Config {
    Append(AppendConfig),
    Caching(CachingConfig),
    File(FileConfig),
    #[cfg(feature = "inflate")]
    Inflate(InflateConfig),
    Limit(LimitConfig),
    Memory(MemoryConfig),
    Multipart(MultipartConfig),
    NoSeek(NoSeekConfig),
}

/// Stream builder from any configuration.
///
/// This structure is the entry point to build a stream from a
/// configuration string or file. The root of the configuration must be a
/// toml table with an `id` field naming one of the formats of the
/// [`configs`](configs/index.html) module. If it is not,
/// a [`ConfigError::ConfigFormatError`] is returned instead of a
/// [`ConfigBuilder`]. The configuration identified by `id`, with its nested
/// streams, is then fully checked before the builder is returned.
///
/// Errors raised by the streams themselves, e.g. a file that cannot be
/// opened, are only raised by [`build()`](#method.build) as a
/// [`ConfigError::Stream`].
///
/// Nested stream tables of a configuration are themselves parsed into a
/// [`ConfigBuilder`].
#[derive(Deserialize)]
#[serde(try_from = "toml::Value")]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Id of the configuration held by this builder.
    pub fn config_id(&self) -> &'static str {
        match &self.config {
            Config::Append(_) => AppendConfig::id(),
            Config::Caching(_) => CachingConfig::id(),
            Config::File(_) => FileConfig::id(),
            #[cfg(feature = "inflate")]
            Config::Inflate(_) => InflateConfig::id(),
            Config::Limit(_) => LimitConfig::id(),
            Config::Memory(_) => MemoryConfig::id(),
            Config::Multipart(_) => MultipartConfig::id(),
            Config::NoSeek(_) => NoSeekConfig::id(),
        }
    }
}

impl TryFrom<toml::Value> for ConfigBuilder {
    type Error = ConfigError;

    fn try_from(value: toml::Value) -> Result<Self, ConfigError> {
        Self::from_toml(&value)
    }
}

impl ConfigInstance for ConfigBuilder {
    fn id() -> &'static str {
        "ConfigBuilder"
    }

    /// Parse a stream configuration out of a toml value.
    /// This function checks that:
    /// * The toml configuration is a toml `Table`,
    /// * The toml configuration contains an "id" field,
    /// * The value of the "id" field is a supported value,
    /// * The target configuration identified by "id" is valid.
    fn from_toml(value: &toml::Value) -> Result<Self, ConfigError> {
        // Check toml value is a table.
        let table = match value {
            toml::Value::Table(t) => t,
            _ => {
                return Err(ConfigError::ConfigFormatError(String::from(
                    "Stream configuration must be a toml table.",
                )))
            }
        };

        // Check config contain an 'id' field.
        let id = match table.get("id") {
            None => {
                return Err(ConfigError::ConfigFormatError(String::from(
                    "Configuration must have an 'id' field.",
                )))
            }
            Some(s) => match s.as_str() {
                Some(s) => s,
                None => {
                    return Err(ConfigError::ConfigFormatError(
                        String::from("Invalid id type, must be a string."),
                    ))
                }
            },
        };

        let config = match id {
            "AppendConfig" => Config::Append(AppendConfig::from_toml(value)?),
            "CachingConfig" => {
                Config::Caching(CachingConfig::from_toml(value)?)
            }
            "FileConfig" => Config::File(FileConfig::from_toml(value)?),
            #[cfg(feature = "inflate")]
            "InflateConfig" => {
                Config::Inflate(InflateConfig::from_toml(value)?)
            }
            "LimitConfig" => Config::Limit(LimitConfig::from_toml(value)?),
            "MemoryConfig" => Config::Memory(MemoryConfig::from_toml(value)?),
            "MultipartConfig" => {
                Config::Multipart(MultipartConfig::from_toml(value)?)
            }
            "NoSeekConfig" => {
                Config::NoSeek(NoSeekConfig::from_toml(value)?)
            }
            unknown => {
                return Err(ConfigError::ConfigFormatError(format!(
                    "Invalid stream configuration type: {}\n\
                     Possible values are: {:?}.",
                    unknown, CONFIGS
                )))
            }
        };
        Ok(ConfigBuilder { config })
    }

    fn build(self) -> Result<Box<dyn Stream>, ConfigError> {
        match self.config {
            Config::Append(c) => c.build(),
            Config::Caching(c) => c.build(),
            Config::File(c) => c.build(),
            #[cfg(feature = "inflate")]
            Config::Inflate(c) => c.build(),
            Config::Limit(c) => c.build(),
            Config::Memory(c) => c.build(),
            Config::Multipart(c) => c.build(),
            Config::NoSeek(c) => c.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConfigBuilder;
    use crate::config::{ConfigError, ConfigInstance};
    use crate::Stream;

    #[test]
    fn test_not_a_table() {
        let value = toml::Value::Integer(3);
        assert!(matches!(
            ConfigBuilder::from_toml(&value),
            Err(ConfigError::ConfigFormatError(_))
        ));
    }

    #[test]
    fn test_missing_id() {
        assert!(matches!(
            ConfigBuilder::from_string("contents = 'abc'"),
            Err(ConfigError::ConfigFormatError(_))
        ));
        assert!(matches!(
            ConfigBuilder::from_string("id = 3"),
            Err(ConfigError::ConfigFormatError(_))
        ));
    }

    #[test]
    fn test_unknown_id() {
        match ConfigBuilder::from_string("id = 'ArrayConfig'") {
            Err(ConfigError::ConfigFormatError(msg)) => {
                assert!(msg.contains("ArrayConfig"));
                assert!(msg.contains("MemoryConfig"));
                assert_eq!(
                    msg.contains("InflateConfig"),
                    cfg!(feature = "inflate")
                );
            }
            _ => panic!("Unknown configuration id must be rejected."),
        }
    }

    #[cfg(not(feature = "inflate"))]
    #[test]
    fn test_inflate_needs_feature() {
        let s = "id = 'InflateConfig'\n[stream]\nid = 'MemoryConfig'";
        assert!(matches!(
            ConfigBuilder::from_string(s),
            Err(ConfigError::ConfigFormatError(_))
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ConfigBuilder::from_string("id = "),
            Err(ConfigError::TomlFormatError(_))
        ));
    }

    #[test]
    fn test_invalid_nested_config() {
        let config_str = "
id = 'NoSeekConfig'
[stream]
id = 'LimitConfig'
limit = 'ten'
[stream.stream]
id = 'MemoryConfig'
";
        assert!(matches!(
            ConfigBuilder::from_string(config_str),
            Err(ConfigError::ConfigFormatError(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            b"id = 'MemoryConfig'\ncontents = 'from a file'\n",
        )
        .unwrap();
        let builder = ConfigBuilder::from_file(file.path()).unwrap();
        assert_eq!(builder.config_id(), "MemoryConfig");
        assert_eq!(builder.build().unwrap().to_bytes(), b"from a file");
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ConfigBuilder::from_file("/nonexistent/byos/config.toml"),
            Err(ConfigError::IOError(_))
        ));
    }
}
