use crate::config::{parse, ConfigBuilder, ConfigError, ConfigInstance};
use crate::{AppendStream, Stream};
use serde::Deserialize;

/// Configuration format of an
/// [`AppendStream`](../../struct.AppendStream.html) reading the streams
/// of the `streams` array one after the other.
/// ```
/// use byos::Stream;
/// use byos::config::{ConfigBuilder, ConfigInstance};
///
/// let config_str = "
/// id = 'AppendConfig'
/// [[streams]]
/// id = 'MemoryConfig'
/// contents = 'foo'
/// [[streams]]
/// id = 'MemoryConfig'
/// contents = 'bar'
/// ";
/// let mut stream =
///     ConfigBuilder::from_string(config_str).unwrap().build().unwrap();
/// assert_eq!(stream.get_contents().unwrap(), b"foobar");
/// ```
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppendConfig {
    #[allow(dead_code)]
    id: String,
    #[serde(default)]
    streams: Vec<ConfigBuilder>,
}

impl ConfigInstance for AppendConfig {
    fn id() -> &'static str {
        "AppendConfig"
    }

    fn from_toml(value: &toml::Value) -> Result<Self, ConfigError> {
        parse(value)
    }

    fn build(self) -> Result<Box<dyn Stream>, ConfigError> {
        let mut stream = AppendStream::new();
        for config in self.streams {
            stream.add_stream(config.build()?)?;
        }
        Ok(Box::new(stream))
    }
}

#[cfg(test)]
mod tests {
    use super::AppendConfig;
    use crate::config::{ConfigError, ConfigInstance};
    use crate::Stream;

    #[test]
    fn test_empty_append_config() {
        let config = AppendConfig::from_string("id='AppendConfig'").unwrap();
        let mut stream = config.build().unwrap();
        assert_eq!(stream.size(), Some(0));
        assert!(stream.get_contents().unwrap().is_empty());
    }

    #[test]
    fn test_nested_append_config() {
        let config_str = "
id = 'AppendConfig'
[[streams]]
id = 'LimitConfig'
limit = 2
[streams.stream]
id = 'MemoryConfig'
contents = 'abcdef'
[[streams]]
id = 'AppendConfig'
[[streams.streams]]
id = 'MemoryConfig'
contents = 'xy'
";
        let mut stream =
            AppendConfig::from_string(config_str).unwrap().build().unwrap();
        assert_eq!(stream.size(), Some(4));
        assert_eq!(stream.get_contents().unwrap(), b"abxy");
    }

    #[test]
    fn test_invalid_append_config() {
        assert!(matches!(
            AppendConfig::from_string("id='AppendConfig'\nstreams=['a']"),
            Err(ConfigError::ConfigFormatError(_))
        ));
    }
}
