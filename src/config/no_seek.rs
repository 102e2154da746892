use crate::config::{parse, ConfigBuilder, ConfigError, ConfigInstance};
use crate::{NoSeekStream, Stream};
use serde::Deserialize;

/// Configuration format of a
/// [`NoSeekStream`](../../struct.NoSeekStream.html) hiding the seek
/// capability of the nested `stream` table.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NoSeekConfig {
    #[allow(dead_code)]
    id: String,
    stream: Box<ConfigBuilder>,
}

impl ConfigInstance for NoSeekConfig {
    fn id() -> &'static str {
        "NoSeekConfig"
    }

    fn from_toml(value: &toml::Value) -> Result<Self, ConfigError> {
        parse(value)
    }

    fn build(self) -> Result<Box<dyn Stream>, ConfigError> {
        Ok(Box::new(NoSeekStream::new(self.stream.build()?)))
    }
}

#[cfg(test)]
mod tests {
    use super::NoSeekConfig;
    use crate::config::ConfigInstance;
    use crate::Stream;

    #[test]
    fn test_valid_no_seek_config() {
        let config_str = "
id = 'NoSeekConfig'
[stream]
id = 'MemoryConfig'
contents = 'abc'
";
        let mut stream =
            NoSeekConfig::from_string(config_str).unwrap().build().unwrap();
        assert!(!stream.is_seekable());
        assert!(stream.rewind().is_err());
        assert_eq!(stream.get_contents().unwrap(), b"abc");
    }
}
