use crate::config::{parse, ConfigBuilder, ConfigError, ConfigInstance};
use crate::{CachingStream, Stream};
use serde::Deserialize;

/// Configuration format of a
/// [`CachingStream`](../../struct.CachingStream.html) caching the nested
/// `stream` table in the default buffer.
/// ```
/// use byos::Stream;
/// use byos::config::{ConfigBuilder, ConfigInstance};
///
/// let config_str = "
/// id = 'CachingConfig'
/// [stream]
/// id = 'NoSeekConfig'
/// [stream.stream]
/// id = 'MemoryConfig'
/// contents = 'abc'
/// ";
/// let mut stream =
///     ConfigBuilder::from_string(config_str).unwrap().build().unwrap();
/// assert_eq!(stream.get_contents().unwrap(), b"abc");
/// stream.rewind().unwrap();
/// assert_eq!(stream.get_contents().unwrap(), b"abc");
/// ```
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CachingConfig {
    #[allow(dead_code)]
    id: String,
    stream: Box<ConfigBuilder>,
}

impl ConfigInstance for CachingConfig {
    fn id() -> &'static str {
        "CachingConfig"
    }

    fn from_toml(value: &toml::Value) -> Result<Self, ConfigError> {
        parse(value)
    }

    fn build(self) -> Result<Box<dyn Stream>, ConfigError> {
        Ok(Box::new(CachingStream::new(self.stream.build()?)))
    }
}
