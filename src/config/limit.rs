use crate::config::{parse, ConfigBuilder, ConfigError, ConfigInstance};
use crate::{LimitStream, Stream};
use serde::Deserialize;

/// Configuration format of a [`LimitStream`](../../struct.LimitStream.html).
///
/// The `stream` table is the configuration of the limited stream.
/// `offset` defaults to 0 and the window is unbounded when `limit` is not
/// set.
/// ```
/// use byos::Stream;
/// use byos::config::{ConfigBuilder, ConfigInstance};
///
/// let config_str = "
/// id = 'LimitConfig'
/// limit = 3
/// [stream]
/// id = 'MemoryConfig'
/// contents = 'abcdef'
/// ";
/// let mut stream =
///     ConfigBuilder::from_string(config_str).unwrap().build().unwrap();
/// assert_eq!(stream.get_contents().unwrap(), b"abc");
/// ```
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LimitConfig {
    #[allow(dead_code)]
    id: String,
    #[serde(default)]
    limit: Option<u64>,
    #[serde(default)]
    offset: u64,
    stream: Box<ConfigBuilder>,
}

impl ConfigInstance for LimitConfig {
    fn id() -> &'static str {
        "LimitConfig"
    }

    fn from_toml(value: &toml::Value) -> Result<Self, ConfigError> {
        parse(value)
    }

    fn build(self) -> Result<Box<dyn Stream>, ConfigError> {
        let stream = self.stream.build()?;
        Ok(Box::new(LimitStream::new(stream, self.limit, self.offset)?))
    }
}
