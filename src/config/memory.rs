use crate::config::{parse, ConfigError, ConfigInstance};
use crate::{MemoryStream, Stream};
use serde::Deserialize;

/// Configuration format of a [`MemoryStream`](../../type.MemoryStream.html).
///
/// The optional `contents` string sets the initial bytes of the stream,
/// which is positioned at its beginning.
/// ```
/// use byos::Stream;
/// use byos::config::{ConfigBuilder, ConfigInstance};
///
/// let config_str = "
/// id = 'MemoryConfig'
/// contents = 'abc'
/// ";
/// let mut stream =
///     ConfigBuilder::from_string(config_str).unwrap().build().unwrap();
/// assert_eq!(stream.read(2).unwrap(), b"ab");
/// ```
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    #[allow(dead_code)]
    id: String,
    #[serde(default)]
    contents: String,
}

impl ConfigInstance for MemoryConfig {
    fn id() -> &'static str {
        "MemoryConfig"
    }

    fn from_toml(value: &toml::Value) -> Result<Self, ConfigError> {
        parse(value)
    }

    fn build(self) -> Result<Box<dyn Stream>, ConfigError> {
        Ok(Box::new(MemoryStream::from_bytes(self.contents.into_bytes())))
    }
}
