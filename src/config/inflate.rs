use crate::config::{parse, ConfigBuilder, ConfigError, ConfigInstance};
use crate::{InflateStream, Stream};
use serde::Deserialize;

/// Configuration format of an
/// [`InflateStream`](../../struct.InflateStream.html) decompressing the
/// gzip payload of the nested `stream` table.
///
/// The gzip header is read when the stream is built.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InflateConfig {
    #[allow(dead_code)]
    id: String,
    stream: Box<ConfigBuilder>,
}

impl ConfigInstance for InflateConfig {
    fn id() -> &'static str {
        "InflateConfig"
    }

    fn from_toml(value: &toml::Value) -> Result<Self, ConfigError> {
        parse(value)
    }

    fn build(self) -> Result<Box<dyn Stream>, ConfigError> {
        Ok(Box::new(InflateStream::new(self.stream.build()?)?))
    }
}
