use crate::config::{parse, ConfigError, ConfigInstance};
use crate::stream::Mode;
use crate::{IoStream, Stream};
use serde::Deserialize;

/// Configuration format of a stream over a file.
///
/// The `path` field is required. The `mode` field is one of "r"
/// (default), "w" or "r+". The file is opened when the stream is built.
/// ```no_run
/// use byos::config::{ConfigBuilder, ConfigInstance};
///
/// let config_str = "
/// id = 'FileConfig'
/// path = '/tmp/body.bin'
/// mode = 'r'
/// ";
/// let stream =
///     ConfigBuilder::from_string(config_str).unwrap().build().unwrap();
/// ```
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[allow(dead_code)]
    id: String,
    path: String,
    #[serde(default)]
    mode: Option<String>,
}

impl ConfigInstance for FileConfig {
    fn id() -> &'static str {
        "FileConfig"
    }

    fn from_toml(value: &toml::Value) -> Result<Self, ConfigError> {
        let config: Self = parse(value)?;
        if let Some(mode) = &config.mode {
            if let Err(e) = mode.parse::<Mode>() {
                return Err(ConfigError::ConfigFormatError(format!(
                    "Invalid FileConfig: {}",
                    e
                )));
            }
        }
        Ok(config)
    }

    fn build(self) -> Result<Box<dyn Stream>, ConfigError> {
        let mode = match self.mode {
            None => Mode::Read,
            Some(mode) => mode.parse::<Mode>()?,
        };
        Ok(Box::new(IoStream::open(self.path, mode)?))
    }
}
