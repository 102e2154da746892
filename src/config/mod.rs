//! Stream pipelines described with the [`toml`](https://toml.io/en/)
//! format.
//!
//! Every table of a configuration has an `id` naming the stream to
//! build. Decorators take the stream they decorate as a nested table
//! named `stream`. The [`ConfigBuilder`] structure is the entry point to
//! build a stream from a configuration string or file.
//!
//! ```
//! use byos::Stream;
//! use byos::config::{ConfigBuilder, ConfigInstance};
//!
//! let config_str = "
//! id = 'LimitConfig'
//! offset = 6
//! limit = 5
//! [stream]
//! id = 'MemoryConfig'
//! contents = 'hello world!'
//! ";
//! let mut stream =
//!     ConfigBuilder::from_string(config_str).unwrap().build().unwrap();
//! assert_eq!(stream.get_contents().unwrap(), b"world");
//! ```
//!
//! See the [`configs`](configs/index.html) module for the configuration
//! format of every stream.

use crate::Stream;
use std::io::Read;
use std::path::Path;

/// Trait of a stream configuration parsed from a toml value and consumed
/// to build the stream it describes.
pub trait ConfigInstance: Sized {
    /// Value of the `id` field of this configuration.
    fn id() -> &'static str;

    /// Parse a configuration out of a toml value.
    ///
    /// The value is expected to be a table with an `id` field.
    /// On failure, the returned error tells what is wrong with the
    /// configuration.
    fn from_toml(value: &toml::Value) -> Result<Self, ConfigError>;

    /// Build the stream described by this configuration.
    fn build(self) -> Result<Box<dyn Stream>, ConfigError>;

    /// Parse a configuration out of a toml string.
    fn from_string(s: &str) -> Result<Self, ConfigError> {
        let value = toml::from_str::<toml::Value>(s)?;
        Self::from_toml(&value)
    }

    /// Parse a configuration out of a toml file.
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = std::fs::File::open(&path)?;
        let mut s = String::new();
        file.read_to_string(&mut s)?;
        Self::from_string(s.as_str())
    }
}

/// Deserialize the configuration `C` out of `value`.
pub(crate) fn parse<C>(value: &toml::Value) -> Result<C, ConfigError>
where
    C: ConfigInstance + serde::de::DeserializeOwned,
{
    value.clone().try_into::<C>().map_err(|e| {
        ConfigError::ConfigFormatError(format!(
            "Invalid {}: {}",
            C::id(),
            e
        ))
    })
}

mod error;
pub use error::ConfigError;
mod builder;
pub use builder::ConfigBuilder;

mod append;
mod caching;
mod file;
#[cfg(feature = "inflate")]
mod inflate;
mod limit;
mod memory;
mod multipart;
mod no_seek;

/// Configuration formats of the streams that can be built from a
/// configuration.
pub mod configs {
    pub use super::append::AppendConfig;
    pub use super::caching::CachingConfig;
    pub use super::file::FileConfig;
    #[cfg(feature = "inflate")]
    pub use super::inflate::InflateConfig;
    pub use super::limit::LimitConfig;
    pub use super::memory::MemoryConfig;
    pub use super::multipart::{ElementConfig, MultipartConfig};
    pub use super::no_seek::NoSeekConfig;
}
