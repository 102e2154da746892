use thiserror::Error;

/// Errors raised while reading a configuration or building the stream it
/// describes.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid toml.
    #[error("invalid toml: {0}")]
    TomlFormatError(#[from] toml::de::Error),
    /// The configuration is valid toml but does not describe a stream.
    #[error("invalid configuration: {0}")]
    ConfigFormatError(String),
    /// The configuration file could not be read.
    #[error("cannot read configuration: {0}")]
    IOError(#[from] std::io::Error),
    /// The stream described by the configuration could not be built.
    #[error("cannot build stream: {0}")]
    Stream(#[from] crate::Error),
}

#[cfg(test)]
mod tests {
    use super::ConfigError;
    use crate::Error;
    use std::io::ErrorKind;

    fn detached() -> crate::Result<()> {
        Err(Error::Detached)
    }

    fn not_found() -> std::io::Result<()> {
        Err(std::io::Error::new(ErrorKind::NotFound, "no such file"))
    }

    fn build_failure() -> Result<(), ConfigError> {
        Ok(detached()?)
    }

    fn read_failure() -> Result<(), ConfigError> {
        Ok(not_found()?)
    }

    #[test]
    fn test_conversions() {
        let e = build_failure().unwrap_err();
        assert!(matches!(e, ConfigError::Stream(Error::Detached)));
        assert_eq!(e.to_string(), "cannot build stream: stream is detached");

        let e = read_failure().unwrap_err();
        assert!(matches!(e, ConfigError::IOError(_)));
        assert_eq!(e.to_string(), "cannot read configuration: no such file");

        let e: ConfigError = toml::from_str::<toml::Value>("a = ")
            .unwrap_err()
            .into();
        assert!(e.to_string().starts_with("invalid toml: "));
    }

    #[test]
    fn test_is_std_error() {
        let e: Box<dyn std::error::Error> =
            Box::new(ConfigError::ConfigFormatError(String::from("no id")));
        assert_eq!(e.to_string(), "invalid configuration: no id");
    }
}
