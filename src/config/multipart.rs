use crate::config::{parse, ConfigBuilder, ConfigError, ConfigInstance};
use crate::{Element, MultipartStream, Stream};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Configuration of one part of a
/// [`MultipartConfig`](struct.MultipartConfig.html).
///
/// `name` is required. The contents of the part are either the
/// `contents` string or the nested `stream` table, not both.
/// `filename` and the `headers` table are optional.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementConfig {
    name: String,
    #[serde(default)]
    contents: Option<String>,
    #[serde(default)]
    stream: Option<Box<ConfigBuilder>>,
    #[serde(default)]
    filename: Option<String>,
    #[serde(default)]
    headers: BTreeMap<String, String>,
}

impl ElementConfig {
    fn check(&self) -> Result<(), ConfigError> {
        match (&self.contents, &self.stream) {
            (Some(_), Some(_)) => Err(ConfigError::ConfigFormatError(
                format!(
                    "Element {} has both 'contents' and 'stream'.",
                    self.name
                ),
            )),
            (None, None) => Err(ConfigError::ConfigFormatError(format!(
                "Element {} needs 'contents' or 'stream'.",
                self.name
            ))),
            _ => Ok(()),
        }
    }

    fn build(self) -> Result<Element, ConfigError> {
        let mut element = Element::new().name(self.name);
        element = match (self.contents, self.stream) {
            (Some(contents), _) => element.contents(contents),
            (None, Some(stream)) => element.contents(stream.build()?),
            (None, None) => element,
        };
        if let Some(filename) = self.filename {
            element = element.filename(filename);
        }
        for (key, value) in self.headers {
            element = element.header(key, value);
        }
        Ok(element)
    }
}

/// Configuration format of a
/// [`MultipartStream`](../../struct.MultipartStream.html).
///
/// The `elements` array lists the parts of the body. A random boundary
/// is used unless `boundary` is set.
/// ```
/// use byos::Stream;
/// use byos::config::{ConfigBuilder, ConfigInstance};
///
/// let config_str = "
/// id = 'MultipartConfig'
/// boundary = 'XYZ'
/// [[elements]]
/// name = 'a'
/// contents = 'b'
/// ";
/// let mut stream =
///     ConfigBuilder::from_string(config_str).unwrap().build().unwrap();
/// assert_eq!(
///     stream.get_contents().unwrap(),
///     &b"--XYZ\r\n\
///        Content-Disposition: form-data; name=\"a\"\r\n\
///        Content-Length: 1\r\n\
///        \r\n\
///        b\r\n\
///        --XYZ--\r\n"[..]
/// );
/// ```
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultipartConfig {
    #[allow(dead_code)]
    id: String,
    #[serde(default)]
    boundary: Option<String>,
    #[serde(default)]
    elements: Vec<ElementConfig>,
}

impl ConfigInstance for MultipartConfig {
    fn id() -> &'static str {
        "MultipartConfig"
    }

    fn from_toml(value: &toml::Value) -> Result<Self, ConfigError> {
        let config: Self = parse(value)?;
        for element in config.elements.iter() {
            element.check()?;
        }
        Ok(config)
    }

    fn build(self) -> Result<Box<dyn Stream>, ConfigError> {
        let elements = self
            .elements
            .into_iter()
            .map(ElementConfig::build)
            .collect::<Result<Vec<Element>, ConfigError>>()?;
        let stream = match self.boundary {
            Some(boundary) => {
                MultipartStream::with_boundary(elements, boundary)?
            }
            None => MultipartStream::new(elements)?,
        };
        Ok(Box::new(stream))
    }
}
