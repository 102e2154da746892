use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

mod resolver;
pub use resolver::{
    is_relative_path_reference, is_same_document_reference, relativize,
    remove_dot_segments, resolve,
};

/// Schemes and the port they use when none is written.
const DEFAULT_PORTS: [(&str, u16); 11] = [
    ("ftp", 21),
    ("gopher", 70),
    ("http", 80),
    ("https", 443),
    ("imap", 143),
    ("ldap", 389),
    ("news", 119),
    ("nntp", 119),
    ("pop", 110),
    ("telnet", 23),
    ("tn3270", 23),
];

fn default_port(scheme: &str) -> Option<u16> {
    DEFAULT_PORTS
        .iter()
        .find(|(s, _)| *s == scheme)
        .map(|(_, port)| *port)
}

/// A URI reference (RFC 3986).
///
/// Components are split without further validation. Scheme and host are
/// lowercased and the default port of the scheme is dropped. Absent and
/// empty components are the same: an empty query is never written.
///
/// Values are immutable, `with_*` methods return a modified copy.
///
/// ## Examples
///
/// ```
/// use byos::Uri;
///
/// let uri: Uri = "HTTP://user@Example.com:80/a/b?q#f".parse().unwrap();
/// assert_eq!(uri.scheme(), "http");
/// assert_eq!(uri.authority(), "user@example.com");
/// assert_eq!(uri.port(), None);
/// assert_eq!(uri.to_string(), "http://user@example.com/a/b?q#f");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Uri {
    scheme: String,
    user_info: String,
    host: String,
    port: Option<u16>,
    path: String,
    query: String,
    fragment: String,
}

impl Uri {
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn user_info(&self) -> &str {
        &self.user_info
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The port, unless it is the default port of the scheme.
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// `[user_info@]host[:port]`, or an empty string without host.
    pub fn authority(&self) -> String {
        let mut authority = self.host.clone();
        if !self.user_info.is_empty() {
            authority = format!("{}@{}", self.user_info, authority);
        }
        if let Some(port) = self.port {
            authority = format!("{}:{}", authority, port);
        }
        authority
    }

    pub fn with_scheme(mut self, scheme: &str) -> Self {
        self.scheme = scheme.to_ascii_lowercase();
        self.filter_port();
        self
    }

    pub fn with_user_info(mut self, user_info: &str) -> Self {
        self.user_info = String::from(user_info);
        self
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_ascii_lowercase();
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self.filter_port();
        self
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = String::from(path);
        self
    }

    pub fn with_query(mut self, query: &str) -> Self {
        self.query = String::from(query);
        self
    }

    pub fn with_fragment(mut self, fragment: &str) -> Self {
        self.fragment = String::from(fragment);
        self
    }

    /// Same URI without scheme nor authority.
    pub(crate) fn without_authority(self) -> Self {
        self.with_scheme("")
            .with_user_info("")
            .with_host("")
            .with_port(None)
    }

    /// Copy the authority components of `other`.
    pub(crate) fn with_authority_of(mut self, other: &Uri) -> Self {
        self.user_info = other.user_info.clone();
        self.host = other.host.clone();
        self.port = other.port;
        self.filter_port();
        self
    }

    fn filter_port(&mut self) {
        if self.port.is_some() && self.port == default_port(&self.scheme) {
            self.port = None;
        }
    }

    fn parse_authority(&mut self, authority: &str) -> Result<()> {
        let host_port = match authority.rsplit_once('@') {
            Some((user_info, host_port)) => {
                self.user_info = String::from(user_info);
                host_port
            }
            None => authority,
        };
        // The port follows the last colon, outside of an IPv6 literal.
        let (host, port) = match host_port.rfind(':') {
            Some(i) if !host_port[i..].contains(']') => {
                (&host_port[..i], &host_port[i + 1..])
            }
            _ => (host_port, ""),
        };
        self.host = host.to_ascii_lowercase();
        if !port.is_empty() {
            match port.parse::<u16>() {
                Ok(port) => self.port = Some(port),
                Err(_) => {
                    return Err(Error::invalid_argument(format!(
                        "invalid port \"{}\"",
                        port
                    )))
                }
            }
        }
        Ok(())
    }
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(|c| {
            c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.'
        }),
        _ => false,
    }
}

impl FromStr for Uri {
    type Err = Error;

    /// Split `s` in its components, following the regular expression of
    /// RFC 3986 appendix B.
    fn from_str(s: &str) -> Result<Self> {
        if s.chars().any(|c| c.is_ascii_whitespace() || c.is_control()) {
            return Err(Error::invalid_argument(format!(
                "unable to parse URI \"{}\"",
                s
            )));
        }
        let mut uri = Uri::default();
        let (rest, fragment) = s.split_once('#').unwrap_or((s, ""));
        let (mut rest, query) = rest.split_once('?').unwrap_or((rest, ""));
        uri.fragment = String::from(fragment);
        uri.query = String::from(query);

        if let Some(i) = rest.find(|c: char| c == ':' || c == '/') {
            if rest.as_bytes()[i] == b':' && is_scheme(&rest[..i]) {
                uri.scheme = rest[..i].to_ascii_lowercase();
                rest = &rest[i + 1..];
            }
        }
        if let Some(hier) = rest.strip_prefix("//") {
            let end = hier.find('/').unwrap_or(hier.len());
            uri.parse_authority(&hier[..end])?;
            rest = &hier[end..];
        }
        uri.path = String::from(rest);
        uri.filter_port();
        Ok(uri)
    }
}

impl fmt::Display for Uri {
    /// Recompose the reference (RFC 3986 section 5.3).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authority = self.authority();
        if !self.scheme.is_empty() {
            write!(f, "{}:", self.scheme)?;
        }
        if !authority.is_empty() || self.scheme == "file" {
            write!(f, "//{}", authority)?;
        }
        if !authority.is_empty()
            && !self.path.is_empty()
            && !self.path.starts_with('/')
        {
            f.write_str("/")?;
        }
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        if !self.fragment.is_empty() {
            write!(f, "#{}", self.fragment)?;
        }
        Ok(())
    }
}
