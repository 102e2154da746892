//! Reference resolution (RFC 3986 section 5) and its inverse.

use super::Uri;

/// Remove the `.` and `..` segments of `path` (RFC 3986 section 5.2.4).
///
/// `..` segments with nothing left to remove are dropped. A path ending
/// with a dot segment keeps a trailing `/`, except a path made of dot
/// segments only, which becomes empty, or `/` if it was absolute.
///
/// ```
/// use byos::uri::remove_dot_segments;
///
/// assert_eq!(remove_dot_segments("/a/b/../c"), "/a/c");
/// assert_eq!(remove_dot_segments("a/./b/"), "a/b/");
/// assert_eq!(remove_dot_segments("/a/b/.."), "/a/");
/// ```
pub fn remove_dot_segments(path: &str) -> String {
    if path.is_empty() || path == "/" {
        return String::from(path);
    }

    let mut results: Vec<&str> = Vec::new();
    let mut last = "";
    for segment in path.split('/') {
        match segment {
            ".." => {
                results.pop();
            }
            "." => {}
            _ => results.push(segment),
        }
        last = segment;
    }

    let mut new_path = results.join("/");
    if path.starts_with('/') && !new_path.starts_with('/') {
        // e.g. "/.."
        new_path.insert(0, '/');
    } else if !new_path.is_empty() && (last == "." || last == "..") {
        new_path.push('/');
    }
    new_path
}

/// Resolve the reference `rel` against the base URI `base`
/// (RFC 3986 section 5.2).
pub fn resolve(base: &Uri, rel: &Uri) -> Uri {
    if rel.to_string().is_empty() {
        return base.clone();
    }
    if !rel.scheme().is_empty() {
        let path = remove_dot_segments(rel.path());
        return rel.clone().with_path(&path);
    }

    let (authority, path, query) = if !rel.authority().is_empty() {
        (rel, remove_dot_segments(rel.path()), rel.query())
    } else if rel.path().is_empty() {
        let query = if rel.query().is_empty() {
            base.query()
        } else {
            rel.query()
        };
        (base, String::from(base.path()), query)
    } else {
        let merged = if rel.path().starts_with('/') {
            String::from(rel.path())
        } else if !base.authority().is_empty() && base.path().is_empty() {
            format!("/{}", rel.path())
        } else {
            match base.path().rfind('/') {
                None => String::from(rel.path()),
                Some(i) => format!("{}{}", &base.path()[..=i], rel.path()),
            }
        };
        (base, remove_dot_segments(&merged), rel.query())
    };

    let mut path = path;
    if !authority.authority().is_empty()
        && !path.is_empty()
        && !path.starts_with('/')
    {
        path.insert(0, '/');
    }
    Uri::default()
        .with_scheme(base.scheme())
        .with_authority_of(authority)
        .with_path(&path)
        .with_query(query)
        .with_fragment(rel.fragment())
}

/// The shortest reference `r` such that `resolve(base, r) == target`.
///
/// The result keeps the scheme of `target` if it differs from the scheme
/// of `base` and its authority if it differs from the authority of
/// `base`. Otherwise it is a relative path reference, with `../` to climb
/// from the directory of the base path, or just a query or a fragment if
/// the paths are the same. `target` is returned as is when it already is
/// a relative path reference.
///
/// ```
/// use byos::uri::{relativize, resolve};
/// use byos::Uri;
///
/// let base: Uri = "http://a/b/c/d;p?q".parse().unwrap();
/// let target: Uri = "http://a/b/g?y".parse().unwrap();
/// let reference = relativize(&base, &target);
/// assert_eq!(reference.to_string(), "../g?y");
/// assert_eq!(resolve(&base, &reference), target);
/// ```
pub fn relativize(base: &Uri, target: &Uri) -> Uri {
    if !target.scheme().is_empty()
        && (base.scheme() != target.scheme()
            || (target.authority().is_empty()
                && !base.authority().is_empty()))
    {
        return target.clone();
    }
    if is_relative_path_reference(target) {
        return target.clone();
    }
    if !target.authority().is_empty()
        && base.authority() != target.authority()
    {
        return target.clone().with_scheme("");
    }

    let reference = target.clone().with_path("").without_authority();
    if base.path() != target.path() {
        return reference.with_path(&relative_path(base, target));
    }
    if base.query() == target.query() {
        // Only the fragment is left, even if it is the base fragment.
        return reference.with_query("");
    }
    if target.query().is_empty() {
        // An empty path would inherit the base query.
        let last = target.path().rsplit('/').next().unwrap_or("");
        let path = if last.is_empty() { "./" } else { last };
        return reference.with_path(path);
    }
    reference
}

/// Path of `target` relative to the directory of the path of `base`.
fn relative_path(base: &Uri, target: &Uri) -> String {
    let mut source: Vec<&str> = base.path().split('/').collect();
    source.pop();
    let mut segments: Vec<&str> = target.path().split('/').collect();
    let last = segments.pop().unwrap_or("");

    let common = source
        .iter()
        .zip(segments.iter())
        .take_while(|(s, t)| s == t)
        .count();
    let mut rest = segments.split_off(common);
    rest.push(last);
    let relative = format!(
        "{}{}",
        "../".repeat(source.len() - common),
        rest.join("/")
    );

    // An empty path, or a first segment with a colon, would be read as
    // something else than a relative path.
    let first = relative.split('/').next().unwrap_or("");
    if relative.is_empty() || first.contains(':') {
        format!("./{}", relative)
    } else if relative.starts_with('/') {
        if !base.authority().is_empty() && base.path().is_empty() {
            // resolve() adds the slash itself.
            format!(".{}", relative)
        } else {
            format!("./{}", relative)
        }
    } else {
        relative
    }
}

/// Whether `uri` has neither scheme nor authority and its path does not
/// start with `/`.
pub fn is_relative_path_reference(uri: &Uri) -> bool {
    uri.scheme().is_empty()
        && uri.authority().is_empty()
        && !uri.path().starts_with('/')
}

/// Whether `uri` refers to the document `base` refers to, i.e. only their
/// fragments differ once `uri` is resolved against `base`. Without base,
/// whether `uri` is a fragment-only reference.
pub fn is_same_document_reference(uri: &Uri, base: Option<&Uri>) -> bool {
    match base {
        Some(base) => {
            let uri = resolve(base, uri);
            uri.scheme() == base.scheme()
                && uri.authority() == base.authority()
                && uri.path() == base.path()
                && uri.query() == base.query()
        }
        None => {
            uri.scheme().is_empty()
                && uri.authority().is_empty()
                && uri.path().is_empty()
                && uri.query().is_empty()
        }
    }
}
