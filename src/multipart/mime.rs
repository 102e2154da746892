//! Media type lookup from file names.

/// Known file extensions and their media type, sorted by extension.
const MIME_TYPES: &[(&str, &str)] = &[
    ("7z", "application/x-7z-compressed"),
    ("avi", "video/x-msvideo"),
    ("bin", "application/octet-stream"),
    ("bmp", "image/bmp"),
    ("bz2", "application/x-bzip2"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("doc", "application/msword"),
    ("flac", "audio/x-flac"),
    ("gif", "image/gif"),
    ("gz", "application/gzip"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("ico", "image/x-icon"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("js", "application/javascript"),
    ("json", "application/json"),
    ("md", "text/markdown"),
    ("mov", "video/quicktime"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("ogg", "audio/ogg"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("rtf", "application/rtf"),
    ("svg", "image/svg+xml"),
    ("tar", "application/x-tar"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("toml", "application/toml"),
    ("txt", "text/plain"),
    ("wav", "audio/x-wav"),
    ("webm", "video/webm"),
    ("webp", "image/webp"),
    ("xml", "application/xml"),
    ("yaml", "text/yaml"),
    ("yml", "text/yaml"),
    ("zip", "application/zip"),
];

/// Media type of a file extension, case insensitive.
pub fn from_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.to_ascii_lowercase();
    MIME_TYPES
        .binary_search_by(|(ext, _)| (*ext).cmp(extension.as_str()))
        .ok()
        .map(|i| MIME_TYPES[i].1)
}

/// Media type of a file name, from its extension.
pub fn from_filename(filename: &str) -> Option<&'static str> {
    let basename = filename.rsplit('/').next().unwrap_or(filename);
    match basename.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => {
            from_extension(extension)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{from_extension, from_filename, MIME_TYPES};

    #[test]
    fn test_table_is_sorted() {
        assert!(MIME_TYPES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_lookup() {
        assert_eq!(from_extension("TXT"), Some("text/plain"));
        assert_eq!(from_filename("a.txt"), Some("text/plain"));
        let gzip = Some("application/gzip");
        assert_eq!(from_filename("/tmp/archive.tar.gz"), gzip);
        assert_eq!(from_filename("photo.JPG"), Some("image/jpeg"));
        assert_eq!(from_filename("README"), None);
        assert_eq!(from_filename(".txt"), None);
        assert_eq!(from_filename("data.unknown"), None);
    }
}
