//! Utility functions for URL inspection and archive file naming

use crate::error::{Error, Result};

/// Entry name used when a URL has no usable path segment
const FALLBACK_ENTRY_NAME: &str = "download";

/// Check whether a URL points at a file with a permitted extension
///
/// The extension is taken from the percent-decoded URL path first. When the
/// path carries none, every query parameter value is inspected in order of
/// appearance and the first non-empty extension wins, which covers links such
/// as `https://host/get?file=report.pdf`. Comparison is exact against the
/// allow-list entries, which are expected lower-case with a leading dot.
///
/// A URL that fails to parse is never allowed.
///
/// # Examples
///
/// ```
/// use file_archiver::utils::is_allowed_extension;
///
/// let allowed = vec![".pdf".to_string()];
/// assert!(is_allowed_extension("https://example.com/doc.PDF", &allowed));
/// assert!(is_allowed_extension("https://example.com/get?f=doc.pdf", &allowed));
/// assert!(!is_allowed_extension("https://example.com/run.exe", &allowed));
/// assert!(!is_allowed_extension("not a url", &allowed));
/// ```
pub fn is_allowed_extension(file_url: &str, allowed_extensions: &[String]) -> bool {
    let Ok(parsed) = url::Url::parse(file_url) else {
        return false;
    };

    // Match against the decoded path so `report%2Epdf` counts as `.pdf`
    let path = urlencoding::decode(parsed.path())
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| parsed.path().to_string());
    let mut ext = extension_of(&path).to_lowercase();

    if ext.is_empty() {
        ext = parsed
            .query_pairs()
            .map(|(_, value)| extension_of(&value).to_lowercase())
            .find(|candidate| !candidate.is_empty())
            .unwrap_or_default();
    }

    if ext.is_empty() {
        return false;
    }

    allowed_extensions.iter().any(|allowed| *allowed == ext)
}

/// Extension of the last `/`-separated element, including the dot
///
/// Returns an empty string when the last element has no dot.
fn extension_of(path: &str) -> &str {
    let base = match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    };
    match base.rfind('.') {
        Some(idx) => &base[idx..],
        None => "",
    }
}

/// Derive an archive entry name from the last path segment of a URL
///
/// Falls back to `"download"` when the URL has no non-empty path segment.
/// Two URLs sharing a final segment produce the same name.
pub fn entry_name_from_url(file_url: &str) -> String {
    url::Url::parse(file_url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back())
                .map(str::to_string)
        })
        .unwrap_or_else(|| FALLBACK_ENTRY_NAME.to_string())
}

/// Reject archive filenames that could escape the archive directory
///
/// Runs before any filesystem access.
pub fn validate_archive_filename(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
    {
        return Err(Error::InvalidFilename(filename.to_string()));
    }
    Ok(())
}
