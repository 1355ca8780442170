//! Feed filename derivation from URLs.
//!
//! Download tasks may omit the destination name; it is then taken from the
//! last URL path segment and sanitized for Linux filesystems.

mod path;
mod sanitize;

pub use path::filename_from_url_path;
pub use sanitize::sanitize_filename_for_linux;

/// Fallback when the URL path yields nothing usable.
const DEFAULT_FILENAME: &str = "feed.txt";

/// Derives a safe local filename for a feed URL.
///
/// - `derive_filename("https://example.com/me/jxyd.m3u")` → `"jxyd.m3u"`
/// - `derive_filename("https://example.com/")` → `"feed.txt"`
pub fn derive_filename(url: &str) -> String {
    let Some(raw) = filename_from_url_path(url) else {
        return DEFAULT_FILENAME.to_string();
    };
    let sanitized = sanitize_filename_for_linux(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_from_url_path() {
        assert_eq!(derive_filename("https://mycode.zbds.top/me/jxyd.m3u"), "jxyd.m3u");
        assert_eq!(
            derive_filename("https://example.com/lists/jxdx_hd.txt?token=abc"),
            "jxdx_hd.txt"
        );
    }

    #[test]
    fn derive_fallback_for_root_or_garbage() {
        assert_eq!(derive_filename("https://example.com/"), "feed.txt");
        assert_eq!(derive_filename("https://example.com"), "feed.txt");
        assert_eq!(derive_filename("not a url"), "feed.txt");
    }

    #[test]
    fn derive_sanitizes_encoded_separators() {
        assert_eq!(derive_filename("https://example.com/a%2Fb.txt"), "a_b.txt");
    }
}
