//! Catalogue path → site link conversion.
//!
//! Every link the navigation tree or the cross-reference linker emits is an
//! absolute, site-rooted URL path. Relative links break previous/next
//! navigation as soon as the reader is one directory deep.

/// Characters `encodeURI` leaves alone besides ASCII alphanumerics.
///
/// `%` is deliberately absent: escaping it keeps [`normalize`] injective, so
/// `a b` and `a%20b` never collapse onto the same link.
const URI_SAFE: &[u8] = b";,/?:@&=+$-_.!~*'()#";

/// Percent-encode a path the way `encodeURI` does, UTF-8 byte by byte.
pub fn encode_uri(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        if byte.is_ascii_alphanumeric() || URI_SAFE.contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Turn a catalogue path (relative, `/`-separated, extension stripped) into a
/// site link: `"/" + base + path + "." + extension`, URI-encoded.
///
/// `base` is the mount directory the path was scanned from, possibly empty.
///
/// ```
/// use docnav::link::normalize;
///
/// assert_eq!(normalize("", "01-intro/README", "html"), "/01-intro/README.html");
/// assert_eq!(normalize("guide", "第 3 章", "html"), "/guide/%E7%AC%AC%203%20%E7%AB%A0.html");
/// ```
pub fn normalize(base: &str, path: &str, extension: &str) -> String {
    let joined = join(base, path);
    format!("/{}.{}", encode_uri(&joined), extension)
}

/// Join two `/`-separated fragments, ignoring empty ones and stray slashes.
pub fn join(base: &str, path: &str) -> String {
    let base = base.trim_matches('/');
    let path = path.trim_start_matches('/');
    if base.is_empty() {
        path.to_string()
    } else {
        format!("{base}/{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ascii_path_passes_through() {
        assert_eq!(encode_uri("01-intro/README"), "01-intro/README");
    }

    #[test]
    fn spaces_and_cjk_are_percent_encoded() {
        assert_eq!(encode_uri("a b"), "a%20b");
        assert_eq!(encode_uri("章"), "%E7%AB%A0");
    }

    #[test]
    fn reserved_characters_kept() {
        assert_eq!(encode_uri("a+b(c)#d"), "a+b(c)#d");
    }

    #[test]
    fn percent_sign_is_escaped() {
        assert_eq!(encode_uri("a%20b"), "a%2520b");
    }

    #[test]
    fn normalize_is_site_rooted() {
        assert_eq!(normalize("", "notes", "html"), "/notes.html");
        assert_eq!(normalize("/guide/", "01-intro/x", "html"), "/guide/01-intro/x.html");
    }

    #[test]
    fn normalize_is_injective_over_distinct_paths() {
        let paths = [
            "a b",
            "a%20b",
            "a/b",
            "a-b",
            "01-intro/README",
            "1-intro/README",
            "第 3 章",
            "第%203%20章",
        ];
        let links: HashSet<String> = paths.iter().map(|p| normalize("", p, "html")).collect();
        assert_eq!(links.len(), paths.len());
    }

    #[test]
    fn join_skips_empty_base() {
        assert_eq!(join("", "x"), "x");
        assert_eq!(join("docs", "x"), "docs/x");
    }
}
