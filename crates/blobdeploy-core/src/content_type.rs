//! Content-Type / Content-Encoding guessing for uploaded files.
//!
//! Matching is by substring anywhere in the path, not by extension, and the
//! checks run in a fixed order: the first content-type hit wins, then the
//! encoding checks may override whatever encoding the type check set.

/// Headers to attach to one uploaded blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileHeaders {
    pub content_type: Option<&'static str>,
    pub content_encoding: Option<&'static str>,
}

const GZIP: &str = "gzip";

pub fn infer_headers(path: &str) -> FileHeaders {
    let mut headers = FileHeaders::default();

    if path.contains(".html") {
        headers.content_type = Some("text/html");
    } else if path.contains(".css") {
        headers.content_type = Some("text/css");
    } else if path.contains(".js") {
        headers.content_type = Some("application/javascript");
    } else if path.contains(".ico") {
        headers.content_type = Some("image/vnd.microsoft.icon");
        headers.content_encoding = Some(GZIP);
    }

    // Brotli siblings are tagged gzip too; the build only emits gzip today.
    if path.contains(".br") || path.contains(".gz") {
        headers.content_encoding = Some(GZIP);
    }

    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_types() {
        assert_eq!(infer_headers("dist/index.html").content_type, Some("text/html"));
        assert_eq!(infer_headers("dist/app.css").content_type, Some("text/css"));
        assert_eq!(
            infer_headers("dist/app.js").content_type,
            Some("application/javascript")
        );
        assert_eq!(infer_headers("dist/logo.png"), FileHeaders::default());
    }

    #[test]
    fn html_wins_over_js() {
        let h = infer_headers("dist/page.html.js");
        assert_eq!(h.content_type, Some("text/html"));
    }

    #[test]
    fn css_wins_over_js() {
        assert_eq!(infer_headers("dist/a.js/b.css").content_type, Some("text/css"));
    }

    #[test]
    fn gzip_sibling_gets_encoding() {
        let h = infer_headers("dist/js/app.js.gz");
        assert_eq!(h.content_type, Some("application/javascript"));
        assert_eq!(h.content_encoding, Some("gzip"));
    }

    #[test]
    fn brotli_sibling_tagged_gzip() {
        assert_eq!(infer_headers("dist/app.css.br").content_encoding, Some("gzip"));
    }

    #[test]
    fn favicon_is_gzip_encoded() {
        let h = infer_headers("dist/favicon.ico");
        assert_eq!(h.content_type, Some("image/vnd.microsoft.icon"));
        assert_eq!(h.content_encoding, Some("gzip"));
    }

    #[test]
    fn substring_in_directory_counts() {
        // ".json" contains ".js".
        let h = infer_headers("dist/manifest.json");
        assert_eq!(h.content_type, Some("application/javascript"));
    }
}
