//! Points the site's index page at the pre-compressed `.gz` siblings.
//!
//! This is a blunt text substitution over the whole file, not an HTML edit:
//! every `.css`, `.html` and `.js` becomes `.css.gz`, `.html.gz`, `.js.gz`.

use std::path::Path;

use crate::error::DeployError;

pub fn rewrite_index_text(text: &str) -> String {
    text.replace(".css", ".css.gz")
        .replace(".html", ".html.gz")
        .replace(".js", ".js.gz")
}

/// Rewrites `path` in place.
pub async fn rewrite_index(path: &Path) -> Result<(), DeployError> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| DeployError::io(format!("read {}", path.display()), e))?;
    let text = String::from_utf8_lossy(&data);
    let rewritten = rewrite_index_text(&text);
    tokio::fs::write(path, rewritten)
        .await
        .map_err(|e| DeployError::io(format!("write {}", path.display()), e))?;
    tracing::debug!(path = %path.display(), "rewrote index to reference .gz assets");
    Ok(())
}
