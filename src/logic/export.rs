// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Export a message body as a standalone, sanitized HTML document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::models::email::FetchedEmail;
use crate::utils::{html, sanitize_component};

/// Keeps embedded media inside the viewport, like the inline viewer.
const DOCUMENT_STYLE: &str = "\
body { font-family: sans-serif; margin: 1.5rem; word-break: break-word; overflow-wrap: break-word; }
.meta { color: #555; font-size: 0.9rem; }
.prose img { max-width: 100%; height: auto; }
.prose table { width: 100%; border-collapse: collapse; }
.prose iframe, .prose video { max-width: 100%; height: auto; }";

/// Suggested file name for saving `subject`, e.g. `your_code.html`.
pub fn suggested_file_name(subject: &str) -> String {
    format!("{}.html", sanitize_component(subject).to_ascii_lowercase())
}

/// Force `extension` onto `path` unless it already has it (case-insensitive).
pub fn ensure_extension(mut path: PathBuf, extension: &str) -> PathBuf {
    let replace = !matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case(extension)
    );

    if replace {
        path.set_extension(extension);
    }
    path
}

/// Build a complete HTML page with a small header and the sanitized body.
pub fn html_document(email: &FetchedEmail) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>\n{style}\n</style>\n</head>\n<body>\n<p class=\"meta\">From: {from}<br>To: {to}<br>At: {at}</p>\n<h1>{title}</h1>\n<div class=\"prose\">\n{body}\n</div>\n</body>\n</html>\n",
        style = DOCUMENT_STYLE,
        title = escape_text(&email.subject),
        from = escape_text(&email.from),
        to = escape_text(&email.to),
        at = escape_text(&email.timestamp.display_local()),
        body = html::sanitize(&email.body),
    )
}

/// Write the sanitized document for `email` to `path`, creating parent directories.
pub fn write_html(path: &Path, email: &FetchedEmail) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(path, html_document(email))
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), id = %email.id, "saved email");
    Ok(())
}

/// Write the document to a fresh temp file and hand it to the system browser.
pub fn open_in_browser(email: &FetchedEmail) -> Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("tempinbox-{}.html", uuid::Uuid::new_v4()));
    write_html(&path, email)?;
    open::that(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    Ok(path)
}

fn escape_text(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::email::Timestamp;
    use tempfile::TempDir;

    fn sample() -> FetchedEmail {
        FetchedEmail {
            id: "1".into(),
            from: "Netflix <info@netflix.com>".into(),
            to: "me@brarov.tech".into(),
            subject: "Your sign-in code".into(),
            snippet: "Code 1234".into(),
            body: r#"<p>Code <b>1234</b></p><script>alert(1)</script>"#.into(),
            timestamp: Timestamp::Text("2025-01-01T00:00:00Z".into()),
        }
    }

    #[test]
    fn suggested_file_name_is_lowercase_html() {
        assert_eq!(suggested_file_name("Your Sign-in Code!"), "your_sign-in_code.html");
        assert_eq!(suggested_file_name(""), "email.html");
    }

    #[test]
    fn ensure_extension_preserves_matching_extension_case_insensitive() {
        let path = PathBuf::from("/tmp/mail.HTML");
        assert_eq!(ensure_extension(path.clone(), "html"), path);
    }

    #[test]
    fn ensure_extension_replaces_when_different() {
        let result = ensure_extension(PathBuf::from("mail.txt"), "html");
        assert_eq!(result.extension().and_then(|e| e.to_str()), Some("html"));
    }

    #[test]
    fn document_escapes_header_and_sanitizes_body() {
        let doc = html_document(&sample());

        assert!(doc.contains("From: Netflix &lt;info@netflix.com&gt;"));
        assert!(doc.contains("<b>1234</b>"));
        assert!(!doc.contains("alert(1)"));
        assert!(doc.contains(".prose img { max-width: 100%; height: auto; }"));
    }

    #[test]
    fn write_html_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/mail.html");

        write_html(&path, &sample()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
    }
}
