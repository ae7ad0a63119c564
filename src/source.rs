//! Document loading from a local HTML file or an http(s) URL.

use anyhow::{Context, Result};
use std::fs;

/// Fixed location of the Measurement Protocol parameter reference.
pub const DEFAULT_SOURCE: &str =
    "https://developers.google.com/analytics/devguides/collection/protocol/v1/parameters";

fn is_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Read the whole document into memory.
pub fn load(location: &str) -> Result<String> {
    if !is_url(location) {
        return fs::read_to_string(location).with_context(|| format!("failed to read {}", location));
    }

    log::info!("fetching {}", location);
    ureq::get(location)
        .call()
        .with_context(|| format!("failed to fetch {}", location))?
        .into_string()
        .with_context(|| format!("failed to read response body from {}", location))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn detects_urls() {
        assert!(is_url(DEFAULT_SOURCE));
        assert!(is_url("http://localhost/params"));
        assert!(!is_url("tests/fixtures/parameters.html"));
    }

    #[test]
    fn loads_local_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"<h3>x</h3>").unwrap();
        assert_eq!(load(file.path().to_str().unwrap()).unwrap(), "<h3>x</h3>");
    }

    #[test]
    fn missing_file_names_path() {
        let err = load("does/not/exist.html").unwrap_err();
        assert!(err.to_string().contains("failed to read does/not/exist.html"));
    }
}
