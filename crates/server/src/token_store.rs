//! Stored Datahub access token.
//!
//! A previous session may have left a personal access token behind; when it
//! still works it is preferred over basic auth. A missing or unreadable file
//! is not an error — the server just falls back to the environment
//! credentials.

use std::io::ErrorKind;
use std::path::Path;
use tracing::warn;

/// Load a stored access token, trimmed of surrounding whitespace.
#[must_use]
pub fn load(path: &Path) -> Option<String> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read stored token");
            return None;
        }
    };

    let token = String::from_utf8_lossy(&bytes).trim().to_string();
    if token.is_empty() { None } else { Some(token) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_missing_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(load(&dir.path().join("access-token")), None);
    }

    #[test]
    fn load_trims_trailing_newline() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("access-token");
        std::fs::write(&path, "tok-abc123\n").expect("write");
        assert_eq!(load(&path), Some("tok-abc123".to_string()));
    }

    #[test]
    fn load_empty_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("access-token");
        std::fs::write(&path, "  \n").expect("write");
        assert_eq!(load(&path), None);
    }
}
