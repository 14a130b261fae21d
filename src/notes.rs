//! Read-only notes viewer.

use std::path::Path;
use tracing::warn;

/// Placeholder shown when the notes file cannot be read.
pub const NO_NOTES_PLACEHOLDER: &str = "No notes found.";

/// Read the notes file as plain text.
///
/// A missing or unreadable file substitutes the placeholder; there is no
/// write path.
#[must_use]
pub fn read_notes(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("cannot read notes at {}: {e}", path.display());
            NO_NOTES_PLACEHOLDER.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn existing_file_is_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "buy milk\ncall joe\n").unwrap();

        assert_eq!(read_notes(&path), "buy milk\ncall joe\n");
    }

    #[test]
    fn missing_file_substitutes_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");

        assert_eq!(read_notes(&path), NO_NOTES_PLACEHOLDER);
    }
}
