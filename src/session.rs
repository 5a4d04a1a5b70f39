//! Run-scoped diagnostics
//!
//! A [`Session`] is created at the start of a run and passed by `&mut` through
//! classification and traversal. Nothing in it feeds back into classification;
//! it exists for the dry-run summary and the end-of-run log line.

use std::collections::BTreeSet;

/// Diagnostic state accumulated over one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Extensions outside the text allowlist whose files sniffed as binary
    unknown_extensions: BTreeSet<String>,
    pub directories: usize,
    pub text_files: usize,
    pub binary_files: usize,
    /// Files that were dropped because they could not be read
    pub skipped: usize,
    /// Text files re-encoded as binary after a UTF-8 decode failure
    pub fallbacks: usize,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an extension that content sniffing found to be binary
    pub fn record_unknown_extension(&mut self, ext: impl Into<String>) {
        self.unknown_extensions.insert(ext.into());
    }

    /// Unknown extensions seen so far, in sorted order
    pub fn unknown_extensions(&self) -> impl Iterator<Item = &str> {
        self.unknown_extensions.iter().map(String::as_str)
    }

    pub fn has_unknown_extensions(&self) -> bool {
        !self.unknown_extensions.is_empty()
    }

    /// End-of-run report printed in dry-run mode
    pub fn summary(&self) -> String {
        if self.unknown_extensions.is_empty() {
            return "No unknown/binary files found".to_string();
        }
        let list = self
            .unknown_extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Following unknown extensions are treated as binary:\n{}", list)
    }

    pub fn files(&self) -> usize {
        self.text_files + self.binary_files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_without_unknown_extensions() {
        let session = Session::new();
        assert!(!session.has_unknown_extensions());
        assert_eq!(session.summary(), "No unknown/binary files found");
    }

    #[test]
    fn test_summary_is_sorted_and_deduplicated() {
        let mut session = Session::new();
        session.record_unknown_extension("exe");
        session.record_unknown_extension("dat");
        session.record_unknown_extension("exe");

        assert_eq!(session.unknown_extensions().collect::<Vec<_>>(), vec!["dat", "exe"]);
        assert_eq!(
            session.summary(),
            "Following unknown extensions are treated as binary:\n.dat, .exe"
        );
    }

    #[test]
    fn test_file_count() {
        let session = Session {
            text_files: 3,
            binary_files: 2,
            ..Default::default()
        };
        assert_eq!(session.files(), 5);
    }
}
