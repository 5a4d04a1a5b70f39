//! Run driver: traversal → classification → encoding → output

use crate::archive::ArchiveBlock;
use crate::classifier::{Classification, Classifier};
use crate::encoder::{Encoder, SourceFile};
use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::session::Session;
use crate::traversal::{walk, FileEntry};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Settings for one run, fixed once the run starts
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Directory (or single file) to archive
    pub root: PathBuf,
    /// List classifications instead of writing archive blocks
    pub dry_run: bool,
    /// Base64 instead of hex dump for binary payloads
    pub use_base64: bool,
    pub locale: Locale,
    pub follow_links: bool,
    /// Extensions added to the built-in text allowlist
    pub extra_text_extensions: Vec<String>,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Default::default()
        }
    }
}

/// Aggregates a tree into a single archive stream
pub struct Aggregator {
    config: Config,
    classifier: Classifier,
    encoder: Encoder,
}

impl Aggregator {
    pub fn new(config: Config) -> Self {
        let classifier = Classifier::new().with_text_extensions(&config.extra_text_extensions);
        let encoder = Encoder::new()
            .with_strings(config.locale.strings())
            .with_base64(config.use_base64);
        Self {
            config,
            classifier,
            encoder,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Archive the configured root into `out`.
    ///
    /// Per-file read failures are logged and the file is skipped. Only a
    /// missing root or a failing writer abort the run.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<Session> {
        let mut session = Session::new();

        for entry in walk(&self.config.root, self.config.follow_links)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable entry");
                    session.skipped += 1;
                    continue;
                }
            };
            self.process_entry(&entry, &mut session, out)?;
        }

        if self.config.dry_run {
            writeln!(out, "{}", session.summary()).map_err(Error::Output)?;
        }
        out.flush().map_err(Error::Output)?;

        tracing::info!(
            text = session.text_files,
            binary = session.binary_files,
            directories = session.directories,
            skipped = session.skipped,
            fallbacks = session.fallbacks,
            "aggregation finished"
        );
        Ok(session)
    }

    fn process_entry<W: Write>(&self, entry: &FileEntry, session: &mut Session, out: &mut W) -> Result<()> {
        if entry.is_directory {
            session.directories += 1;
            if entry.is_symlink && !self.config.follow_links {
                tracing::debug!(path = %entry.path.display(), "not descending into linked directory");
            }
            if self.config.dry_run {
                writeln!(out, "Dir {}", entry.path.display()).map_err(Error::Output)?;
            }
            return Ok(());
        }

        let detection = match self.classifier.classify(&entry.path, session) {
            Ok(detection) => detection,
            Err(source) => {
                let err = Error::FileUnreadable {
                    path: entry.path.clone(),
                    source,
                };
                tracing::warn!(error = %err, "skipping file that could not be classified");
                session.skipped += 1;
                return Ok(());
            }
        };
        tracing::trace!(
            path = %entry.path.display(),
            symlink = entry.is_symlink,
            reason = ?detection.reason,
            "classified"
        );

        if self.config.dry_run {
            count(session, detection.classification);
            writeln!(out, "File {} {}", detection.classification.tag(), entry.path.display())
                .map_err(Error::Output)?;
            return Ok(());
        }

        let block = match self.encode(&entry.path, detection.classification, session) {
            Ok(block) => block,
            Err(err @ Error::FileUnreadable { .. }) => {
                tracing::warn!(error = %err, "skipping file that could not be read");
                session.skipped += 1;
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        count(session, block.kind());
        block.write_to(out).map_err(Error::Output)
    }

    /// Encode as classified; text that fails to decode is encoded again as binary
    fn encode(&self, path: &Path, classification: Classification, session: &mut Session) -> Result<ArchiveBlock> {
        let source = SourceFile::read(path)?;
        match self.encoder.encode_source(&source, classification) {
            Err(err @ Error::TextDecode { .. }) => {
                tracing::warn!(error = %err, "falling back to binary encoding");
                session.fallbacks += 1;
                self.encoder.encode_source(&source, Classification::Binary)
            }
            result => result,
        }
    }
}

fn count(session: &mut Session, classification: Classification) {
    match classification {
        Classification::Text => session.text_files += 1,
        Classification::Binary => session.binary_files += 1,
    }
}
