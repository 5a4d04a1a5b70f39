//! Text/binary classification
//!
//! Classification rules (first match wins):
//! 1. Base name is a well-known extension-less text file (`Makefile`, ...) → Text
//! 2. Extension (lowercased) is in the text allowlist → Text
//! 3. Otherwise the content is sniffed:
//!    - starts with `#!` → Text (interpreter script)
//!    - contains any byte below 32 other than tab, LF, CR → Binary
//!    - otherwise → Text
//!
//! Files without any `.` in their name always go through content sniffing.
//! Sniffing scans the whole file before it settles on Text, so a control byte
//! deep in a large file still marks it binary.

use crate::session::Session;
use std::collections::HashSet;
use std::fs;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

/// Sniffing reads the file in chunks of this size
pub const CHUNK_SIZE: usize = 64 * 1024;

pub const SHEBANG: &[u8; 2] = b"#!";

/// Extension-less file names that are always text (case-sensitive)
pub const TEXT_NAMES: &[&str] = &["readme", "Vagrantfile", "Makefile"];

/// Extensions that are always text, regardless of content
pub const TEXT_EXTENSIONS: &[&str] = &[
    "c", "cc", "c++", "cpp", "cxx", "h", "hpp", "h++", "hxx",
    "txt", "md",
    "sh",
    "bat", "cmd",
    "java", "properties",
    "kt", "kts",
    "js", "ts", "json", "css", "html", "npmrc",
    "sql",
    "yml", "yaml", "conf", "xml",
    "dockerignore", "gitattribute",
    "gitattributes", "gitignore",
    "plist",
];

/// Whether a file is archived verbatim or encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Text,
    Binary,
}

impl Classification {
    /// One-letter tag used by the dry-run listing
    pub fn tag(self) -> char {
        match self {
            Classification::Text => 'T',
            Classification::Binary => 'B',
        }
    }
}

/// Why a file got its classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Base name is in [`TEXT_NAMES`]
    KnownName,
    /// Extension is in the text allowlist
    KnownExtension,
    /// Content starts with `#!`
    Shebang,
    /// The whole content was scanned without finding a control byte
    NoControlBytes,
    /// A control byte was found at `offset`
    ControlByte { offset: u64, byte: u8 },
}

/// Result of classifying one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub classification: Classification,
    pub reason: Reason,
}

impl Detection {
    fn text(reason: Reason) -> Self {
        Self {
            classification: Classification::Text,
            reason,
        }
    }

    fn binary(reason: Reason) -> Self {
        Self {
            classification: Classification::Binary,
            reason,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.classification == Classification::Binary
    }
}

/// Decides whether files are text or binary
#[derive(Debug, Clone)]
pub struct Classifier {
    text_extensions: HashSet<String>,
}

impl Classifier {
    /// Create a classifier with the built-in allowlists
    pub fn new() -> Self {
        Self {
            text_extensions: TEXT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
        }
    }

    /// Extend the text allowlist with extra extensions (leading dots are ignored)
    pub fn with_text_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = ext.as_ref().trim_start_matches('.').to_lowercase();
            if !ext.is_empty() {
                self.text_extensions.insert(ext);
            }
        }
        self
    }

    /// Check whether an extension (already lowercased) is in the text allowlist
    pub fn is_text_extension(&self, ext: &str) -> bool {
        self.text_extensions.contains(ext)
    }

    /// Classify the file at `path`.
    ///
    /// Unknown extensions whose content sniffs as binary are recorded in
    /// `session`. I/O errors are returned to the caller untouched.
    pub fn classify(&self, path: &Path, session: &mut Session) -> io::Result<Detection> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if TEXT_NAMES.contains(&name.as_str()) {
            return Ok(Detection::text(Reason::KnownName));
        }

        let ext = match extension_of(&name) {
            Some(ext) => ext,
            None => return sniff_file(path),
        };

        if self.is_text_extension(&ext) {
            return Ok(Detection::text(Reason::KnownExtension));
        }

        let detection = sniff_file(path)?;
        if detection.is_binary() && !ext.is_empty() {
            session.record_unknown_extension(ext);
        }
        Ok(detection)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased substring after the last `.`, or `None` if the name has no dot
pub fn extension_of(name: &str) -> Option<String> {
    name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase())
}

/// Bytes below 32 that still count as text
fn is_text_control(byte: u8) -> bool {
    matches!(byte, b'\t' | b'\n' | b'\r' | b' ')
}

fn is_binary_byte(byte: u8) -> bool {
    byte < 32 && !is_text_control(byte)
}

fn sniff_file(path: &Path) -> io::Result<Detection> {
    let file = fs::File::open(path)?;
    let detection = sniff(file)?;
    if let Reason::ControlByte { offset, byte } = detection.reason {
        tracing::debug!(
            path = %path.display(),
            offset,
            byte,
            "control byte found, treating file as binary"
        );
    }
    Ok(detection)
}

/// Classify content by inspecting its bytes.
///
/// A `#!` prefix wins immediately; otherwise the reader is rewound and scanned
/// to the end in [`CHUNK_SIZE`] chunks, stopping at the first control byte.
pub fn sniff<R: Read + Seek>(mut reader: R) -> io::Result<Detection> {
    let mut head = Vec::with_capacity(SHEBANG.len());
    reader.by_ref().take(SHEBANG.len() as u64).read_to_end(&mut head)?;
    if head == SHEBANG {
        return Ok(Detection::text(Reason::Shebang));
    }

    reader.seek(SeekFrom::Start(0))?;
    let mut buffer = vec![0u8; CHUNK_SIZE];
    let mut offset: u64 = 0;

    loop {
        let count = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        if let Some(pos) = buffer[..count].iter().position(|&b| is_binary_byte(b)) {
            return Ok(Detection::binary(Reason::ControlByte {
                offset: offset + pos as u64,
                byte: buffer[pos],
            }));
        }
        offset += count as u64;
    }

    Ok(Detection::text(Reason::NoControlBytes))
}
