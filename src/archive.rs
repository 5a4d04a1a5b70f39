//! Archive block data structures
//!
//! One [`ArchiveBlock`] is produced per file. Its rendering is line-exact:
//!
//! ```text
//! --- Text file: src/main.c
//! --- Last modified: 2018-01-26T18:30:09.453Z
//! --- SHA256: 2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824
//! --- file contents, total lines: 2 ---
//! int main() {}
//! // end
//! --- end of file ---
//! ```
//!
//! The last-modified line is left out when the filesystem reports no time.
//! The count in the intro line is always the number of body lines, so a reader
//! can skip a block without scanning for the end marker.

use crate::classifier::Classification;
use crate::locale::Strings;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::io::{self, Write};

// Block format constants
pub const MARKER: &str = "---";
pub const SHA256_KEY: &str = "SHA256";

/// How the body lines of a block were produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// UTF-8 lines copied verbatim
    Text,
    /// Offset / hex / ASCII rows, 16 bytes each
    HexDump,
    /// Base64 wrapped at [`crate::encoder::BASE64_LINE_WIDTH`]
    Base64,
}

impl BodyEncoding {
    /// Classification implied by the encoding
    pub fn classification(self) -> Classification {
        match self {
            BodyEncoding::Text => Classification::Text,
            BodyEncoding::HexDump | BodyEncoding::Base64 => Classification::Binary,
        }
    }
}

/// Metadata lines at the top of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Path as it is shown in the archive
    pub path: String,
    pub last_modified: Option<DateTime<Utc>>,
    /// Lowercase hex SHA-256 of the raw file bytes
    pub sha256: String,
}

/// Payload lines of a block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub encoding: BodyEncoding,
    pub lines: Vec<String>,
}

impl Body {
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// One file rendered into the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveBlock {
    pub header: Header,
    pub body: Body,
    /// Labels used when rendering
    pub strings: &'static Strings,
}

impl ArchiveBlock {
    pub fn kind(&self) -> Classification {
        self.body.encoding.classification()
    }

    pub fn line_count(&self) -> usize {
        self.body.line_count()
    }

    /// Header lines, without trailing newlines
    pub fn header_lines(&self) -> Vec<String> {
        let label = match self.kind() {
            Classification::Text => self.strings.text_file,
            Classification::Binary => self.strings.binary_file,
        };

        let mut lines = Vec::with_capacity(3);
        lines.push(format!("{} {}: {}", MARKER, label, self.header.path));
        if let Some(time) = &self.header.last_modified {
            lines.push(format!(
                "{} {}: {}",
                MARKER,
                self.strings.file_time,
                format_timestamp(time)
            ));
        }
        lines.push(format!("{} {}: {}", MARKER, SHA256_KEY, self.header.sha256));
        lines
    }

    /// The line announcing how many body lines follow
    pub fn intro_line(&self) -> String {
        let intro = match self.body.encoding {
            BodyEncoding::Text => self.strings.text_starts,
            BodyEncoding::HexDump => self.strings.dump_starts,
            BodyEncoding::Base64 => self.strings.base64_starts,
        };
        format!("{} {} {} {}", MARKER, intro, self.line_count(), MARKER)
    }

    pub fn footer_line(&self) -> String {
        format!("{} {} {}", MARKER, self.strings.end_file, MARKER)
    }

    /// Write the block, one `\n`-terminated line at a time
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for line in self.header_lines() {
            writeln!(writer, "{}", line)?;
        }
        writeln!(writer, "{}", self.intro_line())?;
        for line in &self.body.lines {
            writeln!(writer, "{}", line)?;
        }
        writeln!(writer, "{}", self.footer_line())
    }
}

impl fmt::Display for ArchiveBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.header_lines() {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "{}", self.intro_line())?;
        for line in &self.body.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "{}", self.footer_line())
    }
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2018-01-26T18:30:09.453Z`
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}
