//! Archive block encoder

use crate::archive::{ArchiveBlock, Body, BodyEncoding, Header};
use crate::classifier::Classification;
use crate::error::{Error, Result};
use crate::hash::sha256_hex;
use crate::locale::{Strings, ENGLISH};
use base64::Engine;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// Maximum length of a base64 body line
pub const BASE64_LINE_WIDTH: usize = 80;
/// Bytes per hex dump row
pub const DUMP_ROW_WIDTH: usize = 16;

// Width of the hex column of a full row: 16 pairs and 15 separators
const DUMP_HEX_WIDTH: usize = DUMP_ROW_WIDTH * 3 - 1;

/// A file read fully into memory, ready to be encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub last_modified: Option<DateTime<Utc>>,
    pub data: Vec<u8>,
}

impl SourceFile {
    /// Read the file content and its modification time
    pub fn read(path: &Path) -> Result<Self> {
        let data = fs::read(path).map_err(|source| Error::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;

        // A missing mtime only drops the header line
        let last_modified = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Ok(Self {
            path: path.to_path_buf(),
            last_modified,
            data,
        })
    }
}

/// Renders files into archive blocks
#[derive(Debug, Clone, Copy)]
pub struct Encoder {
    strings: &'static Strings,
    use_base64: bool,
}

impl Encoder {
    /// Create an encoder with English labels and hex dumps for binary files
    pub fn new() -> Self {
        Self {
            strings: &ENGLISH,
            use_base64: false,
        }
    }

    /// Use the given label table
    pub fn with_strings(mut self, strings: &'static Strings) -> Self {
        self.strings = strings;
        self
    }

    /// Encode binary payloads as base64 instead of a hex dump
    pub fn with_base64(mut self, use_base64: bool) -> Self {
        self.use_base64 = use_base64;
        self
    }

    /// Read `path` and encode it with the given classification
    pub fn encode(&self, path: &Path, classification: Classification) -> Result<ArchiveBlock> {
        let source = SourceFile::read(path)?;
        self.encode_source(&source, classification)
    }

    /// Encode an already-read file
    pub fn encode_source(&self, source: &SourceFile, classification: Classification) -> Result<ArchiveBlock> {
        self.encode_bytes(&source.path, source.last_modified, &source.data, classification)
    }

    /// Encode raw bytes.
    ///
    /// Fails with [`Error::TextDecode`] when `classification` is text and the
    /// bytes are not valid UTF-8; binary encoding cannot fail.
    pub fn encode_bytes(
        &self,
        path: &Path,
        last_modified: Option<DateTime<Utc>>,
        data: &[u8],
        classification: Classification,
    ) -> Result<ArchiveBlock> {
        let body = match classification {
            Classification::Text => {
                let text = std::str::from_utf8(data).map_err(|source| Error::TextDecode {
                    path: path.to_path_buf(),
                    source,
                })?;
                Body {
                    encoding: BodyEncoding::Text,
                    lines: text_lines(text),
                }
            }
            Classification::Binary if self.use_base64 => Body {
                encoding: BodyEncoding::Base64,
                lines: base64_lines(data),
            },
            Classification::Binary => Body {
                encoding: BodyEncoding::HexDump,
                lines: hex_dump(data),
            },
        };

        Ok(ArchiveBlock {
            header: Header {
                path: path.display().to_string(),
                last_modified,
                sha256: sha256_hex(data),
            },
            body,
            strings: self.strings,
        })
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Split text on `\n`; a final newline does not start another line
pub fn text_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.split('\n').map(String::from).collect()
}

/// Base64 (standard alphabet, padded) hard-wrapped at [`BASE64_LINE_WIDTH`]
pub fn base64_lines(data: &[u8]) -> Vec<String> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    encoded
        .as_bytes()
        .chunks(BASE64_LINE_WIDTH)
        .map(|chunk| chunk.iter().map(|&c| c as char).collect())
        .collect()
}

/// Classic hex dump: `offset  hex pairs  ascii`, one row per 16 bytes
pub fn hex_dump(data: &[u8]) -> Vec<String> {
    data.chunks(DUMP_ROW_WIDTH)
        .enumerate()
        .map(|(row, chunk)| {
            let hex = chunk
                .iter()
                .map(|b| format!("{:02x}", b))
                .collect::<Vec<_>>()
                .join(" ");
            let ascii: String = chunk
                .iter()
                .map(|&b| if (0x20..=0x7e).contains(&b) { b as char } else { '.' })
                .collect();
            format!(
                "{:04x}  {:<width$}  {}",
                row * DUMP_ROW_WIDTH,
                hex,
                ascii,
                width = DUMP_HEX_WIDTH
            )
        })
        .collect()
}
