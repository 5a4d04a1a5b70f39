//! # aggregate-txt
//!
//! Aggregates a directory tree into one human-readable text stream that still
//! carries enough information to restore every file.
//!
//! ## Block Format
//!
//! Each file becomes one block; blocks are simply concatenated:
//!
//! ```text
//! --- Text file: src/hello.sh
//! --- Last modified: 2024-03-01T10:15:00.000Z
//! --- SHA256: 5f1d...
//! --- file contents, total lines: 2 ---
//! #!/bin/sh
//! echo hello
//! --- end of file ---
//! ```
//!
//! Binary files are written as a hex dump (16 bytes per row) or, on request,
//! as base64 wrapped at 80 columns. The count in the intro line always equals
//! the number of body lines.
//!
//! ## Text Detection
//!
//! Detection rules (in order):
//! 1. Well-known extension-less names (`Makefile`, `Vagrantfile`, `readme`) → Text
//! 2. Known source/markup/config extension → Text
//! 3. Content starts with `#!` → Text
//! 4. Content has a control byte other than tab, LF, CR → Binary
//! 5. Otherwise → Text
//!
//! A file classified as text that turns out not to be UTF-8 is re-encoded as
//! binary instead of failing the run.

pub mod aggregator;
pub mod archive;
pub mod classifier;
pub mod encoder;
pub mod error;
pub mod hash;
pub mod locale;
pub mod session;
pub mod traversal;

pub use aggregator::{Aggregator, Config};
pub use archive::{ArchiveBlock, Body, BodyEncoding, Header};
pub use classifier::{Classification, Classifier, Detection, Reason};
pub use encoder::{Encoder, SourceFile};
pub use error::{Error, Result};
pub use hash::sha256_hex;
pub use locale::{Locale, Strings};
pub use session::Session;
pub use traversal::{check_root, walk, FileEntry};
