//! Label tables for archive headers and footers
//!
//! A locale only changes the human-readable labels. Structural tokens (the
//! `---` markers, line counts, the `SHA256` key and the digest itself) are the
//! same in every locale.

use std::fmt;
use std::str::FromStr;

/// Display strings used when rendering an archive block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strings {
    pub text_file: &'static str,
    pub binary_file: &'static str,
    pub file_time: &'static str,
    pub text_starts: &'static str,
    pub dump_starts: &'static str,
    pub base64_starts: &'static str,
    pub end_file: &'static str,
}

pub static ENGLISH: Strings = Strings {
    text_file: "Text file",
    binary_file: "Binary file",
    file_time: "Last modified",
    text_starts: "file contents, total lines:",
    dump_starts: "binary file dump, total lines:",
    base64_starts: "base64 encoded contents, total lines:",
    end_file: "end of file",
};

pub static RUSSIAN: Strings = Strings {
    text_file: "Текстовый файл",
    binary_file: "Двоичный файл",
    file_time: "Время модификации",
    text_starts: "начало файла, всего строк:",
    dump_starts: "Начало файла, всего строк:",
    base64_starts: "Начало base64-кодированного файла, всего строк:",
    end_file: "конец файла",
};

/// Supported label locales
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    English,
    Russian,
}

impl Locale {
    /// The label table for this locale
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::English => &ENGLISH,
            Locale::Russian => &RUSSIAN,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::English => write!(f, "en"),
            Locale::Russian => write!(f, "ru"),
        }
    }
}

/// Error returned when a locale name is not recognized
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown locale '{0}'. Expected one of: en, ru")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Locale::English),
            "ru" | "russian" => Ok(Locale::Russian),
            other => Err(UnknownLocale(other.to_string())),
        }
    }
}
