use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Language whose braille tables translate a text segment.
///
/// # Example
/// ```
/// use brl_core::Language;
/// assert_eq!("ko".parse::<Language>().unwrap(), Language::Korean);
/// assert_eq!(Language::English.code(), "en");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Language {
    /// English (US tables).
    #[default]
    #[serde(rename = "en")]
    English,
    /// Korean.
    #[serde(rename = "ko")]
    Korean,
}

impl Language {
    /// Short code used in config sections and on the command line.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Korean => "ko",
        }
    }
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" | "english" => Ok(Self::English),
            "ko" | "korean" => Ok(Self::Korean),
            _ => Err(CoreError::Unsupported {
                value: s.to_string(),
                expected: "en, ko",
            }),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Language implied by a single character, `None` for digits, punctuation,
/// whitespace and anything that is not a letter of a supported script.
#[must_use]
pub fn classify(ch: char) -> Option<Language> {
    match u32::from(ch) {
        // Hangul jamo, compatibility jamo, syllables
        0x1100..=0x11FF | 0x3130..=0x318F | 0xAC00..=0xD7A3 => Some(Language::Korean),
        _ if ch.is_ascii_alphabetic() => Some(Language::English),
        // Latin-1 supplement and Latin extended-A/B letters
        0x00C0..=0x024F if ch.is_alphabetic() => Some(Language::English),
        _ => None,
    }
}

/// Run of a line translated with one language's tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    /// `None` when the whole line has no letter.
    pub language: Option<Language>,
    /// Slice of the source line.
    pub text: &'a str,
}

/// Split a line into runs of a single script.
///
/// A new segment starts at each letter whose script differs from the
/// current one. Characters without a script (digits, punctuation,
/// whitespace) stay in the current segment; when they lead the line they
/// join the first lettered segment.
///
/// # Example
/// ```
/// use brl_core::Language;
/// use brl_core::script::split_segments;
/// let segs = split_segments("1. Hello 안녕!");
/// assert_eq!(segs.len(), 2);
/// assert_eq!(segs[0].text, "1. Hello ");
/// assert_eq!(segs[0].language, Some(Language::English));
/// assert_eq!(segs[1].text, "안녕!");
/// ```
#[must_use]
pub fn split_segments(line: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut current: Option<Language> = None;
    let mut start = 0usize;

    for (i, ch) in line.char_indices() {
        let Some(lang) = classify(ch) else {
            continue;
        };
        match current {
            None => current = Some(lang),
            Some(cur) if cur != lang => {
                segments.push(Segment {
                    language: current,
                    text: &line[start..i],
                });
                start = i;
                current = Some(lang);
            }
            Some(_) => {}
        }
    }

    if start < line.len() {
        segments.push(Segment {
            language: current,
            text: &line[start..],
        });
    }
    segments
}
