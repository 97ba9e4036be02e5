use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cell::{BRAILLE_BASE, Cell, DOTS_PER_CELL};
use crate::error::{CoreError, FormatError};

/// Braille encoding selectable on the command line.
///
/// # Example
/// ```
/// use brl_core::Format;
/// let f: Format = "dots".parse().unwrap();
/// assert_eq!(f, Format::Dots);
/// assert_eq!(Format::default(), Format::Unicode);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Unicode braille glyphs (U+2800..=U+283F).
    #[default]
    Unicode,
    /// Dot numbers per cell, `"125 15 0"`.
    Dots,
    /// JSON array of six-element 0/1 vectors.
    Binary,
    /// Input only: guess among the three others.
    Auto,
}

impl FromStr for Format {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unicode" => Ok(Self::Unicode),
            "dots" => Ok(Self::Dots),
            "binary" => Ok(Self::Binary),
            "auto" => Ok(Self::Auto),
            _ => Err(CoreError::Unsupported {
                value: s.to_string(),
                expected: "unicode, dots, binary, auto",
            }),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unicode => "unicode",
            Self::Dots => "dots",
            Self::Binary => "binary",
            Self::Auto => "auto",
        })
    }
}

/// Braille as ordered lines of cells.
///
/// Line breaks of the source text are kept as separate lines. The binary
/// encoding has no line notion: [`BrailleText::flatten`] puts a blank cell
/// where each line break was.
///
/// # Example
/// ```
/// use brl_core::{BrailleText, Format};
/// let text = BrailleText::parse("⠓⠊\n⠕", Format::Unicode).unwrap();
/// assert_eq!(text.lines.len(), 2);
/// assert_eq!(text.to_dots(), "125 24\n135");
/// assert_eq!(text.to_binary_json().unwrap(),
///     "[[1,1,0,0,1,0],[0,1,0,1,0,0],[0,0,0,0,0,0],[1,0,1,0,1,0]]");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BrailleText {
    /// Cells of each line, in reading order.
    pub lines: Vec<Vec<Cell>>,
}

impl BrailleText {
    /// Single-line braille from a flat cell sequence.
    #[must_use]
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self { lines: vec![cells] }
    }

    /// Parse `input` in the given encoding. [`Format::Auto`] calls [`detect`].
    ///
    /// # Errors
    /// Any [`FormatError`] of the selected decoder.
    pub fn parse(input: &str, format: Format) -> Result<Self, FormatError> {
        match format {
            Format::Unicode => Self::from_unicode(input),
            Format::Dots => Self::from_dots(input),
            Format::Binary => Self::from_binary(input),
            Format::Auto => Self::parse(input, detect(input)?),
        }
    }

    /// Decode Unicode braille. An ASCII space reads as a blank cell,
    /// `\r` before a line break is ignored.
    ///
    /// # Errors
    /// [`FormatError::NotBraille`] on the first foreign character.
    pub fn from_unicode(input: &str) -> Result<Self, FormatError> {
        let mut lines = Vec::new();
        for line in input.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let cells = line
                .chars()
                .enumerate()
                .map(|(i, ch)| {
                    if ch == ' ' {
                        Ok(Cell::BLANK)
                    } else {
                        Cell::from_char(ch, i)
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            lines.push(cells);
        }
        Ok(Self { lines })
    }

    /// Decode dot-number notation: whitespace-separated cells, each either
    /// `0` (blank) or dot digits, optionally dash-separated (`145`, `1-4-5`).
    ///
    /// # Errors
    /// [`FormatError::DotOutOfRange`] for digits 7 to 9,
    /// [`FormatError::InvalidDotToken`] for anything else malformed.
    pub fn from_dots(input: &str) -> Result<Self, FormatError> {
        let mut lines = Vec::new();
        for line in input.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            let cells = line
                .split_whitespace()
                .map(parse_dot_token)
                .collect::<Result<Vec<_>, _>>()?;
            lines.push(cells);
        }
        Ok(Self { lines })
    }

    /// Decode binary cells, either a JSON array of six-element arrays
    /// (`[[1,0,0,0,0,0]]`) or a bare bit string whose length is a multiple
    /// of six (`"100000 110000"`, whitespace ignored). Always one line.
    ///
    /// # Errors
    /// [`FormatError::Json`], [`FormatError::VectorLength`] or
    /// [`FormatError::InvalidBit`].
    pub fn from_binary(input: &str) -> Result<Self, FormatError> {
        let trimmed = input.trim();
        if trimmed.starts_with('[') {
            let vectors: Vec<Vec<i64>> = serde_json::from_str(trimmed)?;
            let cells = vectors
                .iter()
                .enumerate()
                .map(|(i, v)| Cell::from_bits(v, i))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::from_cells(cells));
        }

        let bits: Vec<i64> = trimmed
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_digit(10).map_or(-1, i64::from))
            .collect();
        if !bits.len().is_multiple_of(DOTS_PER_CELL) {
            return Err(FormatError::VectorLength {
                index: bits.len() / DOTS_PER_CELL,
                len: bits.len() % DOTS_PER_CELL,
            });
        }
        let cells = bits
            .chunks(DOTS_PER_CELL)
            .enumerate()
            .map(|(i, chunk)| Cell::from_bits(chunk, i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_cells(cells))
    }

    /// Unicode glyphs, lines joined by `\n`.
    #[must_use]
    pub fn to_unicode(&self) -> String {
        self.lines
            .iter()
            .map(|line| line.iter().map(|c| c.to_char()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Dot numbers, cells separated by a space, lines by `\n`.
    #[must_use]
    pub fn to_dots(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                line.iter()
                    .map(|c| c.dot_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Binary vectors of [`BrailleText::flatten`].
    #[must_use]
    pub fn to_binary(&self) -> Vec<[u8; DOTS_PER_CELL]> {
        self.flatten().into_iter().map(Cell::bits).collect()
    }

    /// Compact JSON of [`BrailleText::to_binary`].
    ///
    /// # Errors
    /// [`FormatError::Json`] if serialization fails.
    pub fn to_binary_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string(&self.to_binary())?)
    }

    /// Encode in `format`. [`Format::Auto`] encodes as unicode.
    ///
    /// # Errors
    /// Only binary serialization can fail.
    pub fn encode(&self, format: Format) -> Result<String, FormatError> {
        match format {
            Format::Unicode | Format::Auto => Ok(self.to_unicode()),
            Format::Dots => Ok(self.to_dots()),
            Format::Binary => self.to_binary_json(),
        }
    }

    /// All cells in reading order, a blank cell between consecutive lines.
    #[must_use]
    pub fn flatten(&self) -> Vec<Cell> {
        let mut out = Vec::with_capacity(self.cell_count() + self.lines.len());
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push(Cell::BLANK);
            }
            out.extend_from_slice(line);
        }
        out
    }

    /// Number of cells over all lines.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.lines.iter().map(Vec::len).sum()
    }

    /// True when no line holds a cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cell_count() == 0
    }
}

fn parse_dot_token(token: &str) -> Result<Cell, FormatError> {
    if token == "0" {
        return Ok(Cell::BLANK);
    }
    let invalid = || FormatError::InvalidDotToken {
        token: token.to_string(),
    };
    if token.starts_with('-') || token.ends_with('-') || token.contains("--") {
        return Err(invalid());
    }
    let mut dots = Vec::with_capacity(DOTS_PER_CELL);
    for ch in token.chars().filter(|&c| c != '-') {
        let dot = ch.to_digit(10).ok_or_else(invalid)?;
        match dot {
            0 => return Err(invalid()),
            1..=6 => dots.push(dot as u8),
            _ => return Err(FormatError::DotOutOfRange { dot }),
        }
    }
    Cell::from_dots(&dots)
}

/// Guess the encoding of reverse-translation input.
///
/// - starts with `[` → binary (JSON)
/// - every character other than space, `\n` or `\r` is in the braille
///   block → unicode
/// - every token is six 0/1 digits → binary (bit string)
/// - only digits, `-` and whitespace → dots
///
/// # Errors
/// [`FormatError::Undetected`] when nothing matches.
///
/// # Example
/// ```
/// use brl_core::Format;
/// use brl_core::format::detect;
/// assert_eq!(detect("⠓⠑").unwrap(), Format::Unicode);
/// assert_eq!(detect("125 15").unwrap(), Format::Dots);
/// assert_eq!(detect("[[1,0,0,0,0,0]]").unwrap(), Format::Binary);
/// assert_eq!(detect("110010 100010").unwrap(), Format::Binary);
/// assert!(detect("hello").is_err());
/// ```
pub fn detect(input: &str) -> Result<Format, FormatError> {
    let trimmed = input.trim();
    if trimmed.starts_with('[') {
        return Ok(Format::Binary);
    }
    // only the separators `from_unicode` reads
    let braille_block = BRAILLE_BASE..=0x28FF;
    if input
        .chars()
        .filter(|c| !matches!(c, ' ' | '\n' | '\r'))
        .all(|c| braille_block.contains(&u32::from(c)))
    {
        return Ok(Format::Unicode);
    }
    if trimmed.is_empty() {
        return Ok(Format::Dots);
    }
    if trimmed
        .split_whitespace()
        .all(|t| t.len() == DOTS_PER_CELL && t.chars().all(|c| c == '0' || c == '1'))
    {
        return Ok(Format::Binary);
    }
    if trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || c == '-' || c.is_whitespace())
    {
        return Ok(Format::Dots);
    }
    Err(FormatError::Undetected)
}
