//! In-process stand-in for liblouis: grade-1 English letters, digits with
//! the number sign, a capital sign that reverse translation folds away, and
//! a single grade-2 contraction ("the" → ⠮) on `g2` tables.

#![allow(dead_code)]

use std::cell::RefCell;

use brl_core::cell::Cell;
use brl_core::error::EngineError;
use brl_core::traits::{BrailleEngine, Direction};

const LETTERS: [(char, &[u8]); 26] = [
    ('a', &[1]),
    ('b', &[1, 2]),
    ('c', &[1, 4]),
    ('d', &[1, 4, 5]),
    ('e', &[1, 5]),
    ('f', &[1, 2, 4]),
    ('g', &[1, 2, 4, 5]),
    ('h', &[1, 2, 5]),
    ('i', &[2, 4]),
    ('j', &[2, 4, 5]),
    ('k', &[1, 3]),
    ('l', &[1, 2, 3]),
    ('m', &[1, 3, 4]),
    ('n', &[1, 3, 4, 5]),
    ('o', &[1, 3, 5]),
    ('p', &[1, 2, 3, 4]),
    ('q', &[1, 2, 3, 4, 5]),
    ('r', &[1, 2, 3, 5]),
    ('s', &[2, 3, 4]),
    ('t', &[2, 3, 4, 5]),
    ('u', &[1, 3, 6]),
    ('v', &[1, 2, 3, 6]),
    ('w', &[2, 4, 5, 6]),
    ('x', &[1, 3, 4, 6]),
    ('y', &[1, 3, 4, 5, 6]),
    ('z', &[1, 3, 5, 6]),
];

pub const CAPITAL: char = '⠠';
pub const NUMBER: char = '⠼';
pub const THE: char = '⠮';
pub const HANGUL: char = '⠫';
const BLANK: char = '\u{2800}';

fn glyph(dots: &[u8]) -> char {
    Cell::from_dots(dots).unwrap().to_char()
}

fn letter_glyph(letter: char) -> Option<char> {
    LETTERS
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, dots)| glyph(dots))
}

fn glyph_letter(ch: char) -> Option<char> {
    LETTERS
        .iter()
        .find(|(_, dots)| glyph(dots) == ch)
        .map(|(l, _)| *l)
}

fn untranslatable(table: &str, what: char) -> EngineError {
    EngineError::Failed {
        table: table.to_string(),
        code: Some(1),
        stderr: format!("untranslatable {what:?}"),
    }
}

/// Behaviour of the fake for every call.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Working,
    Unreachable,
}

/// Recording fake engine.
pub struct FakeEngine {
    failing: Vec<&'static str>,
    mode: Mode,
    calls: RefCell<Vec<(String, String, Direction)>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self {
            failing: Vec::new(),
            mode: Mode::Working,
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Tables whose name contains one of `tables` fail like a missing table.
    pub fn failing(tables: &[&'static str]) -> Self {
        Self {
            failing: tables.to_vec(),
            ..Self::new()
        }
    }

    /// Every call fails as if the binary were missing.
    pub fn unreachable() -> Self {
        Self {
            mode: Mode::Unreachable,
            ..Self::new()
        }
    }

    /// (input, table list, direction) of every call so far.
    pub fn calls(&self) -> Vec<(String, String, Direction)> {
        self.calls.borrow().clone()
    }

    fn forward_line(line: &str, table: &str, grade2: bool) -> Result<String, EngineError> {
        let mut out = String::new();
        for (i, word) in line.split(' ').enumerate() {
            if i > 0 {
                out.push(BLANK);
            }
            if grade2 && word.eq_ignore_ascii_case("the") {
                out.push(THE);
                continue;
            }
            let mut in_number = false;
            for ch in word.chars() {
                if let Some(d) = ch.to_digit(10) {
                    if !in_number {
                        out.push(NUMBER);
                        in_number = true;
                    }
                    let letter = if d == 0 { 'j' } else { char::from(b'a' + d as u8 - 1) };
                    out.push(letter_glyph(letter).unwrap());
                    continue;
                }
                in_number = false;
                if ch.is_ascii_uppercase() {
                    out.push(CAPITAL);
                }
                match ch.to_ascii_lowercase() {
                    c if c.is_ascii_lowercase() => out.push(letter_glyph(c).unwrap()),
                    '.' => out.push('⠲'),
                    ',' => out.push('⠂'),
                    '\u{AC00}'..='\u{D7A3}' => out.push(HANGUL),
                    other => return Err(untranslatable(table, other)),
                }
            }
        }
        Ok(out)
    }

    fn backward_line(line: &str, table: &str, grade2: bool) -> Result<String, EngineError> {
        let mut out = String::new();
        let mut in_number = false;
        for ch in line.chars() {
            match ch {
                BLANK => {
                    out.push(' ');
                    in_number = false;
                }
                CAPITAL => {}
                NUMBER => in_number = true,
                THE if grade2 => out.push_str("the"),
                '⠲' => out.push('.'),
                '⠂' => out.push(','),
                HANGUL => out.push('가'),
                other => {
                    let letter = glyph_letter(other).ok_or_else(|| untranslatable(table, other))?;
                    if in_number && ('a'..='j').contains(&letter) {
                        let d = if letter == 'j' { 0 } else { letter as u8 - b'a' + 1 };
                        out.push(char::from(b'0' + d));
                    } else {
                        in_number = false;
                        out.push(letter);
                    }
                }
            }
        }
        Ok(out)
    }
}

impl BrailleEngine for FakeEngine {
    fn translate(
        &self,
        input: &str,
        table: &str,
        direction: Direction,
    ) -> Result<String, EngineError> {
        self.calls
            .borrow_mut()
            .push((input.to_string(), table.to_string(), direction));

        if self.mode == Mode::Unreachable {
            return Err(EngineError::Spawn {
                program: "lou_translate".into(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        if self.failing.iter().any(|t| table.contains(t)) {
            return Err(EngineError::Failed {
                table: table.to_string(),
                code: Some(1),
                stderr: "Cannot compile table".into(),
            });
        }

        let grade2 = table.contains("g2");
        let lines = input
            .lines()
            .map(|line| match direction {
                Direction::Forward => Self::forward_line(line, table, grade2),
                Direction::Backward => Self::backward_line(line, table, grade2),
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(lines.join("\n"))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}
