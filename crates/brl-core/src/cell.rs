use std::fmt;

use crate::error::FormatError;

/// Braille base codepoint (U+2800, blank cell).
pub const BRAILLE_BASE: u32 = 0x2800;

/// Last six-dot codepoint (U+283F, dots 1 to 6 raised).
pub const SIX_DOT_LAST: u32 = 0x283F;

/// Number of dot positions in a cell.
pub const DOTS_PER_CELL: usize = 6;

/// One six-dot braille cell.
///
/// Stored as a 6-bit mask where bit `n - 1` is dot `n`, which is exactly
/// the offset of the cell in the Unicode braille block:
/// ```text
///  1 4
///  2 5
///  3 6
/// ```
///
/// # Example
/// ```
/// use brl_core::Cell;
/// let h = Cell::from_dots(&[1, 2, 5]).unwrap();
/// assert_eq!(h.to_char(), '⠓');
/// assert_eq!(h.bits(), [1, 1, 0, 0, 1, 0]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell(u8);

impl Cell {
    /// Cell with no raised dot (U+2800).
    pub const BLANK: Self = Self(0);
    /// Cell with all six dots raised (U+283F).
    pub const FULL: Self = Self(0b11_1111);

    /// Build a cell from its 6-bit mask. Returns `None` above `0b111111`.
    #[must_use]
    pub const fn from_mask(mask: u8) -> Option<Self> {
        if mask <= Self::FULL.0 {
            Some(Self(mask))
        } else {
            None
        }
    }

    /// Raw 6-bit mask (bit 0 = dot 1).
    #[inline]
    #[must_use]
    pub const fn mask(self) -> u8 {
        self.0
    }

    /// Decode a Unicode braille character.
    ///
    /// `index` is only used to locate the error.
    ///
    /// # Errors
    /// [`FormatError::NotBraille`] for anything outside U+2800..=U+283F,
    /// including the eight-dot part of the block.
    pub fn from_char(ch: char, index: usize) -> Result<Self, FormatError> {
        let code = u32::from(ch);
        if (BRAILLE_BASE..=SIX_DOT_LAST).contains(&code) {
            Ok(Self((code - BRAILLE_BASE) as u8))
        } else {
            Err(FormatError::NotBraille { ch, index })
        }
    }

    /// Unicode braille glyph of this cell.
    #[must_use]
    pub fn to_char(self) -> char {
        char::from_u32(BRAILLE_BASE + u32::from(self.0)).unwrap_or('\u{2800}')
    }

    /// Build a cell from raised dot numbers. Order and repetition are ignored.
    ///
    /// # Errors
    /// [`FormatError::DotOutOfRange`] if a dot is not in 1..=6.
    pub fn from_dots(dots: &[u8]) -> Result<Self, FormatError> {
        let mut mask = 0u8;
        for &dot in dots {
            if !(1..=6).contains(&dot) {
                return Err(FormatError::DotOutOfRange {
                    dot: u32::from(dot),
                });
            }
            mask |= 1 << (dot - 1);
        }
        Ok(Self(mask))
    }

    /// Raised dot numbers, ascending.
    ///
    /// # Example
    /// ```
    /// use brl_core::Cell;
    /// assert_eq!(Cell::from_char('⠕', 0).unwrap().dots(), vec![1, 3, 5]);
    /// assert!(Cell::BLANK.dots().is_empty());
    /// ```
    #[must_use]
    pub fn dots(self) -> Vec<u8> {
        (1..=6).filter(|&d| self.is_raised(d)).collect()
    }

    /// True if dot `dot` (1..=6) is raised. Out-of-range dots are never raised.
    #[inline]
    #[must_use]
    pub fn is_raised(self, dot: u8) -> bool {
        (1..=6).contains(&dot) && self.0 & (1 << (dot - 1)) != 0
    }

    /// Build a cell from an ordered binary vector `[d1, d2, d3, d4, d5, d6]`.
    ///
    /// `index` is the cell position in the input, only used in errors.
    ///
    /// # Errors
    /// [`FormatError::VectorLength`] unless the vector has six elements,
    /// [`FormatError::InvalidBit`] for values other than 0 or 1.
    pub fn from_bits(bits: &[i64], index: usize) -> Result<Self, FormatError> {
        if bits.len() != DOTS_PER_CELL {
            return Err(FormatError::VectorLength {
                index,
                len: bits.len(),
            });
        }
        let mut mask = 0u8;
        for (i, &bit) in bits.iter().enumerate() {
            match bit {
                0 => {}
                1 => mask |= 1 << i,
                value => return Err(FormatError::InvalidBit { index, value }),
            }
        }
        Ok(Self(mask))
    }

    /// Ordered binary vector `[d1, d2, d3, d4, d5, d6]`, 1 = raised.
    #[must_use]
    pub fn bits(self) -> [u8; DOTS_PER_CELL] {
        let mut out = [0u8; DOTS_PER_CELL];
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = (self.0 >> i) & 1;
        }
        out
    }

    /// Dot-number notation: raised dots concatenated (`"125"`), `"0"` if blank.
    #[must_use]
    pub fn dot_string(self) -> String {
        if self.0 == 0 {
            return "0".to_string();
        }
        self.dots().iter().map(|d| char::from(b'0' + d)).collect()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_full_codepoints() {
        assert_eq!(Cell::BLANK.to_char(), '\u{2800}');
        assert_eq!(Cell::FULL.to_char(), '\u{283F}');
        assert_eq!(Cell::FULL.bits(), [1; 6]);
        assert_eq!(Cell::BLANK.dot_string(), "0");
    }

    #[test]
    fn every_mask_survives_all_representations() {
        for mask in 0..=0b11_1111u8 {
            let cell = Cell::from_mask(mask).unwrap();
            assert_eq!(Cell::from_char(cell.to_char(), 0).unwrap(), cell);
            assert_eq!(Cell::from_dots(&cell.dots()).unwrap(), cell);
            let bits: Vec<i64> = cell.bits().iter().map(|&b| i64::from(b)).collect();
            assert_eq!(Cell::from_bits(&bits, 0).unwrap(), cell);
        }
    }

    #[test]
    fn mask_above_six_dots_is_rejected() {
        assert!(Cell::from_mask(0b100_0000).is_none());
    }

    #[test]
    fn eight_dot_glyph_is_not_a_cell() {
        let err = Cell::from_char('\u{2840}', 7).unwrap_err();
        assert!(matches!(err, FormatError::NotBraille { index: 7, .. }));
        assert!(Cell::from_char('a', 0).is_err());
    }

    #[test]
    fn dot_seven_is_out_of_range() {
        let err = Cell::from_dots(&[1, 7]).unwrap_err();
        assert!(matches!(err, FormatError::DotOutOfRange { dot: 7 }));
        assert!(Cell::from_dots(&[0]).is_err());
    }

    #[test]
    fn binary_vector_validation() {
        assert!(matches!(
            Cell::from_bits(&[1, 0, 0], 4),
            Err(FormatError::VectorLength { index: 4, len: 3 })
        ));
        assert!(matches!(
            Cell::from_bits(&[1, 0, 0, 2, 0, 0], 1),
            Err(FormatError::InvalidBit { index: 1, value: 2 })
        ));
    }

    #[test]
    fn dot_order_follows_numbering() {
        // dot 4 = top of right column
        let c = Cell::from_bits(&[0, 0, 0, 1, 0, 0], 0).unwrap();
        assert_eq!(c.dots(), vec![4]);
        assert_eq!(c.to_char(), '⠈');
        assert_eq!(c.dot_string(), "4");
    }
}
