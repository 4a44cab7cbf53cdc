//! FILENAME: engine/src/position.rs
//! PURPOSE: Grid coordinates, printable-area sizes, and A1-style labels.
//! CONTEXT: This module defines the `Position` value type used to key cells
//! and the conversions between A1-style notation (e.g. "A1", "AA100") and
//! 0-based (row, col) numeric indices used internally.
//! Column "A" = 0, "B" = 1, ..., "Z" = 25, "AA" = 26, etc.
//! Row 1 in A1 notation = row 0 internally.

use serde::{Deserialize, Serialize};

/// Maximum number of rows a sheet can address.
pub const MAX_ROWS: i32 = 16_384;

/// Maximum number of columns a sheet can address.
pub const MAX_COLS: i32 = 16_384;

const LETTERS_IN_ALPHABET: i32 = 26;
const MAX_LETTER_COUNT: usize = 3;

/// A cell coordinate as (row, col) with 0-based indices.
/// Ordered by row first, then column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    /// The sentinel returned when reference text does not name a position.
    pub const NONE: Position = Position { row: -1, col: -1 };

    pub fn new(row: i32, col: i32) -> Self {
        Position { row, col }
    }

    /// Returns true if the coordinate lies within the addressable grid.
    pub fn is_valid(&self) -> bool {
        self.row >= 0 && self.col >= 0 && self.row < MAX_ROWS && self.col < MAX_COLS
    }

    /// Parses an A1-style label ("A1", "AA100") into a coordinate.
    ///
    /// The text is split into a leading run of uppercase letters (at most
    /// three) and a trailing run that must be a positive decimal number with
    /// no other characters. Any violation yields `Position::NONE`. A label
    /// that parses but lies outside the grid (row or column too large) is
    /// returned as-is and reports `is_valid() == false`.
    pub fn from_string(s: &str) -> Position {
        let split = s
            .find(|c: char| !c.is_ascii_uppercase())
            .unwrap_or(s.len());
        let (letters, digits) = s.split_at(split);

        if letters.is_empty() || digits.is_empty() {
            return Position::NONE;
        }

        if letters.len() > MAX_LETTER_COUNT {
            return Position::NONE;
        }

        if digits.bytes().any(|b| !b.is_ascii_digit()) {
            return Position::NONE;
        }

        // Rejects rows that overflow i32 as well as malformed digit runs.
        let row: i32 = match digits.parse() {
            Ok(n) => n,
            Err(_) => return Position::NONE,
        };

        if row == 0 {
            return Position::NONE;
        }

        Position::new(row - 1, col_to_index(letters))
    }
}

/// The A1-style label of a position; an invalid position formats as "".
impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.is_valid() {
            return Ok(());
        }
        write!(f, "{}{}", index_to_col(self.col), self.row + 1)
    }
}

/// A non-negative (rows, cols) rectangle, used for the printable area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub rows: i32,
    pub cols: i32,
}

/// Converts a column string (e.g., "A", "AA", "ABC") to a 0-based column index.
/// "A" -> 0, "B" -> 1, ..., "Z" -> 25, "AA" -> 26, "AB" -> 27, etc.
pub fn col_to_index(col_str: &str) -> i32 {
    let mut result: i32 = 0;
    for c in col_str.chars() {
        let digit = (c.to_ascii_uppercase() as i32) - ('A' as i32) + 1;
        result = result * LETTERS_IN_ALPHABET + digit;
    }
    result - 1 // Convert to 0-based
}

/// Converts a 0-based column index to a column string.
/// 0 -> "A", 1 -> "B", ..., 25 -> "Z", 26 -> "AA", 27 -> "AB", etc.
pub fn index_to_col(col_index: i32) -> String {
    let mut result = String::new();
    let mut c = col_index;
    while c >= 0 {
        let remainder = (c % LETTERS_IN_ALPHABET) as u8;
        result.insert(0, (b'A' + remainder) as char);
        c = c / LETTERS_IN_ALPHABET - 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col_to_index() {
        assert_eq!(col_to_index("A"), 0);
        assert_eq!(col_to_index("B"), 1);
        assert_eq!(col_to_index("Z"), 25);
        assert_eq!(col_to_index("AA"), 26);
        assert_eq!(col_to_index("AB"), 27);
        assert_eq!(col_to_index("AZ"), 51);
        assert_eq!(col_to_index("BA"), 52);
        assert_eq!(col_to_index("ZZ"), 701);
        assert_eq!(col_to_index("AAA"), 702);
    }

    #[test]
    fn test_index_to_col() {
        assert_eq!(index_to_col(0), "A");
        assert_eq!(index_to_col(1), "B");
        assert_eq!(index_to_col(25), "Z");
        assert_eq!(index_to_col(26), "AA");
        assert_eq!(index_to_col(27), "AB");
        assert_eq!(index_to_col(51), "AZ");
        assert_eq!(index_to_col(52), "BA");
        assert_eq!(index_to_col(701), "ZZ");
        assert_eq!(index_to_col(702), "AAA");
    }

    #[test]
    fn test_column_roundtrip() {
        for i in 0..1000 {
            let col_str = index_to_col(i);
            let back = col_to_index(&col_str);
            assert_eq!(back, i, "Roundtrip failed for index {}", i);
        }
    }

    #[test]
    fn test_label_boundaries() {
        assert_eq!(Position::new(0, 0).to_string(), "A1");
        assert_eq!(Position::new(0, 25).to_string(), "Z1");
        assert_eq!(Position::new(0, 26).to_string(), "AA1");
        assert_eq!(Position::new(0, 701).to_string(), "ZZ1");
        assert_eq!(Position::new(0, 702).to_string(), "AAA1");
        assert_eq!(
            Position::new(MAX_ROWS - 1, MAX_COLS - 1).to_string(),
            format!("{}{}", index_to_col(MAX_COLS - 1), MAX_ROWS)
        );
    }

    #[test]
    fn test_invalid_position_formats_empty() {
        assert_eq!(Position::NONE.to_string(), "");
        assert_eq!(Position::new(-5, 2).to_string(), "");
        assert_eq!(Position::new(MAX_ROWS, 0).to_string(), "");
    }

    #[test]
    fn test_from_string() {
        assert_eq!(Position::from_string("A1"), Position::new(0, 0));
        assert_eq!(Position::from_string("B2"), Position::new(1, 1));
        assert_eq!(Position::from_string("AA100"), Position::new(99, 26));
        assert_eq!(Position::from_string("ZZ1"), Position::new(0, 701));
    }

    #[test]
    fn test_from_string_rejects_malformed_text() {
        assert_eq!(Position::from_string(""), Position::NONE);
        assert_eq!(Position::from_string("A"), Position::NONE);
        assert_eq!(Position::from_string("12"), Position::NONE);
        assert_eq!(Position::from_string("A0"), Position::NONE);
        assert_eq!(Position::from_string("a1"), Position::NONE);
        assert_eq!(Position::from_string("A1x"), Position::NONE);
        assert_eq!(Position::from_string("A+1"), Position::NONE);
        assert_eq!(Position::from_string("AAAA1"), Position::NONE);
        assert_eq!(Position::from_string("A99999999999"), Position::NONE);
    }

    #[test]
    fn test_from_string_keeps_out_of_range_coordinates() {
        // Parsable but unaddressable: not NONE, just invalid.
        let below = Position::from_string("A20000");
        assert_eq!(below, Position::new(19_999, 0));
        assert!(!below.is_valid());
    }

    #[test]
    fn test_position_roundtrip() {
        let positions = [
            Position::new(0, 0),
            Position::new(49, 25),
            Position::new(99, 26),
            Position::new(MAX_ROWS - 1, MAX_COLS - 1),
        ];
        for pos in positions {
            assert_eq!(Position::from_string(&pos.to_string()), pos);
        }
    }

    #[test]
    fn test_ordering() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
    }

    #[test]
    fn test_serde_roundtrip() {
        let pos = Position::new(3, 4);
        let json = serde_json::to_string(&pos).unwrap();
        assert_eq!(serde_json::from_str::<Position>(&json).unwrap(), pos);

        let size = Size { rows: 2, cols: 7 };
        let json = serde_json::to_string(&size).unwrap();
        assert_eq!(serde_json::from_str::<Size>(&json).unwrap(), size);
    }
}
