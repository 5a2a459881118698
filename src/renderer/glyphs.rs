//! Tiny 5x7 bitmap font
//!
//! Only the characters painted in-game are defined: the brand letters and
//! the pickup's `$`. Each row is 5 bits, most significant bit leftmost.

pub const GLYPH_COLS: u32 = 5;
pub const GLYPH_ROWS: u32 = 7;
/// Horizontal advance in font pixels (one blank column between glyphs)
pub const GLYPH_ADVANCE: u32 = GLYPH_COLS + 1;

const BLANK: [u8; 7] = [0; 7];

/// Bitmap rows for `c`, or `None` if the font has no such glyph
pub fn glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c.to_ascii_uppercase() {
        ' ' => BLANK,
        'A' => [
            0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001,
        ],
        'K' => [
            0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001,
        ],
        'L' => [
            0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111,
        ],
        'N' => [
            0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001,
        ],
        'T' => [
            0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100,
        ],
        'U' => [
            0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110,
        ],
        'X' => [
            0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001,
        ],
        '$' => [
            0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100,
        ],
        _ => return None,
    };
    Some(rows)
}

/// Lit cells of `c` as (column, row) pairs
pub fn lit_cells(c: char) -> impl Iterator<Item = (u32, u32)> {
    let rows = glyph(c).unwrap_or(BLANK);
    (0..GLYPH_ROWS).flat_map(move |row| {
        (0..GLYPH_COLS)
            .filter(move |col| rows[row as usize] & (1 << (GLYPH_COLS - 1 - col)) != 0)
            .map(move |col| (col, row))
    })
}

/// Width of `text` in font pixels (no trailing gap)
pub fn text_columns(text: &str) -> u32 {
    let n = text.chars().count() as u32;
    if n == 0 { 0 } else { n * GLYPH_ADVANCE - 1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{BRAND_BADGE, BRAND_NAME};

    #[test]
    fn test_brand_is_covered() {
        for c in BRAND_NAME.chars().chain(BRAND_BADGE.chars()).chain(['$']) {
            assert!(glyph(c).is_some(), "missing glyph {c:?}");
        }
        assert!(glyph('?').is_none());
    }

    #[test]
    fn test_lit_cells() {
        let t: Vec<_> = lit_cells('T').collect();
        // Full top bar plus a six-cell stem
        assert_eq!(t.len(), 5 + 6);
        assert!(t.contains(&(0, 0)) && t.contains(&(4, 0)));
        assert!(t.contains(&(2, 6)));
        assert_eq!(lit_cells(' ').count(), 0);
    }

    #[test]
    fn test_text_columns() {
        assert_eq!(text_columns(""), 0);
        assert_eq!(text_columns("N"), 5);
        assert_eq!(text_columns("NXT"), 17);
    }
}
