//! Tiny 5x7 bitmap font for the intro caption.
//!
//! Text is rasterized once on the CPU into a white RGBA texture whose alpha
//! is the glyph coverage; the overlay pass draws it centered on screen.
//! Lowercase letters use the uppercase glyphs and anything outside the font
//! is drawn as `?`.

use crate::assets::TextureData;

pub const GLYPH_WIDTH: u32 = 5;
pub const GLYPH_HEIGHT: u32 = 7;
/// Horizontal distance between glyph origins.
pub const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;
/// Vertical distance between line origins.
pub const LINE_ADVANCE: u32 = GLYPH_HEIGHT + 1;

/// Rows top to bottom, lowest five bits, leftmost column in bit 4.
type Glyph = [u8; 7];

const UNKNOWN: Glyph = [0x0E, 0x11, 0x01, 0x02, 0x04, 0x00, 0x04];

fn glyph(ch: char) -> Glyph {
    match ch.to_ascii_uppercase() {
        ' ' => [0x00; 7],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        '"' => [0x0A, 0x0A, 0x0A, 0x00, 0x00, 0x00, 0x00],
        '\'' => [0x0C, 0x04, 0x08, 0x00, 0x00, 0x00, 0x00],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        '-' => [0x00, 0x00, 0x00, 0x1F, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0C, 0x0C],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '?' => UNKNOWN,
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'A' => [0x0E, 0x11, 0x11, 0x11, 0x1F, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1C, 0x12, 0x11, 0x11, 0x11, 0x12, 0x1C],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        _ => UNKNOWN,
    }
}

/// Rasterize `text` into a white RGBA texture with glyph coverage in alpha.
///
/// Lines are split on `\n` and centered. The bitmap keeps a one pixel
/// transparent border so edge texels never bleed when sampled.
pub fn rasterize_text(text: &str) -> TextureData {
    let lines: Vec<Vec<char>> = text.lines().map(|l| l.chars().collect()).collect();
    let columns = lines.iter().map(Vec::len).max().unwrap_or(0) as u32;
    let rows = lines.len().max(1) as u32;

    let width = columns * GLYPH_ADVANCE + 1;
    let height = rows * LINE_ADVANCE + 1;
    let mut data = vec![0u8; (width * height * 4) as usize];

    for (row, line) in lines.iter().enumerate() {
        let indent = (columns - line.len() as u32) * GLYPH_ADVANCE / 2;
        let top = 1 + row as u32 * LINE_ADVANCE;
        for (i, &ch) in line.iter().enumerate() {
            let left = 1 + indent + i as u32 * GLYPH_ADVANCE;
            blit(&mut data, width, left, top, glyph(ch));
        }
    }

    TextureData {
        data,
        width,
        height,
    }
}

fn blit(data: &mut [u8], width: u32, left: u32, top: u32, glyph: Glyph) {
    for (dy, bits) in glyph.iter().enumerate() {
        for dx in 0..GLYPH_WIDTH {
            if bits & (1 << (GLYPH_WIDTH - 1 - dx)) != 0 {
                let idx = (((top + dy as u32) * width + left + dx) * 4) as usize;
                data[idx..idx + 4].copy_from_slice(&[255; 4]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(tex: &TextureData, x: u32, y: u32) -> bool {
        tex.data[((y * tex.width + x) * 4 + 3) as usize] == 255
    }

    #[test]
    fn test_dimensions() {
        let tex = rasterize_text("Nocturne");
        assert_eq!(tex.width, 8 * GLYPH_ADVANCE + 1);
        assert_eq!(tex.height, LINE_ADVANCE + 1);
        assert_eq!(tex.data.len(), (tex.width * tex.height * 4) as usize);
    }

    #[test]
    fn test_border_stays_clear() {
        let tex = rasterize_text("MW");
        for x in 0..tex.width {
            assert!(!lit(&tex, x, 0));
            assert!(!lit(&tex, x, tex.height - 1));
        }
        for y in 0..tex.height {
            assert!(!lit(&tex, 0, y));
            assert!(!lit(&tex, tex.width - 1, y));
        }
    }

    #[test]
    fn test_glyph_pixels() {
        // 'T': full top bar, then a center stem
        let tex = rasterize_text("T");
        for x in 1..=5 {
            assert!(lit(&tex, x, 1));
        }
        assert!(lit(&tex, 3, 7));
        assert!(!lit(&tex, 1, 7));
    }

    #[test]
    fn test_lowercase_uses_uppercase_glyphs() {
        assert_eq!(rasterize_text("night"), rasterize_text("NIGHT"));
    }

    #[test]
    fn test_unknown_chars_render_as_question_mark() {
        assert_eq!(rasterize_text("~"), rasterize_text("?"));
    }

    #[test]
    fn test_lines_are_centered() {
        let tex = rasterize_text("III\nI");
        assert_eq!(tex.height, 2 * LINE_ADVANCE + 1);
        // Second line's single glyph sits under the middle of the first
        let middle_left = 1 + GLYPH_ADVANCE;
        assert!(lit(&tex, middle_left + 2, 1 + LINE_ADVANCE + 3));
        assert!(!lit(&tex, 3, 1 + LINE_ADVANCE + 3));
    }

    #[test]
    fn test_empty_text_is_blank() {
        let tex = rasterize_text("");
        assert_eq!(tex.width, 1);
        assert!(tex.data.iter().all(|&b| b == 0));
    }
}
