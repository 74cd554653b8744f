//! Tiny built-in bitmap font for frame annotations.
//!
//! Glyphs are 3x5 cells drawn at an integer scale straight into an RGB8
//! buffer, so rendering does not depend on any font installed on the host.
//! Lowercase letters are drawn with the uppercase glyphs.

/// Glyph cell width in font pixels.
const GLYPH_WIDTH: u32 = 3;
/// Glyph cell height in font pixels.
const GLYPH_HEIGHT: u32 = 5;

const fn glyph_bits(ch: char) -> [u8; 5] {
    match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b111, 0b001, 0b001, 0b101, 0b111],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'Q' => [0b111, 0b101, 0b101, 0b111, 0b011],
        'R' => [0b111, 0b101, 0b111, 0b110, 0b101],
        'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        ';' => [0b000, 0b010, 0b000, 0b010, 0b100],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '%' => [0b101, 0b001, 0b010, 0b100, 0b101],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b010, 0b000, 0b010],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '*' => [0b000, 0b101, 0b010, 0b101, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _ => [0b111, 0b101, 0b010, 0b010, 0b111],
    }
}

/// Writes text into a borrowed RGB8 pixel buffer.
pub struct TextPainter<'a> {
    buffer: &'a mut [u8],
    width: u32,
    height: u32,
    scale: u32,
}

impl<'a> TextPainter<'a> {
    /// `buffer` must hold `width * height` RGB8 pixels.
    pub fn new(buffer: &'a mut [u8], width: u32, height: u32, scale: u32) -> Self {
        debug_assert_eq!(buffer.len(), (width * height * 3) as usize);
        Self {
            buffer,
            width,
            height,
            scale: scale.max(1),
        }
    }

    /// Horizontal distance between two characters, in pixels.
    pub fn advance(&self) -> u32 {
        (GLYPH_WIDTH + 1) * self.scale
    }

    /// Height of a line of text, in pixels.
    pub fn line_height(&self) -> u32 {
        GLYPH_HEIGHT * self.scale
    }

    /// Width of a rendered string, in pixels.
    pub fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * self.advance()
    }

    /// Draw a string with its top-left corner at `(x, y)`. Pixels falling off
    /// the canvas are clipped, including for negative coordinates.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, color: [u8; 3]) {
        let mut cursor = x;
        for ch in text.chars() {
            self.draw_char(cursor, y, ch, color);
            cursor += self.advance() as i32;
        }
    }

    /// Draw a string top to bottom, one character per line.
    pub fn draw_vertical(&mut self, x: i32, y: i32, text: &str, color: [u8; 3]) {
        let pitch = (self.line_height() + self.scale) as i32;
        let mut cursor = y;
        for ch in text.chars() {
            self.draw_char(x, cursor, ch, color);
            cursor += pitch;
        }
    }

    fn draw_char(&mut self, x: i32, y: i32, ch: char, color: [u8; 3]) {
        let glyph = glyph_bits(ch.to_ascii_uppercase());
        for (row, pattern) in glyph.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if (pattern >> (GLYPH_WIDTH - 1 - col)) & 1 == 1 {
                    let px = x + (col * self.scale) as i32;
                    let py = y + (row as u32 * self.scale) as i32;
                    self.fill_block(px, py, color);
                }
            }
        }
    }

    fn fill_block(&mut self, x: i32, y: i32, color: [u8; 3]) {
        for dy in 0..self.scale as i32 {
            for dx in 0..self.scale as i32 {
                self.put_pixel(x + dx, y + dy, color);
            }
        }
    }

    fn put_pixel(&mut self, x: i32, y: i32, color: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = ((y as u32 * self.width + x as u32) * 3) as usize;
        self.buffer[idx..idx + 3].copy_from_slice(&color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draws_scaled_glyph() {
        let (width, height) = (16, 12);
        let mut buffer = vec![255u8; (width * height * 3) as usize];
        let mut painter = TextPainter::new(&mut buffer, width, height, 2);
        painter.draw_text(0, 0, "1", [0, 0, 0]);

        // Top row of '1' is 0b010: only the middle column is set.
        let pixel = |x: u32, y: u32| {
            let idx = ((y * width + x) * 3) as usize;
            [buffer[idx], buffer[idx + 1], buffer[idx + 2]]
        };
        assert_eq!(pixel(0, 0), [255, 255, 255]);
        assert_eq!(pixel(2, 0), [0, 0, 0]);
        assert_eq!(pixel(3, 1), [0, 0, 0]);
        assert_eq!(pixel(4, 0), [255, 255, 255]);
    }

    #[test]
    fn test_clips_outside_canvas() {
        let (width, height) = (8, 8);
        let mut buffer = vec![0u8; (width * height * 3) as usize];
        let mut painter = TextPainter::new(&mut buffer, width, height, 3);
        painter.draw_text(-5, -5, "MB merged", [1, 2, 3]);
        painter.draw_vertical(6, 4, "_a", [1, 2, 3]);
        painter.draw_text(100, 100, "GB", [1, 2, 3]);
    }

    #[test]
    fn test_text_metrics() {
        let mut buffer = vec![0u8; 3 * 10 * 10];
        let painter = TextPainter::new(&mut buffer, 10, 10, 2);
        assert_eq!(painter.advance(), 8);
        assert_eq!(painter.line_height(), 10);
        assert_eq!(painter.text_width("12 MB"), 40);
    }
}
