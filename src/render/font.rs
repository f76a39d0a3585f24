//! Standard-14 Helvetica metrics and WinAnsi text encoding.

use unicode_normalization::UnicodeNormalization;

/// Glyph widths (1/1000 em) for U+0020..=U+007E.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

/// WinAnsi code points 0x80..=0x9F that differ from Latin-1.
const WIN_ANSI_SPECIALS: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

/// Width used for glyphs without a metric.
const DEFAULT_WIDTH: u16 = 556;

/// Fonts available to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    /// Helvetica
    Helvetica,
    /// Helvetica-Bold
    HelveticaBold,
}

impl Font {
    /// All fonts, in resource order.
    pub const ALL: [Font; 2] = [Font::Helvetica, Font::HelveticaBold];

    /// PostScript base font name.
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Name of the font in page resources.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of a character in 1/1000 em.
    pub fn char_width(self, c: char) -> u16 {
        let widths = self.widths();
        match c {
            ' '..='~' => widths[c as usize - 0x20],
            '\t' | '\u{00A0}' => widths[0],
            '\u{2018}' | '\u{2019}' | '\u{201A}' => 222,
            '\u{201C}' | '\u{201D}' | '\u{201E}' => 333,
            '\u{2022}' => 350,
            '\u{2013}' => 556,
            '\u{2014}' | '\u{2026}' | '\u{2030}' => 1000,
            _ => {
                // Accented letters take the width of their base letter
                match c.nfd().next() {
                    Some(base) if base != c && (' '..='~').contains(&base) => {
                        widths[base as usize - 0x20]
                    }
                    _ => DEFAULT_WIDTH,
                }
            }
        }
    }

    /// Width of `text` in points at `size`.
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 * size / 1000.0
    }
}

/// Encode text for a simple font with `WinAnsiEncoding`.
///
/// Characters outside the encoding become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{00A0}'..='\u{00FF}' => c as u32 as u8,
        _ => WIN_ANSI_SPECIALS
            .iter()
            .find(|(special, _)| *special == c)
            .map(|(_, byte)| *byte)
            .unwrap_or(b'?'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_widths() {
        assert_eq!(Font::Helvetica.char_width(' '), 278);
        assert_eq!(Font::Helvetica.char_width('W'), 944);
        assert_eq!(Font::Helvetica.char_width('i'), 222);
        assert_eq!(Font::Helvetica.char_width('~'), 584);
        assert_eq!(Font::HelveticaBold.char_width('i'), 278);
        assert_eq!(Font::HelveticaBold.char_width('m'), 889);
    }

    #[test]
    fn test_accented_width_follows_base_letter() {
        assert_eq!(
            Font::Helvetica.char_width('\u{00e9}'),
            Font::Helvetica.char_width('e')
        );
        assert_eq!(Font::Helvetica.char_width('\u{4e2d}'), DEFAULT_WIDTH);
    }

    #[test]
    fn test_text_width() {
        // "Hi" = 722 + 222
        let width = Font::Helvetica.text_width("Hi", 10.0);
        assert!((width - 9.44).abs() < 1e-4);
        assert_eq!(Font::Helvetica.text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Hello"), b"Hello".to_vec());
        assert_eq!(encode_win_ansi("caf\u{00e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("\u{2019}\u{20AC}"), vec![0x92, 0x80]);
        assert_eq!(encode_win_ansi("\u{4e2d}"), vec![b'?']);
    }
}
