//! Helvetica font metrics and WinAnsi text encoding.
//!
//! The documents only use the two standard Type1 faces, which every PDF viewer
//! ships, so widths come from their published AFM tables instead of a font file.

/// One of the two faces used in the documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    /// Resource name the face is registered under in every document.
    pub fn resource_name(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    pub fn base_font(self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }
}

/// Advance widths (1/1000 em) for bytes 32..=126.
#[rustfmt::skip]
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// WinAnsi code for the bullet glyph.
pub const BULLET: u8 = 149;

/// WinAnsi code for the horizontal ellipsis.
pub const ELLIPSIS: u8 = 133;

fn glyph_width(face: FontFace, byte: u8) -> u16 {
    match byte {
        32..=126 => {
            let table = match face {
                FontFace::Regular => &HELVETICA_ASCII,
                FontFace::Bold => &HELVETICA_BOLD_ASCII,
            };
            table[usize::from(byte - 32)]
        }
        BULLET => 350,
        ELLIPSIS | 151 => 1000,
        150 => 556,
        145 | 146 => match face {
            FontFace::Regular => 222,
            FontFace::Bold => 278,
        },
        147 | 148 => match face {
            FontFace::Regular => 333,
            FontFace::Bold => 500,
        },
        // Latin-1 letters are close enough to the digit width
        _ => 556,
    }
}

/// Map a character to its WinAnsi byte. Characters outside the encoding become `?`.
pub fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '\u{2022}' => BULLET,
        '\u{2026}' => ELLIPSIS,
        '\u{2013}' => 150,
        '\u{2014}' => 151,
        '\u{2018}' => 145,
        '\u{2019}' => 146,
        '\u{201c}' => 147,
        '\u{201d}' => 148,
        '\t' => b' ',
        _ => b'?',
    }
}

pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

/// Width of `text` in points when set in `face` at `size`.
pub fn text_width(text: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| u32::from(glyph_width(face, win_ansi_byte(c))))
        .sum();
    units as f32 * size / 1000.0
}
