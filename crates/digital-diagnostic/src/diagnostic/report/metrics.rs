//! Advance widths of the standard Helvetica faces, in 1/1000 em.
//!
//! Values come from the Adobe core font metrics and are indexed by WinAnsiEncoding byte.

/// Printable ASCII (0x20..=0x7e) for Helvetica.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Printable ASCII (0x20..=0x7e) for Helvetica-Bold.
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // '0'..'?'
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 'P'..'_'
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // '`'..'o'
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 'p'..'~'
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Face {
    Regular,
    Bold,
}

impl Face {
    pub(crate) const fn resource(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold => "F2",
        }
    }

    fn ascii(self) -> &'static [u16; 95] {
        match self {
            Face::Regular => &HELVETICA_ASCII,
            Face::Bold => &HELVETICA_BOLD_ASCII,
        }
    }

    /// Advance width of one WinAnsi byte.
    pub(crate) fn glyph_width(self, byte: u8) -> u16 {
        if (0x20..=0x7e).contains(&byte) {
            return self.ascii()[usize::from(byte - 0x20)];
        }
        if let Some(base) = accented_base(byte) {
            return self.glyph_width(base);
        }

        let bold = self == Face::Bold;
        match byte {
            0x85 | 0x97 | 0x8c => 1000,
            0x91 | 0x92 => if bold { 278 } else { 222 },
            0x82 => if bold { 278 } else { 222 },
            0x93 | 0x94 | 0x84 => if bold { 500 } else { 333 },
            0x95 => 350,
            0x9c => 944,
            0xa0 => 278,
            0xb0 => 400,
            0xc6 => 1000,
            0xe6 => 889,
            0xd7 | 0xf7 => 584,
            0xdf => 611,
            0xec..=0xef | 0xcc..=0xcf => 278,
            _ => 556,
        }
    }

    /// Width of `encoded` WinAnsi text set at `size` points.
    pub(crate) fn text_width(self, encoded: &[u8], size: f32) -> f32 {
        let units: u32 = encoded
            .iter()
            .map(|byte| u32::from(self.glyph_width(*byte)))
            .sum();
        units as f32 * size / 1000.0
    }
}

/// Unaccented letter whose advance an accented Latin-1 letter shares.
fn accented_base(byte: u8) -> Option<u8> {
    let base = match byte {
        0xc0..=0xc5 => b'A',
        0xc7 => b'C',
        0xc8..=0xcb => b'E',
        0xd1 => b'N',
        0xd2..=0xd6 | 0xd8 => b'O',
        0xd9..=0xdc => b'U',
        0xdd | 0x9f => b'Y',
        0xe0..=0xe5 => b'a',
        0xe7 => b'c',
        0xe8..=0xeb => b'e',
        0xf1 => b'n',
        0xf2..=0xf6 | 0xf8 => b'o',
        0xf9..=0xfc => b'u',
        0xfd | 0xff => b'y',
        0xfe => b'p',
        _ => return None,
    };
    Some(base)
}
