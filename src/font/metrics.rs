//! Advance widths from the Adobe AFM files for the standard Helvetica
//! faces, in 1/1000 em. The ASCII range is tabulated; the handful of
//! WinAnsi punctuation glyphs the renderer actually emits (ellipsis,
//! middle dot, dashes, bullet) are mapped explicitly, and anything else
//! falls back to the width of a typical lowercase glyph so layout stays
//! sane for characters the badge/cell text never should contain anyway.

/// Widths for `!`..=`~` (0x21..0x7E) in Helvetica.
const HELVETICA: [u16; 94] = [
    278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ! " # $ % & ' ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    278, 278, 584, 584, 584, 556, 1015, // : ; < = > ? @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // A-O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // P-Z
    278, 278, 278, 469, 556, 333, // [ \ ] ^ _ `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // a-o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // p-z
    334, 260, 334, 584, // { | } ~
];

/// Widths for `!`..=`~` (0x21..0x7E) in Helvetica-Bold.
const HELVETICA_BOLD: [u16; 94] = [
    333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ! " # $ % & ' ( ) * + , - . /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0-9
    333, 333, 584, 584, 584, 611, 975, // : ; < = > ? @
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // A-O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // P-Z
    333, 278, 333, 584, 556, 333, // [ \ ] ^ _ `
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // a-o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // p-z
    389, 280, 389, 584, // { | } ~
];

fn lookup(table: &[u16; 94], ch: char, fallback: u16) -> u16 {
    match ch {
        ' ' => 278,
        '!'..='~' => table[ch as usize - 0x21],
        '\u{2026}' => 1000, // ellipsis
        '\u{00B7}' => 278,  // middle dot
        '\u{2013}' => 556,  // en dash
        '\u{2014}' => 1000, // em dash
        '\u{2022}' => 350,  // bullet
        '\u{00B0}' => 400,  // degree
        _ => fallback,
    }
}

/// Advance width of `ch` in Helvetica, 1/1000 em.
pub fn helvetica_width(ch: char) -> u16 {
    lookup(&HELVETICA, ch, 556)
}

/// Advance width of `ch` in Helvetica-Bold, 1/1000 em.
pub fn helvetica_bold_width(ch: char) -> u16 {
    lookup(&HELVETICA_BOLD, ch, 611)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_afm_values() {
        assert_eq!(helvetica_width(' '), 278);
        assert_eq!(helvetica_width('A'), 667);
        assert_eq!(helvetica_width('W'), 944);
        assert_eq!(helvetica_width('i'), 222);
        assert_eq!(helvetica_bold_width('A'), 722);
        assert_eq!(helvetica_bold_width('i'), 278);
    }

    #[test]
    fn test_table_alignment_spot_checks() {
        // Off-by-one in the tables would shift every glyph after it.
        assert_eq!(helvetica_width('!'), 278);
        assert_eq!(helvetica_width('/'), 278);
        assert_eq!(helvetica_width('0'), 556);
        assert_eq!(helvetica_width('@'), 1015);
        assert_eq!(helvetica_width('Z'), 611);
        assert_eq!(helvetica_width('a'), 556);
        assert_eq!(helvetica_width('z'), 500);
        assert_eq!(helvetica_width('~'), 584);
        assert_eq!(helvetica_bold_width('@'), 975);
        assert_eq!(helvetica_bold_width('~'), 584);
    }

    #[test]
    fn test_ellipsis_has_a_width() {
        assert_eq!(helvetica_width('\u{2026}'), 1000);
    }

    #[test]
    fn test_unknown_char_falls_back() {
        assert_eq!(helvetica_width('\u{4E2D}'), 556);
    }
}
