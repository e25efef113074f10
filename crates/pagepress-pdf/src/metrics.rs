//! Text measurement for the export font.
//!
//! Output text is set in the standard Helvetica base font, so wrapping and
//! alignment use its AFM advance widths (units per 1000 em). The interactive
//! canvas and the exporter share one wrapping result by construction: the
//! exporter is the single source of line breaks.

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.15;

/// Helvetica advance widths for ASCII 0x20..=0x7E, units per 1000 em.
#[rustfmt::skip]
const ASCII_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Fallback advance for characters outside the ASCII table.
const DEFAULT_WIDTH: u16 = 556;

/// Advance width of one character in px for the given font size (px).
fn char_width(c: char, font_size: f64) -> f64 {
    let code = c as u32;
    let units = if (0x20..=0x7E).contains(&code) {
        ASCII_WIDTHS[(code - 0x20) as usize]
    } else {
        DEFAULT_WIDTH
    };
    units as f64 / 1000.0 * font_size
}

/// Measured advance of a string in px for the given font size (px).
pub fn measure(text: &str, font_size: f64) -> f64 {
    text.chars().map(|c| char_width(c, font_size)).sum()
}

/// Line height in px for a font size in px.
pub fn line_height(font_size: f64) -> f64 {
    font_size * LINE_HEIGHT_FACTOR
}

/// Break an overlong word into chunks that each fit `max_width`.
fn break_word(word: &str, max_width: f64, font_size: f64, lines: &mut Vec<String>) -> String {
    let mut current = String::new();
    let mut current_width = 0.0;
    for c in word.chars() {
        let w = char_width(c, font_size);
        if !current.is_empty() && current_width + w > max_width {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }
        current.push(c);
        current_width += w;
    }
    current
}

/// Greedy word-wrap of `text` into lines no wider than `max_width` px.
///
/// Explicit newlines always break; a word wider than the box is broken at
/// character granularity rather than overflowing.
pub fn wrap(text: &str, max_width: f64, font_size: f64) -> Vec<String> {
    let space = char_width(' ', font_size);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = measure(word, font_size);
            if current.is_empty() {
                if word_width > max_width {
                    current = break_word(word, max_width, font_size, &mut lines);
                    current_width = measure(&current, font_size);
                } else {
                    current = word.to_string();
                    current_width = word_width;
                }
            } else if current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(std::mem::take(&mut current));
                if word_width > max_width {
                    current = break_word(word, max_width, font_size, &mut lines);
                    current_width = measure(&current, font_size);
                } else {
                    current = word.to_string();
                    current_width = word_width;
                }
            }
        }
        lines.push(current);
    }
    lines
}

/// Number of spaces in a line, for justification.
pub fn space_count(line: &str) -> usize {
    line.chars().filter(|&c| c == ' ').count()
}

/// Encode text for the WinAnsi-encoded export font. Characters outside the
/// 8-bit range are replaced.
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF { code as u8 } else { b'?' }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_scales_with_font_size() {
        let narrow = measure("Hello", 10.0);
        let wide = measure("Hello", 20.0);
        assert!((wide - narrow * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_measure_known_string() {
        // "HI" at 1000px: H = 722, I = 278.
        assert!((measure("HI", 1000.0) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("aa bb cc dd", 3000.0, 1000.0);
        for line in &lines {
            assert!(measure(line, 1000.0) <= 3000.0, "line too wide: {line:?}");
        }
        assert!(lines.len() > 1);
    }

    #[test]
    fn test_wrap_single_line_when_it_fits() {
        let lines = wrap("short", 10_000.0, 100.0);
        assert_eq!(lines, vec!["short".to_string()]);
    }

    #[test]
    fn test_wrap_preserves_explicit_newlines() {
        let lines = wrap("one\ntwo", 10_000.0, 100.0);
        assert_eq!(lines, vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn test_wrap_breaks_overlong_word() {
        // One unbreakable word much wider than the box still wraps.
        let lines = wrap("aaaaaaaaaaaaaaaaaaaa", 2000.0, 1000.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(measure(line, 1000.0) <= 2000.0);
        }
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        assert_eq!(wrap("", 100.0, 10.0), vec![String::new()]);
    }

    #[test]
    fn test_encode_replaces_non_latin() {
        assert_eq!(encode_winansi("ab"), b"ab".to_vec());
        assert_eq!(encode_winansi("a\u{4e16}b"), b"a?b".to_vec());
    }
}
