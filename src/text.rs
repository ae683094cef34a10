//! # Text Wrapping
//!
//! Greedy line breaking for cell text, using UAX#14 break opportunities.
//! Cells have a fixed column width and a per-field maximum line count;
//! text that would exceed the limit is clamped and the last visible line
//! gets a trailing ellipsis. Text is never dropped without the marker.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::StandardFont;

const ELLIPSIS: char = '\u{2026}';

/// Break opportunities indexed by char position: "may we break before
/// char[i]?". Index 0 is always None.
fn break_opportunities(text: &str) -> Vec<Option<BreakOpportunity>> {
    let char_count = text.chars().count();
    let mut result = vec![None; char_count];

    let byte_to_char: Vec<usize> = {
        let mut map = vec![0usize; text.len() + 1];
        let mut char_idx = 0;
        for (byte_idx, _) in text.char_indices() {
            map[byte_idx] = char_idx;
            char_idx += 1;
        }
        map[text.len()] = char_idx;
        map
    };

    // linebreaks() yields offsets AFTER each break; the final mandatory
    // break at text.len() is irrelevant here.
    for (byte_offset, opp) in linebreaks(text) {
        let char_idx = byte_to_char[byte_offset];
        if char_idx < char_count {
            result[char_idx] = Some(opp);
        }
    }

    result
}

/// Greedy-wrap `text` into lines no wider than `max_width` points.
///
/// Breaks at UAX#14 opportunities; a single segment wider than the column
/// is split mid-word rather than overflowing. Trailing whitespace on each
/// line is trimmed. Returns at least one (possibly empty) line.
pub fn wrap(text: &str, font: StandardFont, size: f64, max_width: f64) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    let opps = break_opportunities(text);

    let mut lines: Vec<String> = Vec::new();
    let mut line_start = 0usize;
    let mut line_width = 0.0f64;
    let mut last_break: Option<usize> = None;

    let mut i = 0usize;
    while i < chars.len() {
        if matches!(opps[i], Some(BreakOpportunity::Mandatory)) && i > line_start {
            lines.push(take_line(&chars, line_start, i));
            line_start = i;
            line_width = 0.0;
            last_break = None;
        } else if opps[i].is_some() && i > line_start {
            last_break = Some(i);
        }

        let w = font.char_width(chars[i], size);
        if line_width + w > max_width && i > line_start {
            // Prefer the last break opportunity; fall back to a hard
            // mid-word split when one segment is wider than the column.
            let split = match last_break {
                Some(b) if b > line_start => b,
                _ => i,
            };
            lines.push(take_line(&chars, line_start, split));
            line_start = split;
            last_break = None;
            line_width = chars[line_start..=i]
                .iter()
                .map(|&c| font.char_width(c, size))
                .sum();
            i += 1;
            continue;
        }

        line_width += w;
        i += 1;
    }

    if line_start < chars.len() {
        lines.push(take_line(&chars, line_start, chars.len()));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn take_line(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end]
        .iter()
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Clamp wrapped lines to `max_lines`, marking truncation with an
/// ellipsis on the last visible line. The marked line is re-fitted so it
/// still fits `max_width`.
pub fn clamp_lines(
    mut lines: Vec<String>,
    max_lines: usize,
    font: StandardFont,
    size: f64,
    max_width: f64,
) -> Vec<String> {
    if max_lines == 0 {
        return Vec::new();
    }
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);
    let last = lines
        .pop()
        .unwrap_or_default();
    lines.push(truncate_with_ellipsis(&last, font, size, max_width));
    lines
}

/// Fit `text` plus a trailing ellipsis into `max_width`, dropping
/// characters from the end as needed.
pub fn truncate_with_ellipsis(
    text: &str,
    font: StandardFont,
    size: f64,
    max_width: f64,
) -> String {
    let ellipsis_width = font.char_width(ELLIPSIS, size);
    let mut kept: Vec<char> = text.trim_end().chars().collect();
    let mut width: f64 = kept.iter().map(|&c| font.char_width(c, size)).sum();

    while !kept.is_empty() && width + ellipsis_width > max_width {
        let dropped = kept.pop().unwrap();
        width -= font.char_width(dropped, size);
    }
    // Avoid a dangling space before the marker.
    while kept.last().is_some_and(|c| c.is_whitespace()) {
        kept.pop();
    }

    let mut out: String = kept.into_iter().collect();
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT: StandardFont = StandardFont::Helvetica;

    #[test]
    fn test_short_text_single_line() {
        let lines = wrap("North wall", FONT, 7.5, 100.0);
        assert_eq!(lines, vec!["North wall".to_string()]);
    }

    #[test]
    fn test_wrap_breaks_at_spaces() {
        let lines = wrap("cracked tile near the window frame", FONT, 7.5, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(FONT.measure(line, 7.5) <= 60.0 + 1e-6, "line too wide: {:?}", line);
            assert!(!line.starts_with(' '));
            assert!(!line.ends_with(' '));
        }
        // No text lost.
        assert_eq!(lines.join(" "), "cracked tile near the window frame");
    }

    #[test]
    fn test_overlong_word_splits_mid_word() {
        let lines = wrap("Nieuwbouwwijkontsluitingsweg", FONT, 7.5, 40.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(FONT.measure(line, 7.5) <= 40.0 + 1e-6);
        }
        assert_eq!(lines.concat(), "Nieuwbouwwijkontsluitingsweg");
    }

    #[test]
    fn test_empty_text_yields_one_empty_line() {
        assert_eq!(wrap("", FONT, 7.5, 50.0), vec![String::new()]);
    }

    #[test]
    fn test_clamp_within_limit_is_untouched() {
        let lines = vec!["one".to_string(), "two".to_string()];
        let clamped = clamp_lines(lines.clone(), 3, FONT, 7.5, 80.0);
        assert_eq!(clamped, lines);
    }

    #[test]
    fn test_clamp_adds_ellipsis() {
        let lines: Vec<String> = (0..6).map(|i| format!("line {}", i)).collect();
        let clamped = clamp_lines(lines, 3, FONT, 7.5, 80.0);
        assert_eq!(clamped.len(), 3);
        assert!(
            clamped[2].ends_with('\u{2026}'),
            "last visible line must carry the ellipsis marker: {:?}",
            clamped[2]
        );
    }

    #[test]
    fn test_truncated_line_still_fits() {
        let long = "a very long trailing line that cannot possibly fit";
        let out = truncate_with_ellipsis(long, FONT, 7.5, 50.0);
        assert!(out.ends_with('\u{2026}'));
        assert!(FONT.measure(&out, 7.5) <= 50.0 + 1e-6);
    }

    #[test]
    fn test_no_space_before_ellipsis() {
        let out = truncate_with_ellipsis("word another", FONT, 7.5, 45.0);
        assert!(!out.contains(" \u{2026}"));
    }
}
