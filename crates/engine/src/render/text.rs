//! Greedy word wrapping against the Helvetica metrics.

use super::metrics::{text_width, FontFace};

const ELLIPSIS: char = '\u{2026}';

/// Break `text` into lines no wider than `max_width`.
///
/// Words wider than a whole line are split by character so nothing ever
/// overflows. Empty input gives no lines.
pub fn wrap_text(text: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(&candidate, face, size) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(word, face, size) <= max_width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                current.push(c);
                if text_width(&current, face, size) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::replace(&mut current, c.to_string()));
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Keep at most `max_lines`; when lines are dropped the last kept line ends in
/// an ellipsis that still fits `max_width`.
pub fn truncate_lines(
    mut lines: Vec<String>,
    max_lines: usize,
    face: FontFace,
    size: f32,
    max_width: f32,
) -> Vec<String> {
    if lines.len() <= max_lines {
        return lines;
    }
    lines.truncate(max_lines);

    if let Some(last) = lines.last_mut() {
        let mut kept = last.trim_end().to_string();
        while !kept.is_empty() && text_width(&format!("{kept}{ELLIPSIS}"), face, size) > max_width {
            kept.pop();
            kept.truncate(kept.trim_end().len());
        }
        kept.push(ELLIPSIS);
        *last = kept;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("aaa bbb ccc", FontFace::Regular, 10.0, 45.0);
        // "aaa bbb" = 7 glyphs: 6*5.56 + 2.78 = 36.14
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn every_line_fits() {
        let text = "Trade goods with your neighbours, hoard rare spices, and outwit the tax collector before the market closes at sundown.";
        for width in [40.0, 80.0, 150.0] {
            for line in wrap_text(text, FontFace::Regular, 12.0, width) {
                assert!(text_width(&line, FontFace::Regular, 12.0) <= width, "{line}");
            }
        }
    }

    #[test]
    fn overlong_word_is_split() {
        let lines = wrap_text("Supercalifragilistic", FontFace::Bold, 12.0, 40.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "Supercalifragilistic");
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_text("   \n ", FontFace::Regular, 10.0, 100.0).is_empty());
    }

    #[test]
    fn truncation_adds_fitting_ellipsis() {
        let lines: Vec<String> = ["one two three", "four five six", "seven eight"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let width = text_width("four five six", FontFace::Regular, 10.0);

        let kept = truncate_lines(lines, 2, FontFace::Regular, 10.0, width);

        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0], "one two three");
        assert!(kept[1].ends_with('\u{2026}'));
        assert!(text_width(&kept[1], FontFace::Regular, 10.0) <= width);
    }

    #[test]
    fn truncation_leaves_short_text_alone() {
        let lines = vec!["only".to_string()];
        assert_eq!(
            truncate_lines(lines.clone(), 3, FontFace::Regular, 10.0, 100.0),
            lines
        );
    }
}
