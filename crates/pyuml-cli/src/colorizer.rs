//! Terminal colorization for diagram output
//!
//! Applies ANSI escape codes to diagram elements using crossterm.

use crossterm::style::{Color, Stylize};
use pyuml::LineChars;

/// Colorize a terminal class diagram using ANSI escape codes
///
/// Applies colors to different diagram elements:
/// - Box-drawing corners, edges and connector lines: Cyan
/// - Inheritance arrowheads: Yellow
/// - Class names and member labels: Default (terminal color)
pub fn colorize_output(input: &str) -> String {
    let mut result = String::with_capacity(input.len() * 2); // Extra space for ANSI codes
    let unicode = LineChars::unicode();

    for line in input.lines() {
        let chars: Vec<char> = line.chars().collect();
        for (i, &c) in chars.iter().enumerate() {
            let before = i.checked_sub(1).and_then(|j| chars.get(j)).copied();
            let after = chars.get(i + 1).copied();

            let color = match c {
                '┌' | '┐' | '└' | '┘' | '├' | '┤' | '┬' | '┴' | '┼' | '─' | '│' => {
                    Some(Color::Cyan)
                }
                c if unicode.is_arrow(c) => Some(Color::Yellow),
                // ASCII glyphs double as label text, so look at the neighbours
                '+' | '-' | '|' if is_ascii_line(c, before, after) => Some(Color::Cyan),
                '^' | 'v' | '<' | '>' if is_ascii_arrow(c, before, after) => Some(Color::Yellow),
                _ => None,
            };

            match color {
                Some(color) => result.push_str(&format!("{}", c.to_string().with(color))),
                None => result.push(c),
            }
        }
        result.push('\n');
    }

    // Remove trailing newline to match input format
    if !input.ends_with('\n') && result.ends_with('\n') {
        result.pop();
    }

    result
}

fn is_line_neighbour(c: Option<char>) -> bool {
    matches!(c, Some('-' | '+'))
}

/// Check if an ASCII character is part of a box or connector vs label text
fn is_ascii_line(c: char, before: Option<char>, after: Option<char>) -> bool {
    match c {
        // `+ name()` and `- attr` prefixes are followed by a space
        '+' | '-' => is_line_neighbour(before) || is_line_neighbour(after),
        '|' => {
            !before.is_some_and(|b| b.is_alphanumeric())
                && !after.is_some_and(|a| a.is_alphanumeric())
        }
        _ => false,
    }
}

/// Arrowheads sit at the end of a connector: `-<`, `>-`, or alone above/below a box
fn is_ascii_arrow(c: char, before: Option<char>, after: Option<char>) -> bool {
    let isolated = |n: Option<char>| n.map_or(true, |n| n == ' ');
    match c {
        '<' => is_line_neighbour(after),
        '>' => is_line_neighbour(before),
        '^' | 'v' => isolated(before) && isolated(after),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_ansi(s: &str) -> String {
        let mut out = String::new();
        let mut chars = s.chars();
        while let Some(c) = chars.next() {
            if c == '\x1b' {
                // skip to the end of the CSI sequence
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(c);
            }
        }
        out
    }

    #[test]
    fn test_colorize_preserves_content() {
        let input = "┌─────┐\n│ Dog │\n└─────┘";
        let output = colorize_output(input);

        // Should contain ANSI codes
        assert!(output.contains("\x1b["));
        assert_eq!(strip_ansi(&output), input);
    }

    #[test]
    fn test_colorize_arrows() {
        let output = colorize_output("──◁");
        assert!(output.contains("◁"));
        assert!(output.contains("\x1b["));
    }

    #[test]
    fn test_ascii_labels_stay_plain() {
        let input = "| + move(dx, dy) |\n| - level        |";
        let output = colorize_output(input);

        assert_eq!(strip_ansi(&output), input);
        // Only the four border bars are colored
        assert_eq!(output.matches("\x1b[").count() / 2, 4);
    }

    #[test]
    fn test_ascii_arrowheads() {
        assert!(is_ascii_arrow('<', Some('+'), Some('-')));
        assert!(is_ascii_arrow('^', Some(' '), Some(' ')));
        assert!(!is_ascii_arrow('v', Some('a'), Some('e')));
        assert!(!is_ascii_arrow('>', Some(' '), Some('x')));
    }

    #[test]
    fn test_no_trailing_newline() {
        let input = "test";
        let output = colorize_output(input);
        assert!(!output.ends_with('\n'));
    }
}
