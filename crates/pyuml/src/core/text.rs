//! Shared text utilities for diagram labels

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Marker appended to truncated labels in every rendition
///
/// Plain dots, so the bitmap font used for PNG output can draw it and both
/// renditions show the same label.
pub const ELLIPSIS: &str = "...";

/// Display width of a label in terminal columns
pub fn display_width(label: &str) -> usize {
    UnicodeWidthStr::width(label)
}

/// Shorten a label to at most `max_width` display columns.
///
/// Labels that fit are returned unchanged. Longer labels are cut and end with
/// `ellipsis`. A `max_width` of 0 disables truncation.
///
/// # Example
/// ```
/// use pyuml::core::fit_label;
///
/// assert_eq!(fit_label("process_items(batch)", 10, "…"), "process_i…");
/// assert_eq!(fit_label("bark()", 10, "…"), "bark()");
/// ```
pub fn fit_label(label: &str, max_width: usize, ellipsis: &str) -> String {
    if max_width == 0 || display_width(label) <= max_width {
        return label.to_string();
    }

    let budget = max_width.saturating_sub(display_width(ellipsis));
    let mut fitted = String::new();
    let mut width = 0;

    for c in label.chars() {
        let char_width = c.width().unwrap_or(0);
        if width + char_width > budget {
            break;
        }
        fitted.push(c);
        width += char_width;
    }

    fitted.push_str(ellipsis);
    fitted
}
