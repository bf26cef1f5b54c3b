//! Terminal display width helpers.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string after stripping ANSI escapes.
pub fn display_width(text: &str) -> usize {
    let clean = strip_ansi(text);
    UnicodeWidthStr::width(clean.as_str())
}

pub fn strip_ansi(text: &str) -> String {
    let clean = strip_ansi_escapes::strip(text);
    String::from_utf8_lossy(&clean).into_owned()
}

/// Clip `text` to at most `width` display cells, marking a cut with `…`.
///
/// ANSI escapes are removed first; the result is plain text.
pub fn fit_to_width(text: &str, width: usize) -> String {
    let clean = strip_ansi(text);
    if UnicodeWidthStr::width(clean.as_str()) <= width {
        return clean;
    }
    if width == 0 {
        return String::new();
    }

    let budget = width - 1;
    let mut used = 0;
    let mut out = String::new();
    for ch in clean.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}
