//! Terminal cell widths for rendered characters.
//!
//! The engine counts every rendered character as one column; the screen
//! does not, so the renderer measures with `unicode-width` before placing
//! characters and the cursor.

use unicode_width::UnicodeWidthChar;

/// What to draw in place of a control character, shown reversed: `^A`..`^Z`
/// become `A`..`Z`, `NUL` becomes `@`, anything else `?`.
pub fn substitute(ch: char) -> Option<char> {
    if !ch.is_control() {
        return None;
    }
    let code = ch as u32;
    if code <= 26 {
        char::from_u32('@' as u32 + code)
    } else {
        Some('?')
    }
}

/// Cells occupied by `ch` once drawn.
pub fn cell_width(ch: char) -> usize {
    if substitute(ch).is_some() {
        1
    } else {
        ch.width().unwrap_or(1)
    }
}

/// Total cells for a run of rendered characters.
pub fn str_width(chars: &[char]) -> usize {
    chars.iter().map(|&c| cell_width(c)).sum()
}

/// Number of leading characters of `chars` that fit in `max` cells.
pub fn fit_prefix<I>(chars: I, max: usize) -> usize
where
    I: IntoIterator<Item = char>,
{
    let mut used = 0;
    let mut count = 0;
    for ch in chars {
        let width = cell_width(ch);
        if used + width > max {
            break;
        }
        used += width;
        count += 1;
    }
    count
}
