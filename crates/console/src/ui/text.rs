pub(super) fn display_width(text: &str) -> usize {
    text.chars().count()
}

pub(super) fn pad_right(text: &str, width: usize) -> String {
    let mut out = text.to_string();
    let current = display_width(text);
    if current < width {
        out.extend(std::iter::repeat(' ').take(width - current));
    }
    out
}

pub(super) fn truncate_with_ellipsis(text: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if display_width(text) <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return text.chars().take(max_len).collect();
    }
    let mut out: String = text.chars().take(max_len - 3).collect();
    out.push_str("...");
    out
}

/// Truncates or pads `text` so it occupies exactly `width` columns.
pub(super) fn fit_width(text: &str, width: usize) -> String {
    pad_right(&truncate_with_ellipsis(text, width), width)
}
