/// Longest preview of reference or collaborator input text
pub const PREVIEW_CHARS: usize = 200;

/// First `max_chars` characters, with "..." appended when cut
pub fn preview(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{}...", head)
    }
}

/// Two-column table with a header row, columns padded to the widest cell
pub fn table(headers: (&str, &str), rows: &[(String, String)]) -> Vec<String> {
    let width = |s: &str| s.chars().count();
    let left = rows
        .iter()
        .map(|(name, _)| width(name))
        .chain(std::iter::once(width(headers.0)))
        .max()
        .unwrap_or(0);
    let right = rows
        .iter()
        .map(|(_, value)| width(value))
        .chain(std::iter::once(width(headers.1)))
        .max()
        .unwrap_or(0);

    let pad = |s: &str, to: usize| format!("{}{}", s, " ".repeat(to - width(s)));

    let mut lines = vec![
        format!("| {} | {} |", pad(headers.0, left), pad(headers.1, right)),
        format!("|{}|{}|", "-".repeat(left + 2), "-".repeat(right + 2)),
    ];
    for (name, value) in rows {
        lines.push(format!("| {} | {} |", pad(name, left), pad(value, right)));
    }
    lines
}
