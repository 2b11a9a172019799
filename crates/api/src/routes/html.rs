//! Minimal HTML rendering for the form surface.
//!
//! The pages are deliberately plain: a shared shell, escaped user content,
//! and nothing else.

/// Escape text for safe interpolation into HTML.
pub(crate) fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap page content in the shared document shell.
pub(crate) fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Filedepot</title>
</head>
<body>
<nav>
<a href="/files">Files</a> |
<a href="/files/upload">Upload</a> |
<a href="/report">Send report</a> |
<a href="/profile">Profile</a> |
<a href="/status">Status</a>
</nav>
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
    )
}

/// Render a field error list, or nothing when the slice is empty.
pub(crate) fn error_list(errors: &[filedepot_core::files::FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let items: String = errors
        .iter()
        .map(|e| format!("<li><strong>{}</strong>: {}</li>", escape(e.field), escape(&e.message)))
        .collect();
    format!("<ul class=\"errors\">{items}</ul>")
}
