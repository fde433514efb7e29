//! HTML pages served to browsers

const INDEX_HTML: &str = include_str!("../templates/index.html");
const RESULT_HTML: &str = include_str!("../templates/result.html");

pub fn index_page() -> &'static str {
    INDEX_HTML
}

/// Page carrying a single message (used for prediction errors).
pub fn result_page(message: &str) -> String {
    RESULT_HTML.replace("{{prediction_text}}", &escape_html(message))
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
