//! Shared email content
//!
//! Canonical content generators for verification emails, used by every
//! provider including the mock.

/// Generate the HTML body for a verification code email.
pub fn verification_code_html(code: &str) -> String {
    format!("Your verification code is: <b>{}</b>", escape_html(code))
}

/// Generate the plain-text alternative for a verification code email.
pub fn verification_code_text(code: &str) -> String {
    format!("Your verification code is: {}", code)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
