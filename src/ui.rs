//! Shared HTML rendering helpers.
//!
//! Pages are plain `format!` templates returned as [`Html`]; every value
//! that originates outside the program goes through [`escape`] first.

use axum::response::Html;

use crate::cookies::Flash;

/// Escape a value for interpolation into HTML text or attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

/// Wrap page body in the shared layout, with an optional flash banner.
pub fn page(title: &str, flash: Option<Flash>, body: &str) -> Html<String> {
    let banner = match flash {
        Some(flash) => format!(r#"<p class="flash">{}</p>"#, escape(flash.message())),
        None => String::new(),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            max-width: 960px;
            margin: 0 auto;
            padding: 20px;
            color: #222;
            line-height: 1.5;
        }}
        nav {{
            border-bottom: 1px solid #ddd;
            padding-bottom: 8px;
            margin-bottom: 20px;
        }}
        nav a {{ margin-right: 12px; }}
        .flash {{
            background-color: #fff3cd;
            border: 1px solid #e0c96a;
            padding: 8px 12px;
        }}
        table {{ border-collapse: collapse; }}
        th, td {{
            border: 1px solid #ccc;
            padding: 4px 8px;
            text-align: left;
        }}
        form label {{ display: block; margin-top: 8px; }}
    </style>
</head>
<body>
{banner}
{body}
</body>
</html>
"#,
        title = escape(title),
        banner = banner,
        body = body,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralizes_markup() {
        assert_eq!(
            escape(r#"<script>alert("x&y")</script>"#),
            "&lt;script&gt;alert(&quot;x&amp;y&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("it's"), "it&#39;s");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn page_includes_flash_banner() {
        let Html(html) = page("Login", Some(Flash::InvalidCredentials), "<h1>Login</h1>");
        assert!(html.contains("Invalid email or password"));
        assert!(html.contains("<h1>Login</h1>"));
        assert!(html.contains("<title>Login</title>"));
    }

    #[test]
    fn page_without_flash_has_no_banner() {
        let Html(html) = page("Home", None, "<p>hi</p>");
        assert!(!html.contains("class=\"flash\""));
    }
}
