//! Hand-written HTML for the browser-facing pages.

use crate::page::PageRecord;

const PREVIEW_CHARS: usize = 200;

const STYLE: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; font-family: Arial, sans-serif; }
        body { background: #000; color: #fff; line-height: 1.4; padding: 20px; }
        .container { max-width: 800px; margin: 0 auto; }
        header { border-bottom: 1px solid #333; padding: 10px 0; margin-bottom: 20px; }
        .logo { font-size: 24px; font-weight: bold; color: #fff; text-decoration: none; }
        nav a { color: #ccc; text-decoration: none; margin-right: 15px; }
        nav a:hover { color: #fff; }
        h3 { margin: 20px 0 10px; }
        .page-item { border: 1px solid #333; background: #111; padding: 15px; margin: 10px 0; }
        .page-item a { color: #fff; text-decoration: none; font-weight: bold; }
        .page-content { white-space: pre-wrap; background: #111; padding: 20px; border: 1px solid #333; margin: 20px 0; }
        .page-info { color: #888; margin: 10px 0; font-size: 14px; }
        input, textarea { width: 100%; background: #111; color: #fff; border: 1px solid #333; padding: 8px; margin: 5px 0 15px; }
        textarea { min-height: 300px; }
        .btn { display: inline-block; padding: 8px 15px; background: #333; color: #fff; text-decoration: none; border: 1px solid #333; cursor: pointer; }
        .btn:hover { background: #444; }
        .error { color: #f66; margin: 10px 0; }
"#;

/// Escape text for interpolation into HTML bodies and attribute values.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>{STYLE}</style>
</head>
<body>
    <div class="container">
        <header>
            <a href="/" class="logo">Doxify</a>
            <nav><a href="/">Home</a><a href="/write">Write</a></nav>
        </header>
        {body}
    </div>
</body>
</html>"#,
        title = escape(title),
    )
}

fn preview(content: &str) -> String {
    let mut chars = content.char_indices();
    match chars.nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &content[..cut]),
        None => content.to_string(),
    }
}

pub fn home(query: Option<&str>, pages: &[PageRecord]) -> String {
    let query = query.map(str::trim).filter(|q| !q.is_empty());

    let heading = match query {
        Some(q) => format!("<h3>Search results for: \"{}\"</h3>", escape(q)),
        None => "<h3>Recent Pages</h3>".to_string(),
    };

    let listing = if pages.is_empty() {
        match query {
            Some(_) => "<p>No pages found matching your search.</p>".to_string(),
            None => r#"<p>No pages yet. <a href="/write">Create the first one!</a></p>"#.to_string(),
        }
    } else {
        pages
            .iter()
            .map(|page| {
                format!(
                    r#"<div class="page-item">
            <a href="/{slug}">{title}</a>
            <div class="page-info">/{slug} &bull; {date}</div>
            <p>{preview}</p>
        </div>"#,
                    slug = escape(&page.slug),
                    title = escape(&page.title),
                    date = page.created_at.format("%Y-%m-%d"),
                    preview = escape(&preview(&page.content)),
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let body = format!(
        r#"<form action="/search" method="get">
            <input type="text" name="q" placeholder="Search pages..." value="{q}">
            <button class="btn" type="submit">Search</button>
        </form>
        {heading}
        {listing}"#,
        q = escape(query.unwrap_or_default()),
    );
    layout("Doxify", &body)
}

pub fn write_form() -> String {
    let body = r#"<h3>Write a new page</h3>
        <div id="error" class="error"></div>
        <form id="write">
            <label for="slug">Page name</label>
            <input type="text" id="slug" name="slug" required
                   pattern="[a-zA-Z0-9-]{3,50}"
                   title="Only letters, numbers and hyphens (3-50 characters)"
                   placeholder="my-page-name">
            <label for="title">Title</label>
            <input type="text" id="title" name="title" required maxlength="200">
            <label for="content">Content</label>
            <textarea id="content" name="content" required></textarea>
            <button class="btn" type="submit">Publish</button>
        </form>
        <script>
            document.getElementById('write').addEventListener('submit', async function (e) {
                e.preventDefault();
                const form = new FormData(this);
                const response = await fetch('/create', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify(Object.fromEntries(form)),
                });
                const result = await response.json();
                if (result.success) {
                    window.location.href = result.url;
                } else {
                    document.getElementById('error').textContent = result.error;
                }
            });
        </script>"#;
    layout("Write - Doxify", body)
}

pub fn page(page: &PageRecord) -> String {
    let body = format!(
        r#"<h1>{title}</h1>
        <div class="page-info">/{slug} &bull; Created: {date}</div>
        <div class="page-content">{content}</div>
        <a href="/write" class="btn">Write your own</a>"#,
        title = escape(&page.title),
        slug = escape(&page.slug),
        date = page.created_at.format("%Y-%m-%d"),
        content = escape(&page.content),
    );
    layout(&page.title, &body)
}

pub fn message(title: &str, detail: &str) -> String {
    let body = format!(
        r#"<h1>{}</h1>
        <p>{}</p>
        <p><a href="/">Go home</a></p>"#,
        escape(title),
        escape(detail),
    );
    layout(title, &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(content: &str) -> PageRecord {
        PageRecord {
            slug: "hello-world".to_string(),
            title: "<b>Hi</b>".to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn page_escapes_user_content() {
        let html = page(&record("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("&lt;b&gt;Hi&lt;/b&gt;"));
        assert!(!html.contains("<script>alert"));
    }

    #[test]
    fn home_truncates_previews() {
        let long = "é".repeat(250);
        let html = home(None, &[record(&long)]);
        assert!(html.contains(&format!("{}...", "é".repeat(200))));
        assert!(!html.contains(&"é".repeat(201)));
    }

    #[test]
    fn home_empty_states() {
        assert!(home(None, &[]).contains("No pages yet"));
        assert!(home(Some("zzz"), &[]).contains("No pages found matching your search."));
        assert!(home(Some("  "), &[]).contains("Recent Pages"));
    }
}
