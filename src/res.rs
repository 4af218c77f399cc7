use pulldown_cmark::{Event, Options, Parser};

#[macro_export]
macro_rules! include_res {
    (bytes, $p:expr) => {
        include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
    (str, $p:expr) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res", $p))
    };
}

pub const TRY_AGAIN: &str = "Error, try again later";

/// Escapes text for HTML bodies and attributes. Braces are escaped too so
/// user text can never be picked up as a template placeholder.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '{' => out.push_str("&#123;"),
            '}' => out.push_str("&#125;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders message content as markdown. Raw html is shown as text.
pub fn markdown(content: &str) -> String {
    let parser = Parser::new_ext(content, Options::ENABLE_STRIKETHROUGH)
        .map(|event| match event {
            Event::Html(html) | Event::InlineHtml(html) => Event::Text(html),
            _ => event,
        });

    let mut html_output = String::new();
    pulldown_cmark::html::push_html(&mut html_output, parser);
    html_output
        .replace('{', "&#123;")
        .replace('}', "&#125;")
}

pub fn layout(title: &str, body: &str) -> String {
    include_res!(str, "/pages/layout.html")
        .replace("{title}", &escape(title))
        .replace("{body}", body)
}

pub fn alert(kind: &str, message: &str) -> String {
    include_res!(str, "/pages/components/alert.html")
        .replace("{type}", kind)
        .replace("{message}", &escape(message))
}

pub fn not_found(what: &str) -> String {
    layout(
        "Not found",
        &include_res!(str, "/pages/not_found.html").replace("{what}", &escape(what)),
    )
}

/// Only local paths are accepted as return targets.
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

pub fn login_url(next: &str) -> String {
    if is_local_path(next) {
        format!("/login?next={}", urlencoding::encode(next))
    } else {
        "/login".to_string()
    }
}
