// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Email body sanitizing and HTML-to-text flattening for display.

/// Tags whose boundaries start a new line in the flattened text.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "tr", "table", "ul", "ol", "blockquote", "hr", "h1", "h2", "h3", "h4",
    "h5", "h6", "pre", "section", "article", "header", "footer",
];

/// Sanitized body ready for egui: readable text plus the links it contained.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedBody {
    pub text: String,
    pub links: Vec<String>,
}

/// Strip scripts, event handlers, and unsafe URLs from an email body.
///
/// Uses Ammonia's default allow-list; `<script>`/`<style>` contents are
/// dropped entirely and links get `rel="noopener noreferrer"`.
pub fn sanitize(html: &str) -> String {
    ammonia::Builder::default().clean(html).to_string()
}

/// Sanitize `html` and flatten it into display text.
pub fn render_body(html: &str) -> RenderedBody {
    html_to_text(&sanitize(html))
}

/// Flatten (already sanitized) HTML into text.
///
/// Block-level tags and `<br>` become line breaks and paragraphs end with a
/// blank line. List items get a bullet. Inline whitespace collapses like a
/// browser would, entities are decoded, and blank-line runs squeeze to one.
pub fn html_to_text(html: &str) -> RenderedBody {
    let mut out = String::with_capacity(html.len());
    let mut links = Vec::new();
    let mut rest = html;

    while let Some(start) = rest.find('<') {
        push_text(&mut out, &rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = tag_end(after) else {
            // Unterminated tag: treat the remainder as text.
            push_text(&mut out, &rest[start..]);
            rest = "";
            break;
        };
        handle_tag(&after[..end], &mut out, &mut links);
        rest = &after[end + 1..];
    }
    push_text(&mut out, rest);

    RenderedBody {
        text: squeeze_lines(&out),
        links,
    }
}

/// Byte offset of the `>` closing a tag body, skipping quoted attribute values.
fn tag_end(tag: &str) -> Option<usize> {
    let mut quote = None;
    let mut after_equals = false;
    for (i, ch) in tag.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None => match ch {
                '>' => return Some(i),
                '"' | '\'' if after_equals => quote = Some(ch),
                _ => {}
            },
        }
        if !ch.is_whitespace() {
            after_equals = ch == '=';
        }
    }
    None
}

fn handle_tag(tag: &str, out: &mut String, links: &mut Vec<String>) {
    let closing = tag.starts_with('/');
    let name: String = tag
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    match name.as_str() {
        "br" => out.push('\n'),
        "p" if closing => {
            ensure_newline(out);
            if !out.is_empty() && !out.ends_with("\n\n") {
                out.push('\n');
            }
        }
        "li" if !closing => {
            ensure_newline(out);
            out.push_str("• ");
        }
        "td" | "th" if closing => out.push_str("  "),
        "a" if !closing => {
            if let Some(href) = attribute(tag, "href") {
                let href = decode_entities(&href);
                if !href.is_empty() && !links.contains(&href) {
                    links.push(href);
                }
            }
        }
        n if BLOCK_TAGS.contains(&n) => ensure_newline(out),
        _ => {}
    }
}

fn ensure_newline(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Append a text run, collapsing whitespace and decoding entities.
fn push_text(out: &mut String, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let decoded = decode_entities(raw);
    for ch in decoded.chars() {
        if ch.is_whitespace() && ch != '\u{a0}' {
            if !out.is_empty() && !out.ends_with([' ', '\n']) {
                out.push(' ');
            }
        } else if ch == '\u{a0}' {
            out.push(' ');
        } else {
            out.push(ch);
        }
    }
}

/// Extract a quoted attribute value from a raw tag body.
fn attribute(tag: &str, name: &str) -> Option<String> {
    let lower = tag.to_ascii_lowercase();
    let needle = format!("{name}=");
    let mut search_from = 0;
    while let Some(found) = lower[search_from..].find(&needle) {
        let pos = search_from + found;
        let preceded_ok = pos == 0 || lower.as_bytes()[pos - 1].is_ascii_whitespace();
        let value_start = pos + needle.len();
        if preceded_ok {
            let quote = tag[value_start..].chars().next()?;
            if quote == '"' || quote == '\'' {
                let body = &tag[value_start + 1..];
                let end = body.find(quote)?;
                return Some(body[..end].to_string());
            }
            let end = tag[value_start..]
                .find(char::is_whitespace)
                .map_or(tag.len(), |e| value_start + e);
            return Some(tag[value_start..end].to_string());
        }
        search_from = value_start;
    }
    None
}

/// Decode the named entities Ammonia emits plus numeric references.
pub fn decode_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail
            .find(';')
            .filter(|semi| *semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((ch, semi)) => {
                out.push(ch);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

/// Trim trailing spaces per line and collapse blank-line runs.
fn squeeze_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut blank_run = 0;
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        lines.push(line);
    }
    lines.join("\n").trim().to_string()
}
