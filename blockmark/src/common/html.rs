//! Inline HTML fragments back to Markdown.
//!
//! Block attributes carry small HTML fragments (`Hello <strong>you</strong>`).
//! We parse them with `html5ever` into an `RcDom` and walk the tree; parsing
//! takes care of entity decoding and malformed markup for us.

use crate::common::escape::{escape_markdown, longest_run};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Convert an inline HTML fragment to Markdown text.
///
/// Text is Markdown-escaped except inside `<code>`. Known formatting tags map
/// to their Markdown syntax; any other element is transparent.
pub fn html_fragment_to_markdown(html: &str) -> String {
    let mut out = String::new();
    if let Some((_dom, body)) = parse_body(html) {
        render_children(&body, true, &mut out);
    }
    out
}

/// Decode a fragment to literal text: entities resolved, `<br>` as a newline,
/// every other tag dropped. Used for code content, which is never formatted.
pub fn html_fragment_to_text(html: &str) -> String {
    let mut out = String::new();
    if let Some((_dom, body)) = parse_body(html) {
        collect_text(&body, &mut out);
    }
    out
}

/// Parse `html` as the body of a document. The dom is returned alongside the
/// body handle: dropping an `RcDom` empties every node in it, so callers keep
/// it bound for as long as they walk the body.
fn parse_body(html: &str) -> Option<(RcDom, Handle)> {
    if html.is_empty() {
        return None;
    }
    let wrapped = format!("<!DOCTYPE html><html><head></head><body>{html}</body></html>");
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes());
    let body = find_element(&dom.document, "body")?;
    Some((dom, body))
}

fn find_element(handle: &Handle, tag: &str) -> Option<Handle> {
    if let NodeData::Element { ref name, .. } = handle.data {
        if name.local.as_ref() == tag {
            return Some(handle.clone());
        }
    }
    for child in handle.children.borrow().iter() {
        if let Some(found) = find_element(child, tag) {
            return Some(found);
        }
    }
    None
}

fn render_children(handle: &Handle, escape: bool, out: &mut String) {
    for child in handle.children.borrow().iter() {
        render_node(child, escape, out);
    }
}

fn children_to_string(handle: &Handle, escape: bool) -> String {
    let mut inner = String::new();
    render_children(handle, escape, &mut inner);
    inner
}

fn render_node(handle: &Handle, escape: bool, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => {
            let text = contents.borrow();
            if escape {
                out.push_str(&escape_markdown(&text));
            } else {
                out.push_str(&text);
            }
        }
        NodeData::Element { name, .. } => match name.local.as_ref() {
            "b" | "strong" => wrap(handle, "**", escape, out),
            "i" | "em" => wrap(handle, "*", escape, out),
            "u" => wrap(handle, "_", escape, out),
            "code" => out.push_str(&code_span(&children_to_string(handle, false))),
            "a" => {
                let text = children_to_string(handle, escape);
                let href = attribute(handle, "href").unwrap_or_default();
                out.push_str(&format!("[{text}]({href})"));
            }
            "img" => {
                let alt = attribute(handle, "alt").unwrap_or_default();
                let alt = if escape { escape_markdown(&alt) } else { alt };
                let src = attribute(handle, "src").unwrap_or_default();
                out.push_str(&format!("![{alt}]({src})"));
            }
            "br" => out.push('\n'),
            _ => render_children(handle, escape, out),
        },
        NodeData::Comment { .. } | NodeData::Doctype { .. } => {}
        _ => render_children(handle, escape, out),
    }
}

fn wrap(handle: &Handle, marker: &str, escape: bool, out: &mut String) {
    out.push_str(marker);
    render_children(handle, escape, out);
    out.push_str(marker);
}

/// Wrap `code` in a backtick run longer than any run it contains.
fn code_span(code: &str) -> String {
    let fence = "`".repeat(longest_run(code, '`') + 1);
    if code.starts_with('`') || code.ends_with('`') {
        format!("{fence} {code} {fence}")
    } else {
        format!("{fence}{code}{fence}")
    }
}

fn attribute(handle: &Handle, key: &str) -> Option<String> {
    let NodeData::Element { ref attrs, .. } = handle.data else {
        return None;
    };
    attrs
        .borrow()
        .iter()
        .find(|attr| attr.name.local.as_ref() == key)
        .map(|attr| attr.value.to_string())
}

fn collect_text(handle: &Handle, out: &mut String) {
    for child in handle.children.borrow().iter() {
        match &child.data {
            NodeData::Text { contents } => out.push_str(&contents.borrow()),
            NodeData::Element { name, .. } if name.local.as_ref() == "br" => out.push('\n'),
            _ => collect_text(child, out),
        }
    }
}
