//! HTML parser – converts the renderer's markup into a simple DOM tree.
//!
//! Only the controlled subset the resume renderer emits is understood:
//! - Document: html, head, title, meta, body
//! - Block: header, section, div, p, h1-h3, ul, li
//! - Inline: span, strong, em, a
//!
//! Styling comes exclusively from `style` attributes.

use std::collections::HashMap;

// ---------------------------------------------------------------------------
// DOM types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Html,
    Head,
    Title,
    Meta,
    Body,
    Header,
    Section,
    Div,
    P,
    H1,
    H2,
    H3,
    Ul,
    Li,
    Span,
    Strong,
    Em,
    A,
    /// Anything else; kept in the tree but never displayed.
    Unknown(String),
}

impl Tag {
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "html" => Tag::Html,
            "head" => Tag::Head,
            "title" => Tag::Title,
            "meta" => Tag::Meta,
            "body" => Tag::Body,
            "header" => Tag::Header,
            "section" => Tag::Section,
            "div" => Tag::Div,
            "p" => Tag::P,
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "ul" => Tag::Ul,
            "li" => Tag::Li,
            "span" => Tag::Span,
            "strong" | "b" => Tag::Strong,
            "em" | "i" => Tag::Em,
            "a" => Tag::A,
            other => Tag::Unknown(other.to_string()),
        }
    }

    /// Elements with no content and no closing tag.
    pub fn is_void(&self) -> bool {
        matches!(self, Tag::Meta)
    }
}

#[derive(Debug, Clone)]
pub enum DomNode {
    Element(ElementNode),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag: Tag,
    pub attributes: HashMap<String, String>,
    pub children: Vec<DomNode>,
}

impl ElementNode {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn inline_style(&self) -> Option<&str> {
        self.attributes.get("style").map(|s| s.as_str())
    }

    pub fn href(&self) -> Option<&str> {
        self.attributes.get("href").map(|s| s.as_str())
    }

    /// Concatenated text of the whole subtree.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[DomNode], out: &mut String) {
    for node in nodes {
        match node {
            DomNode::Text(t) => out.push_str(t),
            DomNode::Element(e) => collect_text(&e.children, out),
        }
    }
}

// ---------------------------------------------------------------------------
// Parser – recursive descent over the controlled subset
// ---------------------------------------------------------------------------

/// Parse an HTML string into a list of top-level DOM nodes.
pub fn parse_html(html: &str) -> Vec<DomNode> {
    let mut cursor = Cursor { input: html, pos: 0 };
    cursor.parse_nodes(false)
}

struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Advance past the next occurrence of `needle`, or to the end.
    fn skip_past(&mut self, needle: &str) {
        match self.rest().find(needle) {
            Some(i) => self.pos += i + needle.len(),
            None => self.pos = self.input.len(),
        }
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    /// Parse siblings until a closing tag (when `nested`) or end of input.
    fn parse_nodes(&mut self, nested: bool) -> Vec<DomNode> {
        let mut nodes = Vec::new();
        while !self.eof() {
            if self.starts_with("</") {
                if nested {
                    break;
                }
                // Stray closing tag at top level.
                self.skip_past(">");
                continue;
            }
            if self.starts_with("<!--") {
                self.skip_past("-->");
            } else if self.starts_with("<!") || self.starts_with("<?") {
                self.skip_past(">");
            } else if self.starts_with("<") {
                nodes.push(DomNode::Element(self.parse_element()));
            } else {
                let end = self.rest().find('<').unwrap_or(self.rest().len());
                let raw = &self.rest()[..end];
                self.pos += end;
                // Whitespace-only runs between tags carry no content.
                if !raw.trim().is_empty() {
                    nodes.push(DomNode::Text(decode_entities(raw)));
                } else if !raw.is_empty()
                    && !nodes.is_empty()
                    && self.starts_with("<")
                    && !self.starts_with("</")
                {
                    // Keep a single separating space between inline siblings.
                    nodes.push(DomNode::Text(" ".to_string()));
                }
            }
        }
        nodes
    }

    fn parse_element(&mut self) -> ElementNode {
        self.pos += 1; // '<'
        let tag = Tag::parse(&self.parse_name());
        let mut elem = ElementNode::new(tag);

        loop {
            self.skip_whitespace();
            if self.eof() || self.starts_with(">") || self.starts_with("/>") {
                break;
            }
            let before = self.pos;
            let (key, value) = self.parse_attribute();
            if self.pos == before {
                // Unparseable byte inside the tag; drop it.
                self.pos += self.rest().chars().next().map_or(1, char::len_utf8);
                continue;
            }
            elem.attributes.insert(key, value);
        }

        if self.starts_with("/>") {
            self.pos += 2;
            return elem;
        }
        if self.starts_with(">") {
            self.pos += 1;
        }
        if elem.tag.is_void() {
            return elem;
        }

        elem.children = self.parse_nodes(true);

        if self.starts_with("</") {
            self.skip_past(">");
        }
        elem
    }

    fn parse_name(&mut self) -> String {
        let len = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == ':'))
            .unwrap_or(self.rest().len());
        let name = &self.rest()[..len];
        self.pos += len;
        name.to_string()
    }

    fn parse_attribute(&mut self) -> (String, String) {
        let key = self.parse_name().to_ascii_lowercase();
        self.skip_whitespace();
        if !self.starts_with("=") {
            return (key, String::new());
        }
        self.pos += 1;
        self.skip_whitespace();

        let value = match self.rest().chars().next() {
            Some(q @ ('"' | '\'')) => {
                self.pos += 1;
                let end = self.rest().find(q).unwrap_or(self.rest().len());
                let raw = &self.rest()[..end];
                self.pos = (self.pos + end + 1).min(self.input.len());
                decode_entities(raw)
            }
            _ => {
                let end = self
                    .rest()
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(self.rest().len());
                let raw = &self.rest()[..end];
                self.pos += end;
                decode_entities(raw)
            }
        };
        (key, value)
    }
}

/// Decode the named entities the renderer produces plus numeric references.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let decoded = tail.find(';').filter(|&semi| semi <= 10).and_then(|semi| {
            let entity = &tail[1..semi];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{00A0}'),
                _ => entity.strip_prefix('#').and_then(|num| {
                    let code = match num.strip_prefix(['x', 'X']) {
                        Some(hex) => u32::from_str_radix(hex, 16).ok(),
                        None => num.parse::<u32>().ok(),
                    };
                    code.and_then(char::from_u32)
                }),
            };
            ch.map(|c| (c, semi))
        });
        match decoded {
            Some((c, semi)) => {
                out.push(c);
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

// ---------------------------------------------------------------------------
// Document helpers
// ---------------------------------------------------------------------------

fn find_element<'a>(nodes: &'a [DomNode], tag: &Tag) -> Option<&'a ElementNode> {
    for node in nodes {
        if let DomNode::Element(e) = node {
            if &e.tag == tag {
                return Some(e);
            }
            if let Some(found) = find_element(&e.children, tag) {
                return Some(found);
            }
        }
    }
    None
}

/// The `<body>` element, if the markup is a full document.
pub fn find_body(nodes: &[DomNode]) -> Option<&ElementNode> {
    find_element(nodes, &Tag::Body)
}

/// Text of `<title>`, whitespace-normalised.
pub fn document_title(nodes: &[DomNode]) -> Option<String> {
    let title = find_element(nodes, &Tag::Title)?.text_content();
    let title = title.split_whitespace().collect::<Vec<_>>().join(" ");
    (!title.is_empty()).then_some(title)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_element(nodes: &[DomNode]) -> &ElementNode {
        match &nodes[0] {
            DomNode::Element(e) => e,
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn parse_nested_blocks() {
        let nodes =
            parse_html(r#"<section style="margin: 4px"><h2>Skills</h2><p>Go</p></section>"#);
        let section = first_element(&nodes);
        assert_eq!(section.tag, Tag::Section);
        assert_eq!(section.inline_style(), Some("margin: 4px"));
        assert_eq!(section.children.len(), 2);
    }

    #[test]
    fn void_elements_do_not_swallow_siblings() {
        let nodes = parse_html(r#"<head><meta charset="utf-8"><title>T</title></head>"#);
        let head = first_element(&nodes);
        assert_eq!(head.children.len(), 2);
    }

    #[test]
    fn inline_children_keep_spacing() {
        let nodes = parse_html("<div><strong>Tools:</strong> Git, Docker</div>");
        assert_eq!(first_element(&nodes).text_content(), "Tools: Git, Docker");
    }

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(decode_entities("Skills &amp; Tools"), "Skills & Tools");
        assert_eq!(decode_entities("it&#39;s &#x2022; &lt;ok&gt;"), "it's \u{2022} <ok>");
        assert_eq!(decode_entities("AT&T rocks"), "AT&T rocks");
    }

    #[test]
    fn attribute_values_are_decoded() {
        let nodes = parse_html(r#"<a href="https://x.dev/?a=1&amp;b=2">x</a>"#);
        assert_eq!(first_element(&nodes).href(), Some("https://x.dev/?a=1&b=2"));
    }

    #[test]
    fn finds_body_and_title() {
        let html = "<!doctype html>\n<html><head><title>Jane \u{2014} Resume</title></head>\
                    <body><p>Hi</p></body></html>";
        let nodes = parse_html(html);
        let body = find_body(&nodes).unwrap();
        assert_eq!(body.children.len(), 1);
        assert_eq!(document_title(&nodes).as_deref(), Some("Jane \u{2014} Resume"));
    }

    #[test]
    fn comments_are_skipped() {
        let nodes = parse_html("<!-- note --><p>x</p>");
        assert_eq!(nodes.len(), 1);
    }
}
