//! Markup builder – a small typed tree that serialises to HTML.
//!
//! Every text child and attribute value goes through [`escape`] when the tree
//! is written, so record fields can never inject markup.

use std::fmt;

/// Escape the five markup-significant characters.
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

/// Elements that never carry children or a closing tag.
const VOID_TAGS: &[&str] = &["meta"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Set the inline `style` attribute; empty styles are skipped.
    pub fn style(self, css: &str) -> Self {
        if css.is_empty() {
            self
        } else {
            self.attr("style", css)
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn child_if(self, child: Option<Element>) -> Self {
        match child {
            Some(c) => self.child(c),
            None => self,
        }
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children.into_iter().map(Node::Element));
        self
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Serialise this element (and its subtree) into `out`.
    pub fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        out.push('>');
        if VOID_TAGS.contains(&self.tag) {
            return;
        }
        for child in &self.children {
            match child {
                Node::Element(e) => e.write_to(out),
                Node::Text(t) => out.push_str(&escape(t)),
            }
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

/// A complete, self-contained rendered document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    /// Wrap a root `<html>` element with the doctype.
    pub fn document(root: &Element) -> Self {
        let mut out = String::from("<!doctype html>\n");
        root.write_to(&mut out);
        out.push('\n');
        Markup(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain text"), "plain text");
    }

    #[test]
    fn text_and_attributes_are_escaped() {
        let html = Element::new("a")
            .attr("href", "https://x.dev/?a=1&b=\"2\"")
            .text("<script>")
            .to_html();
        assert_eq!(
            html,
            r#"<a href="https://x.dev/?a=1&amp;b=&quot;2&quot;">&lt;script&gt;</a>"#
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let html = Element::new("meta").attr("charset", "utf-8").to_html();
        assert_eq!(html, r#"<meta charset="utf-8">"#);
    }

    #[test]
    fn children_keep_insertion_order() {
        let html = Element::new("ul")
            .children(["a", "b", "c"].iter().map(|s| Element::new("li").text(*s)))
            .child_if(None)
            .to_html();
        assert_eq!(html, "<ul><li>a</li><li>b</li><li>c</li></ul>");
    }

    #[test]
    fn empty_style_is_omitted() {
        assert_eq!(Element::new("div").style("").to_html(), "<div></div>");
        assert_eq!(
            Element::new("div").style("color: #000").to_html(),
            r#"<div style="color: #000"></div>"#
        );
    }

    #[test]
    fn document_has_doctype() {
        let doc = Markup::document(&Element::new("html"));
        assert!(doc.as_str().starts_with("<!doctype html>"));
        assert!(!doc.is_empty());
    }
}
