//! Pagination – splits positioned boxes into pages.
//!
//! Handles:
//! - Page boundaries for any [`PageConfig`] (per-edge margins)
//! - Page-break-before / page-break-after hints
//! - `break-inside: avoid` blocks that move whole to the next page
//! - Headings kept on the same page as the block that follows them

use crate::layout::{BoxContent, Fragment, PositionedBox};
use crate::layout_config::{
    BoxBorders, LayoutBox, LayoutConfig, PageLayout, TextContent, TextLine, TextRun,
};
use crate::page::PageConfig;
use crate::style::{self, ComputedStyle};

/// Whether a box may be split into its children at a page boundary.
fn is_splittable(pbox: &PositionedBox, content_height: f32) -> bool {
    if pbox.children.is_empty() || matches!(pbox.content, BoxContent::Text { .. }) {
        return false;
    }
    if pbox.height > content_height {
        return true;
    }
    let is_row = pbox.style.display == style::Display::Flex
        && pbox.style.flex_direction == style::FlexDirection::Row;
    matches!(pbox.content, BoxContent::None) && !is_row && !pbox.style.break_inside_avoid
}

/// Expand containers down to the units that pagination places atomically.
fn flatten_for_pagination(boxes: &[PositionedBox], content_height: f32) -> Vec<&PositionedBox> {
    let mut result = Vec::new();
    for pbox in boxes {
        if is_splittable(pbox, content_height) {
            result.extend(flatten_for_pagination(&pbox.children, content_height));
        } else {
            result.push(pbox);
        }
    }
    result
}

fn new_page(config: &mut LayoutConfig, current: &mut PageLayout) {
    let finished = std::mem::replace(
        current,
        PageLayout {
            page_index: config.pages.len() + 1,
            boxes: Vec::new(),
        },
    );
    config.pages.push(finished);
}

/// Convert positioned boxes into a paginated [`LayoutConfig`].
pub fn paginate(boxes: &[PositionedBox], page: &PageConfig, title: &str) -> LayoutConfig {
    let mut config = LayoutConfig {
        title: title.to_string(),
        page_width_pt: page.format.width_pt(),
        page_height_pt: page.format.height_pt(),
        print_background: page.print_background,
        pages: Vec::new(),
    };

    let content_height = page.content_height();
    let top = page.margins.top_pt();
    let flat = flatten_for_pagination(boxes, content_height);

    let mut current_page = PageLayout {
        page_index: 0,
        boxes: Vec::new(),
    };

    // Document-space y at which the current page begins. PositionedBox.y
    // values are absolute, so `pbox.y - page_start_doc_y` is the y-on-page.
    let mut page_start_doc_y = 0.0f32;

    for (i, pbox) in flat.iter().enumerate() {
        if pbox.style.page_break_before && !current_page.boxes.is_empty() {
            new_page(&mut config, &mut current_page);
            page_start_doc_y = pbox.y;
        }

        let mut needed_bottom = pbox.bottom() - page_start_doc_y;
        if pbox.style.keep_with_next {
            if let Some(next) = flat.get(i + 1) {
                if next.bottom() - pbox.y <= content_height {
                    needed_bottom = needed_bottom.max(next.bottom() - page_start_doc_y);
                }
            }
        }

        if needed_bottom > content_height && !current_page.boxes.is_empty() {
            new_page(&mut config, &mut current_page);
            page_start_doc_y = pbox.y;
        }

        let y_on_page = (pbox.y - page_start_doc_y).max(0.0);
        current_page
            .boxes
            .push(build_layout_box(pbox, pbox.x, top + y_on_page));

        if pbox.style.page_break_after {
            new_page(&mut config, &mut current_page);
            page_start_doc_y = pbox.bottom();
        }
    }

    if !current_page.boxes.is_empty() || config.pages.is_empty() {
        config.pages.push(current_page);
    }
    log::debug!("Paginated {} boxes onto {} page(s)", flat.len(), config.pages.len());
    config
}

fn text_content(
    style: &ComputedStyle,
    lines: Vec<TextLine>,
    marker: Option<String>,
) -> TextContent {
    TextContent {
        lines,
        font_family: style.font_family,
        font_size: style.font_size,
        bold: style.is_bold(),
        italic: style.is_italic(),
        color: style.color.to_array(),
        line_height: style.line_height_pt(),
        list_marker: marker,
    }
}

fn text_run(frag: &Fragment) -> TextRun {
    let s = &frag.style;
    TextRun {
        text: frag.text.clone(),
        x_offset: frag.x,
        width: frag.width,
        font_family: s.font_family,
        font_size: s.font_size,
        bold: s.is_bold(),
        italic: s.is_italic(),
        color: s.color.to_array(),
        underline: s.text_decoration == style::TextDecoration::Underline,
        href: frag.href.clone(),
    }
}

/// Recursively build a LayoutBox tree with page-absolute coordinates.
///
/// A child's absolute y is `parent_abs_y + (child.y - parent.y)` because all
/// PositionedBox coordinates live in the same document space.
fn build_layout_box(pbox: &PositionedBox, abs_x: f32, abs_y: f32) -> LayoutBox {
    let s = &pbox.style;
    let mut lb = LayoutBox::new(abs_x, abs_y, pbox.width, pbox.height);

    if !s.background_color.is_transparent() {
        lb.background_color = Some(s.background_color.to_array());
    }

    if s.border.any() {
        lb.borders = Some(BoxBorders {
            top: s.border.top,
            right: s.border.right,
            bottom: s.border.bottom,
            left: s.border.left,
            color: s.border_color.to_array(),
        });
    }

    match &pbox.content {
        BoxContent::Text { lines } => {
            let inset_left = s.border.left + s.padding.left;
            let inset_top = s.border.top + s.padding.top;
            let content_w = pbox.width - inset_left - s.border.right - s.padding.right;
            let mut y = inset_top;
            let mut text_lines = Vec::with_capacity(lines.len());
            for line in lines {
                let slack = (content_w - line.width).max(0.0);
                let align = match s.text_align {
                    style::TextAlign::Left => 0.0,
                    style::TextAlign::Center => slack / 2.0,
                    style::TextAlign::Right => slack,
                };
                text_lines.push(TextLine {
                    text: line.text(),
                    x_offset: inset_left + align,
                    y_offset: y,
                    height: line.height,
                    baseline: line.baseline,
                    runs: line.fragments.iter().map(text_run).collect(),
                });
                y += line.height;
            }
            lb.text = Some(text_content(s, text_lines, None));
        }
        BoxContent::ListItem { marker } => {
            // The item's text comes from its children; only the bullet lives here.
            lb.text = Some(text_content(s, Vec::new(), Some(marker.clone())));
        }
        BoxContent::None => {}
    }

    for child in &pbox.children {
        let child_abs_y = abs_y + (child.y - pbox.y);
        lb.children.push(build_layout_box(child, child.x, child_abs_y));
    }

    lb
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;
    use crate::layout::compute_layout;
    use crate::style::build_styled_tree;

    fn paginate_html(html: &str, page: &PageConfig) -> LayoutConfig {
        let styled = build_styled_tree(&parse_html(html), None);
        let boxes =
            compute_layout(&styled, page.content_width(), page.margins.left_pt()).unwrap();
        paginate(&boxes, page, "test")
    }

    #[test]
    fn single_page() {
        let config = paginate_html("<p>Short text</p>", &PageConfig::ats());
        assert_eq!(config.pages.len(), 1);
        assert!(config.print_background);
        let first = &config.pages[0].boxes[0];
        assert!((first.y - PageConfig::ats().margins.top_pt()).abs() < 0.01);
    }

    #[test]
    fn multiple_pages() {
        let html: String = (0..80)
            .map(|i| format!("<p>Paragraph {i} with some text</p>"))
            .collect();
        let page = PageConfig::designed();
        let config = paginate_html(&format!("<section>{html}</section>"), &page);
        assert!(config.pages.len() > 1, "got {} pages", config.pages.len());
        let limit = page.format.height_pt() - page.margins.bottom_pt() + 0.01;
        for p in &config.pages {
            for b in &p.boxes {
                assert!(b.y + b.height <= limit, "box overflows page {}", p.page_index);
            }
        }
    }

    #[test]
    fn explicit_page_break() {
        let html = r#"<p>one</p><p style="page-break-before: always">two</p>"#;
        let config = paginate_html(html, &PageConfig::ats());
        assert_eq!(config.pages.len(), 2);
        assert_eq!(config.pages[1].page_index, 1);
    }

    #[test]
    fn heading_moves_with_following_block() {
        // Leave room for exactly one more 12pt line: the heading fits, its body does not.
        let page = PageConfig::ats();
        let line = r#"<p style="margin: 0; font-size: 10pt">line</p>"#;
        let fill = (page.content_height() / 12.0).floor() as usize - 1;
        let mut html = line.repeat(fill);
        html.push_str(r#"<h2 style="margin: 0; font-size: 10pt">Heading</h2>"#);
        html.push_str(r#"<p style="margin: 0; font-size: 10pt">body</p>"#);

        let config = paginate_html(&html, &page);
        let page_of = |needle: &str| {
            config.pages.iter().position(|p| {
                p.boxes.iter().any(|b| {
                    b.text
                        .as_ref()
                        .is_some_and(|t| t.lines.iter().any(|l| l.text == needle))
                })
            })
        };
        assert_eq!(config.pages.len(), 2);
        assert_eq!(page_of("Heading"), Some(1));
        assert_eq!(page_of("body"), Some(1));
    }

    #[test]
    fn right_aligned_blocks_hug_the_right_edge() {
        let html = r#"<div style="text-align: right; width: 300pt"><div>hi</div></div>"#;
        let page = PageConfig::ats();
        let config = paginate_html(html, &page);
        // The wrapper is split away; only the text box is placed.
        let text_box = &config.pages[0].boxes[0];
        assert_eq!(text_box.text.as_ref().unwrap().lines.len(), 1);
        assert!(text_box.x > page.margins.left_pt() + 200.0);
        assert!((text_box.x + text_box.width - page.margins.left_pt() - 300.0).abs() < 0.5);
    }

    #[test]
    fn runs_keep_style_and_link_per_fragment() {
        let html = concat!(
            r#"<p><strong>Links:</strong> "#,
            r#"<a href="https://jane.dev" style="text-decoration: underline">site</a></p>"#,
        );
        let config = paginate_html(html, &PageConfig::ats());
        let text = config.pages[0].boxes[0].text.as_ref().unwrap();
        let line = &text.lines[0];
        assert_eq!(line.text, "Links: site");
        let bold = line.runs.iter().find(|r| r.text.contains("Links:")).unwrap();
        let link = line.runs.iter().find(|r| r.text == "site").unwrap();
        assert!(bold.bold && bold.href.is_none());
        assert!(!link.bold && link.underline);
        assert_eq!(link.href.as_deref(), Some("https://jane.dev"));
        assert!(link.x_offset >= bold.x_offset + bold.width - 0.01);
        assert!(line.baseline > 0.0 && line.baseline < line.height);
    }

    #[test]
    fn empty_document_still_has_a_page() {
        let config = paginate(&[], &PageConfig::designed(), "empty");
        assert_eq!(config.pages.len(), 1);
        assert!(config.pages[0].boxes.is_empty());
    }
}
