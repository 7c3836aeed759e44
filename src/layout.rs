//! Layout engine – uses Taffy to compute block and flexbox layout from a styled
//! DOM tree, then converts the result into a tree of positioned boxes.
//!
//! Block elements become flex columns. A block whose children are all inline
//! is collapsed into a single wrapped text leaf carrying the block's own
//! margin, padding and border.

use std::collections::HashMap;
use taffy::prelude::*;
use taffy::TaffyError;

use crate::dom::Tag;
use crate::fonts::{wrap_runs, FontFace, RunSpec, WrappedLine};
use crate::style::{self as css, ComputedStyle, StyledNode};

// ---------------------------------------------------------------------------
// Intermediate layout tree (pre-pagination)
// ---------------------------------------------------------------------------

/// A positioned border box in document coordinates (before page splitting).
#[derive(Debug, Clone)]
pub struct PositionedBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub style: ComputedStyle,
    pub content: BoxContent,
    pub children: Vec<PositionedBox>,
}

impl PositionedBox {
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Clone)]
pub enum BoxContent {
    None,
    Text { lines: Vec<LineBox> },
    /// List item marker drawn in the left gutter.
    ListItem { marker: String },
}

/// Part of a line drawn in one style, optionally linking somewhere.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub text: String,
    /// Offset from the line start.
    pub x: f32,
    pub width: f32,
    pub style: ComputedStyle,
    pub href: Option<String>,
}

/// One wrapped line of a text box.
#[derive(Debug, Clone)]
pub struct LineBox {
    pub fragments: Vec<Fragment>,
    pub width: f32,
    pub height: f32,
    /// Distance from the line top to the shared baseline.
    pub baseline: f32,
}

impl LineBox {
    pub fn text(&self) -> String {
        self.fragments.iter().map(|f| f.text.as_str()).collect()
    }
}

fn face_of(style: &ComputedStyle) -> FontFace {
    FontFace::new(style.font_family, style.is_bold(), style.is_italic())
}

/// Inline text with the style and link target in effect where it appears.
#[derive(Debug, Clone)]
struct InlineRun {
    text: String,
    style: ComputedStyle,
    href: Option<String>,
}

fn collect_runs(node: &StyledNode, href: Option<&str>, out: &mut Vec<InlineRun>) {
    match node {
        StyledNode::Text { text, style } => out.push(InlineRun {
            text: text.clone(),
            style: style.clone(),
            href: href.map(str::to_string),
        }),
        StyledNode::Element {
            style,
            href: own,
            children,
            ..
        } => {
            if style.display == css::Display::None {
                return;
            }
            let href = own.as_deref().or(href);
            for child in children {
                collect_runs(child, href, out);
            }
        }
    }
}

/// Line height and baseline: the tallest fragment wins, and the block's own
/// font always contributes a strut.
fn line_box(wrapped: WrappedLine, runs: &[InlineRun], strut: &ComputedStyle) -> LineBox {
    let metrics = |s: &ComputedStyle| {
        let height = s.line_height_pt();
        let baseline = (height - s.font_size) / 2.0 + face_of(s).ascender(s.font_size);
        (height, baseline)
    };
    let (mut height, mut baseline) = metrics(strut);
    let fragments: Vec<Fragment> = wrapped
        .pieces
        .into_iter()
        .map(|piece| {
            let run = &runs[piece.run];
            let (h, b) = metrics(&run.style);
            height = height.max(h);
            baseline = baseline.max(b);
            Fragment {
                text: piece.text,
                x: piece.x,
                width: piece.width,
                style: run.style.clone(),
                href: run.href.clone(),
            }
        })
        .collect();
    LineBox {
        fragments,
        width: wrapped.width,
        height,
        baseline,
    }
}

// ---------------------------------------------------------------------------
// Build Taffy tree from styled nodes
// ---------------------------------------------------------------------------

struct LayoutBuilder {
    taffy: TaffyTree<()>,
    node_styles: HashMap<NodeId, ComputedStyle>,
    node_content: HashMap<NodeId, BoxContent>,
}

impl LayoutBuilder {
    fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            node_styles: HashMap::new(),
            node_content: HashMap::new(),
        }
    }

    /// True when every child is a text node or an inline element with only
    /// inline descendants.
    fn all_inline(children: &[StyledNode]) -> bool {
        children.iter().all(|c| match c {
            StyledNode::Text { .. } => true,
            StyledNode::Element {
                style,
                children: gc,
                ..
            } => style.display == css::Display::Inline && Self::all_inline(gc),
        })
    }

    fn is_skipped(node: &StyledNode) -> bool {
        match node {
            StyledNode::Text { text, .. } => text.trim().is_empty(),
            StyledNode::Element { style, .. } => style.display == css::Display::None,
        }
    }

    fn build_node(
        &mut self,
        styled: &StyledNode,
        parent_width: f32,
    ) -> Result<NodeId, TaffyError> {
        match styled {
            StyledNode::Text { text, style } => {
                let run = InlineRun {
                    text: text.clone(),
                    style: style.clone(),
                    href: None,
                };
                self.build_text_node(&[run], style, parent_width)
            }
            StyledNode::Element {
                style, children, ..
            } => self.build_element_node(style, children, parent_width),
        }
    }

    /// Wrapped text leaf. `style` supplies the margin, padding and border the
    /// leaf carries; each run brings its own typography.
    fn build_text_node(
        &mut self,
        runs: &[InlineRun],
        style: &ComputedStyle,
        parent_width: f32,
    ) -> Result<NodeId, TaffyError> {
        let inset_x = style.horizontal_extras();
        let inset_y =
            style.border.top + style.border.bottom + style.padding.top + style.padding.bottom;
        let max_w = (parent_width - inset_x).max(1.0);

        let specs: Vec<RunSpec<'_>> = runs
            .iter()
            .map(|r| RunSpec {
                text: &r.text,
                face: face_of(&r.style),
                size: r.style.font_size,
            })
            .collect();
        let lines: Vec<LineBox> = wrap_runs(&specs, max_w)
            .into_iter()
            .map(|w| line_box(w, runs, style))
            .collect();
        let text_width = lines.iter().map(|l| l.width).fold(0.0f32, f32::max);
        let text_height: f32 = lines.iter().map(|l| l.height).sum();

        let box_extras_x = inset_x - style.margin.left - style.margin.right;
        let taffy_style = Style {
            size: Size {
                width: Dimension::Length(text_width + box_extras_x),
                height: Dimension::Length(text_height + inset_y),
            },
            margin: margin_rect(style),
            padding: padding_rect(style),
            border: border_rect(style),
            ..Default::default()
        };

        let node = self.taffy.new_leaf(taffy_style)?;
        self.node_styles.insert(node, style.clone());
        self.node_content.insert(node, BoxContent::Text { lines });
        Ok(node)
    }

    fn build_element_node(
        &mut self,
        style: &ComputedStyle,
        children: &[StyledNode],
        parent_width: f32,
    ) -> Result<NodeId, TaffyError> {
        let my_width = match style.width {
            css::Dimension::Pt(w) => w + style.margin.left + style.margin.right,
            css::Dimension::Percent(p) => parent_width * p / 100.0,
            css::Dimension::Auto => parent_width,
        };

        // Inline-only content flows as one wrapped run per style.
        let inline_only = style.display != css::Display::Flex
            && !children.is_empty()
            && Self::all_inline(children);
        if inline_only {
            let mut runs = Vec::new();
            for child in children {
                collect_runs(child, None, &mut runs);
            }
            if runs.iter().any(|r| !r.text.trim().is_empty()) {
                if style.display != css::Display::ListItem {
                    return self.build_text_node(&runs, style, my_width);
                }
                let inner = my_width - style.horizontal_extras();
                let text = self.build_text_node(&runs, &style.for_text(), inner)?;
                return self.finish_container(style, &[text]);
            }
        }

        let inner_width = (my_width - style.horizontal_extras()).max(1.0);
        let visible: Vec<&StyledNode> = children.iter().filter(|c| !Self::is_skipped(c)).collect();

        // Flex rows divide the width evenly at build time so text wraps to its
        // column. Wrapping rows give every item the whole line.
        let is_flex_row =
            style.display == css::Display::Flex && style.flex_direction == css::FlexDirection::Row;
        let child_build_width = if is_flex_row && style.flex_wrap == css::FlexWrap::NoWrap {
            let count = visible.len().max(1);
            let gap_total = style.gap * count.saturating_sub(1) as f32;
            ((inner_width - gap_total) / count as f32).max(1.0)
        } else {
            inner_width
        };

        let mut child_nodes = Vec::with_capacity(visible.len());
        for child in visible {
            let child_id = self.build_node(child, child_build_width)?;
            if let StyledNode::Element { tag: Tag::Li, .. } = child {
                self.node_content.insert(
                    child_id,
                    BoxContent::ListItem {
                        marker: "\u{2022}".to_string(),
                    },
                );
            }
            child_nodes.push(child_id);
        }

        self.finish_container(style, &child_nodes)
    }

    fn finish_container(
        &mut self,
        style: &ComputedStyle,
        children: &[NodeId],
    ) -> Result<NodeId, TaffyError> {
        let node = self.taffy.new_with_children(computed_to_taffy(style), children)?;
        self.node_styles.insert(node, style.clone());
        Ok(node)
    }

    /// Extract positioned boxes after layout computation.
    fn extract(
        &self,
        node: NodeId,
        offset_x: f32,
        offset_y: f32,
    ) -> Result<PositionedBox, TaffyError> {
        let layout = self.taffy.layout(node)?;
        let style = self.node_styles.get(&node).cloned().unwrap_or_default();
        let content = self
            .node_content
            .get(&node)
            .cloned()
            .unwrap_or(BoxContent::None);

        let x = offset_x + layout.location.x;
        let y = offset_y + layout.location.y;

        let children = self
            .taffy
            .children(node)?
            .into_iter()
            .map(|child| self.extract(child, x, y))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PositionedBox {
            x,
            y,
            width: layout.size.width,
            height: layout.size.height,
            style,
            content,
            children,
        })
    }
}

fn margin_rect(s: &ComputedStyle) -> Rect<LengthPercentageAuto> {
    Rect {
        top: LengthPercentageAuto::Length(s.margin.top),
        right: LengthPercentageAuto::Length(s.margin.right),
        bottom: LengthPercentageAuto::Length(s.margin.bottom),
        left: LengthPercentageAuto::Length(s.margin.left),
    }
}

fn padding_rect(s: &ComputedStyle) -> Rect<LengthPercentage> {
    Rect {
        top: LengthPercentage::Length(s.padding.top),
        right: LengthPercentage::Length(s.padding.right),
        bottom: LengthPercentage::Length(s.padding.bottom),
        left: LengthPercentage::Length(s.padding.left),
    }
}

fn border_rect(s: &ComputedStyle) -> Rect<LengthPercentage> {
    Rect {
        top: LengthPercentage::Length(s.border.top),
        right: LengthPercentage::Length(s.border.right),
        bottom: LengthPercentage::Length(s.border.bottom),
        left: LengthPercentage::Length(s.border.left),
    }
}

fn dim_to_taffy(d: css::Dimension) -> Dimension {
    match d {
        css::Dimension::Auto => Dimension::Auto,
        css::Dimension::Pt(v) => Dimension::Length(v),
        css::Dimension::Percent(v) => Dimension::Percent(v / 100.0),
    }
}

fn computed_to_taffy(s: &ComputedStyle) -> Style {
    let mut ts = Style::default();

    match s.display {
        css::Display::Flex => {
            ts.display = taffy::Display::Flex;
            ts.flex_direction = match s.flex_direction {
                css::FlexDirection::Row => taffy::FlexDirection::Row,
                css::FlexDirection::Column => taffy::FlexDirection::Column,
            };
            ts.flex_wrap = match s.flex_wrap {
                css::FlexWrap::NoWrap => taffy::FlexWrap::NoWrap,
                css::FlexWrap::Wrap => taffy::FlexWrap::Wrap,
            };
            ts.justify_content = Some(match s.justify_content {
                css::JustifyContent::Start => taffy::JustifyContent::Start,
                css::JustifyContent::End => taffy::JustifyContent::End,
                css::JustifyContent::Center => taffy::JustifyContent::Center,
                css::JustifyContent::SpaceBetween => taffy::JustifyContent::SpaceBetween,
                css::JustifyContent::SpaceAround => taffy::JustifyContent::SpaceAround,
                css::JustifyContent::SpaceEvenly => taffy::JustifyContent::SpaceEvenly,
            });
            ts.align_items = Some(match s.align_items {
                css::AlignItems::Start => taffy::AlignItems::Start,
                css::AlignItems::End => taffy::AlignItems::End,
                css::AlignItems::Center => taffy::AlignItems::Center,
                css::AlignItems::Stretch => taffy::AlignItems::Stretch,
            });
            ts.gap = Size {
                width: LengthPercentage::Length(s.gap),
                height: LengthPercentage::Length(s.gap),
            };
        }
        css::Display::Block | css::Display::ListItem => {
            // Block-level elements stack vertically.
            ts.display = taffy::Display::Flex;
            ts.flex_direction = taffy::FlexDirection::Column;
            ts.align_items = match s.text_align {
                css::TextAlign::Left => None,
                css::TextAlign::Center => Some(taffy::AlignItems::Center),
                css::TextAlign::Right => Some(taffy::AlignItems::End),
            };
        }
        css::Display::Inline => {
            ts.display = taffy::Display::Flex;
            ts.flex_direction = taffy::FlexDirection::Row;
            ts.flex_wrap = taffy::FlexWrap::Wrap;
        }
        css::Display::None => {
            ts.display = taffy::Display::None;
        }
    }

    ts.size = Size {
        width: dim_to_taffy(s.width),
        height: Dimension::Auto,
    };
    // Flex items may compress below their natural content size.
    ts.min_size = Size {
        width: if s.flex_shrink > 0.0 || s.flex_grow > 0.0 {
            Dimension::Length(0.0)
        } else {
            Dimension::Auto
        },
        height: Dimension::Auto,
    };
    ts.max_size = Size {
        width: dim_to_taffy(s.max_width),
        height: Dimension::Auto,
    };
    ts.flex_grow = s.flex_grow;
    ts.flex_shrink = s.flex_shrink;
    ts.margin = margin_rect(s);
    ts.padding = padding_rect(s);
    ts.border = border_rect(s);

    ts
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute layout for a styled tree, returning the top-level positioned boxes
/// in document coordinates. `origin_x` is the left page margin.
pub fn compute_layout(
    styled_nodes: &[StyledNode],
    content_width: f32,
    origin_x: f32,
) -> Result<Vec<PositionedBox>, TaffyError> {
    let mut builder = LayoutBuilder::new();

    let mut child_ids = Vec::new();
    for node in styled_nodes.iter().filter(|n| !LayoutBuilder::is_skipped(n)) {
        child_ids.push(builder.build_node(node, content_width)?);
    }

    let root_style = Style {
        display: taffy::Display::Flex,
        flex_direction: taffy::FlexDirection::Column,
        size: Size {
            width: Dimension::Length(content_width),
            height: Dimension::Auto,
        },
        ..Default::default()
    };
    let root = builder.taffy.new_with_children(root_style, &child_ids)?;

    builder.taffy.compute_layout(
        root,
        Size {
            width: AvailableSpace::Definite(content_width),
            height: AvailableSpace::MaxContent,
        },
    )?;

    let root_box = builder.extract(root, origin_x, 0.0)?;
    log::debug!(
        "Laid out {} top-level boxes, document height {:.1}pt",
        root_box.children.len(),
        root_box.height
    );
    Ok(root_box.children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_html;
    use crate::style::build_styled_tree;

    fn layout(html: &str) -> Vec<PositionedBox> {
        let styled = build_styled_tree(&parse_html(html), None);
        compute_layout(&styled, 500.0, 40.0).unwrap()
    }

    #[test]
    fn layout_simple_paragraph() {
        let boxes = layout("<p>Hello world</p>");
        assert_eq!(boxes.len(), 1);
        let first = &boxes[0];
        assert!(first.width > 0.0, "Box should have width");
        assert!(first.height > 0.0, "Box should have height");
        assert_eq!(first.x, 40.0);
        assert!(matches!(first.content, BoxContent::Text { .. }));
    }

    #[test]
    fn inline_runs_merge_into_one_text_box() {
        let boxes = layout("<div><strong>Skills:</strong> Rust, Go</div>");
        let BoxContent::Text { lines } = &boxes[0].content else {
            panic!("expected text content");
        };
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "Skills: Rust, Go");
        let fragments = &lines[0].fragments;
        assert_eq!(fragments.len(), 2);
        assert!(fragments[0].style.is_bold());
        assert!(!fragments[1].style.is_bold());
        assert!(fragments[1].x > 0.0);
    }

    #[test]
    fn anchor_fragments_carry_their_target() {
        let boxes = layout(
            r#"<div>see <a href="https://jane.dev" style="color: #0d47a1">site</a> now</div>"#,
        );
        let BoxContent::Text { lines } = &boxes[0].content else {
            panic!("expected text content");
        };
        let link = lines[0]
            .fragments
            .iter()
            .find(|f| f.href.is_some())
            .expect("link fragment");
        assert_eq!(link.text, "site");
        assert_eq!(link.href.as_deref(), Some("https://jane.dev"));
        assert!((link.style.color.b - 0.631).abs() < 0.01);
        let linked = lines[0].fragments.iter().filter(|f| f.href.is_some());
        assert_eq!(linked.count(), 1);
    }

    #[test]
    fn mixed_sizes_share_the_tallest_line() {
        let boxes = layout(
            r#"<div style="font-size: 10pt">Role<span style="font-size: 20pt">Big</span></div>"#,
        );
        let BoxContent::Text { lines } = &boxes[0].content else {
            panic!("expected text content");
        };
        assert!((lines[0].height - 24.0).abs() < 0.01);
        assert!((boxes[0].height - 24.0).abs() < 0.01);
    }

    #[test]
    fn flex_row_places_children_side_by_side() {
        let boxes = layout(
            r#"<div style="display: flex; justify-content: space-between"><div>A</div><div>B</div></div>"#,
        );
        let row = &boxes[0];
        assert_eq!(row.children.len(), 2);
        assert!(row.children[1].x > row.children[0].x);
        assert!((row.children[0].y - row.children[1].y).abs() < 0.01);
    }

    #[test]
    fn list_items_get_markers() {
        let boxes = layout("<ul><li>one</li><li>two</li></ul>");
        let list = &boxes[0];
        assert_eq!(list.children.len(), 2);
        assert!(matches!(list.children[0].content, BoxContent::ListItem { .. }));
        assert!(list.children[1].y > list.children[0].y);
    }

    #[test]
    fn hidden_and_blank_nodes_are_skipped() {
        let boxes = layout("<title>x</title><div>\n  </div><p>shown</p>");
        assert_eq!(boxes.len(), 2);
        assert!(boxes[0].height.abs() < 0.01);
    }

    #[test]
    fn text_box_includes_padding() {
        let plain = layout("<span>pill</span>");
        let padded = layout(r#"<span style="padding: 4px 8px">pill</span>"#);
        assert!((padded[0].width - plain[0].width - 12.0).abs() < 0.01);
        assert!((padded[0].height - plain[0].height - 6.0).abs() < 0.01);
    }

    #[test]
    fn long_text_wraps_within_width() {
        let words = "experience ".repeat(40);
        let boxes = layout(&format!("<p>{words}</p>"));
        let BoxContent::Text { lines } = &boxes[0].content else {
            panic!("expected text");
        };
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.width <= 500.0));
        assert!(boxes[0].width <= 500.0);
    }
}
