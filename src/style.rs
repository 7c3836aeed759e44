//! Style resolver – maps tag defaults and inline `style` attributes to a flat
//! [`ComputedStyle`] consumed by the layout engine.
//!
//! All lengths are resolved to PDF points (1pt = 1/72in, 1px = 0.75pt).

use crate::dom::{DomNode, ElementNode, Tag};
use crate::fonts::FontFamily;
use crate::page::PT_PER_MM;

/// Fully resolved style for a single element.
#[derive(Debug, Clone)]
pub struct ComputedStyle {
    // Display / layout
    pub display: Display,
    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub flex_grow: f32,
    pub flex_shrink: f32,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub gap: f32,

    // Sizing
    pub width: Dimension,
    pub max_width: Dimension,

    // Spacing (pt)
    pub margin: Edges,
    pub padding: Edges,

    // Border
    pub border: Edges,
    pub border_color: Color,

    // Typography
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_family: FontFamily,
    pub color: Color,
    pub text_align: TextAlign,
    pub line_height: f32,
    pub text_decoration: TextDecoration,
    pub font_style: FontStyle,

    // Background
    pub background_color: Color,

    // Pagination hints
    pub page_break_before: bool,
    pub page_break_after: bool,
    pub break_inside_avoid: bool,
    /// Keep on the same page as the following box (headings).
    pub keep_with_next: bool,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::Block,
            flex_direction: FlexDirection::Row,
            flex_wrap: FlexWrap::NoWrap,
            flex_grow: 0.0,
            flex_shrink: 1.0,
            justify_content: JustifyContent::Start,
            align_items: AlignItems::Stretch,
            gap: 0.0,
            width: Dimension::Auto,
            max_width: Dimension::Auto,
            margin: Edges::ZERO,
            padding: Edges::ZERO,
            border: Edges::ZERO,
            border_color: Color::BLACK,
            font_size: 12.0,
            font_weight: FontWeight::Normal,
            font_family: FontFamily::Sans,
            color: Color::BLACK,
            text_align: TextAlign::Left,
            line_height: 1.2,
            text_decoration: TextDecoration::None,
            font_style: FontStyle::Normal,
            background_color: Color::TRANSPARENT,
            page_break_before: false,
            page_break_after: false,
            break_inside_avoid: false,
            keep_with_next: false,
        }
    }
}

impl ComputedStyle {
    pub fn is_bold(&self) -> bool {
        self.font_weight == FontWeight::Bold
    }

    pub fn is_italic(&self) -> bool {
        self.font_style == FontStyle::Italic
    }

    /// Line box height in points.
    pub fn line_height_pt(&self) -> f32 {
        self.font_size * self.line_height
    }

    /// Horizontal space eaten by margin, border and padding.
    pub fn horizontal_extras(&self) -> f32 {
        self.margin.left
            + self.margin.right
            + self.border.left
            + self.border.right
            + self.padding.left
            + self.padding.right
    }

    /// Copy of this style suitable for a bare text run: text properties only.
    pub fn for_text(&self) -> ComputedStyle {
        ComputedStyle {
            display: Display::Inline,
            font_size: self.font_size,
            font_weight: self.font_weight,
            font_family: self.font_family,
            color: self.color,
            text_align: self.text_align,
            line_height: self.line_height,
            text_decoration: self.text_decoration,
            font_style: self.font_style,
            ..ComputedStyle::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Supporting types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Block,
    Flex,
    Inline,
    ListItem,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexDirection {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlexWrap {
    NoWrap,
    Wrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JustifyContent {
    Start,
    End,
    Center,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignItems {
    Start,
    End,
    Center,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDecoration {
    None,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Dimension {
    Auto,
    Pt(f32),
    Percent(f32),
}

/// Four per-edge lengths in points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn any(&self) -> bool {
        self.top > 0.0 || self.right > 0.0 || self.bottom > 0.0 || self.left > 0.0
    }
}

/// RGBA colour (0.0 – 1.0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn is_transparent(&self) -> bool {
        self.a < 0.001
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);
        match hex.len() {
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => Some(Self::rgb(
                channel(&hex[0..1].repeat(2))?,
                channel(&hex[1..2].repeat(2))?,
                channel(&hex[2..3].repeat(2))?,
            )),
            _ => None,
        }
    }

    /// Hex colours and the few keywords the templates use.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "black" => Some(Self::BLACK),
            "white" => Some(Self::WHITE),
            "transparent" | "none" => Some(Self::TRANSPARENT),
            other => Self::from_hex(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Style resolution
// ---------------------------------------------------------------------------

/// Resolve the style for an element, inheriting text properties from its parent.
pub fn resolve_style(element: &ElementNode, parent: Option<&ComputedStyle>) -> ComputedStyle {
    let mut style = ComputedStyle::default();

    if let Some(p) = parent {
        style.font_size = p.font_size;
        style.font_weight = p.font_weight;
        style.font_family = p.font_family;
        style.color = p.color;
        style.text_align = p.text_align;
        style.line_height = p.line_height;
        style.font_style = p.font_style;
    }

    apply_tag_defaults(&mut style, &element.tag);

    if let Some(inline) = element.inline_style() {
        apply_inline_style(&mut style, inline);
    }

    style
}

/// User-agent defaults, applied on top of inherited values.
fn apply_tag_defaults(s: &mut ComputedStyle, tag: &Tag) {
    let heading = |s: &mut ComputedStyle, size: f32, before: f32, after: f32| {
        s.font_size = size;
        s.font_weight = FontWeight::Bold;
        s.margin.top = before;
        s.margin.bottom = after;
        s.keep_with_next = true;
    };
    match tag {
        Tag::H1 => heading(s, 24.0, 12.0, 8.0),
        Tag::H2 => heading(s, 18.0, 10.0, 6.0),
        Tag::H3 => heading(s, 14.0, 8.0, 4.0),
        Tag::P => s.margin.bottom = 8.0,
        Tag::Ul => {
            s.margin.bottom = 8.0;
            s.padding.left = 22.5;
        }
        Tag::Li => s.display = Display::ListItem,
        Tag::Span | Tag::A => s.display = Display::Inline,
        Tag::Strong => {
            s.display = Display::Inline;
            s.font_weight = FontWeight::Bold;
        }
        Tag::Em => {
            s.display = Display::Inline;
            s.font_style = FontStyle::Italic;
        }
        Tag::Head | Tag::Title | Tag::Meta | Tag::Unknown(_) => s.display = Display::None,
        Tag::Html | Tag::Body | Tag::Header | Tag::Section | Tag::Div => {}
    }
    if *tag == Tag::A {
        s.color = Color::rgb(0.0, 0.0, 0.933);
        s.text_decoration = TextDecoration::Underline;
    }
}

pub(crate) fn apply_inline_style(s: &mut ComputedStyle, style_str: &str) {
    for decl in style_str.split(';') {
        let Some((prop, val)) = decl.split_once(':') else {
            continue;
        };
        apply_css_property(s, prop.trim(), val.trim());
    }
}

fn apply_css_property(s: &mut ComputedStyle, prop: &str, val: &str) {
    let em = s.font_size;
    let len = |v: &str| parse_length(v, em);
    match prop {
        "display" => {
            s.display = match val {
                "flex" => Display::Flex,
                "block" => Display::Block,
                "inline" | "inline-block" => Display::Inline,
                "list-item" => Display::ListItem,
                "none" => Display::None,
                _ => s.display,
            }
        }
        "flex-direction" => {
            s.flex_direction = match val {
                "column" => FlexDirection::Column,
                _ => FlexDirection::Row,
            }
        }
        "flex-wrap" => {
            s.flex_wrap = match val {
                "wrap" => FlexWrap::Wrap,
                _ => FlexWrap::NoWrap,
            }
        }
        "flex" => {
            if let Ok(grow) = val.split_whitespace().next().unwrap_or("").parse::<f32>() {
                s.flex_grow = grow;
                s.flex_shrink = 1.0;
            }
        }
        "flex-grow" => s.flex_grow = val.parse().unwrap_or(s.flex_grow),
        "flex-shrink" => s.flex_shrink = val.parse().unwrap_or(s.flex_shrink),
        "justify-content" => {
            s.justify_content = match val {
                "flex-end" | "end" | "right" => JustifyContent::End,
                "center" => JustifyContent::Center,
                "space-between" => JustifyContent::SpaceBetween,
                "space-around" => JustifyContent::SpaceAround,
                "space-evenly" => JustifyContent::SpaceEvenly,
                _ => JustifyContent::Start,
            }
        }
        "align-items" => {
            s.align_items = match val {
                "flex-start" | "start" | "baseline" => AlignItems::Start,
                "flex-end" | "end" => AlignItems::End,
                "center" => AlignItems::Center,
                _ => AlignItems::Stretch,
            }
        }
        "gap" => {
            if let Some(v) = len(val) {
                s.gap = v;
            }
        }
        "width" => s.width = parse_dimension(val, em),
        "max-width" => s.max_width = parse_dimension(val, em),
        "margin" => apply_shorthand(val, em, &mut s.margin),
        "margin-top" => set_len(&mut s.margin.top, len(val)),
        "margin-right" => set_len(&mut s.margin.right, len(val)),
        "margin-bottom" => set_len(&mut s.margin.bottom, len(val)),
        "margin-left" => set_len(&mut s.margin.left, len(val)),
        "padding" => apply_shorthand(val, em, &mut s.padding),
        "padding-top" => set_len(&mut s.padding.top, len(val)),
        "padding-right" => set_len(&mut s.padding.right, len(val)),
        "padding-bottom" => set_len(&mut s.padding.bottom, len(val)),
        "padding-left" => set_len(&mut s.padding.left, len(val)),
        "border" => {
            let (width, color) = parse_border(val, em);
            s.border = Edges {
                top: width,
                right: width,
                bottom: width,
                left: width,
            };
            if let Some(c) = color {
                s.border_color = c;
            }
        }
        "border-top" | "border-right" | "border-bottom" | "border-left" => {
            let (width, color) = parse_border(val, em);
            match prop {
                "border-top" => s.border.top = width,
                "border-right" => s.border.right = width,
                "border-bottom" => s.border.bottom = width,
                _ => s.border.left = width,
            }
            if let Some(c) = color {
                s.border_color = c;
            }
        }
        "border-width" => apply_shorthand(val, em, &mut s.border),
        "border-color" => {
            if let Some(c) = Color::parse(val) {
                s.border_color = c;
            }
        }
        "font-size" => set_len(&mut s.font_size, len(val)),
        "font-weight" => {
            s.font_weight = match val {
                "bold" | "bolder" | "600" | "700" | "800" | "900" => FontWeight::Bold,
                _ => FontWeight::Normal,
            }
        }
        "font-style" => {
            s.font_style = match val {
                "italic" | "oblique" => FontStyle::Italic,
                _ => FontStyle::Normal,
            }
        }
        "font-family" => s.font_family = FontFamily::from_css(val),
        "color" => {
            if let Some(c) = Color::parse(val) {
                s.color = c;
            }
        }
        "background-color" | "background" => {
            if let Some(c) = Color::parse(val) {
                s.background_color = c;
            }
        }
        "text-align" => {
            s.text_align = match val {
                "center" => TextAlign::Center,
                "right" | "end" => TextAlign::Right,
                _ => TextAlign::Left,
            }
        }
        "text-decoration" => {
            s.text_decoration = if val.contains("underline") {
                TextDecoration::Underline
            } else {
                TextDecoration::None
            }
        }
        "line-height" => {
            if val == "normal" {
                s.line_height = 1.2;
            } else if let Ok(factor) = val.parse::<f32>() {
                s.line_height = factor;
            } else if let Some(pt) = len(val) {
                s.line_height = pt / s.font_size;
            }
        }
        "break-before" | "page-break-before" => {
            s.page_break_before = matches!(val, "always" | "page");
        }
        "break-after" | "page-break-after" => {
            s.page_break_after = matches!(val, "always" | "page");
        }
        "break-inside" | "page-break-inside" => {
            s.break_inside_avoid = matches!(val, "avoid" | "avoid-page");
        }
        // Purely cosmetic (border-radius, word-break, ...): not rendered.
        _ => {}
    }
}

fn set_len(target: &mut f32, value: Option<f32>) {
    if let Some(v) = value {
        *target = v;
    }
}

/// Parse a CSS length into points. Bare numbers are treated as px.
pub fn parse_length(value: &str, em: f32) -> Option<f32> {
    let v = value.trim();
    let (number, factor) = if let Some(n) = v.strip_suffix("px") {
        (n, 0.75)
    } else if let Some(n) = v.strip_suffix("pt") {
        (n, 1.0)
    } else if let Some(n) = v.strip_suffix("mm") {
        (n, PT_PER_MM)
    } else if let Some(n) = v.strip_suffix("rem") {
        (n, 12.0)
    } else if let Some(n) = v.strip_suffix("em") {
        (n, em)
    } else {
        (v, 0.75)
    };
    number.trim().parse::<f32>().ok().map(|n| n * factor)
}

fn parse_dimension(value: &str, em: f32) -> Dimension {
    let v = value.trim();
    if v == "auto" {
        Dimension::Auto
    } else if let Some(pct) = v.strip_suffix('%') {
        pct.trim()
            .parse::<f32>()
            .map(Dimension::Percent)
            .unwrap_or(Dimension::Auto)
    } else {
        parse_length(v, em).map(Dimension::Pt).unwrap_or(Dimension::Auto)
    }
}

/// `1px solid #ddd` → (0.75, Some(#ddd)). `none` → zero width.
fn parse_border(value: &str, em: f32) -> (f32, Option<Color>) {
    let mut width = 0.0;
    let mut color = None;
    let mut styled = false;
    for token in value.split_whitespace() {
        if token == "none" || token == "hidden" {
            return (0.0, None);
        }
        if let Some(w) = parse_length(token, em) {
            width = w;
        } else if let Some(c) = Color::parse(token) {
            color = Some(c);
        } else {
            styled = true;
        }
    }
    // `border: solid` alone means the initial medium width.
    if styled && width == 0.0 {
        width = 2.25;
    }
    (width, color)
}

/// CSS 1/2/3/4-value shorthand.
fn apply_shorthand(value: &str, em: f32, edges: &mut Edges) {
    let parts: Vec<f32> = value
        .split_whitespace()
        .map(|p| if p == "auto" { Some(0.0) } else { parse_length(p, em) })
        .collect::<Option<Vec<f32>>>()
        .unwrap_or_default();
    let (top, right, bottom, left) = match parts[..] {
        [all] => (all, all, all, all),
        [vertical, horizontal] => (vertical, horizontal, vertical, horizontal),
        [top, horizontal, bottom] => (top, horizontal, bottom, horizontal),
        [top, right, bottom, left] => (top, right, bottom, left),
        _ => return,
    };
    *edges = Edges {
        top,
        right,
        bottom,
        left,
    };
}

// ---------------------------------------------------------------------------
// Styled DOM tree
// ---------------------------------------------------------------------------

/// A DOM node annotated with its computed style.
#[derive(Debug, Clone)]
pub enum StyledNode {
    Element {
        tag: Tag,
        style: ComputedStyle,
        /// Link target of an `<a>` element.
        href: Option<String>,
        children: Vec<StyledNode>,
    },
    Text {
        text: String,
        style: ComputedStyle,
    },
}

/// Build a styled tree from a DOM tree, resolving styles top-down.
pub fn build_styled_tree(
    nodes: &[DomNode],
    parent_style: Option<&ComputedStyle>,
) -> Vec<StyledNode> {
    let mut result = Vec::new();
    for node in nodes {
        match node {
            DomNode::Element(e) => {
                let style = resolve_style(e, parent_style);
                let children = build_styled_tree(&e.children, Some(&style));
                result.push(StyledNode::Element {
                    tag: e.tag.clone(),
                    style,
                    href: e.href().map(str::to_string),
                    children,
                });
            }
            DomNode::Text(text) => {
                // A lone separator space is kept only between inline siblings;
                // layout drops it again when it ends up alone in a block.
                if text.is_empty() {
                    continue;
                }
                let style = parent_style.map(ComputedStyle::for_text).unwrap_or_default();
                result.push(StyledNode::Text {
                    text: text.clone(),
                    style,
                });
            }
        }
    }
    result
}
