//! Layout config – the frozen, serialisable description of exactly what goes
//! on each page. Produced by pagination, consumed by the PDF renderer.

use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};
use crate::fonts::FontFamily;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    #[serde(default = "LayoutConfig::default_title")]
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Whether background fills are painted.
    #[serde(default)]
    pub print_background: bool,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub boxes: Vec<LayoutBox>,
}

/// A positioned border box with optional content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Position relative to page top-left, in points.
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,

    pub background_color: Option<[f32; 4]>,
    pub borders: Option<BoxBorders>,

    pub text: Option<TextContent>,

    pub children: Vec<LayoutBox>,
}

/// Per-edge border widths sharing one colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxBorders {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// Pre-wrapped lines of text.
    pub lines: Vec<TextLine>,
    pub font_family: FontFamily,
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: [f32; 4],
    /// Line box height in points.
    pub line_height: f32,
    /// Bullet drawn in the gutter left of the box.
    pub list_marker: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLine {
    /// Plain text of the whole line.
    pub text: String,
    /// X offset of the line start from the box's left edge.
    pub x_offset: f32,
    /// Y offset of the line box top from the box's top edge.
    pub y_offset: f32,
    pub height: f32,
    /// Baseline position below the line box top.
    pub baseline: f32,
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

/// A stretch of one line drawn in a single font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    /// Offset from the line start.
    pub x_offset: f32,
    pub width: f32,
    pub font_family: FontFamily,
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub color: [f32; 4],
    pub underline: bool,
    /// URI the run links to.
    #[serde(default)]
    pub href: Option<String>,
}

impl LayoutConfig {
    fn default_title() -> String {
        "Resume".to_string()
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ForgeError::Render(format!("layout serialisation: {e}")))
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ForgeError::parse(format!("layout JSON: {e}")))
    }

    /// Number of text lines across all pages, markers excluded.
    pub fn line_count(&self) -> usize {
        fn count(b: &LayoutBox) -> usize {
            let own = b.text.as_ref().map_or(0, |t| t.lines.len());
            own + b.children.iter().map(count).sum::<usize>()
        }
        self.pages.iter().flat_map(|p| &p.boxes).map(count).sum()
    }

    /// Link targets in page order.
    pub fn link_targets(&self) -> Vec<&str> {
        fn walk<'a>(b: &'a LayoutBox, out: &mut Vec<&'a str>) {
            if let Some(text) = &b.text {
                let runs = text.lines.iter().flat_map(|l| &l.runs);
                out.extend(runs.filter_map(|r| r.href.as_deref()));
            }
            for child in &b.children {
                walk(child, out);
            }
        }
        let mut out = Vec::new();
        for b in self.pages.iter().flat_map(|p| &p.boxes) {
            walk(b, &mut out);
        }
        out
    }
}

impl LayoutBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            background_color: None,
            borders: None,
            text: None,
            children: Vec::new(),
        }
    }
}
