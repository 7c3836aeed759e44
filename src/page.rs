//! Page layout configuration handed to the PDF engine.

use std::fmt;
use std::str::FromStr;

/// Points per millimetre (1 pt = 1/72 inch).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// Physical paper size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageFormat {
    /// 210mm × 297mm (default).
    #[default]
    A4,
    /// 8.5in × 11in.
    Letter,
    /// 8.5in × 14in.
    Legal,
}

impl PageFormat {
    /// Page width in points.
    pub fn width_pt(self) -> f32 {
        match self {
            PageFormat::A4 => 595.28,
            PageFormat::Letter | PageFormat::Legal => 612.0,
        }
    }

    /// Page height in points.
    pub fn height_pt(self) -> f32 {
        match self {
            PageFormat::A4 => 841.89,
            PageFormat::Letter => 792.0,
            PageFormat::Legal => 1008.0,
        }
    }
}

impl FromStr for PageFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageFormat::A4),
            "letter" => Ok(PageFormat::Letter),
            "legal" => Ok(PageFormat::Legal),
            other => Err(format!("unknown page format '{other}'")),
        }
    }
}

impl fmt::Display for PageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageFormat::A4 => "A4",
            PageFormat::Letter => "Letter",
            PageFormat::Legal => "Legal",
        };
        f.write_str(name)
    }
}

/// Per-edge page margins in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub const fn uniform(mm: f32) -> Self {
        Self {
            top: mm,
            right: mm,
            bottom: mm,
            left: mm,
        }
    }

    pub fn top_pt(&self) -> f32 {
        self.top * PT_PER_MM
    }

    pub fn right_pt(&self) -> f32 {
        self.right * PT_PER_MM
    }

    pub fn bottom_pt(&self) -> f32 {
        self.bottom * PT_PER_MM
    }

    pub fn left_pt(&self) -> f32 {
        self.left * PT_PER_MM
    }
}

/// Everything the engine needs to know about the physical page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageConfig {
    pub format: PageFormat,
    pub margins: Margins,
    /// Whether background colours are painted.
    pub print_background: bool,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self::designed()
    }
}

impl PageConfig {
    /// A4, 12mm margins, backgrounds suppressed.
    pub const fn designed() -> Self {
        Self {
            format: PageFormat::A4,
            margins: Margins::uniform(12.0),
            print_background: false,
        }
    }

    /// A4, 20mm margins, backgrounds printed.
    pub const fn ats() -> Self {
        Self {
            format: PageFormat::A4,
            margins: Margins::uniform(20.0),
            print_background: true,
        }
    }

    /// Width available to content between the left and right margins.
    pub fn content_width(&self) -> f32 {
        self.format.width_pt() - self.margins.left_pt() - self.margins.right_pt()
    }

    /// Height available to content between the top and bottom margins.
    pub fn content_height(&self) -> f32 {
        self.format.height_pt() - self.margins.top_pt() - self.margins.bottom_pt()
    }
}
