//! PDF renderer – takes a [`LayoutConfig`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API) and the base-14 builtin fonts.

use printpdf::*;

use crate::fonts::{FontFace, FontFamily};
use crate::layout_config::{LayoutBox, LayoutConfig, PageLayout, TextContent};

const MM_PER_PT: f32 = 0.352778;

/// Gap between a list marker and the item's box.
const MARKER_GUTTER: f32 = 10.0;

/// Render a LayoutConfig into PDF bytes.
pub fn render_pdf(config: &LayoutConfig) -> Vec<u8> {
    let page_w = Mm(config.page_width_pt * MM_PER_PT);
    let page_h = Mm(config.page_height_pt * MM_PER_PT);

    let mut doc = PdfDocument::new(&config.title);

    let mut pages: Vec<PdfPage> = config
        .pages
        .iter()
        .map(|page| PdfPage::new(page_w, page_h, page_ops(config, page)))
        .collect();
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let mut warnings = Vec::new();
    // Unknown ops carry the pre-encoded non-ASCII text and must be kept.
    let options = PdfSaveOptions {
        secure: false,
        ..Default::default()
    };
    let bytes = doc.save(&options, &mut warnings);
    for w in &warnings {
        log::warn!("printpdf: {w:?}");
    }
    log::debug!("Rendered {} page(s), {} bytes", config.pages.len(), bytes.len());
    bytes
}

/// Drawing operations for one page.
fn page_ops(config: &LayoutConfig, page: &PageLayout) -> Vec<Op> {
    let mut ops = Vec::new();
    for lbox in &page.boxes {
        render_box(&mut ops, lbox, config.page_height_pt, config.print_background);
    }
    ops
}

/// Windows-1252 code for `c`; the builtin fonts are declared with WinAnsiEncoding.
fn winansi(c: char) -> u8 {
    match c {
        '\u{20AC}' => 0x80, // euro
        '\u{2026}' => 0x85, // ellipsis
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201C}' => 0x93,
        '\u{201D}' => 0x94,
        '\u{2022}' => 0x95, // bullet
        '\u{2013}' => 0x96, // en-dash
        '\u{2014}' => 0x97, // em-dash
        '\u{2122}' => 0x99,
        '\u{00A0}' => 0x20,
        c if c.is_ascii() || ('\u{00A1}'..='\u{00FF}').contains(&c) => c as u8,
        other => {
            log::warn!("No WinAnsi glyph for {other:?}, substituting '?'");
            b'?'
        }
    }
}

/// A stretch of text shown with one operator.
#[derive(Debug, PartialEq)]
enum Chunk {
    /// Plain ASCII, written through printpdf's builtin-font op.
    Ascii(String),
    /// Already WinAnsi-encoded bytes, shown with a raw `Tj`.
    Encoded(Vec<u8>),
}

/// Split `text` so that only ASCII goes through printpdf's text encoder,
/// which passes strings through as UTF-8.
fn chunk_text(text: &str) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();
    for c in text.chars() {
        match (c.is_ascii(), chunks.last_mut()) {
            (true, Some(Chunk::Ascii(s))) => s.push(c),
            (true, _) => chunks.push(Chunk::Ascii(c.to_string())),
            (false, Some(Chunk::Encoded(bytes))) => bytes.push(winansi(c)),
            (false, _) => chunks.push(Chunk::Encoded(vec![winansi(c)])),
        }
    }
    chunks
}

fn builtin_font(family: FontFamily, bold: bool, italic: bool) -> BuiltinFont {
    match (family, bold, italic) {
        (FontFamily::Sans, false, false) => BuiltinFont::Helvetica,
        (FontFamily::Sans, true, false) => BuiltinFont::HelveticaBold,
        (FontFamily::Sans, false, true) => BuiltinFont::HelveticaOblique,
        (FontFamily::Sans, true, true) => BuiltinFont::HelveticaBoldOblique,
        (FontFamily::Serif, false, false) => BuiltinFont::TimesRoman,
        (FontFamily::Serif, true, false) => BuiltinFont::TimesBold,
        (FontFamily::Serif, false, true) => BuiltinFont::TimesItalic,
        (FontFamily::Serif, true, true) => BuiltinFont::TimesBoldItalic,
        (FontFamily::Mono, false, false) => BuiltinFont::Courier,
        (FontFamily::Mono, true, false) => BuiltinFont::CourierBold,
        (FontFamily::Mono, false, true) => BuiltinFont::CourierOblique,
        (FontFamily::Mono, true, true) => BuiltinFont::CourierBoldOblique,
    }
}

fn rgb(c: [f32; 4]) -> Color {
    Color::Rgb(Rgb {
        r: c[0],
        g: c[1],
        b: c[2],
        icc_profile: None,
    })
}

fn point(x: f32, y: f32) -> LinePoint {
    LinePoint {
        p: Point { x: Pt(x), y: Pt(y) },
        bezier: false,
    }
}

/// Filled rectangle given in top-left page coordinates.
fn fill_rect(
    ops: &mut Vec<Op>,
    x: f32,
    top: f32,
    w: f32,
    h: f32,
    page_height: f32,
    color: [f32; 4],
) {
    if w <= 0.0 || h <= 0.0 {
        return;
    }
    // PDF origin is bottom-left.
    let y1 = page_height - top - h;
    let y2 = page_height - top;
    ops.push(Op::SetFillColor { col: rgb(color) });
    ops.push(Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    point(x, y1),
                    point(x + w, y1),
                    point(x + w, y2),
                    point(x, y2),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        },
    });
}

fn write_text(
    ops: &mut Vec<Op>,
    x: f32,
    baseline: f32,
    text: &str,
    size: f32,
    font: BuiltinFont,
    color: [f32; 4],
) {
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(x),
            y: Pt(baseline),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        size: Pt(size),
        font,
    });
    ops.push(Op::SetFillColor { col: rgb(color) });
    let chunks = chunk_text(text);
    if !chunks.iter().any(|c| matches!(c, Chunk::Ascii(_))) {
        // printpdf only embeds builtin fonts named by a text op.
        ops.push(Op::WriteTextBuiltinFont {
            items: Vec::new(),
            font,
        });
    }
    for chunk in chunks {
        ops.push(match chunk {
            Chunk::Ascii(s) => Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(s)],
                font,
            },
            Chunk::Encoded(data) => Op::Unknown {
                key: "Tj".to_string(),
                value: vec![DictItem::String {
                    data,
                    literal: false,
                }],
            },
        });
    }
    ops.push(Op::EndTextSection);
}

fn underline(ops: &mut Vec<Op>, x: f32, baseline: f32, width: f32, size: f32, color: [f32; 4]) {
    let y = baseline - size * 0.1;
    ops.push(Op::SetOutlineThickness { pt: Pt(0.5) });
    ops.push(Op::SetOutlineColor { col: rgb(color) });
    ops.push(Op::DrawLine {
        line: Line {
            points: vec![point(x, y), point(x + width, y)],
            is_closed: false,
        },
    });
}

/// Clickable area over a run; `top` is in top-left page coordinates.
fn link_area(ops: &mut Vec<Op>, href: &str, x: f32, top: f32, w: f32, h: f32, page_height: f32) {
    ops.push(Op::LinkAnnotation {
        link: LinkAnnotation::new(
            Rect {
                x: Pt(x),
                y: Pt(page_height - top - h),
                width: Pt(w),
                height: Pt(h),
            },
            Actions::Uri(href.to_string()),
            Some(BorderArray::Solid([0.0, 0.0, 0.0])),
            None,
            None,
        ),
    });
}

fn render_text(ops: &mut Vec<Op>, lbox: &LayoutBox, text: &TextContent, page_height: f32) {
    for tline in &text.lines {
        let line_x = lbox.x + tline.x_offset;
        let line_top = lbox.y + tline.y_offset;
        let baseline = page_height - line_top - tline.baseline;
        for run in &tline.runs {
            if run.text.trim().is_empty() && run.href.is_none() {
                continue;
            }
            let x = line_x + run.x_offset;
            let font = builtin_font(run.font_family, run.bold, run.italic);
            write_text(ops, x, baseline, &run.text, run.font_size, font, run.color);
            if run.underline {
                underline(ops, x, baseline, run.width, run.font_size, run.color);
            }
            if let Some(href) = &run.href {
                link_area(ops, href, x, line_top, run.width, tline.height, page_height);
            }
        }
    }

    if let Some(marker) = &text.list_marker {
        let font = builtin_font(text.font_family, text.bold, text.italic);
        let face = FontFace::new(text.font_family, text.bold, text.italic);
        let marker_w = face.measure(marker, text.font_size);
        // Sit on the first line's baseline.
        let half_leading = (text.line_height - text.font_size) / 2.0;
        let baseline = page_height - lbox.y - half_leading - face.ascender(text.font_size);
        write_text(
            ops,
            lbox.x - MARKER_GUTTER - marker_w,
            baseline,
            marker,
            text.font_size,
            font,
            text.color,
        );
    }
}

/// Recursively render a LayoutBox and its children into PDF ops.
fn render_box(ops: &mut Vec<Op>, lbox: &LayoutBox, page_height: f32, print_background: bool) {
    if print_background {
        if let Some(bg) = lbox.background_color {
            fill_rect(ops, lbox.x, lbox.y, lbox.width, lbox.height, page_height, bg);
        }
    }

    if let Some(b) = &lbox.borders {
        let (x, y, w, h) = (lbox.x, lbox.y, lbox.width, lbox.height);
        fill_rect(ops, x, y, w, b.top, page_height, b.color);
        fill_rect(ops, x, y + h - b.bottom, w, b.bottom, page_height, b.color);
        fill_rect(ops, x, y, b.left, h, page_height, b.color);
        fill_rect(ops, x + w - b.right, y, b.right, h, page_height, b.color);
    }

    if let Some(text) = &lbox.text {
        render_text(ops, lbox, text, page_height);
    }

    for child in &lbox.children {
        render_box(ops, child, page_height, print_background);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_config::{BoxBorders, TextLine, TextRun};

    fn one_box_config(lbox: LayoutBox, print_background: bool) -> LayoutConfig {
        LayoutConfig {
            title: "Test".to_string(),
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            print_background,
            pages: vec![PageLayout {
                page_index: 0,
                boxes: vec![lbox],
            }],
        }
    }

    fn polygons(ops: &[Op]) -> usize {
        ops.iter()
            .filter(|op| matches!(op, Op::DrawPolygon { .. }))
            .count()
    }

    #[test]
    fn render_empty_document() {
        let config = LayoutConfig {
            title: "Empty".to_string(),
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            print_background: false,
            pages: Vec::new(),
        };
        let bytes = render_pdf(&config);
        assert!(bytes.len() > 100, "PDF should have content");
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn backgrounds_follow_print_background() {
        let mut lbox = LayoutBox::new(10.0, 10.0, 100.0, 20.0);
        lbox.background_color = Some([0.9, 0.9, 0.9, 1.0]);

        let printed = one_box_config(lbox.clone(), true);
        assert_eq!(polygons(&page_ops(&printed, &printed.pages[0])), 1);

        let suppressed = one_box_config(lbox, false);
        assert_eq!(polygons(&page_ops(&suppressed, &suppressed.pages[0])), 0);
    }

    #[test]
    fn only_present_border_edges_are_drawn() {
        let mut lbox = LayoutBox::new(10.0, 10.0, 100.0, 20.0);
        lbox.borders = Some(BoxBorders {
            top: 0.0,
            right: 0.0,
            bottom: 0.0,
            left: 2.25,
            color: [0.05, 0.28, 0.63, 1.0],
        });
        let config = one_box_config(lbox, false);
        assert_eq!(polygons(&page_ops(&config, &config.pages[0])), 1);
    }

    fn text_box(runs: Vec<TextRun>) -> LayoutBox {
        let mut lbox = LayoutBox::new(50.0, 60.0, 200.0, 14.0);
        lbox.text = Some(TextContent {
            lines: vec![TextLine {
                text: runs.iter().map(|r| r.text.as_str()).collect(),
                x_offset: 0.0,
                y_offset: 0.0,
                height: 14.0,
                baseline: 10.5,
                runs,
            }],
            font_family: FontFamily::Sans,
            font_size: 10.0,
            bold: false,
            italic: false,
            color: [0.0, 0.0, 0.0, 1.0],
            line_height: 14.0,
            list_marker: None,
        });
        lbox
    }

    fn run(text: &str, x_offset: f32, href: Option<&str>) -> TextRun {
        TextRun {
            text: text.to_string(),
            x_offset,
            width: 40.0,
            font_family: FontFamily::Sans,
            font_size: 10.0,
            bold: false,
            italic: false,
            color: [0.0, 0.0, 0.0, 1.0],
            underline: false,
            href: href.map(str::to_string),
        }
    }

    #[test]
    fn non_ascii_is_shown_as_winansi_bytes() {
        assert_eq!(
            chunk_text("a \u{2022} b"),
            [
                Chunk::Ascii("a ".into()),
                Chunk::Encoded(vec![0x95]),
                Chunk::Ascii(" b".into()),
            ]
        );
        assert_eq!(chunk_text("\u{4E2D}\u{00E9}"), [Chunk::Encoded(vec![b'?', 0xE9])]);

        let mut ops = Vec::new();
        write_text(&mut ops, 0.0, 0.0, "\u{2022}", 10.0, BuiltinFont::Helvetica, [0.0; 4]);
        let raw = ops.iter().find_map(|op| match op {
            Op::Unknown { key, value } if key == "Tj" => Some(value.clone()),
            _ => None,
        });
        assert!(matches!(
            raw.as_deref(),
            Some([DictItem::String { data, .. }]) if data == &[0x95]
        ));
        // The font is still registered with the page.
        assert!(ops.iter().any(|op| matches!(op, Op::WriteTextBuiltinFont { .. })));
    }

    #[test]
    fn bullet_survives_into_the_pdf() {
        let config = one_box_config(text_box(vec![run("Go \u{2022} Rust", 0.0, None)]), false);
        let pdf = render_pdf(&config);
        let hex = b"<95>";
        assert!(pdf.windows(hex.len()).any(|w| w == hex));
        assert!(!pdf.windows(3).any(|w| w == [0xE2, 0x80, 0xA2]));
    }

    #[test]
    fn runs_draw_in_their_own_font() {
        let mut bold = run("Tools:", 0.0, None);
        bold.bold = true;
        let config = one_box_config(text_box(vec![bold, run(" Git", 32.0, None)]), false);
        let fonts: Vec<BuiltinFont> = page_ops(&config, &config.pages[0])
            .into_iter()
            .filter_map(|op| match op {
                Op::SetFontSizeBuiltinFont { font, .. } => Some(font),
                _ => None,
            })
            .collect();
        assert_eq!(fonts, [BuiltinFont::HelveticaBold, BuiltinFont::Helvetica]);
    }

    #[test]
    fn linked_runs_get_uri_annotations() {
        let href = "https://linkedin.com/in/jane";
        let config = one_box_config(
            text_box(vec![run("Email", 0.0, None), run("LinkedIn", 50.0, Some(href))]),
            false,
        );
        let ops = page_ops(&config, &config.pages[0]);
        let links: Vec<&LinkAnnotation> = ops
            .iter()
            .filter_map(|op| match op {
                Op::LinkAnnotation { link } => Some(link),
                _ => None,
            })
            .collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].actions, Actions::Uri(href.to_string()));
        let rect = &links[0].rect;
        assert!((rect.x.0 - 100.0).abs() < 0.01);
        assert!((rect.y.0 - (841.89 - 60.0 - 14.0)).abs() < 0.01);
        assert!((rect.width.0 - 40.0).abs() < 0.01);

        let pdf = render_pdf(&config);
        assert!(pdf.windows(4).any(|w| w == b"/URI"));
        assert!(pdf.windows(href.len()).any(|w| w == href.as_bytes()));
    }

    #[test]
    fn fonts_map_to_builtins() {
        assert!(matches!(
            builtin_font(FontFamily::Serif, true, false),
            BuiltinFont::TimesBold
        ));
        assert!(matches!(
            builtin_font(FontFamily::Sans, false, false),
            BuiltinFont::Helvetica
        ));
    }
}
