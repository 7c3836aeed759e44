//! Pipeline – ties together parsing, styling, layout, pagination, and
//! rendering into a single function call.

use crate::dom::{document_title, find_body, parse_html, DomNode};
use crate::error::Result;
use crate::layout::compute_layout;
use crate::layout_config::LayoutConfig;
use crate::page::PageConfig;
use crate::pagination::paginate;
use crate::render::render_pdf;
use crate::style::build_styled_tree;

/// Anything that turns self-contained markup into PDF bytes.
///
/// The run orchestrator only depends on this seam, so tests can substitute a
/// recording or failing emitter.
pub trait PdfEmitter {
    fn emit(&self, markup: &str, page: &PageConfig) -> Result<Vec<u8>>;
}

/// The in-crate emitter: taffy layout plus printpdf output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForgeEngine;

impl PdfEmitter for ForgeEngine {
    fn emit(&self, markup: &str, page: &PageConfig) -> Result<Vec<u8>> {
        let (bytes, _) = generate_pdf(markup, page)?;
        Ok(bytes)
    }
}

/// Layout only (no PDF rendering) – useful for inspection and testing.
pub fn compute_layout_config(html: &str, page: &PageConfig) -> Result<LayoutConfig> {
    let dom = parse_html(html);
    let title = document_title(&dom).unwrap_or_else(|| "Resume".to_string());

    // Lay out from <body> so its own padding and colours apply.
    let roots: Vec<DomNode> = match find_body(&dom) {
        Some(body) => vec![DomNode::Element(body.clone())],
        None => dom,
    };
    let styled = build_styled_tree(&roots, None);

    let boxes = compute_layout(&styled, page.content_width(), page.margins.left_pt())?;
    Ok(paginate(&boxes, page, &title))
}

/// Full pipeline: HTML string → PDF bytes plus the layout that produced them.
pub fn generate_pdf(html: &str, page: &PageConfig) -> Result<(Vec<u8>, LayoutConfig)> {
    let layout = compute_layout_config(html, page)?;
    log::info!(
        "Laid out '{}' on {} {} page(s)",
        layout.title,
        layout.pages.len(),
        page.format
    );
    let bytes = render_pdf(&layout);
    Ok((bytes, layout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_basic() {
        let html = "<h1>Hello</h1><p>World</p>";
        let (bytes, config) = generate_pdf(html, &PageConfig::default()).unwrap();
        assert!(!config.pages.is_empty());
        assert_eq!(&bytes[0..5], b"%PDF-");
        assert_eq!(config.title, "Resume");
    }

    #[test]
    fn title_and_page_size_come_through() {
        let html = "<!doctype html><html><head><title>Jane — Resume</title></head>\
                    <body><p>x</p></body></html>";
        let page = PageConfig {
            format: crate::page::PageFormat::Letter,
            ..PageConfig::ats()
        };
        let config = compute_layout_config(html, &page).unwrap();
        assert_eq!(config.title, "Jane — Resume");
        assert_eq!(config.page_width_pt, 612.0);
        assert!(config.print_background);
    }

    #[test]
    fn emitter_trait_object() {
        let engine: &dyn PdfEmitter = &ForgeEngine;
        let bytes = engine.emit("<p>hi</p>", &PageConfig::designed()).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }
}
