//! One end-to-end generation: load, render, emit, persist.

use std::path::PathBuf;

use crate::config::RunConfig;
use crate::document;
use crate::error::Result;
use crate::output::{output_path, write_markup, write_pdf};
use crate::pipeline::PdfEmitter;
use crate::record;
use crate::variant::Variant;

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output: PathBuf,
    /// Markup side file, when requested.
    pub html: Option<PathBuf>,
    pub bytes: usize,
    pub variant: Variant,
}

/// Generate the PDF described by `config`.
///
/// Nothing is written unless the emitter succeeds.
pub fn run(config: &RunConfig, emitter: &dyn PdfEmitter) -> Result<RunSummary> {
    let record = record::load(&config.data_path)?;
    let output = output_path(&record, &config.output_dir)?;

    let policy = config.variant.policy();
    let markup = document::render(&record, config.variant);
    log::info!(
        "Rendered {} variant for '{}' ({} bytes of markup)",
        config.variant,
        record.name,
        markup.len()
    );

    let page = config.page();
    let bytes = emitter.emit(markup.as_str(), &page)?;

    write_pdf(&output, &bytes, policy.write_mode)?;
    // The side file only accompanies a PDF that was actually written.
    let html = if config.write_html {
        Some(write_markup(&output, &markup)?)
    } else {
        None
    };

    Ok(RunSummary {
        output,
        html,
        bytes: bytes.len(),
        variant: config.variant,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForgeError;
    use crate::page::{PageConfig, PageFormat};
    use std::cell::RefCell;
    use std::fs;

    #[derive(Default)]
    struct Recording {
        calls: RefCell<Vec<(String, PageConfig)>>,
    }

    impl PdfEmitter for Recording {
        fn emit(&self, markup: &str, page: &PageConfig) -> Result<Vec<u8>> {
            self.calls.borrow_mut().push((markup.to_string(), *page));
            Ok(b"%PDF-stub".to_vec())
        }
    }

    struct Failing;

    impl PdfEmitter for Failing {
        fn emit(&self, _markup: &str, _page: &PageConfig) -> Result<Vec<u8>> {
            Err(ForgeError::Render("boom".into()))
        }
    }

    fn data_file(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("data.json");
        fs::write(&path, r#"{"name": "Jane Doe", "skills": ["Go"]}"#).unwrap();
        path
    }

    #[test]
    fn writes_pdf_named_after_subject() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::for_data(data_file(dir.path()));
        let emitter = Recording::default();

        let summary = run(&config, &emitter).unwrap();

        assert_eq!(summary.output, dir.path().join("Jane Doe.pdf"));
        assert_eq!(summary.bytes, 9);
        assert_eq!(summary.html, None);
        assert_eq!(fs::read(&summary.output).unwrap(), b"%PDF-stub");
        let calls = emitter.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].0.contains("Jane Doe"));
        assert_eq!(calls[0].1, PageConfig::designed());
    }

    #[test]
    fn ats_run_uses_ats_page_and_format_override() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            variant: Variant::AtsSafe,
            format: Some(PageFormat::Legal),
            write_html: true,
            ..RunConfig::for_data(data_file(dir.path()))
        };
        let emitter = Recording::default();

        let summary = run(&config, &emitter).unwrap();

        let page = emitter.calls.borrow()[0].1;
        assert_eq!(page.format, PageFormat::Legal);
        assert!(page.print_background);
        let html = summary.html.unwrap();
        assert!(fs::read_to_string(html).unwrap().contains("JANE DOE"));
    }

    #[test]
    fn failed_emit_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig {
            write_html: true,
            ..RunConfig::for_data(data_file(dir.path()))
        };

        let err = run(&config, &Failing).unwrap_err();

        assert!(matches!(err, ForgeError::Render(_)));
        assert!(!dir.path().join("Jane Doe.pdf").exists());
        assert!(!dir.path().join("Jane Doe.html").exists());
    }

    #[test]
    fn failed_pdf_write_skips_the_markup() {
        let dir = tempfile::tempdir().unwrap();
        // A directory squatting on the PDF path makes the write fail.
        fs::create_dir(dir.path().join("Jane Doe.pdf")).unwrap();
        let config = RunConfig {
            write_html: true,
            ..RunConfig::for_data(data_file(dir.path()))
        };

        let err = run(&config, &Recording::default()).unwrap_err();

        assert!(matches!(err, ForgeError::Write { .. }), "got {err:?}");
        assert!(!dir.path().join("Jane Doe.html").exists());
    }

    #[test]
    fn missing_data_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = RunConfig::for_data(dir.path().join("absent.json"));
        let err = run(&config, &Recording::default()).unwrap_err();
        assert!(matches!(err, ForgeError::NotFound { .. }));
    }
}
