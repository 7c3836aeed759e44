//! Output path derivation and file persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{ForgeError, Result};
use crate::markup::Markup;
use crate::record::ResumeRecord;

/// How an existing output file is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Plain write; the file is truncated and replaced in place.
    Overwrite,
    /// Remove any pre-existing file, then write a fresh one.
    ReplaceExisting,
}

/// `<dir>/<name>.pdf` for the record's subject.
///
/// The name is used exactly as given; only names that would escape `dir` or
/// name no file at all are rejected.
pub fn output_path(record: &ResumeRecord, dir: &Path) -> Result<PathBuf> {
    let name = record.name.as_str();
    let invalid = name.trim().is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\');
    if invalid {
        let path = dir.join(format!("{name}.pdf"));
        return Err(ForgeError::Write {
            path,
            source: io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{name}' cannot be used as a file name"),
            ),
        });
    }
    Ok(dir.join(format!("{name}.pdf")))
}

fn write_error(path: &Path) -> impl FnOnce(io::Error) -> ForgeError + '_ {
    move |source| ForgeError::Write {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_error(parent))?;
        }
    }
    Ok(())
}

/// Persist PDF bytes to `path`.
pub fn write_pdf(path: &Path, bytes: &[u8], mode: WriteMode) -> Result<()> {
    ensure_parent(path)?;
    if mode == WriteMode::ReplaceExisting {
        match fs::remove_file(path) {
            Ok(()) => log::debug!("Removed previous '{}'", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(write_error(path)(e)),
        }
    }
    fs::write(path, bytes).map_err(write_error(path))?;
    log::info!("Wrote {} bytes to '{}'", bytes.len(), path.display());
    Ok(())
}

/// Write the intermediate markup next to the PDF (same stem, `.html`).
pub fn write_markup(pdf_path: &Path, markup: &Markup) -> Result<PathBuf> {
    let html_path = pdf_path.with_extension("html");
    ensure_parent(&html_path)?;
    fs::write(&html_path, markup.as_str()).map_err(write_error(&html_path))?;
    log::info!("Wrote markup to '{}'", html_path.display());
    Ok(html_path)
}
