//! Command-line and environment configuration for a single run.

use std::env;
use std::path::{Path, PathBuf};

use crate::page::{PageConfig, PageFormat};
use crate::variant::Variant;

pub const USAGE: &str = "\
resume – render resume data into a PDF

Usage:
  resume [data.json] [--variant designed|ats] [--format a4|letter|legal]
         [--out-dir DIR] [--html]

Arguments:
  [data.json]      Resume data (default: data.json next to the executable)

Flags:
  --variant, -v    Rendering variant (default: designed)
  --format, -f     Paper size override (default: the variant's, A4)
  --out-dir, -o    Directory for the PDF (default: the data file's directory)
  --html           Also write the intermediate markup next to the PDF
  --help, -h       Print this message

Environment:
  RESUME_DATA, RESUME_OUTPUT_DIR, RESUME_VARIANT override the defaults;
  flags override the environment.";

/// Everything one invocation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub variant: Variant,
    /// Paper size override; `None` keeps the variant's.
    pub format: Option<PageFormat>,
    pub write_html: bool,
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Run(RunConfig),
    Help,
}

impl RunConfig {
    /// Defaults for a data file: output beside it, designed variant.
    pub fn for_data(data_path: impl Into<PathBuf>) -> Self {
        let data_path = data_path.into();
        let output_dir = parent_dir(&data_path);
        Self {
            data_path,
            output_dir,
            variant: Variant::default(),
            format: None,
            write_html: false,
        }
    }

    /// Page configuration: the variant's, with the paper size overridden.
    pub fn page(&self) -> PageConfig {
        let mut page = self.variant.policy().page;
        if let Some(format) = self.format {
            page.format = format;
        }
        page
    }

    /// Parse process arguments (program name excluded) using the real
    /// environment for fallbacks.
    pub fn from_args<I>(args: I) -> Result<Invocation, String>
    where
        I: IntoIterator<Item = String>,
    {
        Self::from_args_with_env(args, |key| env::var(key).ok())
    }

    pub fn from_args_with_env<I, F>(args: I, lookup: F) -> Result<Invocation, String>
    where
        I: IntoIterator<Item = String>,
        F: Fn(&str) -> Option<String>,
    {
        let mut data_path: Option<PathBuf> = None;
        let mut output_dir: Option<PathBuf> = None;
        let mut variant: Option<Variant> = None;
        let mut format: Option<PageFormat> = None;
        let mut write_html = false;

        let mut iter = args.into_iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Invocation::Help),
                "--html" => write_html = true,
                "--variant" | "-v" => {
                    let value = iter.next().ok_or("--variant needs a value")?;
                    variant = Some(value.parse()?);
                }
                "--format" | "-f" => {
                    let value = iter.next().ok_or("--format needs a value")?;
                    format = Some(value.parse()?);
                }
                "--out-dir" | "-o" => {
                    let value = iter.next().ok_or("--out-dir needs a value")?;
                    output_dir = Some(PathBuf::from(value));
                }
                other if other.starts_with('-') => {
                    return Err(format!("unknown flag: {other}"));
                }
                path => {
                    if data_path.is_some() {
                        return Err(format!("unexpected argument: {path}"));
                    }
                    data_path = Some(PathBuf::from(path));
                }
            }
        }

        let variant = match variant {
            Some(v) => v,
            None => match lookup("RESUME_VARIANT") {
                Some(v) => v.parse()?,
                None => Variant::default(),
            },
        };
        let data_path = data_path
            .or_else(|| lookup("RESUME_DATA").map(PathBuf::from))
            .unwrap_or_else(default_data_path);
        let output_dir = output_dir
            .or_else(|| lookup("RESUME_OUTPUT_DIR").map(PathBuf::from))
            .unwrap_or_else(|| parent_dir(&data_path));

        Ok(Invocation::Run(RunConfig {
            data_path,
            output_dir,
            variant,
            format,
            write_html,
        }))
    }
}

/// `data.json` beside the running executable, or in the working directory.
fn default_data_path() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("data.json")
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
