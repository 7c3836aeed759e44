//! # resume-forge – structured resume data → PDF
//!
//! A resume record is rendered into self-contained markup in one of two
//! variants, then handed to an in-crate HTML → PDF engine. The stages are:
//!
//! 1. **Load** – JSON → [`record::ResumeRecord`]
//! 2. **Render** – record + [`variant::Variant`] → [`markup::Markup`] ([`document`])
//! 3. **Parse** – markup → DOM tree ([`dom`])
//! 4. **Style** – tag defaults and inline styles ([`style`])
//! 5. **Layout** – flexbox layout with Taffy ([`layout`])
//! 6. **Paginate** – split onto pages ([`pagination`])
//! 7. **Emit** – PDF bytes via printpdf ([`render`], [`pipeline`])
//! 8. **Write** – persist next to the data ([`output`])
//!
//! [`run::run`] drives the whole sequence for one [`config::RunConfig`].

pub mod config;
pub mod document;
pub mod dom;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod layout_config;
pub mod links;
pub mod markup;
pub mod output;
pub mod page;
pub mod pagination;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod run;
pub mod style;
pub mod variant;

// Re-exports for convenience
pub use config::RunConfig;
pub use document::render as render_document;
pub use error::{ForgeError, Result};
pub use links::{classify_link, LinkKind};
pub use page::{PageConfig, PageFormat};
pub use pipeline::{generate_pdf, ForgeEngine, PdfEmitter};
pub use record::ResumeRecord;
pub use run::{run, RunSummary};
pub use variant::Variant;
