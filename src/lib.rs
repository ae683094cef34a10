//! # Snagio Report Engine
//!
//! A page-native PDF layout engine for photo-centric inspection reports:
//! content is laid out INTO pages, with banners re-drawn after every page
//! break and a footer pass stamped once the page count is known, not onto
//! an infinite canvas sliced afterwards.
//!
//! The input is a fully-resolved [`model::Report`] (project, categories,
//! items, photo URLs). The output is a finished PDF plus a suggested
//! download filename. Photos are fetched best-effort over HTTP and can
//! never fail an export; every fetch problem becomes a labeled
//! placeholder in the photo slot.
//!
//! ```no_run
//! use snagio_report::{render_json, RenderOptions};
//!
//! let json = std::fs::read_to_string("report.json")?;
//! let output = render_json(&json, &RenderOptions::default())?;
//! std::fs::write(&output.filename, &output.bytes)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Two layouts share the whole pipeline: the compact table (one row per
//! item, first photo only) and the detailed variant (one block per item,
//! every photo). They differ only in the [`geometry::Geometry`] constants
//! selected up front.

pub mod error;
pub mod fetch;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod style;
pub mod text;

use log::info;

pub use error::ReportError;
pub use fetch::{HttpPhotoFetcher, PhotoFetcher};
pub use model::{LayoutVariant, RenderOptions, Report};

/// A finished export.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    /// The complete PDF file.
    pub bytes: Vec<u8>,
    /// Suggested download filename, derived from the project name and
    /// the export date.
    pub filename: String,
}

/// Render a report over HTTP with the configured photo timeout.
pub fn render(report: &Report, options: &RenderOptions) -> Result<ReportOutput, ReportError> {
    let fetcher = HttpPhotoFetcher::new(options.fetch_timeout);
    render_with_fetcher(report, options, &fetcher)
}

/// Render with a caller-supplied photo fetcher. This is the seam tests
/// and offline callers use; [`render`] is this with the HTTP fetcher.
pub fn render_with_fetcher(
    report: &Report,
    options: &RenderOptions,
    fetcher: &dyn PhotoFetcher,
) -> Result<ReportOutput, ReportError> {
    let export_date = options
        .export_date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let scope: Vec<model::Category> = match &options.category_id {
        None => report.categories.clone(),
        Some(id) => {
            let matched: Vec<model::Category> = report
                .categories
                .iter()
                .filter(|c| &c.id == id)
                .cloned()
                .collect();
            if matched.is_empty() {
                return Err(ReportError::EmptyScope(id.clone()));
            }
            matched
        }
    };

    let geometry = geometry::Geometry::for_variant(options.variant);
    let assembler = layout::Assembler::new(
        geometry,
        report.labels.resolve(),
        options.theme.clone(),
        report.project.name.clone(),
        export_date,
        fetcher,
    );
    let pages = assembler.assemble(&scope);
    info!(
        "laid out {} page(s) for project {:?} ({:?} layout)",
        pages.len(),
        report.project.name,
        options.variant
    );

    let doc_info = pdf::DocumentInfo {
        title: Some(format!("{} snag report", report.project.name)),
        author: Some("Snagio".to_string()),
    };
    let bytes = pdf::PdfWriter::new().write(&pages, &doc_info)?;

    Ok(ReportOutput {
        bytes,
        filename: layout::suggested_filename(&report.project.name, export_date),
    })
}

/// Parse the application's JSON export and render it.
pub fn render_json(json: &str, options: &RenderOptions) -> Result<ReportOutput, ReportError> {
    let report: Report = serde_json::from_str(json).map_err(ReportError::parse)?;
    render(&report, options)
}
