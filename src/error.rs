//! Error taxonomy for the report engine.
//!
//! Only genuinely fatal conditions surface as errors: unreadable input,
//! an empty export scope, or a failure while serializing the PDF itself.
//! Photo trouble is explicitly NOT an error — the fetcher degrades to
//! placeholders and the export always completes.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// The report JSON could not be deserialized. The hint narrows the
    /// failure down for callers that surface it to users.
    #[error("failed to parse report input: {source} ({hint})")]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: &'static str,
    },

    /// A category scope was requested that the report does not contain.
    #[error("category {0:?} not found in report")]
    EmptyScope(String),

    /// The layout was fine but the PDF could not be serialized.
    #[error("PDF rendering failed: {0}")]
    Render(String),
}

impl ReportError {
    pub(crate) fn parse(source: serde_json::Error) -> Self {
        let hint = classify(&source);
        ReportError::Parse { source, hint }
    }
}

/// Map serde_json's error category to a short human hint.
fn classify(err: &serde_json::Error) -> &'static str {
    use serde_json::error::Category;
    match err.classify() {
        Category::Io => "could not read the input",
        Category::Syntax => "the input is not valid JSON",
        Category::Data => "the JSON does not match the report schema",
        Category::Eof => "the input ended unexpectedly",
    }
}
