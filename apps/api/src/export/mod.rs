// Export: plain-text report and paginated PDF rendering of a ReviewResult.
// Pure formatting; no scoring or review logic lives here.

pub mod layout;
pub mod pdf;
pub mod text;

use thiserror::Error;

pub use layout::PageConfig;
pub use pdf::to_pdf;
pub use text::{read_narrative, to_text};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF encoding failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF write failed: {0}")]
    Io(#[from] std::io::Error),
}
