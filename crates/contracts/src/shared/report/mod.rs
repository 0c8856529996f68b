//! Renderable block structure for printable register reports.
//!
//! The backend composes these blocks; a document renderer (PDF surface) or
//! the CSV export walks them in order. Visual styling, fonts and physical
//! page-break mechanics belong to the renderer, not to this contract.

use serde::{Deserialize, Serialize};

/// One printable line of a register report.
///
/// `quantity` stays in its raw source form; group totals are derived from it
/// leniently at composition time so a malformed count never blocks a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    /// Group date in `YYYY-MM-DD` form; absent means the unscheduled bucket.
    pub group_date: Option<String>,
    /// Display cells, one per report column (quantity excluded).
    pub columns: Vec<String>,
    /// Raw quantity field (box count), possibly malformed.
    pub quantity: Option<String>,
}

/// Logical block emitted to the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReportBlock {
    /// Opens a date group; repeated when a group continues onto a new page.
    GroupHeader { label: String },
    /// Column title strip; the titles themselves live on the document.
    ColumnHeader,
    Row { row: ReportRow },
    /// Closes a date group with its lenient quantity total.
    GroupFooter { label: String, total: f64 },
    /// Sole block of the single page an empty report produces.
    NoData,
}

/// One physical page worth of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPage {
    pub blocks: Vec<ReportBlock>,
}

/// A fully composed report, ready for the renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub title: String,
    /// Column titles matching `ReportRow::columns`, quantity column last.
    pub column_titles: Vec<String>,
    pub pages: Vec<ReportPage>,
    pub total_rows: usize,
}
