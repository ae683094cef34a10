//! # Geometry Model
//!
//! The immutable physical layout constants for one report variant: page
//! size, margins, the column partition of the printable width, and the
//! fixed row metrics. All values are in PDF points (1/72 inch).
//!
//! Two variants exist — the compact multi-column table and the detailed
//! single-column-per-item layout — selected once by the caller via
//! `Geometry::compact()` / `Geometry::detailed()`. Rendering code reads
//! the active geometry; it never branches on the variant ad hoc.
//!
//! The one hard invariant: **column widths sum to the content width
//! exactly.** Getting this wrong is a design-time bug, so it is enforced
//! with a debug assertion at construction and unit tests, not tolerated
//! at runtime.

use crate::model::LayoutVariant;

/// A4 in points.
pub const PAGE_WIDTH: f64 = 595.28;
pub const PAGE_HEIGHT: f64 = 841.89;
/// 15 mm margins.
pub const MARGIN: f64 = 42.52;

/// Column widths for the compact table, left to right.
#[derive(Debug, Clone, Copy)]
pub struct TableColumns {
    pub number: f64,
    pub location: f64,
    pub photo: f64,
    pub description: f64,
    pub solution: f64,
    pub status: f64,
}

impl TableColumns {
    pub fn sum(&self) -> f64 {
        self.number + self.location + self.photo + self.description + self.solution + self.status
    }

    /// X offset of each column's left edge, relative to the content box.
    pub fn offsets(&self) -> [f64; 6] {
        let mut x = 0.0;
        let mut out = [0.0; 6];
        for (i, w) in [
            self.number,
            self.location,
            self.photo,
            self.description,
            self.solution,
            self.status,
        ]
        .iter()
        .enumerate()
        {
            out[i] = x;
            x += w;
        }
        out
    }
}

/// How the printable width is partitioned for a variant.
#[derive(Debug, Clone, Copy)]
pub enum ColumnPlan {
    /// Compact: six fixed table columns.
    Table(TableColumns),
    /// Detailed: a photo column and a text column per item block.
    Split { photo: f64, text: f64 },
}

impl ColumnPlan {
    pub fn sum(&self) -> f64 {
        match self {
            ColumnPlan::Table(cols) => cols.sum(),
            ColumnPlan::Split { photo, text } => photo + text,
        }
    }
}

/// The full set of layout constants for one variant.
#[derive(Debug, Clone)]
pub struct Geometry {
    pub variant: LayoutVariant,
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub columns: ColumnPlan,

    /// Photo slot dimensions inside its column.
    pub photo_width: f64,
    pub photo_height: f64,
    /// Vertical padding above and below the photo slot; together with the
    /// slot height this fixes the compact row height.
    pub row_padding: f64,
    /// Horizontal inset of cell content from the column edge.
    pub cell_inset: f64,

    pub banner_height: f64,
    /// Column header row height. Zero means the variant has no header row
    /// (the detailed layout is not a table).
    pub header_height: f64,
    /// Vertical band reserved at the page bottom for the footer pass.
    pub footer_reserve: f64,
    /// Whether every category starts on a fresh page.
    pub section_break: bool,

    // Type sizes. Line height is the baseline-to-baseline distance for
    // wrapped cell text.
    pub banner_size: f64,
    pub header_size: f64,
    pub cell_size: f64,
    pub cell_line_height: f64,
    pub meta_size: f64,
    pub badge_size: f64,
    pub caption_size: f64,
    pub footer_size: f64,

    // Per-field wrap limits. Text beyond these is clamped with an
    // ellipsis by the row renderer.
    pub location_max_lines: usize,
    pub description_max_lines: usize,
    pub solution_max_lines: usize,
}

impl Geometry {
    /// The compact multi-column table layout.
    pub fn compact() -> Self {
        let geometry = Self {
            variant: LayoutVariant::Compact,
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
            margin: MARGIN,
            columns: ColumnPlan::Table(TableColumns {
                number: 36.0,
                location: 80.0,
                photo: 110.0,
                description: 136.24,
                solution: 100.0,
                status: 48.0,
            }),
            photo_width: 102.0,
            photo_height: 76.0,
            row_padding: 7.0,
            cell_inset: 4.0,
            banner_height: 26.0,
            header_height: 20.0,
            footer_reserve: 28.0,
            section_break: true,
            banner_size: 11.0,
            header_size: 7.5,
            cell_size: 7.5,
            cell_line_height: 9.5,
            meta_size: 6.5,
            badge_size: 6.5,
            caption_size: 6.5,
            footer_size: 7.5,
            location_max_lines: 7,
            description_max_lines: 6,
            solution_max_lines: 7,
        };
        geometry.assert_valid();
        geometry
    }

    /// The detailed single-column-per-item layout with large photos.
    pub fn detailed() -> Self {
        let geometry = Self {
            variant: LayoutVariant::Detailed,
            page_width: PAGE_WIDTH,
            page_height: PAGE_HEIGHT,
            margin: MARGIN,
            columns: ColumnPlan::Split {
                photo: 240.0,
                text: 270.24,
            },
            photo_width: 232.0,
            photo_height: 174.0,
            row_padding: 10.0,
            cell_inset: 6.0,
            banner_height: 26.0,
            header_height: 0.0,
            footer_reserve: 28.0,
            section_break: false,
            banner_size: 11.0,
            header_size: 8.0,
            cell_size: 8.5,
            cell_line_height: 11.0,
            meta_size: 7.5,
            badge_size: 7.0,
            caption_size: 7.0,
            footer_size: 7.5,
            location_max_lines: 2,
            description_max_lines: 12,
            solution_max_lines: 8,
        };
        geometry.assert_valid();
        geometry
    }

    pub fn for_variant(variant: LayoutVariant) -> Self {
        match variant {
            LayoutVariant::Compact => Self::compact(),
            LayoutVariant::Detailed => Self::detailed(),
        }
    }

    /// Printable width between the margins.
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Left edge of the content box.
    pub fn content_left(&self) -> f64 {
        self.margin
    }

    /// Lowest Y a row may extend to: page bottom minus margin minus the
    /// footer reservation. Crossing this triggers a page break.
    pub fn printable_bottom(&self) -> f64 {
        self.page_height - self.margin - self.footer_reserve
    }

    /// Fixed compact row height: photo slot plus padding on both sides.
    pub fn row_height(&self) -> f64 {
        self.photo_height + 2.0 * self.row_padding
    }

    fn assert_valid(&self) {
        debug_assert!(
            (self.columns.sum() - self.content_width()).abs() < 1e-6,
            "column widths ({:.4}) must sum to content width ({:.4})",
            self.columns.sum(),
            self.content_width()
        );
        debug_assert!(self.photo_height + 2.0 * self.row_padding < self.printable_bottom() - self.margin);
    }
}
