//! # Page-Aware Report Layout
//!
//! The heart of the engine. Content is never laid out on an infinite
//! canvas and sliced afterwards: the page boundary is a hard constraint,
//! checked before every row is placed. When a row would cross the
//! printable bound, the current page is finalized and the new page
//! re-draws the active category's banner and column header first — a
//! reader must never see an orphaned row without knowing which category
//! and columns it belongs to.
//!
//! The flow, leaves upward:
//!
//! ```text
//! Assembler            — iterates categories → items, owns RenderContext
//!   section control    — banners, header rows, page-break policy
//!     row renderer     — one item → positioned elements (row.rs)
//!       geometry/fetch — constants and best-effort photo bytes
//! ```
//!
//! After the last row, a second pass stamps every page's footer; it
//! cannot be interleaved with layout because the total page count is
//! only known once layout completes.

pub mod row;

use chrono::NaiveDate;
use log::debug;

use crate::fetch::{EmbeddableImage, PhotoFetcher};
use crate::geometry::Geometry;
use crate::model::{Category, Item, ResolvedLabels};
use crate::style::{Color, Theme};

/// A fully laid-out page ready for PDF serialization.
#[derive(Debug, Clone)]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<LayoutElement>,
}

/// A positioned element on a page. For `Text`, (x, y) is the baseline
/// origin; for everything else it is the top-left corner.
#[derive(Debug, Clone)]
pub struct LayoutElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub draw: DrawCommand,
}

/// What to draw for an element.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// Filled and/or stroked rectangle. A corner radius of half the
    /// height turns it into a pill (badges) or circle (priority dots).
    Rect {
        fill: Option<Color>,
        stroke: Option<Stroke>,
        corner_radius: f64,
    },
    /// A single positioned line of text.
    Text {
        text: String,
        font: crate::font::StandardFont,
        size: f64,
        color: Color,
    },
    /// An embedded raster image scaled to the element box.
    Image { image: EmbeddableImage },
}

#[derive(Debug, Clone, Copy)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
}

/// Mutable cursor/page state for one export pass. Created when assembly
/// starts, mutated monotonically, discarded when the document is done.
struct RenderContext {
    pages: Vec<LayoutPage>,
    /// Elements of the page currently being filled.
    elements: Vec<LayoutElement>,
    /// Vertical cursor, measured from the page top.
    y: f64,
    /// Row parity within the current section, for zebra backgrounds.
    parity: usize,
}

impl RenderContext {
    fn new(geometry: &Geometry) -> Self {
        Self {
            pages: Vec::new(),
            elements: Vec::new(),
            y: geometry.margin,
            parity: 0,
        }
    }

    fn remaining(&self, geometry: &Geometry) -> f64 {
        (geometry.printable_bottom() - self.y).max(0.0)
    }

    /// Finalize the current page and reset the cursor to the top margin.
    fn break_page(&mut self, geometry: &Geometry) {
        self.pages.push(LayoutPage {
            width: geometry.page_width,
            height: geometry.page_height,
            elements: std::mem::take(&mut self.elements),
        });
        self.y = geometry.margin;
    }

}

/// Top-level driver: iterates categories in caller order and items in
/// ascending number order, delegating row layout and owning the page
/// cursor and the final footer pass.
pub struct Assembler<'a> {
    geometry: Geometry,
    labels: ResolvedLabels,
    theme: Theme,
    project_name: String,
    export_date: NaiveDate,
    fetcher: &'a dyn PhotoFetcher,
}

impl<'a> Assembler<'a> {
    pub fn new(
        geometry: Geometry,
        labels: ResolvedLabels,
        theme: Theme,
        project_name: String,
        export_date: NaiveDate,
        fetcher: &'a dyn PhotoFetcher,
    ) -> Self {
        Self {
            geometry,
            labels,
            theme,
            project_name,
            export_date,
            fetcher,
        }
    }

    /// Lay out the whole report and stamp footers. Categories arrive in
    /// the caller's order and are never re-sorted here; empty categories
    /// produce no output at all.
    pub fn assemble(&self, categories: &[Category]) -> Vec<LayoutPage> {
        let geometry = &self.geometry;
        let mut ctx = RenderContext::new(geometry);

        let sections: Vec<&Category> = categories.iter().filter(|c| !c.items.is_empty()).collect();

        if sections.is_empty() {
            self.render_empty_note(&mut ctx);
        }

        for (index, &category) in sections.iter().enumerate() {
            if index > 0 {
                if geometry.section_break {
                    // Compact rule: categories never share a page.
                    ctx.break_page(geometry);
                } else {
                    ctx.y += geometry.banner_height * 0.6;
                }
            }
            self.render_section(&mut ctx, category);
        }

        ctx.break_page(geometry);
        let mut pages = ctx.pages;
        self.stamp_footers(&mut pages);
        pages
    }

    /// One category: banner, header, then each item in number order with
    /// a fit check before every row.
    fn render_section(&self, ctx: &mut RenderContext, category: &Category) {
        let geometry = &self.geometry;

        let mut items: Vec<&Item> = category.items.iter().collect();
        items.sort_by_key(|item| item.number);

        // A banner must land on a page that also carries its first item
        // (or at least the first page-sized piece of it); otherwise the
        // whole head moves to the next page.
        let head = geometry.banner_height + geometry.header_height;
        let first_needed = match geometry.variant {
            crate::model::LayoutVariant::Compact => geometry.row_height(),
            crate::model::LayoutVariant::Detailed => row::detailed_min_height(items[0], geometry),
        };
        if head + first_needed > ctx.remaining(geometry) && !ctx.elements.is_empty() {
            debug!(
                "page break before banner '{}' ({:.1}pt left)",
                category.display_name(),
                ctx.remaining(geometry)
            );
            ctx.break_page(geometry);
        }

        ctx.parity = 0;
        self.render_section_head(ctx, category);

        for item in items {
            match geometry.variant {
                crate::model::LayoutVariant::Compact => {
                    let needed = geometry.row_height();
                    if needed > ctx.remaining(geometry) && !self.section_head_is_fresh(ctx) {
                        debug!(
                            "page break before item {} (needs {:.1}pt, {:.1}pt left)",
                            item.number,
                            needed,
                            ctx.remaining(geometry)
                        );
                        ctx.break_page(geometry);
                        self.render_section_head(ctx, category);
                    }
                    let elements = row::render_compact_row(
                        item,
                        ctx.y,
                        ctx.parity,
                        geometry,
                        &self.theme,
                        self.fetcher,
                    );
                    ctx.elements.extend(elements);
                    ctx.y += needed;
                }
                crate::model::LayoutVariant::Detailed => {
                    // A block whose photo stack outgrows one page is split
                    // into page-sized segments; continuations re-draw the
                    // banner so no photo ever crosses the printable bound.
                    let page_available = geometry.printable_bottom() - geometry.margin - head;
                    let mut segments = row::split_detailed_block(
                        item,
                        geometry,
                        ctx.remaining(geometry),
                        page_available,
                    );
                    if segments[0].height > ctx.remaining(geometry)
                        && !self.section_head_is_fresh(ctx)
                    {
                        debug!(
                            "page break before item {} (needs {:.1}pt, {:.1}pt left)",
                            item.number,
                            segments[0].height,
                            ctx.remaining(geometry)
                        );
                        ctx.break_page(geometry);
                        self.render_section_head(ctx, category);
                        segments = row::split_detailed_block(
                            item,
                            geometry,
                            ctx.remaining(geometry),
                            page_available,
                        );
                    }
                    for segment in &segments {
                        if !segment.first {
                            debug!(
                                "continuing item {} on a new page ({} photos left)",
                                item.number,
                                segment.take
                            );
                            ctx.break_page(geometry);
                            self.render_section_head(ctx, category);
                        }
                        let elements = row::render_detailed_segment(
                            item,
                            segment,
                            ctx.y,
                            geometry,
                            &self.labels,
                            &self.theme,
                            self.fetcher,
                        );
                        ctx.elements.extend(elements);
                        ctx.y += segment.height;
                    }
                }
            }
            ctx.parity += 1;
        }
    }

    /// Banner plus (for table variants) the column header row.
    fn render_section_head(&self, ctx: &mut RenderContext, category: &Category) {
        let geometry = &self.geometry;
        let theme = &self.theme;
        let left = geometry.content_left();
        let width = geometry.content_width();

        ctx.elements.push(LayoutElement {
            x: left,
            y: ctx.y,
            width,
            height: geometry.banner_height,
            draw: DrawCommand::Rect {
                fill: Some(theme.banner_bg),
                stroke: None,
                corner_radius: 0.0,
            },
        });
        ctx.elements.push(LayoutElement {
            x: left + 6.0,
            y: ctx.y + geometry.banner_height / 2.0 + geometry.banner_size * 0.35,
            width: width - 12.0,
            height: geometry.banner_size,
            draw: DrawCommand::Text {
                text: category.display_name().to_string(),
                font: crate::font::StandardFont::HelveticaBold,
                size: geometry.banner_size,
                color: theme.banner_fg,
            },
        });
        ctx.y += geometry.banner_height;

        if geometry.header_height > 0.0 {
            self.render_header_row(ctx);
        }
    }

    /// The column header row of the compact table.
    fn render_header_row(&self, ctx: &mut RenderContext) {
        let geometry = &self.geometry;
        let theme = &self.theme;
        let labels = &self.labels;
        let left = geometry.content_left();

        let cols = match geometry.columns {
            crate::geometry::ColumnPlan::Table(cols) => cols,
            crate::geometry::ColumnPlan::Split { .. } => return,
        };

        ctx.elements.push(LayoutElement {
            x: left,
            y: ctx.y,
            width: geometry.content_width(),
            height: geometry.header_height,
            draw: DrawCommand::Rect {
                fill: Some(theme.header_bg),
                stroke: None,
                corner_radius: 0.0,
            },
        });

        let baseline = ctx.y + geometry.header_height / 2.0 + geometry.header_size * 0.35;
        let offsets = cols.offsets();
        let texts = [
            &labels.number,
            &labels.location,
            &labels.photo,
            &labels.description,
            &labels.solution,
            &labels.status,
        ];
        for (offset, text) in offsets.iter().zip(texts) {
            ctx.elements.push(LayoutElement {
                x: left + offset + geometry.cell_inset,
                y: baseline,
                width: crate::font::StandardFont::HelveticaBold
                    .measure(text, geometry.header_size),
                height: geometry.header_size,
                draw: DrawCommand::Text {
                    text: text.clone(),
                    font: crate::font::StandardFont::HelveticaBold,
                    size: geometry.header_size,
                    color: theme.header_fg,
                },
            });
        }
        ctx.y += geometry.header_height;
    }

    /// True right after a section head was drawn at the top of a fresh
    /// page, the point past which breaking again cannot gain space.
    fn section_head_is_fresh(&self, ctx: &RenderContext) -> bool {
        let head = self.geometry.banner_height + self.geometry.header_height;
        (ctx.y - self.geometry.margin - head).abs() < 1e-6
            && ctx
                .elements
                .iter()
                .all(|e| e.y <= self.geometry.margin + head + 1e-6)
    }

    /// A report scoped to nothing but empty categories still produces a
    /// valid single-page document.
    fn render_empty_note(&self, ctx: &mut RenderContext) {
        let geometry = &self.geometry;
        ctx.elements.push(LayoutElement {
            x: geometry.content_left(),
            y: geometry.margin + 20.0,
            width: geometry.content_width(),
            height: geometry.cell_size,
            draw: DrawCommand::Text {
                text: "No items to report.".to_string(),
                font: crate::font::StandardFont::HelveticaOblique,
                size: 9.0,
                color: self.theme.text_secondary,
            },
        });
        ctx.y = geometry.margin + 30.0;
    }

    /// Second pass over the finished pages: project name left, page
    /// number centered, export date right, inside the reserved band.
    fn stamp_footers(&self, pages: &mut [LayoutPage]) {
        let geometry = &self.geometry;
        let theme = &self.theme;
        let total = pages.len();
        let font = crate::font::StandardFont::Helvetica;
        let size = geometry.footer_size;
        let baseline = geometry.page_height - geometry.margin - 8.0;
        let date = self.export_date.format("%Y-%m-%d").to_string();

        for (index, page) in pages.iter_mut().enumerate() {
            let center = format!("Page {} of {}", index + 1, total);
            let center_w = font.measure(&center, size);
            let date_w = font.measure(&date, size);

            for (x, text) in [
                (geometry.margin, self.project_name.clone()),
                ((geometry.page_width - center_w) / 2.0, center),
                (geometry.page_width - geometry.margin - date_w, date.clone()),
            ] {
                page.elements.push(LayoutElement {
                    x,
                    y: baseline,
                    width: font.measure(&text, size),
                    height: size,
                    draw: DrawCommand::Text {
                        text,
                        font,
                        size,
                        color: theme.footer_fg,
                    },
                });
            }
        }
    }
}

/// Derive a filesystem-safe download filename from the project name:
/// lowercase, non-alphanumeric runs collapsed to `-`, export date
/// appended.
pub fn suggested_filename(project_name: &str, export_date: NaiveDate) -> String {
    let mut slug = String::with_capacity(project_name.len());
    let mut pending_dash = false;
    for ch in project_name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("report");
    }
    format!("{}-report-{}.pdf", slug, export_date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()
    }

    #[test]
    fn test_filename_replaces_special_chars() {
        assert_eq!(
            suggested_filename("Harbour View — Block B!", date()),
            "harbour-view-block-b-report-2026-08-31.pdf"
        );
    }

    #[test]
    fn test_filename_collapses_runs() {
        assert_eq!(
            suggested_filename("  A   B  ", date()),
            "a-b-report-2026-08-31.pdf"
        );
    }

    #[test]
    fn test_filename_empty_name_falls_back() {
        assert_eq!(suggested_filename("***", date()), "report-report-2026-08-31.pdf");
    }
}
