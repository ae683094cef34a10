//! Per-item rendering: one compact table row or one detailed block.
//!
//! Everything here is pure layout arithmetic against a fixed `y_top`; the
//! page cursor, break policy and footers belong to the assembler. The
//! detailed block has a split/render pair because its height depends on
//! content — the split never touches the network, so every page-break
//! decision is made before any photo is fetched.

use crate::fetch::{PhotoFetch, PhotoFetcher};
use crate::font::StandardFont;
use crate::geometry::{ColumnPlan, Geometry};
use crate::layout::{DrawCommand, LayoutElement, Stroke};
use crate::model::{Item, Photo, ResolvedLabels};
use crate::style::Theme;
use crate::text;

/// Gap between stacked photos in the detailed layout.
const PHOTO_GAP: f64 = 6.0;
/// Heading band of a detailed block.
const HEADING_HEIGHT: f64 = 16.0;
/// Height of a field label line in the detailed text column.
const FIELD_LABEL_HEIGHT: f64 = 11.0;
const FIELD_GAP: f64 = 6.0;

fn wrap_clamped(
    text_value: &str,
    font: StandardFont,
    size: f64,
    max_width: f64,
    max_lines: usize,
) -> Vec<String> {
    text::clamp_lines(
        text::wrap(text_value, font, size, max_width),
        max_lines,
        font,
        size,
        max_width,
    )
}

/// One compact table row at `y_top`. Always consumes exactly
/// `geometry.row_height()`; overflowing text is clamped, never grows the
/// row. Fetches the first photo only, and nothing when there are none.
pub fn render_compact_row(
    item: &Item,
    y_top: f64,
    parity: usize,
    geometry: &Geometry,
    theme: &Theme,
    fetcher: &dyn PhotoFetcher,
) -> Vec<LayoutElement> {
    let cols = match geometry.columns {
        ColumnPlan::Table(cols) => cols,
        ColumnPlan::Split { .. } => return Vec::new(),
    };
    let left = geometry.content_left();
    let offsets = cols.offsets();
    let row_height = geometry.row_height();
    let inset = geometry.cell_inset;
    let size = geometry.cell_size;
    let line_height = geometry.cell_line_height;
    let first_baseline = y_top + geometry.row_padding + size;

    let mut out = Vec::new();

    if parity % 2 == 1 {
        out.push(LayoutElement {
            x: left,
            y: y_top,
            width: geometry.content_width(),
            height: row_height,
            draw: DrawCommand::Rect {
                fill: Some(theme.row_alt_bg),
                stroke: None,
                corner_radius: 0.0,
            },
        });
    }
    // Hairline row separator.
    out.push(LayoutElement {
        x: left,
        y: y_top + row_height - 0.5,
        width: geometry.content_width(),
        height: 0.5,
        draw: DrawCommand::Rect {
            fill: Some(theme.border),
            stroke: None,
            corner_radius: 0.0,
        },
    });

    // Number, with the priority dot beside it for Medium and up.
    let number_text = item.number.to_string();
    let number_x = left + offsets[0] + inset;
    let number_w = StandardFont::HelveticaBold.measure(&number_text, size);
    out.push(LayoutElement {
        x: number_x,
        y: first_baseline,
        width: number_w,
        height: size,
        draw: DrawCommand::Text {
            text: number_text,
            font: StandardFont::HelveticaBold,
            size,
            color: theme.text,
        },
    });
    if let Some(color) = theme.priority_color(item.priority) {
        out.push(LayoutElement {
            x: number_x + number_w + 3.0,
            y: first_baseline - 4.5,
            width: 5.0,
            height: 5.0,
            draw: DrawCommand::Rect {
                fill: Some(color),
                stroke: None,
                corner_radius: 2.5,
            },
        });
    }

    // Location.
    push_lines(
        &mut out,
        wrap_clamped(
            &item.location,
            StandardFont::Helvetica,
            size,
            cols.location - 2.0 * inset,
            geometry.location_max_lines,
        ),
        left + offsets[1] + inset,
        first_baseline,
        line_height,
        StandardFont::Helvetica,
        size,
        theme.text,
    );

    // Photo slot: first photo, or a labeled placeholder.
    let slot_x = left + offsets[2] + (cols.photo - geometry.photo_width) / 2.0;
    let slot_y = y_top + geometry.row_padding;
    render_photo_slot(
        &mut out,
        item.photos.first(),
        slot_x,
        slot_y,
        geometry,
        theme,
        fetcher,
    );

    // Description, with the assignee/due-date meta line underneath.
    let desc_lines = wrap_clamped(
        &item.description,
        StandardFont::Helvetica,
        size,
        cols.description - 2.0 * inset,
        geometry.description_max_lines,
    );
    let desc_count = desc_lines.len();
    push_lines(
        &mut out,
        desc_lines,
        left + offsets[3] + inset,
        first_baseline,
        line_height,
        StandardFont::Helvetica,
        size,
        theme.text,
    );
    if let Some(meta) = meta_line(item) {
        out.push(LayoutElement {
            x: left + offsets[3] + inset,
            y: first_baseline + desc_count as f64 * line_height,
            width: StandardFont::Helvetica.measure(&meta, geometry.meta_size),
            height: geometry.meta_size,
            draw: DrawCommand::Text {
                text: meta,
                font: StandardFont::Helvetica,
                size: geometry.meta_size,
                color: theme.text_secondary,
            },
        });
    }

    // Solution, when one was recorded.
    if let Some(solution) = &item.solution {
        push_lines(
            &mut out,
            wrap_clamped(
                solution,
                StandardFont::Helvetica,
                size,
                cols.solution - 2.0 * inset,
                geometry.solution_max_lines,
            ),
            left + offsets[4] + inset,
            first_baseline,
            line_height,
            StandardFont::Helvetica,
            size,
            theme.text,
        );
    }

    // Status badge, centered in its column.
    let badge_x_base = left + offsets[5];
    render_status_badge(
        &mut out,
        item,
        badge_x_base,
        cols.status,
        y_top + geometry.row_padding,
        geometry,
        theme,
    );

    out
}

/// One page-sized piece of a detailed block. The first segment carries
/// the heading band and the text column; continuation segments carry
/// only the rest of the photo stack after a page break.
#[derive(Debug, Clone, Copy)]
pub struct BlockSegment {
    /// Photos consumed by earlier segments.
    pub skip: usize,
    /// Photos this segment embeds.
    pub take: usize,
    pub first: bool,
    pub last: bool,
    pub height: f64,
}

/// Split one item into page-sized segments, first-fit over the photo
/// stack. Every photo ends up in exactly one segment; a stack too tall
/// for one page continues on the next instead of running off the sheet.
/// Pure arithmetic, no fetching, so the page-break decision never
/// touches the network.
pub fn split_detailed_block(
    item: &Item,
    geometry: &Geometry,
    first_available: f64,
    page_available: f64,
) -> Vec<BlockSegment> {
    let text_h = detailed_text_height(item, geometry);
    let first_overhead = 2.0 * geometry.row_padding + HEADING_HEIGHT + FIELD_GAP;
    let heights = photo_stack_heights(item, geometry);

    if heights.is_empty() {
        return vec![BlockSegment {
            skip: 0,
            take: 0,
            first: true,
            last: true,
            height: first_overhead + text_h.max(geometry.photo_height),
        }];
    }

    let mut segments = Vec::new();
    let mut index = 0usize;
    while index < heights.len() {
        let first = index == 0;
        let overhead = if first {
            first_overhead
        } else {
            2.0 * geometry.row_padding
        };
        let floor = if first { text_h } else { 0.0 };
        let available = if first { first_available } else { page_available };

        // Each segment places at least one photo; a bare segment could
        // never make progress.
        let mut take = 0usize;
        let mut stack = 0.0f64;
        while index + take < heights.len() {
            let grown = stack + heights[index + take];
            if take > 0 && overhead + grown.max(floor) > available {
                break;
            }
            stack = grown;
            take += 1;
        }

        segments.push(BlockSegment {
            skip: index,
            take,
            first,
            last: index + take == heights.len(),
            height: overhead + stack.max(floor),
        });
        index += take;
    }
    segments
}

/// The smallest piece of an item that must share a page with its
/// category banner: heading, text column, and the first photo.
pub fn detailed_min_height(item: &Item, geometry: &Geometry) -> f64 {
    let first_overhead = 2.0 * geometry.row_padding + HEADING_HEIGHT + FIELD_GAP;
    let text_h = detailed_text_height(item, geometry);
    let first_photo = photo_stack_heights(item, geometry)
        .first()
        .copied()
        .unwrap_or(geometry.photo_height);
    first_overhead + text_h.max(first_photo)
}

/// Render one segment of a detailed block at `y_top`. The first segment
/// draws the heading band (item label + number, priority dot, status
/// badge) and the text column; every segment draws its slice of the
/// photo stack.
pub fn render_detailed_segment(
    item: &Item,
    segment: &BlockSegment,
    y_top: f64,
    geometry: &Geometry,
    labels: &ResolvedLabels,
    theme: &Theme,
    fetcher: &dyn PhotoFetcher,
) -> Vec<LayoutElement> {
    let (photo_col, text_col) = match geometry.columns {
        ColumnPlan::Split { photo, text } => (photo, text),
        ColumnPlan::Table(_) => return Vec::new(),
    };
    let left = geometry.content_left();
    let inset = geometry.cell_inset;
    let text_x = left + photo_col + inset;
    let text_width = text_col - 2.0 * inset;

    let mut out = Vec::new();

    // Closing separator only under the final segment.
    if segment.last {
        out.push(LayoutElement {
            x: left,
            y: y_top + segment.height - 0.5,
            width: geometry.content_width(),
            height: 0.5,
            draw: DrawCommand::Rect {
                fill: Some(theme.border),
                stroke: None,
                corner_radius: 0.0,
            },
        });
    }

    let body_top = if segment.first {
        y_top + geometry.row_padding + HEADING_HEIGHT + FIELD_GAP
    } else {
        y_top + geometry.row_padding
    };

    if segment.first {
        // Heading band: "<item label> <number>", priority dot, badge.
        let heading_baseline = y_top + geometry.row_padding + geometry.cell_size + 1.0;
        let heading = format!("{} {}", labels.item, item.number);
        let heading_size = geometry.cell_size + 1.0;
        let heading_w = StandardFont::HelveticaBold.measure(&heading, heading_size);
        out.push(LayoutElement {
            x: left,
            y: heading_baseline,
            width: heading_w,
            height: heading_size,
            draw: DrawCommand::Text {
                text: heading,
                font: StandardFont::HelveticaBold,
                size: heading_size,
                color: theme.text,
            },
        });
        if let Some(color) = theme.priority_color(item.priority) {
            out.push(LayoutElement {
                x: left + heading_w + 4.0,
                y: heading_baseline - 5.0,
                width: 6.0,
                height: 6.0,
                draw: DrawCommand::Rect {
                    fill: Some(color),
                    stroke: None,
                    corner_radius: 3.0,
                },
            });
        }
        let badge_w = badge_width(item, geometry);
        render_status_badge(
            &mut out,
            item,
            geometry.page_width - geometry.margin - badge_w,
            badge_w,
            y_top + geometry.row_padding,
            geometry,
            theme,
        );

        // Text column: labeled location, description and solution
        // fields, then the meta line.
        let mut field_y = body_top;
        field_y = push_field(
            &mut out,
            &labels.location,
            &item.location,
            geometry.location_max_lines,
            text_x,
            field_y,
            text_width,
            geometry,
            theme,
        );
        field_y = push_field(
            &mut out,
            &labels.description,
            &item.description,
            geometry.description_max_lines,
            text_x,
            field_y,
            text_width,
            geometry,
            theme,
        );
        if let Some(solution) = &item.solution {
            field_y = push_field(
                &mut out,
                &labels.solution,
                solution,
                geometry.solution_max_lines,
                text_x,
                field_y,
                text_width,
                geometry,
                theme,
            );
        }
        if let Some(meta) = meta_line(item) {
            out.push(LayoutElement {
                x: text_x,
                y: field_y + geometry.meta_size,
                width: StandardFont::Helvetica.measure(&meta, geometry.meta_size),
                height: geometry.meta_size,
                draw: DrawCommand::Text {
                    text: meta,
                    font: StandardFont::Helvetica,
                    size: geometry.meta_size,
                    color: theme.text_secondary,
                },
            });
        }
    }

    // This segment's slice of the photo stack.
    let mut photo_y = body_top;
    if item.photos.is_empty() {
        render_photo_slot(&mut out, None, left, photo_y, geometry, theme, fetcher);
    } else {
        for photo in &item.photos[segment.skip..segment.skip + segment.take] {
            render_photo_slot(&mut out, Some(photo), left, photo_y, geometry, theme, fetcher);
            photo_y += geometry.photo_height;
            if let Some(caption) = caption_text(photo) {
                out.push(LayoutElement {
                    x: left,
                    y: photo_y + geometry.caption_size + 2.0,
                    width: StandardFont::HelveticaOblique
                        .measure(&caption, geometry.caption_size),
                    height: geometry.caption_size,
                    draw: DrawCommand::Text {
                        text: caption,
                        font: StandardFont::HelveticaOblique,
                        size: geometry.caption_size,
                        color: theme.text_secondary,
                    },
                });
                photo_y += CAPTION_LINE;
            }
            photo_y += PHOTO_GAP;
        }
    }

    out
}

/// Caption line height in the detailed photo column.
const CAPTION_LINE: f64 = 10.0;

/// Vertical footprint of each photo in the stack, trailing gap included.
fn photo_stack_heights(item: &Item, geometry: &Geometry) -> Vec<f64> {
    item.photos
        .iter()
        .map(|photo| {
            let caption = if caption_text(photo).is_some() {
                CAPTION_LINE
            } else {
                0.0
            };
            geometry.photo_height + caption + PHOTO_GAP
        })
        .collect()
}

fn detailed_text_height(item: &Item, geometry: &Geometry) -> f64 {
    let text_col = match geometry.columns {
        ColumnPlan::Split { text, .. } => text,
        ColumnPlan::Table(_) => return 0.0,
    };
    let text_width = text_col - 2.0 * geometry.cell_inset;

    let mut h = field_height(&item.location, geometry.location_max_lines, text_width, geometry);
    h += FIELD_GAP;
    h += field_height(
        &item.description,
        geometry.description_max_lines,
        text_width,
        geometry,
    );
    if let Some(solution) = &item.solution {
        h += FIELD_GAP;
        h += field_height(solution, geometry.solution_max_lines, text_width, geometry);
    }
    if meta_line(item).is_some() {
        h += FIELD_GAP + geometry.meta_size + 2.0;
    }
    h
}

fn field_height(value: &str, max_lines: usize, width: f64, geometry: &Geometry) -> f64 {
    let lines = wrap_clamped(
        value,
        StandardFont::Helvetica,
        geometry.cell_size,
        width,
        max_lines,
    );
    FIELD_LABEL_HEIGHT + lines.len() as f64 * geometry.cell_line_height
}

/// Draw one labeled field and return the Y below it (plus the field gap).
#[allow(clippy::too_many_arguments)]
fn push_field(
    out: &mut Vec<LayoutElement>,
    label: &str,
    value: &str,
    max_lines: usize,
    x: f64,
    y: f64,
    width: f64,
    geometry: &Geometry,
    theme: &Theme,
) -> f64 {
    let label_text = label.to_uppercase();
    out.push(LayoutElement {
        x,
        y: y + geometry.header_size,
        width: StandardFont::HelveticaBold.measure(&label_text, geometry.header_size),
        height: geometry.header_size,
        draw: DrawCommand::Text {
            text: label_text,
            font: StandardFont::HelveticaBold,
            size: geometry.header_size,
            color: theme.text_secondary,
        },
    });
    let lines = wrap_clamped(
        value,
        StandardFont::Helvetica,
        geometry.cell_size,
        width,
        max_lines,
    );
    let count = lines.len();
    push_lines(
        out,
        lines,
        x,
        y + FIELD_LABEL_HEIGHT + geometry.cell_size,
        geometry.cell_line_height,
        StandardFont::Helvetica,
        geometry.cell_size,
        theme.text,
    );
    y + FIELD_LABEL_HEIGHT + count as f64 * geometry.cell_line_height + FIELD_GAP
}

#[allow(clippy::too_many_arguments)]
fn push_lines(
    out: &mut Vec<LayoutElement>,
    lines: Vec<String>,
    x: f64,
    first_baseline: f64,
    line_height: f64,
    font: StandardFont,
    size: f64,
    color: crate::style::Color,
) {
    for (index, line) in lines.into_iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        out.push(LayoutElement {
            x,
            y: first_baseline + index as f64 * line_height,
            width: font.measure(&line, size),
            height: size,
            draw: DrawCommand::Text {
                text: line,
                font,
                size,
                color,
            },
        });
    }
}

/// The photo slot: image with a border on success, a labeled placeholder
/// otherwise. `photo = None` means the item has no photos at all, which
/// must not trigger a fetch.
fn render_photo_slot(
    out: &mut Vec<LayoutElement>,
    photo: Option<&Photo>,
    x: f64,
    y: f64,
    geometry: &Geometry,
    theme: &Theme,
    fetcher: &dyn PhotoFetcher,
) {
    let width = geometry.photo_width;
    let height = geometry.photo_height;

    let label = match photo {
        None => "No Photo",
        Some(photo) => match fetcher.fetch(&photo.url) {
            PhotoFetch::Image(image) => {
                out.push(LayoutElement {
                    x,
                    y,
                    width,
                    height,
                    draw: DrawCommand::Image { image },
                });
                out.push(LayoutElement {
                    x,
                    y,
                    width,
                    height,
                    draw: DrawCommand::Rect {
                        fill: None,
                        stroke: Some(Stroke {
                            color: theme.border,
                            width: 0.5,
                        }),
                        corner_radius: 0.0,
                    },
                });
                return;
            }
            PhotoFetch::Unavailable(failure) => failure.label(),
        },
    };

    out.push(LayoutElement {
        x,
        y,
        width,
        height,
        draw: DrawCommand::Rect {
            fill: Some(theme.placeholder_bg),
            stroke: Some(Stroke {
                color: theme.border,
                width: 0.5,
            }),
            corner_radius: 2.0,
        },
    });
    let label_w = StandardFont::Helvetica.measure(label, geometry.meta_size);
    out.push(LayoutElement {
        x: x + (width - label_w) / 2.0,
        y: y + height / 2.0 + geometry.meta_size * 0.35,
        width: label_w,
        height: geometry.meta_size,
        draw: DrawCommand::Text {
            text: label.to_string(),
            font: StandardFont::Helvetica,
            size: geometry.meta_size,
            color: theme.text_secondary,
        },
    });
}

fn badge_width(item: &Item, geometry: &Geometry) -> f64 {
    StandardFont::HelveticaBold.measure(item.status.short_label(), geometry.badge_size) + 10.0
}

/// Pill-shaped status badge centered in a band of `band_width` starting
/// at `band_x`.
fn render_status_badge(
    out: &mut Vec<LayoutElement>,
    item: &Item,
    band_x: f64,
    band_width: f64,
    y: f64,
    geometry: &Geometry,
    theme: &Theme,
) {
    let label = item.status.short_label();
    let size = geometry.badge_size;
    let text_w = StandardFont::HelveticaBold.measure(label, size);
    let width = text_w + 10.0;
    let height = size + 5.0;
    let x = band_x + (band_width - width) / 2.0;

    out.push(LayoutElement {
        x,
        y,
        width,
        height,
        draw: DrawCommand::Rect {
            fill: Some(theme.status_color(item.status)),
            stroke: None,
            corner_radius: height / 2.0,
        },
    });
    out.push(LayoutElement {
        x: x + (width - text_w) / 2.0,
        y: y + height / 2.0 + size * 0.35,
        width: text_w,
        height: size,
        draw: DrawCommand::Text {
            text: label.to_string(),
            font: StandardFont::HelveticaBold,
            size,
            color: crate::style::Color::WHITE,
        },
    });
}

fn caption_text(photo: &Photo) -> Option<String> {
    photo
        .caption
        .as_ref()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
}

/// Assignee and due date joined for the small secondary line.
fn meta_line(item: &Item) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(assignee) = &item.assignee {
        parts.push(assignee.short_name());
    }
    if let Some(due) = item.due_date {
        parts.push(format!("Due {}", due.format("%Y-%m-%d")));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" \u{00B7} "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Assignee, Priority, Status};
    use chrono::NaiveDate;
    use std::cell::RefCell;

    /// Test double that records every URL it is asked for.
    struct RecordingFetcher {
        calls: RefCell<Vec<String>>,
    }

    impl RecordingFetcher {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl PhotoFetcher for RecordingFetcher {
        fn fetch(&self, url: &str) -> PhotoFetch {
            self.calls.borrow_mut().push(url.to_string());
            PhotoFetch::Unavailable(crate::fetch::FetchFailure::Status(404))
        }
    }

    fn item(photos: Vec<Photo>) -> Item {
        Item {
            number: 7,
            location: "North wall".to_string(),
            description: "Cracked tile near the window frame".to_string(),
            solution: Some("Replace tile".to_string()),
            status: Status::Open,
            priority: Priority::High,
            due_date: Some(NaiveDate::from_ymd_opt(2026, 9, 15).unwrap()),
            assignee: Some(Assignee {
                first_name: "Jo".to_string(),
                last_name: "Nilsen".to_string(),
            }),
            photos,
        }
    }

    fn texts(elements: &[LayoutElement]) -> Vec<String> {
        elements
            .iter()
            .filter_map(|e| match &e.draw {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_compact_row_no_photos_means_no_fetch() {
        let fetcher = RecordingFetcher::new();
        let geometry = Geometry::compact();
        let elements = render_compact_row(
            &item(vec![]),
            100.0,
            0,
            &geometry,
            &Theme::default(),
            &fetcher,
        );
        assert!(fetcher.calls.borrow().is_empty());
        assert!(texts(&elements).iter().any(|t| t == "No Photo"));
    }

    #[test]
    fn test_compact_row_fetches_first_photo_only() {
        let fetcher = RecordingFetcher::new();
        let geometry = Geometry::compact();
        let photos = vec![
            Photo {
                url: "https://example.com/a.jpg".to_string(),
                caption: None,
            },
            Photo {
                url: "https://example.com/b.jpg".to_string(),
                caption: None,
            },
        ];
        render_compact_row(&item(photos), 100.0, 0, &geometry, &Theme::default(), &fetcher);
        assert_eq!(*fetcher.calls.borrow(), vec!["https://example.com/a.jpg"]);
    }

    #[test]
    fn test_compact_row_failed_fetch_draws_placeholder() {
        let fetcher = RecordingFetcher::new();
        let geometry = Geometry::compact();
        let photos = vec![Photo {
            url: "https://example.com/gone.jpg".to_string(),
            caption: None,
        }];
        let elements = render_compact_row(
            &item(photos),
            100.0,
            0,
            &geometry,
            &Theme::default(),
            &fetcher,
        );
        assert!(texts(&elements).iter().any(|t| t == "Unavailable"));
    }

    #[test]
    fn test_compact_row_contains_status_and_meta() {
        let fetcher = RecordingFetcher::new();
        let geometry = Geometry::compact();
        let elements = render_compact_row(
            &item(vec![]),
            0.0,
            0,
            &geometry,
            &Theme::default(),
            &fetcher,
        );
        let all = texts(&elements);
        assert!(all.iter().any(|t| t == "OPEN"));
        assert!(all.iter().any(|t| t.contains("J. Nilsen")));
        assert!(all.iter().any(|t| t.contains("Due 2026-09-15")));
    }

    #[test]
    fn test_compact_text_stays_inside_columns() {
        let fetcher = RecordingFetcher::new();
        let geometry = Geometry::compact();
        let mut it = item(vec![]);
        it.description = "a very long description ".repeat(20);
        let elements =
            render_compact_row(&it, 0.0, 0, &geometry, &Theme::default(), &fetcher);
        let right_edge = geometry.content_left() + geometry.content_width();
        for e in &elements {
            assert!(
                e.x + e.width <= right_edge + 1e-6,
                "element sticks out of the content box: {:?}",
                e.draw
            );
        }
    }

    fn photo(url: &str) -> Photo {
        Photo {
            url: url.to_string(),
            caption: None,
        }
    }

    /// Roomy enough that any block fits in one segment.
    const WIDE_OPEN: f64 = 10_000.0;

    #[test]
    fn test_detailed_segment_render_stays_within_height() {
        let fetcher = RecordingFetcher::new();
        let geometry = Geometry::detailed();
        let photos = vec![Photo {
            url: "https://example.com/a.jpg".to_string(),
            caption: Some("Before".to_string()),
        }];
        let it = item(photos);
        let segments = split_detailed_block(&it, &geometry, WIDE_OPEN, WIDE_OPEN);
        assert_eq!(segments.len(), 1);
        let elements = render_detailed_segment(
            &it,
            &segments[0],
            50.0,
            &geometry,
            &crate::model::ReportLabels::default().resolve(),
            &Theme::default(),
            &fetcher,
        );
        let max_bottom = elements
            .iter()
            .map(|e| e.y + e.height)
            .fold(f64::MIN, f64::max);
        assert!(
            max_bottom <= 50.0 + segments[0].height + 1e-6,
            "rendered content ({:.2}) exceeds segment height ({:.2})",
            max_bottom - 50.0,
            segments[0].height
        );
    }

    #[test]
    fn test_detailed_segments_fetch_every_photo() {
        let fetcher = RecordingFetcher::new();
        let geometry = Geometry::detailed();
        let photos = vec![
            photo("https://example.com/a.jpg"),
            Photo {
                url: "https://example.com/b.jpg".to_string(),
                caption: Some("After".to_string()),
            },
        ];
        let it = item(photos);
        let segments = split_detailed_block(&it, &geometry, WIDE_OPEN, WIDE_OPEN);
        assert_eq!(segments.len(), 1);
        let elements = render_detailed_segment(
            &it,
            &segments[0],
            0.0,
            &geometry,
            &crate::model::ReportLabels::default().resolve(),
            &Theme::default(),
            &fetcher,
        );
        assert_eq!(fetcher.calls.borrow().len(), 2);
        assert!(texts(&elements).iter().any(|t| t == "After"));
    }

    #[test]
    fn test_detailed_block_taller_with_more_photos() {
        let geometry = Geometry::detailed();
        let one = split_detailed_block(&item(vec![photo("u")]), &geometry, WIDE_OPEN, WIDE_OPEN);
        let two = split_detailed_block(
            &item(vec![photo("u"), photo("v")]),
            &geometry,
            WIDE_OPEN,
            WIDE_OPEN,
        );
        assert!(two[0].height > one[0].height);
    }

    #[test]
    fn test_split_covers_every_photo_across_segments() {
        let geometry = Geometry::detailed();
        let it = item((0..6).map(|i| photo(&format!("u{}", i))).collect());
        let first_available = 400.0;
        let page_available = 700.0;
        let segments = split_detailed_block(&it, &geometry, first_available, page_available);

        assert!(segments.len() > 1, "six photos must not fit one segment");
        assert!(segments[0].first);
        assert!(segments.last().is_some_and(|s| s.last));
        let mut expected_skip = 0;
        for segment in &segments {
            assert_eq!(segment.skip, expected_skip);
            assert!(segment.take >= 1);
            expected_skip += segment.take;
            let available = if segment.first {
                first_available
            } else {
                page_available
            };
            assert!(
                segment.height <= available + 1e-6,
                "segment height {:.1} exceeds available {:.1}",
                segment.height,
                available
            );
        }
        assert_eq!(expected_skip, it.photos.len());
    }

    #[test]
    fn test_split_without_photos_is_one_segment() {
        let geometry = Geometry::detailed();
        let segments = split_detailed_block(&item(vec![]), &geometry, WIDE_OPEN, WIDE_OPEN);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].take, 0);
        assert!(segments[0].first && segments[0].last);
        assert!(segments[0].height >= geometry.photo_height);
    }

    #[test]
    fn test_continuation_segment_skips_heading_and_text() {
        let fetcher = RecordingFetcher::new();
        let geometry = Geometry::detailed();
        let it = item((0..6).map(|i| photo(&format!("u{}", i))).collect());
        let segments = split_detailed_block(&it, &geometry, 400.0, 700.0);
        let continuation = &segments[1];
        let elements = render_detailed_segment(
            &it,
            continuation,
            100.0,
            &geometry,
            &crate::model::ReportLabels::default().resolve(),
            &Theme::default(),
            &fetcher,
        );
        assert!(
            !texts(&elements).iter().any(|t| t.starts_with("Snag")),
            "continuation must not repeat the heading"
        );
        assert_eq!(fetcher.calls.borrow().len(), continuation.take);
    }

    #[test]
    fn test_detailed_min_height_covers_text_and_first_photo() {
        let geometry = Geometry::detailed();
        let it = item(vec![photo("u"), photo("v")]);
        let min = detailed_min_height(&it, &geometry);
        let segments = split_detailed_block(&it, &geometry, min, WIDE_OPEN);
        assert_eq!(segments[0].height, min);
        assert_eq!(segments[0].take, 1);
    }

    #[test]
    fn test_meta_line_formats() {
        let mut it = item(vec![]);
        assert_eq!(
            meta_line(&it).unwrap(),
            "J. Nilsen \u{00B7} Due 2026-09-15"
        );
        it.assignee = None;
        assert_eq!(meta_line(&it).unwrap(), "Due 2026-09-15");
        it.due_date = None;
        assert!(meta_line(&it).is_none());
    }
}
