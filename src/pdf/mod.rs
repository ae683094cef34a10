//! # PDF Serializer
//!
//! Takes the laid-out pages and writes a valid PDF 1.7 file. This is a
//! from-scratch writer: the subset of the format a report needs — pages,
//! Type1 font references, FlateDecode content streams, image XObjects,
//! xref, trailer — is small enough to emit directly, and owning the bytes
//! keeps the engine self-contained.
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- objects (catalog, pages, fonts, streams, ...)
//! ...
//! xref                <- byte offset of every object
//! trailer             <- points at the catalog
//! %%EOF
//! ```
//!
//! All text uses the standard Helvetica family with WinAnsiEncoding, so
//! no font program is ever embedded. Photos become image XObjects: JPEG
//! bytes pass straight through as DCTDecode streams, decoded rasters are
//! Flate-compressed RGB with an optional SMask for transparency.

use std::fmt::Write as FmtWrite;
use std::io::Write as IoWrite;

use miniz_oxide::deflate::compress_to_vec_zlib;

use crate::error::ReportError;
use crate::fetch::{EmbeddableImage, ImageData};
use crate::font::StandardFont;
use crate::layout::{DrawCommand, LayoutPage};

/// Bézier circle approximation constant.
const BEZIER_K: f64 = 0.5522847498;

/// Document-level metadata for the Info dictionary.
#[derive(Debug, Clone, Default)]
pub struct DocumentInfo {
    pub title: Option<String>,
    pub author: Option<String>,
}

pub struct PdfWriter;

struct PdfObject {
    data: Vec<u8>,
}

/// Object bookkeeping while the file is being assembled.
struct PdfBuilder {
    objects: Vec<PdfObject>,
    /// Fonts actually used, in /F-index order.
    fonts: Vec<(StandardFont, usize)>,
    /// XObject ids in /Im-index order.
    images: Vec<usize>,
    /// (page index, image element ordinal on that page) -> /Im index.
    image_refs: Vec<((usize, usize), usize)>,
}

impl PdfWriter {
    pub fn new() -> Self {
        Self
    }

    /// Serialize laid-out pages into PDF bytes.
    pub fn write(&self, pages: &[LayoutPage], info: &DocumentInfo) -> Result<Vec<u8>, ReportError> {
        if pages.is_empty() {
            return Err(ReportError::Render("no pages to serialize".to_string()));
        }

        let mut builder = PdfBuilder {
            objects: Vec::new(),
            fonts: Vec::new(),
            images: Vec::new(),
            image_refs: Vec::new(),
        };

        // Object 0 is the free-list placeholder; 1 is the catalog and 2
        // the page tree, filled in once the page ids are known.
        builder.objects.push(PdfObject { data: vec![] });
        builder.objects.push(PdfObject { data: vec![] });
        builder.objects.push(PdfObject { data: vec![] });

        register_fonts(&mut builder, pages);
        register_images(&mut builder, pages);

        let mut page_ids = Vec::with_capacity(pages.len());
        for (page_index, page) in pages.iter().enumerate() {
            let content = build_content_stream(page, page_index, &builder);
            let compressed = compress_to_vec_zlib(content.as_bytes(), 6);

            let content_id = builder.objects.len();
            let mut data: Vec<u8> = Vec::new();
            let _ = write!(
                data,
                "<< /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            );
            data.extend_from_slice(&compressed);
            data.extend_from_slice(b"\nendstream");
            builder.objects.push(PdfObject { data });

            let page_id = builder.objects.len();
            let fonts = font_resource_dict(&builder.fonts);
            let xobjects = xobject_resource_dict(page_index, &builder);
            let resources = if xobjects.is_empty() {
                format!("/Font << {} >>", fonts)
            } else {
                format!("/Font << {} >> /XObject << {} >>", fonts, xobjects)
            };
            let dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << {} >> >>",
                page.width, page.height, content_id, resources
            );
            builder.objects.push(PdfObject {
                data: dict.into_bytes(),
            });
            page_ids.push(page_id);
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();
        let kids: String = page_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_ids.len()
        )
        .into_bytes();

        let info_id = {
            let id = builder.objects.len();
            let mut dict = String::from("<< ");
            // Info strings go through the same WinAnsi encoder as page
            // text; raw UTF-8 in a literal would be read as PDFDocEncoding.
            if let Some(title) = &info.title {
                let _ = write!(dict, "/Title ({}) ", encode_winansi(title));
            }
            if let Some(author) = &info.author {
                let _ = write!(dict, "/Author ({}) ", encode_winansi(author));
            }
            dict.push_str("/Producer (snagio-report) >>");
            builder.objects.push(PdfObject {
                data: dict.into_bytes(),
            });
            id
        };

        Ok(serialize(&builder, info_id))
    }
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Register one Type1 font object per face used anywhere in the document.
fn register_fonts(builder: &mut PdfBuilder, pages: &[LayoutPage]) {
    let mut used: Vec<StandardFont> = Vec::new();
    for page in pages {
        for element in &page.elements {
            if let DrawCommand::Text { font, .. } = &element.draw {
                if !used.contains(font) {
                    used.push(*font);
                }
            }
        }
    }
    if used.is_empty() {
        used.push(StandardFont::Helvetica);
    }
    // Stable /F-index regardless of which face appears first.
    used.sort_by_key(|f| f.pdf_name());

    for font in used {
        let id = builder.objects.len();
        let dict = format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} \
             /Encoding /WinAnsiEncoding >>",
            font.pdf_name()
        );
        builder.objects.push(PdfObject {
            data: dict.into_bytes(),
        });
        builder.fonts.push((font, id));
    }
}

/// Create an XObject per image element and remember which /Im index each
/// (page, ordinal) position refers to.
fn register_images(builder: &mut PdfBuilder, pages: &[LayoutPage]) {
    for (page_index, page) in pages.iter().enumerate() {
        let mut ordinal = 0usize;
        for element in &page.elements {
            if let DrawCommand::Image { image } = &element.draw {
                let object_id = write_image_xobject(builder, image);
                let image_index = builder.images.len();
                builder.images.push(object_id);
                builder
                    .image_refs
                    .push(((page_index, ordinal), image_index));
                ordinal += 1;
            }
        }
    }
}

/// One or two XObjects per image (the SMask rides separately). Returns
/// the main object id.
fn write_image_xobject(builder: &mut PdfBuilder, image: &EmbeddableImage) -> usize {
    match &image.data {
        ImageData::Jpeg { data, grayscale } => {
            let color_space = if *grayscale { "/DeviceGray" } else { "/DeviceRGB" };
            let id = builder.objects.len();
            let mut obj: Vec<u8> = Vec::new();
            let _ = write!(
                obj,
                "<< /Type /XObject /Subtype /Image \
                 /Width {} /Height {} \
                 /ColorSpace {} \
                 /BitsPerComponent 8 \
                 /Filter /DCTDecode \
                 /Length {} >>\nstream\n",
                image.width_px,
                image.height_px,
                color_space,
                data.len()
            );
            obj.extend_from_slice(data);
            obj.extend_from_slice(b"\nendstream");
            builder.objects.push(PdfObject { data: obj });
            id
        }
        ImageData::Raster { rgb, alpha } => {
            let smask_id = alpha.as_ref().map(|alpha| {
                let compressed = compress_to_vec_zlib(alpha, 6);
                let id = builder.objects.len();
                let mut obj: Vec<u8> = Vec::new();
                let _ = write!(
                    obj,
                    "<< /Type /XObject /Subtype /Image \
                     /Width {} /Height {} \
                     /ColorSpace /DeviceGray \
                     /BitsPerComponent 8 \
                     /Filter /FlateDecode \
                     /Length {} >>\nstream\n",
                    image.width_px,
                    image.height_px,
                    compressed.len()
                );
                obj.extend_from_slice(&compressed);
                obj.extend_from_slice(b"\nendstream");
                builder.objects.push(PdfObject { data: obj });
                id
            });

            let compressed = compress_to_vec_zlib(rgb, 6);
            let id = builder.objects.len();
            let smask_ref = smask_id
                .map(|id| format!(" /SMask {} 0 R", id))
                .unwrap_or_default();
            let mut obj: Vec<u8> = Vec::new();
            let _ = write!(
                obj,
                "<< /Type /XObject /Subtype /Image \
                 /Width {} /Height {} \
                 /ColorSpace /DeviceRGB \
                 /BitsPerComponent 8 \
                 /Filter /FlateDecode \
                 /Length {}{} >>\nstream\n",
                image.width_px,
                image.height_px,
                compressed.len(),
                smask_ref
            );
            obj.extend_from_slice(&compressed);
            obj.extend_from_slice(b"\nendstream");
            builder.objects.push(PdfObject { data: obj });
            id
        }
    }
}

/// Emit the operators for one page. The layout works top-down; PDF user
/// space has its origin bottom-left, so every Y flips here and only here.
fn build_content_stream(page: &LayoutPage, page_index: usize, builder: &PdfBuilder) -> String {
    let mut stream = String::new();
    let page_height = page.height;
    let mut image_ordinal = 0usize;

    for element in &page.elements {
        match &element.draw {
            DrawCommand::Rect {
                fill,
                stroke,
                corner_radius,
            } => {
                let x = element.x;
                let y = page_height - element.y - element.height;
                if let Some(fill) = fill {
                    if fill.a > 0.0 {
                        let _ = write!(stream, "q\n{:.3} {:.3} {:.3} rg\n", fill.r, fill.g, fill.b);
                        write_rect_path(&mut stream, x, y, element.width, element.height, *corner_radius);
                        stream.push_str("f\nQ\n");
                    }
                }
                if let Some(stroke) = stroke {
                    let _ = write!(
                        stream,
                        "q\n{:.3} {:.3} {:.3} RG\n{:.2} w\n",
                        stroke.color.r, stroke.color.g, stroke.color.b, stroke.width
                    );
                    write_rect_path(&mut stream, x, y, element.width, element.height, *corner_radius);
                    stream.push_str("S\nQ\n");
                }
            }

            DrawCommand::Text {
                text,
                font,
                size,
                color,
            } => {
                let font_index = builder
                    .fonts
                    .iter()
                    .position(|(f, _)| f == font)
                    .unwrap_or(0);
                let _ = write!(
                    stream,
                    "BT\n{:.3} {:.3} {:.3} rg\n/F{} {:.1} Tf\n{:.2} {:.2} Td\n({}) Tj\nET\n",
                    color.r,
                    color.g,
                    color.b,
                    font_index,
                    size,
                    element.x,
                    page_height - element.y,
                    encode_winansi(text)
                );
            }

            DrawCommand::Image { .. } => {
                let key = (page_index, image_ordinal);
                image_ordinal += 1;
                let x = element.x;
                let y = page_height - element.y - element.height;
                if let Some(&(_, image_index)) =
                    builder.image_refs.iter().find(|(k, _)| *k == key)
                {
                    let _ = write!(
                        stream,
                        "q\n{:.4} 0 0 {:.4} {:.2} {:.2} cm\n/Im{} Do\nQ\n",
                        element.width, element.height, x, y, image_index
                    );
                } else {
                    // Grey box rather than a hole if bookkeeping slipped.
                    let _ = write!(
                        stream,
                        "q\n0.9 0.9 0.9 rg\n{:.2} {:.2} {:.2} {:.2} re\nf\nQ\n",
                        x, y, element.width, element.height
                    );
                }
            }
        }
    }

    stream
}

/// Path for a rectangle, rounded when `radius > 0`.
fn write_rect_path(stream: &mut String, x: f64, y: f64, w: f64, h: f64, radius: f64) {
    if radius <= 0.0 {
        let _ = write!(stream, "{:.2} {:.2} {:.2} {:.2} re\n", x, y, w, h);
        return;
    }
    let r = radius.min(w / 2.0).min(h / 2.0);
    let k = r * BEZIER_K;

    let _ = write!(stream, "{:.2} {:.2} m\n", x + r, y);
    let _ = write!(stream, "{:.2} {:.2} l\n", x + w - r, y);
    let _ = write!(
        stream,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
        x + w - r + k, y, x + w, y + r - k, x + w, y + r
    );
    let _ = write!(stream, "{:.2} {:.2} l\n", x + w, y + h - r);
    let _ = write!(
        stream,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
        x + w, y + h - r + k, x + w - r + k, y + h, x + w - r, y + h
    );
    let _ = write!(stream, "{:.2} {:.2} l\n", x + r, y + h);
    let _ = write!(
        stream,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
        x + r - k, y + h, x, y + h - r + k, x, y + h - r
    );
    let _ = write!(stream, "{:.2} {:.2} l\n", x, y + r);
    let _ = write!(
        stream,
        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
        x, y + r - k, x + r - k, y, x + r, y
    );
    stream.push_str("h\n");
}

fn font_resource_dict(fonts: &[(StandardFont, usize)]) -> String {
    fonts
        .iter()
        .enumerate()
        .map(|(index, (_, id))| format!("/F{} {} 0 R", index, id))
        .collect::<Vec<_>>()
        .join(" ")
}

fn xobject_resource_dict(page_index: usize, builder: &PdfBuilder) -> String {
    let mut entries: Vec<(usize, usize)> = builder
        .image_refs
        .iter()
        .filter(|((pidx, _), _)| *pidx == page_index)
        .map(|(_, image_index)| (*image_index, builder.images[*image_index]))
        .collect();
    entries.sort_by_key(|(index, _)| *index);
    entries
        .iter()
        .map(|(index, id)| format!("/Im{} {} 0 R", index, id))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Encode a string as a WinAnsi PDF literal: delimiters escaped, bytes
/// above ASCII as octal escapes, unmappable characters as `?`.
fn encode_winansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let b = unicode_to_winansi(ch).unwrap_or(b'?');
        match b {
            b'\\' => out.push_str("\\\\"),
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            0x20..=0x7E => out.push(b as char),
            _ => {
                let _ = write!(out, "\\{:03o}", b);
            }
        }
    }
    out
}

/// Map a Unicode codepoint to a WinAnsiEncoding (Windows-1252) byte.
/// Direct in 0x20..=0x7E and 0xA0..=0xFF; the 0x80..=0x9F range holds the
/// typographic extras.
fn unicode_to_winansi(ch: char) -> Option<u8> {
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) || (0xA0..=0xFF).contains(&cp) {
        return Some(cp as u8);
    }
    match cp {
        0x20AC => Some(0x80), // euro
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85), // ellipsis
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // bullet
        0x2013 => Some(0x96), // en dash
        0x2014 => Some(0x97), // em dash
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

/// Final byte assembly: header, numbered objects, xref, trailer.
fn serialize(builder: &PdfBuilder, info_id: usize) -> Vec<u8> {
    let mut output: Vec<u8> = Vec::new();
    let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

    output.extend_from_slice(b"%PDF-1.7\n");
    output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

    for (i, object) in builder.objects.iter().enumerate().skip(1) {
        offsets[i] = output.len();
        let _ = write!(output, "{} 0 obj\n", i);
        output.extend_from_slice(&object.data);
        output.extend_from_slice(b"\nendobj\n\n");
    }

    let xref_offset = output.len();
    let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
    let _ = write!(output, "0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        let _ = write!(output, "{:010} 00000 n \n", offset);
    }

    let _ = write!(
        output,
        "trailer\n<< /Size {} /Root 1 0 R /Info {} 0 R >>\nstartxref\n{}\n%%EOF\n",
        builder.objects.len(),
        info_id,
        xref_offset
    );

    output
}
