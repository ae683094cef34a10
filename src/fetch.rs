//! # Remote Photo Fetching
//!
//! Turns a photo URL into bytes the PDF writer can embed. This is strictly
//! best-effort: a broken URL, a 404, a timeout, or a corrupt file must
//! never abort the report. Every failure path collapses to
//! [`PhotoFetch::Unavailable`] and the row renderer draws a labeled
//! placeholder in the slot instead.
//!
//! JPEG bytes pass through untouched — the PDF format embeds them natively
//! with DCTDecode. PNG and WebP are decoded to RGB pixels with a separate
//! alpha channel for SMask transparency.
//!
//! Each photo is fetched at most once per export, sequentially, with a
//! bounded timeout on the shared agent. No retries, no cross-call cache.

use std::io::{Cursor, Read};
use std::time::Duration;

use log::warn;

/// Hard cap on a photo response body. Anything larger degrades to a
/// placeholder rather than ballooning the export.
const MAX_PHOTO_BYTES: u64 = 20 * 1024 * 1024;

/// Converts a photo URL into an embeddable image. Implemented by the
/// HTTP fetcher in production and by stubs in tests.
pub trait PhotoFetcher {
    fn fetch(&self, url: &str) -> PhotoFetch;
}

/// The outcome of one photo fetch. Note the absence of an error variant:
/// failure is a value here, not an exception.
#[derive(Debug, Clone)]
pub enum PhotoFetch {
    Image(EmbeddableImage),
    Unavailable(FetchFailure),
}

/// Why a photo could not be embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    /// Transport-level failure: DNS, connect, timeout.
    Request,
    /// The server answered with a non-success status.
    Status(u16),
    /// Body exceeded [`MAX_PHOTO_BYTES`].
    TooLarge,
    /// Bytes arrived but were not a decodable image.
    Decode,
}

impl FetchFailure {
    /// The label drawn inside the placeholder slot.
    pub fn label(&self) -> &'static str {
        match self {
            FetchFailure::Decode => "Error",
            _ => "Unavailable",
        }
    }
}

/// A fully decoded/loaded image ready for PDF embedding.
#[derive(Debug, Clone)]
pub struct EmbeddableImage {
    pub data: ImageData,
    pub width_px: u32,
    pub height_px: u32,
}

/// Pixel payload in a form the PDF serializer consumes directly.
#[derive(Debug, Clone)]
pub enum ImageData {
    /// Raw JPEG bytes — embedded with DCTDecode.
    Jpeg { data: Vec<u8>, grayscale: bool },
    /// Decoded RGB pixels plus optional alpha (SMask). `rgb` is
    /// width × height × 3 bytes; `alpha` is width × height bytes.
    Raster {
        rgb: Vec<u8>,
        alpha: Option<Vec<u8>>,
    },
}

/// The production fetcher: one blocking GET per photo over a shared
/// agent with a connect/read timeout.
pub struct HttpPhotoFetcher {
    agent: ureq::Agent,
}

impl HttpPhotoFetcher {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent }
    }
}

impl PhotoFetcher for HttpPhotoFetcher {
    fn fetch(&self, url: &str) -> PhotoFetch {
        let response = match self.agent.get(url).call() {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, _)) => {
                warn!("photo fetch {} returned status {}", url, code);
                return PhotoFetch::Unavailable(FetchFailure::Status(code));
            }
            Err(err) => {
                warn!("photo fetch {} failed: {}", url, err);
                return PhotoFetch::Unavailable(FetchFailure::Request);
            }
        };

        let mut bytes: Vec<u8> = Vec::new();
        let mut reader = response.into_reader().take(MAX_PHOTO_BYTES + 1);
        if let Err(err) = reader.read_to_end(&mut bytes) {
            warn!("photo fetch {} body read failed: {}", url, err);
            return PhotoFetch::Unavailable(FetchFailure::Request);
        }
        if bytes.len() as u64 > MAX_PHOTO_BYTES {
            warn!("photo fetch {} exceeded {} bytes", url, MAX_PHOTO_BYTES);
            return PhotoFetch::Unavailable(FetchFailure::TooLarge);
        }

        match decode_photo_bytes(&bytes) {
            Ok(image) => PhotoFetch::Image(image),
            Err(reason) => {
                warn!("photo decode {} failed: {}", url, reason);
                PhotoFetch::Unavailable(FetchFailure::Decode)
            }
        }
    }
}

/// Detect the image format from magic bytes and decode accordingly.
pub fn decode_photo_bytes(data: &[u8]) -> Result<EmbeddableImage, String> {
    if data.len() < 4 {
        return Err("image data too short".to_string());
    }
    if is_jpeg(data) {
        decode_jpeg(data)
    } else {
        decode_raster(data)
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

/// JPEG: read dimensions and component count without decoding pixels.
/// The raw bytes pass through to the PDF as a DCTDecode stream.
fn decode_jpeg(data: &[u8]) -> Result<EmbeddableImage, String> {
    let reader = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("JPEG format detection error: {}", e))?;
    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| format!("failed to read JPEG dimensions: {}", e))?;

    Ok(EmbeddableImage {
        data: ImageData::Jpeg {
            data: data.to_vec(),
            grayscale: jpeg_is_grayscale(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Scan JPEG markers for the SOF segment and read the component count.
/// One component means DeviceGray, anything else DeviceRGB.
fn jpeg_is_grayscale(data: &[u8]) -> bool {
    let mut i = 2; // skip SOI (FF D8)
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            break;
        }
        let marker = data[i + 1];
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof {
            // SOF segment: length(2) precision(1) height(2) width(2) components(1)
            if i + 9 < data.len() {
                return data[i + 9] == 1;
            }
        }
        if i + 3 < data.len() {
            let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            i += 2 + seg_len;
        } else {
            break;
        }
    }
    false
}

/// PNG/WebP: decode to RGBA, split into RGB + alpha. The alpha channel is
/// dropped when the image is fully opaque.
fn decode_raster(data: &[u8]) -> Result<EmbeddableImage, String> {
    let reader = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| format!("format detection error: {}", e))?;
    let img = reader
        .decode()
        .map_err(|e| format!("failed to decode image: {}", e))?;

    let rgba = img.to_rgba8();
    let (width, height) = (rgba.width(), rgba.height());

    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    let mut has_transparency = false;

    for pixel in rgba.pixels() {
        rgb.push(pixel[0]);
        rgb.push(pixel[1]);
        rgb.push(pixel[2]);
        alpha.push(pixel[3]);
        if pixel[3] != 255 {
            has_transparency = true;
        }
    }

    Ok(EmbeddableImage {
        data: ImageData::Raster {
            rgb,
            alpha: if has_transparency { Some(alpha) } else { None },
        },
        width_px: width,
        height_px: height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(rgba: image::RgbaImage) -> Vec<u8> {
        let (w, h) = (rgba.width(), rgba.height());
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, rgba.as_raw(), w, h, image::ColorType::Rgba8)
            .unwrap();
        buf
    }

    #[test]
    fn test_too_short_data_is_an_error() {
        assert!(decode_photo_bytes(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(decode_photo_bytes(&[0x00, 0x01, 0x02, 0x03, 0x04]).is_err());
    }

    #[test]
    fn test_png_decodes_to_raster() {
        let mut img = image::RgbaImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        let decoded = decode_photo_bytes(&encode_png(img)).unwrap();
        assert_eq!(decoded.width_px, 1);
        match &decoded.data {
            ImageData::Raster { rgb, alpha } => {
                assert_eq!(rgb, &[255, 0, 0]);
                assert!(alpha.is_none(), "fully opaque should carry no alpha");
            }
            _ => panic!("PNG should decode to Raster"),
        }
    }

    #[test]
    fn test_png_transparency_keeps_alpha() {
        let mut img = image::RgbaImage::new(1, 1);
        img.put_pixel(0, 0, image::Rgba([0, 0, 255, 128]));
        let decoded = decode_photo_bytes(&encode_png(img)).unwrap();
        match &decoded.data {
            ImageData::Raster { alpha, .. } => {
                assert_eq!(alpha.as_ref().unwrap(), &[128]);
            }
            _ => panic!("PNG should decode to Raster"),
        }
    }

    #[test]
    fn test_jpeg_passes_through() {
        let img = image::RgbImage::from_fn(2, 2, |_, _| image::Rgb([0, 128, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 2, 2, image::ColorType::Rgb8)
            .unwrap();

        let decoded = decode_photo_bytes(&buf).unwrap();
        assert_eq!(decoded.width_px, 2);
        match &decoded.data {
            ImageData::Jpeg { data, grayscale } => {
                assert!(data.starts_with(&[0xFF, 0xD8]));
                assert!(!grayscale);
            }
            _ => panic!("JPEG should stay Jpeg"),
        }
    }

    #[test]
    fn test_failure_labels() {
        assert_eq!(FetchFailure::Status(404).label(), "Unavailable");
        assert_eq!(FetchFailure::Request.label(), "Unavailable");
        assert_eq!(FetchFailure::Decode.label(), "Error");
    }
}
