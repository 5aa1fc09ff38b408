//! Software rendering of the score card for capture.
//!
//! Layout follows the on-screen card (375pt wide, scaled by the region's
//! density): background raster, translucent overlay, centered title, a
//! three-column grid of hole tiles, and the total underneath.

use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

use super::capture::{CaptureError, CaptureOptions, CaptureRegion, ImageFormat};

const MAX_EDGE: u32 = 8192;
const BASE_WIDTH: f32 = 375.0;

const INK: [u8; 3] = [46, 64, 82];
const ACCENT: [u8; 3] = [27, 153, 139];
const WHITE: [u8; 3] = [255, 255, 255];

/// Renders `region` and encodes it according to `options`.
pub fn render_and_encode(
    region: &CaptureRegion,
    options: &CaptureOptions,
) -> Result<Vec<u8>, CaptureError> {
    let image = render_region(region)?;
    encode(&image, options)
}

pub fn render_region(region: &CaptureRegion) -> Result<RgbaImage, CaptureError> {
    let (width, height) = (region.width, region.height);
    if width == 0 || height == 0 || width > MAX_EDGE || height > MAX_EDGE {
        return Err(CaptureError::InvalidRegion { width, height });
    }

    let mut image = match &region.background {
        Some(bytes) => cover_background(bytes, width, height)?,
        None => fairway_gradient(width, height),
    };

    fill_rect(&mut image, 0, 0, width, height, 0, WHITE, 0.85);

    let density = width as f32 / BASE_WIDTH;
    let px = |pt: f32| (pt * density).round() as u32;
    let pad = px(20.0);
    let inner_width = width.saturating_sub(pad * 2);

    let title_scale = glyph_scale(24.0, density);
    let label_scale = glyph_scale(16.0, density);
    let score_scale = glyph_scale(24.0, density);
    let total_scale = glyph_scale(20.0, density);

    let card = &region.card;
    let mut y = pad;
    draw_text_centered(&mut image, width / 2, y, card.course_name(), INK, title_scale);
    y += 7 * title_scale + px(20.0);

    let tile_width = (inner_width as f32 * 0.30).round() as u32;
    let gap = inner_width.saturating_sub(tile_width * 3) / 2;
    let tile_pad = px(10.0);
    let line_gap = px(4.0);
    let tile_height = tile_pad * 2 + 7 * label_scale + line_gap + 7 * score_scale;

    for (index, hole) in card.holes().iter().enumerate() {
        let col = (index % 3) as u32;
        let row = (index / 3) as u32;
        let tile_x = pad + col * (tile_width + gap);
        let tile_y = y + row * (tile_height + px(15.0));
        fill_rect(
            &mut image,
            tile_x,
            tile_y,
            tile_width,
            tile_height,
            px(8.0),
            WHITE,
            0.7,
        );

        let center = tile_x + tile_width / 2;
        let label_y = tile_y + tile_pad;
        draw_text_centered(&mut image, center, label_y, &hole.label(), INK, label_scale);
        let score_y = label_y + 7 * label_scale + line_gap;
        let score = hole.strokes.to_string();
        draw_text_centered(&mut image, center, score_y, &score, ACCENT, score_scale);
    }

    let rows = card.holes().len().div_ceil(3) as u32;
    y += rows * (tile_height + px(15.0)) + px(5.0);
    draw_text_centered(&mut image, width / 2, y, &card.total_label(), INK, total_scale);

    Ok(image)
}

pub fn encode(pixels: &RgbaImage, options: &CaptureOptions) -> Result<Vec<u8>, CaptureError> {
    let (width, height) = pixels.dimensions();
    let mut buffer = Vec::new();
    match options.format {
        ImageFormat::Jpg => {
            // JPEG has no alpha channel.
            let rgb = image::DynamicImage::ImageRgba8(pixels.clone()).into_rgb8();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, options.jpeg_quality())
                .encode(rgb.as_raw(), width, height, image::ColorType::Rgb8)
                .map_err(|err| encode_error(ImageFormat::Jpg, err))?;
        }
        ImageFormat::Png => {
            let mut encoder = png::Encoder::new(&mut buffer, width, height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            encoder
                .write_header()
                .map_err(|err| encode_error(ImageFormat::Png, err))?
                .write_image_data(pixels.as_raw())
                .map_err(|err| encode_error(ImageFormat::Png, err))?;
        }
    }
    Ok(buffer)
}

fn encode_error(format: ImageFormat, err: impl std::fmt::Display) -> CaptureError {
    CaptureError::Encode {
        format,
        reason: err.to_string(),
    }
}

/// Scales the decoded background to cover the region, cropping the overflow
/// evenly on both sides.
fn cover_background(bytes: &[u8], width: u32, height: u32) -> Result<RgbaImage, CaptureError> {
    let decoded = image::load_from_memory(bytes)
        .map_err(|err| CaptureError::Background(err.to_string()))?
        .into_rgba8();
    let (src_w, src_h) = decoded.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(CaptureError::Background("empty image".into()));
    }

    let scale = f32::max(width as f32 / src_w as f32, height as f32 / src_h as f32);
    let scaled_w = ((src_w as f32 * scale).ceil() as u32).max(width);
    let scaled_h = ((src_h as f32 * scale).ceil() as u32).max(height);
    let scaled = imageops::resize(&decoded, scaled_w, scaled_h, FilterType::Triangle);

    let x = (scaled_w - width) / 2;
    let y = (scaled_h - height) / 2;
    Ok(imageops::crop_imm(&scaled, x, y, width, height).to_image())
}

/// Sky fading into a mown fairway.
fn fairway_gradient(width: u32, height: u32) -> RgbaImage {
    let horizon = height * 2 / 5;
    let stripe = (height / 20).max(1);
    RgbaImage::from_fn(width, height, |_, y| {
        if y < horizon {
            let blend = y as f32 / horizon.max(1) as f32;
            Rgba([
                (135.0 + 60.0 * blend) as u8,
                (190.0 + 35.0 * blend) as u8,
                (235.0 + 10.0 * blend) as u8,
                255,
            ])
        } else {
            let shade = if ((y - horizon) / stripe) % 2 == 0 { 0 } else { 14 };
            Rgba([34 + shade, 139 + shade, 34 + shade, 255])
        }
    })
}

fn glyph_scale(font_size: f32, density: f32) -> u32 {
    ((font_size * density * 0.7) / 7.0).round().max(1.0) as u32
}

fn blend(pixel: &mut Rgba<u8>, color: [u8; 3], alpha: f32) {
    for channel in 0..3 {
        let base = pixel[channel] as f32;
        pixel[channel] = (base + (color[channel] as f32 - base) * alpha).round() as u8;
    }
    pixel[3] = 255;
}

/// Fills a rectangle (optionally with rounded corners) blended at `alpha`.
#[allow(clippy::too_many_arguments)]
fn fill_rect(
    image: &mut RgbaImage,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    radius: u32,
    color: [u8; 3],
    alpha: f32,
) {
    let radius = radius.min(w / 2).min(h / 2) as i64;
    let x_end = (x + w).min(image.width());
    let y_end = (y + h).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            if radius > 0 && outside_corner(px - x, py - y, w, h, radius) {
                continue;
            }
            blend(image.get_pixel_mut(px, py), color, alpha);
        }
    }
}

fn outside_corner(dx: u32, dy: u32, w: u32, h: u32, radius: i64) -> bool {
    let (dx, dy, w, h) = (dx as i64, dy as i64, w as i64, h as i64);
    let cx = if dx < radius {
        radius
    } else if dx >= w - radius {
        w - radius - 1
    } else {
        return false;
    };
    let cy = if dy < radius {
        radius
    } else if dy >= h - radius {
        h - radius - 1
    } else {
        return false;
    };
    let (ox, oy) = (dx - cx, dy - cy);
    ox * ox + oy * oy > radius * radius
}

fn text_width(text: &str, scale: u32) -> u32 {
    let advance: u32 = text
        .chars()
        .map(|ch| if glyph(ch).is_some() { 7 } else { 6 })
        .sum();
    advance.saturating_sub(2) * scale
}

fn draw_text_centered(
    image: &mut RgbaImage,
    center_x: u32,
    top: u32,
    text: &str,
    color: [u8; 3],
    scale: u32,
) {
    let left = center_x.saturating_sub(text_width(text, scale) / 2);
    draw_text_line(image, left, top, text, color, scale);
}

fn draw_text_line(
    image: &mut RgbaImage,
    mut x: u32,
    top: u32,
    text: &str,
    color: [u8; 3],
    scale: u32,
) {
    for ch in text.chars() {
        let Some(rows) = glyph(ch) else {
            x = x.saturating_add(6 * scale);
            continue;
        };
        for (row_idx, bits) in rows.iter().enumerate() {
            for col in 0..5u32 {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                let px = x + col * scale;
                let py = top + row_idx as u32 * scale;
                fill_rect(image, px, py, scale, scale, 0, color, 1.0);
            }
        }
        x = x.saturating_add(7 * scale);
    }
}

/// 5x7 bitmap glyphs, one row per byte, high bit leftmost. Lowercase maps to
/// uppercase.
fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0x04, 0x0A, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0E],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x12, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x19, 0x15, 0x13, 0x11, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x0A, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x1B, 0x11],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x0A, 0x04, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x14, 0x04, 0x04, 0x04, 0x1F],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x0E, 0x11, 0x01, 0x0E, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x10, 0x1E, 0x01, 0x11, 0x0E],
        '6' => [0x0E, 0x11, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x04, 0x04, 0x04],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x11, 0x0E],
        '-' => [0x00, 0x00, 0x00, 0x0E, 0x00, 0x00, 0x00],
        '.' => [0x00, 0x00, 0x00, 0x00, 0x00, 0x0E, 0x0E],
        '/' => [0x01, 0x02, 0x02, 0x04, 0x08, 0x10, 0x10],
        ':' => [0x00, 0x06, 0x06, 0x00, 0x06, 0x06, 0x00],
        '!' => [0x04, 0x04, 0x04, 0x04, 0x04, 0x00, 0x04],
        _ => return None,
    };
    Some(rows)
}
