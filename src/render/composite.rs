use kurbo::{Affine, Point};

use crate::assets::decode::PageImage;

/// One premultiplied RGBA8 pixel (r, g, b already multiplied by a).
pub type PremulRgba8 = [u8; 4];

/// Source-over blend of premultiplied pixels, with an extra opacity applied
/// to the source.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - sa;
    let mut out = [0u8; 4];
    out[3] = add_sat(sa, mul_div255(u16::from(dst[3]), inv));
    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat(sc, dc);
    }
    out
}

/// Bilinear sample of a premultiplied image at continuous coordinates;
/// everything outside the image is transparent black.
pub fn sample_bilinear(img: &PageImage, x: f64, y: f64) -> PremulRgba8 {
    let x0 = x.floor() as i64;
    let y0 = y.floor() as i64;
    let fx = (x - x0 as f64) as f32;
    let fy = (y - y0 as f64) as f32;

    let p00 = fetch(img, x0, y0);
    let p10 = fetch(img, x0 + 1, y0);
    let p01 = fetch(img, x0, y0 + 1);
    let p11 = fetch(img, x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f32::from(p00[c]) + (f32::from(p10[c]) - f32::from(p00[c])) * fx;
        let bot = f32::from(p01[c]) + (f32::from(p11[c]) - f32::from(p01[c])) * fx;
        out[c] = (top + (bot - top) * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Warp `img` through `dest_to_src` onto an RGBA8 canvas, blending with
/// source-over at the given opacity. Canvas size is preserved; dest pixels
/// mapping outside the image stay untouched.
pub fn warp_over(
    canvas: &mut [u8],
    canvas_width: u32,
    canvas_height: u32,
    img: &PageImage,
    dest_to_src: Affine,
    opacity: f32,
) {
    debug_assert_eq!(
        canvas.len(),
        canvas_width as usize * canvas_height as usize * 4
    );
    if opacity <= 0.0 {
        return;
    }

    for y in 0..canvas_height {
        for x in 0..canvas_width {
            let src = dest_to_src * Point::new(f64::from(x), f64::from(y));
            let px = sample_bilinear(img, src.x, src.y);
            if px[3] == 0 {
                continue;
            }
            let idx = (y as usize * canvas_width as usize + x as usize) * 4;
            let dst = [canvas[idx], canvas[idx + 1], canvas[idx + 2], canvas[idx + 3]];
            let blended = over(dst, px, opacity);
            canvas[idx..idx + 4].copy_from_slice(&blended);
        }
    }
}

fn fetch(img: &PageImage, x: i64, y: i64) -> PremulRgba8 {
    if x < 0 || y < 0 || x >= i64::from(img.width) || y >= i64::from(img.height) {
        return [0, 0, 0, 0];
    }
    let idx = (y as usize * img.width as usize + x as usize) * 4;
    let data = &img.rgba8_premul;
    [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]]
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

fn add_sat(a: u16, b: u16) -> u8 {
    a.saturating_add(b).min(255) as u8
}
