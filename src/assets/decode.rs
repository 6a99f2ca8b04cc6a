use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::foundation::error::StoryreelResult;

/// A decoded page still, premultiplied RGBA8, already resized to the output
/// canvas. Row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct PageImage {
    /// Canvas width in pixels.
    pub width: u32,
    /// Canvas height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 pixel data, `width * height * 4` bytes.
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Decode an image file and fit it to the `width` x `height` output canvas.
///
/// Source stills rarely match the output resolution exactly; the warp and
/// slide math all assume canvas-sized inputs, so the resize happens once
/// here rather than per frame.
pub fn load_page_image(path: &Path, width: u32, height: u32) -> StoryreelResult<PageImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    let decoded = image::load_from_memory(&bytes)
        .with_context(|| format!("decode image '{}'", path.display()))?;
    let rgba = decoded.to_rgba8();
    let rgba = if rgba.dimensions() == (width, height) {
        rgba
    } else {
        image::imageops::resize(&rgba, width, height, image::imageops::FilterType::Triangle)
    };

    let mut data = rgba.into_raw();
    premultiply_rgba8_in_place(&mut data);

    Ok(PageImage {
        width,
        height,
        rgba8_premul: Arc::new(data),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premultiply_scales_color_by_alpha() {
        let mut px = vec![255u8, 128, 0, 128, 10, 10, 10, 0];
        premultiply_rgba8_in_place(&mut px);
        assert_eq!(&px[..4], &[128, 64, 0, 128]);
        assert_eq!(&px[4..], &[0, 0, 0, 0]);
    }

    #[test]
    fn load_resizes_to_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p1.png");
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([200, 100, 50, 255]));
        img.save(&path).unwrap();

        let page = load_page_image(&path, 8, 6).unwrap();
        assert_eq!((page.width, page.height), (8, 6));
        assert_eq!(page.rgba8_premul.len(), 8 * 6 * 4);
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(load_page_image(Path::new("/nonexistent/p1.png"), 8, 8).is_err());
    }
}
