//! Still images of a rendered frame.
//!
//! A frame can be written as SVG, which keeps text as text, or rasterized
//! and encoded as PNG or JPEG through the `image` crate.

mod glyphs;
mod raster;
mod svg;

pub use raster::rasterize;
pub use svg::render_svg;

use std::io::Cursor;

use image::DynamicImage;

use crate::geom::SurfaceSize;
use crate::render::RenderList;

/// Image encodings a frame can be exported to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Scalable vector graphics.
    Svg,
    /// Lossless raster.
    Png,
    /// Lossy raster without transparency.
    Jpeg,
}

impl ImageFormat {
    /// Guess the format from a file extension.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "svg" => Some(Self::Svg),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Canonical file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

/// Encode a frame of the given size.
pub fn encode_frame(
    frame: &RenderList,
    size: SurfaceSize,
    format: ImageFormat,
) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Cursor::new(Vec::new());
    match format {
        ImageFormat::Svg => return Ok(render_svg(frame, size).into_bytes()),
        ImageFormat::Png => rasterize(frame, size).write_to(&mut bytes, image::ImageFormat::Png)?,
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(rasterize(frame, size))
            .to_rgb8()
            .write_to(&mut bytes, image::ImageFormat::Jpeg)?,
    }
    Ok(bytes.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::ScreenPoint;
    use crate::render::{Color, RectStyle, RenderCommand};

    fn frame() -> RenderList {
        let mut frame = RenderList::new();
        frame.push(RenderCommand::Clear);
        frame.push(RenderCommand::Rect {
            rect: SurfaceSize::new(32.0, 16.0).rect(),
            style: RectStyle::filled(Color::from_rgb8(0x20, 0x40, 0x60)),
        });
        frame.push(RenderCommand::Text {
            position: ScreenPoint::new(2.0, 12.0),
            text: "ok".to_string(),
            style: crate::render::TextStyle::new(Color::WHITE, 10.0),
        });
        frame
    }

    #[test]
    fn formats_follow_extensions() {
        assert_eq!(ImageFormat::from_extension("PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_extension("jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_extension("gif"), None);
        assert_eq!(ImageFormat::Jpeg.extension(), "jpg");
    }

    #[test]
    fn png_decodes_back_to_the_frame() {
        let bytes = encode_frame(&frame(), SurfaceSize::new(32.0, 16.0), ImageFormat::Png)
            .expect("png encodes");
        assert!(bytes.starts_with(b"\x89PNG"));
        let decoded = image::load_from_memory(&bytes).expect("png decodes").to_rgba8();
        assert_eq!(decoded.dimensions(), (32, 16));
        assert_eq!(decoded.get_pixel(30, 1).0, [0x20, 0x40, 0x60, 0xff]);
    }

    #[test]
    fn jpeg_has_jpeg_header() {
        let bytes = encode_frame(&frame(), SurfaceSize::new(32.0, 16.0), ImageFormat::Jpeg)
            .expect("jpeg encodes");
        assert!(bytes.starts_with(&[0xFF, 0xD8]));
    }

    #[test]
    fn svg_is_utf8_markup() {
        let bytes = encode_frame(&frame(), SurfaceSize::new(32.0, 16.0), ImageFormat::Svg)
            .expect("svg");
        let text = String::from_utf8(bytes).expect("utf-8");
        assert!(text.contains(">ok</text>"));
    }
}
