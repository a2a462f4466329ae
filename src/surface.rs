//! Pixel surface backing the live preview and the image export.
//!
//! A [`Surface`] is a fixed square canvas (reference resolution
//! 1000×1000) that the renderer mutates in place. Export is a pure read
//! of the current pixels, either as PNG bytes or as a base64 data URL.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tiny_skia::{Color, Pixmap};

use crate::error::{Error, Result};
use crate::CanvasSize;

/// Parse a `#rrggbb` or `#rrggbbaa` hex color.
pub fn parse_color(hex: &str) -> Result<Color> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.is_ascii() {
        return Err(Error::Config(format!("invalid hex color: {}", hex)));
    }
    let channel = |range: std::ops::Range<usize>| -> Result<u8> {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| Error::Config(format!("invalid hex color: {}", hex)))
    };
    match digits.len() {
        6 => Ok(Color::from_rgba8(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            255,
        )),
        8 => Ok(Color::from_rgba8(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => Err(Error::Config(format!("invalid hex color: {}", hex))),
    }
}

/// Download-style file name embedding a generation timestamp (unix
/// milliseconds) so repeated exports do not collide.
pub fn export_file_name(stamp: u128) -> String {
    format!("lightcloud-{}.png", stamp)
}

/// The mutable pixel canvas a render pass draws onto.
pub struct Surface {
    pixmap: Pixmap,
}

impl Surface {
    pub fn new(size: CanvasSize) -> Result<Self> {
        let pixmap = Pixmap::new(size.width, size.height).ok_or_else(|| {
            Error::Config(format!(
                "invalid canvas size {}x{}",
                size.width, size.height
            ))
        })?;
        Ok(Self { pixmap })
    }

    pub fn size(&self) -> CanvasSize {
        CanvasSize {
            width: self.pixmap.width(),
            height: self.pixmap.height(),
        }
    }

    /// Reset every pixel to fully transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(Color::TRANSPARENT);
    }

    /// Flood-fill with a hex color.
    pub fn fill(&mut self, hex: &str) -> Result<()> {
        self.pixmap.fill(parse_color(hex)?);
        Ok(())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Raw mutable access for backends drawing onto the surface.
    pub fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Encode the current pixels as PNG bytes.
    pub fn export_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| Error::Export(format!("PNG encoding failed: {}", e)))
    }

    /// Encode the current pixels as a `data:image/png;base64,` URL.
    pub fn to_data_url(&self) -> Result<String> {
        let png = self.export_png()?;
        Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_surface_is_transparent() {
        let s = Surface::new(CanvasSize {
            width: 16,
            height: 16,
        })
        .unwrap();
        let px = s.pixmap().pixel(8, 8).unwrap();
        assert_eq!(px.alpha(), 0);
    }

    #[test]
    fn fill_sets_every_pixel() {
        let mut s = Surface::new(CanvasSize {
            width: 8,
            height: 8,
        })
        .unwrap();
        s.fill("#ff0000").unwrap();
        let px = s.pixmap().pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (255, 0, 0, 255));
        s.clear();
        assert_eq!(s.pixmap().pixel(0, 0).unwrap().alpha(), 0);
    }

    #[test]
    fn parse_color_accepts_rgb_and_rgba() {
        assert!(parse_color("#3b82f6").is_ok());
        assert!(parse_color("#3b82f680").is_ok());
        assert!(parse_color("#fff").is_err());
        assert!(parse_color("blue").is_err());
        assert!(parse_color("#zzzzzz").is_err());
    }

    #[test]
    fn export_png_emits_png_magic() {
        let mut s = Surface::new(CanvasSize {
            width: 4,
            height: 4,
        })
        .unwrap();
        s.fill("#ffffff").unwrap();
        let png = s.export_png().unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn data_url_has_png_prefix() {
        let s = Surface::new(CanvasSize {
            width: 4,
            height: 4,
        })
        .unwrap();
        assert!(s.to_data_url().unwrap().starts_with("data:image/png;base64,"));
    }

    #[test]
    fn export_file_name_embeds_stamp() {
        assert_eq!(export_file_name(1700000000000), "lightcloud-1700000000000.png");
    }
}
