use std::{path::Path, sync::Arc};

use anyhow::Context as _;

use crate::{
    encode::ffmpeg::ensure_parent_dir,
    foundation::{
        core::{Canvas, Rgba8},
        error::{ReelError, ReelResult},
    },
};

/// One rendered frame of RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Composite every pixel over `background` into `dst`, leaving it fully opaque.
    pub fn flatten_into(&self, dst: &mut [u8], background: Rgba8) -> ReelResult<()> {
        let expected = self.width as usize * self.height as usize * 4;
        if self.data.len() != expected || dst.len() != expected {
            return Err(ReelError::render(format!(
                "{}x{} frame needs {expected} bytes, got {} in and {} out",
                self.width,
                self.height,
                self.data.len(),
                dst.len()
            )));
        }
        let bg = [background.r, background.g, background.b];
        for (out, px) in dst.chunks_exact_mut(4).zip(self.data.chunks_exact(4)) {
            let alpha = px[3];
            for c in 0..3 {
                let src = if self.premultiplied {
                    u16::from(px[c])
                } else {
                    scale(px[c], alpha)
                };
                out[c] = (src + scale(bg[c], 255 - alpha)).min(255) as u8;
            }
            out[3] = 255;
        }
        Ok(())
    }

    pub fn to_opaque(&self, background: Rgba8) -> ReelResult<Vec<u8>> {
        let mut out = vec![0u8; self.data.len()];
        self.flatten_into(&mut out, background)?;
        Ok(out)
    }
}

/// `value * factor / 255`, rounded.
fn scale(value: u8, factor: u8) -> u16 {
    ((u32::from(value) * u32::from(factor) + 127) / 255) as u16
}

/// Turns per-frame SVG documents into pixels with `usvg` + `resvg`.
pub struct SvgRasterizer {
    options: usvg::Options<'static>,
}

impl SvgRasterizer {
    /// Rasterizer backed by the system fonts plus any font files found in `font_dir`.
    pub fn new(font_dir: Option<&Path>) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = font_dir {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.faces().count(), "font database ready");

        let options = usvg::Options {
            fontdb: Arc::new(db),
            ..Default::default()
        };
        Self { options }
    }

    #[tracing::instrument(skip(self, svg))]
    pub fn rasterize(&self, svg: &str, canvas: Canvas) -> ReelResult<FrameRGBA> {
        let tree = usvg::Tree::from_str(svg, &self.options)
            .map_err(|e| ReelError::render(format!("parse frame svg: {e}")))?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height)
            .ok_or_else(|| {
                ReelError::render(format!(
                    "cannot allocate {}x{} pixmap",
                    canvas.width, canvas.height
                ))
            })?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.take(),
            premultiplied: true,
        })
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        let _ = db.load_font_file(&path);
    }
}

/// Write `frame` as an opaque PNG composited over `background`.
pub fn write_png(frame: &FrameRGBA, background: Rgba8, out: &Path) -> ReelResult<()> {
    ensure_parent_dir(out)?;
    let opaque = frame.to_opaque(background)?;
    image::save_buffer_with_format(
        out,
        &opaque,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
