use gtk4::cairo::{Context, Format, ImageSurface, Operator};
use image::RgbaImage;
use std::io::Cursor;

use crate::geometry::{CanvasGeometry, Color};

use super::{SurfaceError, SurfaceResult};

/// The `pixel_ratio` scale is installed once at creation; drawing calls work in CSS pixels.
pub struct DrawingContext {
    geometry: CanvasGeometry,
    surface: ImageSurface,
    context: Context,
}

impl std::fmt::Debug for DrawingContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingContext")
            .field("geometry", &self.geometry)
            .finish_non_exhaustive()
    }
}

impl DrawingContext {
    pub fn create(geometry: CanvasGeometry) -> SurfaceResult<Self> {
        let surface = ImageSurface::create(
            Format::ARgb32,
            geometry.backing_width,
            geometry.backing_height,
        )?;
        let context = Context::new(&surface)?;
        context.scale(geometry.pixel_ratio, geometry.pixel_ratio);
        Ok(Self {
            geometry,
            surface,
            context,
        })
    }

    pub fn geometry(&self) -> CanvasGeometry {
        self.geometry
    }

    pub fn cairo(&self) -> &Context {
        &self.context
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    pub fn fill_background(&self, color: Color) -> SurfaceResult<()> {
        let (red, green, blue) = color.to_cairo_rgb();
        self.context.save()?;
        self.context.new_path();
        self.context.set_operator(Operator::Source);
        self.context.set_source_rgb(red, green, blue);
        self.context.rectangle(
            0.0,
            0.0,
            self.geometry.css_width,
            self.geometry.css_height,
        );
        let filled = self.context.fill();
        self.context.restore()?;
        filled?;
        Ok(())
    }

    pub fn to_rgba_image(&self) -> SurfaceResult<RgbaImage> {
        let width = u32::try_from(self.surface.width()).map_err(|_| SurfaceError::PixelLayout)?;
        let height =
            u32::try_from(self.surface.height()).map_err(|_| SurfaceError::PixelLayout)?;
        let stride = usize::try_from(self.surface.stride()).map_err(|_| SurfaceError::PixelLayout)?;

        let mut converted = None;
        self.surface.with_data(|data| {
            converted = argb32_to_rgba_image(data, width, height, stride);
        })?;
        converted.ok_or(SurfaceError::PixelLayout)
    }

    pub fn encode_png(&self) -> SurfaceResult<Vec<u8>> {
        let image = self.to_rgba_image()?;
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}

/// Converts cairo's native-endian premultiplied ARGB32 rows into straight RGBA.
pub(crate) fn argb32_to_rgba_image(
    data: &[u8],
    width: u32,
    height: u32,
    stride: usize,
) -> Option<RgbaImage> {
    let row_len = usize::try_from(width).ok()?.checked_mul(4)?;
    let rows = usize::try_from(height).ok()?;
    if stride < row_len {
        return None;
    }
    let mut rgba = Vec::with_capacity(row_len.checked_mul(rows)?);

    for row in 0..rows {
        let offset = row.checked_mul(stride)?;
        let end = offset.checked_add(row_len)?;
        let src_row = data.get(offset..end)?;
        for pixel in src_row.chunks_exact(4) {
            let argb = u32::from_ne_bytes([pixel[0], pixel[1], pixel[2], pixel[3]]);
            let alpha = (argb >> 24) as u8;
            let red = (argb >> 16) as u8;
            let green = (argb >> 8) as u8;
            let blue = argb as u8;
            rgba.extend_from_slice(&[
                unpremultiply(red, alpha),
                unpremultiply(green, alpha),
                unpremultiply(blue, alpha),
                alpha,
            ]);
        }
    }

    RgbaImage::from_raw(width, height, rgba)
}

fn unpremultiply(channel: u8, alpha: u8) -> u8 {
    match alpha {
        0 => 0,
        255 => channel,
        _ => {
            let alpha = u32::from(alpha);
            let value = (u32::from(channel) * 255 + alpha / 2) / alpha;
            value.min(255) as u8
        }
    }
}
