use gtk4::cairo::{Context, FontSlant, FontWeight, Matrix};

use crate::geometry::Color;
use crate::state::{PresenceEvent, PresenceMachine};
use crate::surface::{SurfaceError, SurfaceGeometryManager, SurfaceHost, SurfaceResult};

pub const DEFAULT_FONT_FAMILY: &str = "cursive";
pub const DEFAULT_BASE_FONT_SIZE: f64 = 52.0;
pub const DEFAULT_MIN_FONT_SIZE: f64 = 16.0;
pub const DEFAULT_FONT_SIZE_STEP: f64 = 2.0;
pub const DEFAULT_TEXT_MARGIN: f64 = 40.0;
pub const DEFAULT_SHEAR: f64 = -0.18;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontFit {
    pub base_size: f64,
    pub min_size: f64,
    pub step: f64,
}

impl Default for FontFit {
    fn default() -> Self {
        Self {
            base_size: DEFAULT_BASE_FONT_SIZE,
            min_size: DEFAULT_MIN_FONT_SIZE,
            step: DEFAULT_FONT_SIZE_STEP,
        }
    }
}

impl FontFit {
    /// Largest size, starting at `base_size` and shrinking by `step`, whose
    /// measured width fits `max_width`. Stops at `min_size` even if the text
    /// still overflows there.
    pub fn fit(&self, max_width: f64, mut measure: impl FnMut(f64) -> f64) -> f64 {
        let min_size = self.min_size.max(1.0);
        let step = if self.step > 0.0 { self.step } else { 1.0 };
        let mut size = self.base_size.max(min_size);
        loop {
            if size <= min_size || measure(size) <= max_width {
                return size;
            }
            size = (size - step).max(min_size);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextSignatureOptions {
    pub family: String,
    pub color: Color,
    pub fit: FontFit,
    pub margin: f64,
    /// `xy` term of the slant matrix.
    pub shear: f64,
}

impl Default for TextSignatureOptions {
    fn default() -> Self {
        Self {
            family: DEFAULT_FONT_FAMILY.to_string(),
            color: Color::INK,
            fit: FontFit::default(),
            margin: DEFAULT_TEXT_MARGIN,
            shear: DEFAULT_SHEAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedSignature {
    pub font_size: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TextSignatureRenderer {
    options: TextSignatureOptions,
}

impl TextSignatureRenderer {
    pub fn new(options: TextSignatureOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TextSignatureOptions {
        &self.options
    }

    /// Returns `Ok(None)` and leaves the surface blank when the trimmed name is empty.
    pub fn render(
        &self,
        name: &str,
        surface: &mut SurfaceGeometryManager,
        host: &dyn SurfaceHost,
        presence: &mut PresenceMachine,
    ) -> SurfaceResult<Option<RenderedSignature>> {
        surface.clear(host, presence)?;
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }

        let drawing = surface.drawing().ok_or(SurfaceError::NotReady)?;
        let geometry = drawing.geometry();
        let context = drawing.cairo();

        context.save()?;
        let drawn = self.draw_name(context, name, geometry.css_width, geometry.css_height);
        context.restore()?;
        let font_size = drawn?;

        presence.transition(PresenceEvent::TextRendered)?;
        tracing::debug!(font_size, chars = name.chars().count(), "generated signature rendered");
        Ok(Some(RenderedSignature { font_size }))
    }

    fn draw_name(
        &self,
        context: &Context,
        name: &str,
        width: f64,
        height: f64,
    ) -> SurfaceResult<f64> {
        context.select_font_face(&self.options.family, FontSlant::Italic, FontWeight::Normal);
        let font_size = self
            .options
            .fit
            .fit(width - self.options.margin, |size| {
                context.set_font_size(size);
                measure_text_advance(context, name)
            });
        context.set_font_size(font_size);

        let (red, green, blue) = self.options.color.to_cairo_rgb();
        context.set_source_rgb(red, green, blue);

        let extents = context.text_extents(name)?;
        let center_x = width / 2.0;
        let center_y = height / 2.0;
        let shear = self.options.shear;
        context.transform(Matrix::new(1.0, 0.0, shear, 1.0, 0.0, 0.0));
        // Sheared space maps x to x + shear * y; shift so the center stays put.
        let origin_x = center_x - shear * center_y - (extents.x_bearing() + extents.width() / 2.0);
        let origin_y = center_y - (extents.y_bearing() + extents.height() / 2.0);
        context.new_path();
        context.move_to(origin_x, origin_y);
        context.show_text(name)?;
        Ok(font_size)
    }
}

fn measure_text_advance(context: &Context, text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    context
        .text_extents(text)
        .map(|extents| extents.x_advance())
        .unwrap_or_else(|_| {
            let fallback = context
                .font_extents()
                .map(|extents| extents.max_x_advance().max(1.0) * 0.62)
                .unwrap_or(6.0);
            text.chars().count() as f64 * fallback
        })
}
