#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfacePoint {
    pub x: f64,
    pub y: f64,
}

impl SurfacePoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: SurfacePoint) -> Self {
        Self::new(self.x - origin.x, self.y - origin.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
}

impl SurfaceSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_laid_out(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Resolution of the drawing surface for one visible period of the dialog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    pub css_width: f64,
    pub css_height: f64,
    pub pixel_ratio: f64,
    pub backing_width: i32,
    pub backing_height: i32,
}

impl CanvasGeometry {
    /// Returns `None` until the container has a positive visible size.
    pub fn measure(size: SurfaceSize, pixel_ratio: f64) -> Option<Self> {
        if !size.is_laid_out() {
            return None;
        }
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
            pixel_ratio
        } else {
            1.0
        };
        let backing_width = backing_dimension(size.width, pixel_ratio)?;
        let backing_height = backing_dimension(size.height, pixel_ratio)?;
        Some(Self {
            css_width: size.width,
            css_height: size.height,
            pixel_ratio,
            backing_width,
            backing_height,
        })
    }
}

fn backing_dimension(css: f64, pixel_ratio: f64) -> Option<i32> {
    let scaled = (css * pixel_ratio).floor();
    if !scaled.is_finite() || scaled < 1.0 || scaled > f64::from(i32::MAX) {
        return None;
    }
    Some(scaled as i32)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const INK: Color = Color::new(0x11, 0x11, 0x11);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_cairo_rgb(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(red, green, blue))
    }
}
