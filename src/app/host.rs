use gtk4::prelude::*;
use gtk4::{graphene, Button, DrawingArea, Entry, EventSequenceState, GestureDrag, Label};

use crate::geometry::{SurfacePoint, SurfaceSize};
use crate::session::SignatureFields;
use crate::stroke::{CaptureError, PointerCapture};
use crate::surface::SurfaceHost;

// Pointer positions are in window-root coordinates, so the origin is the area's position in the root.
#[derive(Clone)]
pub(super) struct GtkSurfaceHost {
    pub(super) area: DrawingArea,
}

impl GtkSurfaceHost {
    pub(super) fn root_point(&self, x: f64, y: f64) -> SurfacePoint {
        let point = graphene::Point::new(x as f32, y as f32);
        match self.area.root() {
            Some(root) => self
                .area
                .compute_point(&root, &point)
                .map(|p| SurfacePoint::new(f64::from(p.x()), f64::from(p.y())))
                .unwrap_or_else(|| SurfacePoint::new(x, y)),
            None => SurfacePoint::new(x, y),
        }
    }
}

impl SurfaceHost for GtkSurfaceHost {
    fn visible_size(&self) -> SurfaceSize {
        if !self.area.is_mapped() {
            return SurfaceSize::new(0.0, 0.0);
        }
        SurfaceSize::new(f64::from(self.area.width()), f64::from(self.area.height()))
    }

    fn pixel_ratio(&self) -> f64 {
        f64::from(self.area.scale_factor())
    }

    fn surface_origin(&self) -> SurfacePoint {
        self.root_point(0.0, 0.0)
    }
}

/// Claiming the drag sequence keeps motion routed to the surface when the
/// pointer leaves it mid-stroke.
pub(super) struct GestureCapture<'a> {
    pub(super) gesture: &'a GestureDrag,
}

impl PointerCapture for GestureCapture<'_> {
    fn capture(&self, pointer_id: u32) -> Result<(), CaptureError> {
        if self.gesture.set_state(EventSequenceState::Claimed) {
            Ok(())
        } else {
            Err(CaptureError::PointerCaptureUnavailable { pointer_id })
        }
    }

    fn release(&self, _pointer_id: u32) -> Result<(), CaptureError> {
        Ok(())
    }
}

#[derive(Clone)]
pub(super) struct GtkSignatureFields {
    pub(super) name_entry: Entry,
    pub(super) hint_label: Label,
    pub(super) message_label: Label,
    pub(super) generate_button: Button,
}

impl SignatureFields for GtkSignatureFields {
    fn signer_name(&self) -> String {
        self.name_entry.text().to_string()
    }

    fn focus_signer_name(&self) {
        self.name_entry.grab_focus();
    }

    fn set_hint(&self, hint: &str) {
        self.hint_label.set_text(hint);
    }

    fn set_generate_visible(&self, visible: bool) {
        self.generate_button.set_visible(visible);
    }

    fn set_transmission_value(&self, value: Option<&str>) {
        match value {
            Some(value) => tracing::debug!(bytes = value.len(), "transmission field filled"),
            None => tracing::debug!("transmission field cleared"),
        }
    }

    fn show_message(&self, message: Option<&str>) {
        self.message_label.set_text(message.unwrap_or_default());
        self.message_label.set_visible(message.is_some());
    }
}
