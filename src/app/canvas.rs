use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::DrawingArea;

use crate::session::SignatureSession;

/// Paints the backing surface at `1 / pixel_ratio` so it maps 1:1 to device pixels.
pub(super) fn configure_surface_draw(area: &DrawingArea, session: Rc<RefCell<SignatureSession>>) {
    area.set_draw_func(move |_, context, width, height| {
        if width <= 0 || height <= 0 {
            return;
        }
        context.set_source_rgb(1.0, 1.0, 1.0);
        context.paint().ok();

        let Ok(session) = session.try_borrow() else {
            return;
        };
        let Some(drawing) = session.surface().drawing() else {
            return;
        };
        let ratio = drawing.geometry().pixel_ratio;
        context.save().ok();
        context.scale(1.0 / ratio, 1.0 / ratio);
        if let Err(err) = context.set_source_surface(drawing.surface(), 0.0, 0.0) {
            tracing::warn!(%err, "failed to attach signature surface");
        } else {
            context.paint().ok();
        }
        context.restore().ok();
    });
}
