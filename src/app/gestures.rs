use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::GestureDrag;

use crate::session::SignatureSession;
use crate::stroke::{PointerEvent, StrokeOutcome};

use super::host::{GestureCapture, GtkSurfaceHost};

#[derive(Clone)]
pub(super) struct SurfaceGestureContext {
    pub(super) session: Rc<RefCell<SignatureSession>>,
    pub(super) host: GtkSurfaceHost,
}

/// Mouse buttons and touch sequences both arrive through one drag gesture;
/// touch reports button 0.
fn pointer_id(gesture: &GestureDrag) -> u32 {
    gesture.current_button()
}

fn pointer_event(context: &SurfaceGestureContext, pointer_id: u32, x: f64, y: f64) -> PointerEvent {
    let point = context.host.root_point(x, y);
    PointerEvent {
        pointer_id,
        position: point,
    }
}

pub(super) fn connect_surface_draw_gesture(context: SurfaceGestureContext) {
    let gesture = GestureDrag::new();
    gesture.set_button(0);
    let start = Rc::new(Cell::new((0.0_f64, 0.0_f64)));
    let active_pointer = Rc::new(Cell::new(None::<u32>));

    let begin_context = context.clone();
    let begin_start = start.clone();
    let begin_pointer = active_pointer.clone();
    gesture.connect_drag_begin(move |gesture, start_x, start_y| {
        let id = pointer_id(gesture);
        begin_start.set((start_x, start_y));
        let event = pointer_event(&begin_context, id, start_x, start_y);
        let capture = GestureCapture { gesture };
        let outcome = begin_context
            .session
            .borrow_mut()
            .pointer_down(event, &begin_context.host, &capture);
        match outcome {
            StrokeOutcome::Started => begin_pointer.set(Some(id)),
            StrokeOutcome::Ignored(reason) => {
                tracing::debug!(?reason, pointer_id = id, "pointer down ignored");
                gesture.set_state(gtk4::EventSequenceState::Denied);
            }
            StrokeOutcome::Painted | StrokeOutcome::Released => {}
        }
    });

    let update_context = context.clone();
    let update_start = start.clone();
    let update_pointer = active_pointer.clone();
    gesture.connect_drag_update(move |_, offset_x, offset_y| {
        let Some(id) = update_pointer.get() else {
            return;
        };
        let (start_x, start_y) = update_start.get();
        let event = pointer_event(&update_context, id, start_x + offset_x, start_y + offset_y);
        let outcome = update_context
            .session
            .borrow_mut()
            .pointer_move(event, &update_context.host);
        if outcome == StrokeOutcome::Painted {
            update_context.host.area.queue_draw();
        }
    });

    let end_context = context.clone();
    let end_start = start.clone();
    let end_pointer = active_pointer.clone();
    gesture.connect_drag_end(move |gesture, offset_x, offset_y| {
        let Some(id) = end_pointer.take() else {
            return;
        };
        let (start_x, start_y) = end_start.get();
        let event = pointer_event(&end_context, id, start_x + offset_x, start_y + offset_y);
        let capture = GestureCapture { gesture };
        let _ = end_context.session.borrow_mut().pointer_up(event, &capture);
    });

    let cancel_context = context.clone();
    let cancel_pointer = active_pointer;
    gesture.connect_cancel(move |gesture, _sequence| {
        let Some(id) = cancel_pointer.take() else {
            return;
        };
        let (start_x, start_y) = start.get();
        let event = pointer_event(&cancel_context, id, start_x, start_y);
        let capture = GestureCapture { gesture };
        let _ = cancel_context
            .session
            .borrow_mut()
            .pointer_cancel(event, &capture);
        tracing::debug!(pointer_id = id, "stroke cancelled by the system");
    });

    context.host.area.add_controller(gesture);
}
