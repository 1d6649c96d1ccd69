use gtk4::cairo::{LineCap, LineJoin};
use thiserror::Error;

use crate::geometry::{Color, SurfacePoint};
use crate::mode::SignatureMode;
use crate::state::{PresenceEvent, PresenceMachine};
use crate::surface::{DrawingContext, SurfaceGeometryManager, SurfaceHost};

pub const DEFAULT_STROKE_WIDTH: f64 = 2.5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    #[error("pointer capture unavailable for pointer {pointer_id}")]
    PointerCaptureUnavailable { pointer_id: u32 },
}

/// Exclusive routing of a pointer's events to the surface.
pub trait PointerCapture {
    fn capture(&self, pointer_id: u32) -> Result<(), CaptureError>;
    fn release(&self, pointer_id: u32) -> Result<(), CaptureError>;
}

/// Hosts without capture support; strokes still work while the pointer stays on the surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPointerCapture;

impl PointerCapture for NoPointerCapture {
    fn capture(&self, _pointer_id: u32) -> Result<(), CaptureError> {
        Ok(())
    }

    fn release(&self, _pointer_id: u32) -> Result<(), CaptureError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub width: f64,
    pub color: Color,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_STROKE_WIDTH,
            color: Color::INK,
        }
    }
}

impl StrokeStyle {
    pub fn set_width(&mut self, width: f64) {
        self.width = if width.is_finite() {
            width.clamp(0.5, 64.0)
        } else {
            DEFAULT_STROKE_WIDTH
        };
    }
}

/// A raw pointer event in the host's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub pointer_id: u32,
    pub position: SurfacePoint,
}

impl PointerEvent {
    pub const fn new(pointer_id: u32, x: f64, y: f64) -> Self {
        Self {
            pointer_id,
            position: SurfacePoint::new(x, y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeSession {
    pub pointer_id: u32,
    pub last_point: SurfacePoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    GeneratedMode,
    SurfaceNotReady,
    AlreadyTracing,
    NotTracing,
    ForeignPointer,
    PaintFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    Started,
    Painted,
    Released,
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Default)]
pub struct StrokeInputController {
    style: StrokeStyle,
    session: Option<StrokeSession>,
}

impl StrokeInputController {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            style,
            session: None,
        }
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn is_tracing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<StrokeSession> {
        self.session
    }

    pub fn pointer_down(
        &mut self,
        event: PointerEvent,
        mode: SignatureMode,
        surface: &mut SurfaceGeometryManager,
        host: &dyn SurfaceHost,
        capture: &dyn PointerCapture,
        presence: &mut PresenceMachine,
    ) -> StrokeOutcome {
        if mode != SignatureMode::Manual {
            return StrokeOutcome::Ignored(IgnoreReason::GeneratedMode);
        }
        if self.session.is_some() {
            return StrokeOutcome::Ignored(IgnoreReason::AlreadyTracing);
        }
        if let Err(err) = surface.ensure_ready(host, presence) {
            tracing::debug!(%err, "pointer down before surface setup");
            return StrokeOutcome::Ignored(IgnoreReason::SurfaceNotReady);
        }

        if let Err(err) = capture.capture(event.pointer_id) {
            tracing::warn!(%err, "continuing stroke without pointer capture");
        }

        let start = event.position.offset_from(host.surface_origin());
        self.session = Some(StrokeSession {
            pointer_id: event.pointer_id,
            last_point: start,
        });
        tracing::debug!(pointer_id = event.pointer_id, x = start.x, y = start.y, "stroke started");
        StrokeOutcome::Started
    }

    pub fn pointer_move(
        &mut self,
        event: PointerEvent,
        surface: &SurfaceGeometryManager,
        host: &dyn SurfaceHost,
        presence: &mut PresenceMachine,
    ) -> StrokeOutcome {
        let Some(session) = self.session else {
            return StrokeOutcome::Ignored(IgnoreReason::NotTracing);
        };
        if session.pointer_id != event.pointer_id {
            return StrokeOutcome::Ignored(IgnoreReason::ForeignPointer);
        }
        let Some(drawing) = surface.drawing() else {
            self.session = None;
            return StrokeOutcome::Ignored(IgnoreReason::SurfaceNotReady);
        };

        let point = event.position.offset_from(host.surface_origin());
        self.session = Some(StrokeSession {
            last_point: point,
            ..session
        });
        if let Err(err) = paint_segment(drawing, session.last_point, point, self.style) {
            tracing::warn!(%err, "failed to paint stroke segment");
            return StrokeOutcome::Ignored(IgnoreReason::PaintFailed);
        }
        if let Err(err) = presence.transition(PresenceEvent::InkStroke) {
            tracing::warn!(%err, "ink painted over a generated signature");
        }
        StrokeOutcome::Painted
    }

    pub fn pointer_up(&mut self, event: PointerEvent, capture: &dyn PointerCapture) -> StrokeOutcome {
        let Some(session) = self.session else {
            return StrokeOutcome::Ignored(IgnoreReason::NotTracing);
        };
        if session.pointer_id != event.pointer_id {
            return StrokeOutcome::Ignored(IgnoreReason::ForeignPointer);
        }
        self.session = None;
        if let Err(err) = capture.release(event.pointer_id) {
            tracing::debug!(%err, "pointer capture already released");
        }
        tracing::debug!(pointer_id = event.pointer_id, "stroke finished");
        StrokeOutcome::Released
    }

    // Painted ink stays on the surface.
    pub fn pointer_cancel(
        &mut self,
        event: PointerEvent,
        capture: &dyn PointerCapture,
    ) -> StrokeOutcome {
        self.pointer_up(event, capture)
    }

    pub fn force_idle(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(pointer_id = session.pointer_id, "stroke abandoned");
        }
    }
}

fn paint_segment(
    drawing: &DrawingContext,
    from: SurfacePoint,
    to: SurfacePoint,
    style: StrokeStyle,
) -> Result<(), gtk4::cairo::Error> {
    let context = drawing.cairo();
    let (red, green, blue) = style.color.to_cairo_rgb();
    context.set_source_rgb(red, green, blue);
    context.set_line_width(style.width);
    context.set_line_cap(LineCap::Round);
    context.set_line_join(LineJoin::Round);
    context.new_path();
    context.move_to(from.x, from.y);
    context.line_to(to.x, to.y);
    context.stroke()
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::state::SignaturePresence;
    use crate::surface::test_support::FakeHost;

    #[derive(Debug, Default)]
    struct RecordingCapture {
        calls: RefCell<Vec<(&'static str, u32)>>,
        fail: bool,
    }

    impl PointerCapture for RecordingCapture {
        fn capture(&self, pointer_id: u32) -> Result<(), CaptureError> {
            self.calls.borrow_mut().push(("capture", pointer_id));
            if self.fail {
                return Err(CaptureError::PointerCaptureUnavailable { pointer_id });
            }
            Ok(())
        }

        fn release(&self, pointer_id: u32) -> Result<(), CaptureError> {
            self.calls.borrow_mut().push(("release", pointer_id));
            if self.fail {
                return Err(CaptureError::PointerCaptureUnavailable { pointer_id });
            }
            Ok(())
        }
    }

    fn ready_surface(host: &FakeHost, presence: &mut PresenceMachine) -> SurfaceGeometryManager {
        let mut surface = SurfaceGeometryManager::default();
        surface.begin_setup();
        let _ = surface.poll_setup(host, presence).expect("setup");
        assert!(surface.is_ready());
        surface
    }

    fn dark_pixels(surface: &SurfaceGeometryManager) -> usize {
        surface
            .drawing()
            .expect("drawing")
            .to_rgba_image()
            .expect("pixels")
            .pixels()
            .filter(|pixel| pixel.0[0] < 128)
            .count()
    }

    #[test]
    fn full_stroke_in_manual_mode_marks_drawn() {
        let host = FakeHost::new(200.0, 100.0, 1.0);
        let mut presence = PresenceMachine::new();
        let mut surface = ready_surface(&host, &mut presence);
        let capture = RecordingCapture::default();
        let mut strokes = StrokeInputController::default();

        let down = strokes.pointer_down(
            PointerEvent::new(7, 20.0, 20.0),
            SignatureMode::Manual,
            &mut surface,
            &host,
            &capture,
            &mut presence,
        );
        assert_eq!(down, StrokeOutcome::Started);
        assert!(strokes.is_tracing());

        let moved = strokes.pointer_move(
            PointerEvent::new(7, 120.0, 60.0),
            &surface,
            &host,
            &mut presence,
        );
        assert_eq!(moved, StrokeOutcome::Painted);
        assert_eq!(
            strokes.pointer_up(PointerEvent::new(7, 120.0, 60.0), &capture),
            StrokeOutcome::Released
        );

        assert_eq!(presence.presence(), SignaturePresence::Drawn);
        assert!(!strokes.is_tracing());
        assert!(dark_pixels(&surface) > 0);
        assert_eq!(
            capture.calls.borrow().as_slice(),
            &[("capture", 7), ("release", 7)]
        );
    }

    #[test]
    fn stroke_in_generated_mode_is_ignored() {
        let host = FakeHost::new(200.0, 100.0, 1.0);
        let mut presence = PresenceMachine::new();
        let mut surface = ready_surface(&host, &mut presence);
        let capture = RecordingCapture::default();
        let mut strokes = StrokeInputController::default();

        let down = strokes.pointer_down(
            PointerEvent::new(1, 20.0, 20.0),
            SignatureMode::Generated,
            &mut surface,
            &host,
            &capture,
            &mut presence,
        );
        let moved = strokes.pointer_move(
            PointerEvent::new(1, 80.0, 40.0),
            &surface,
            &host,
            &mut presence,
        );
        let up = strokes.pointer_up(PointerEvent::new(1, 80.0, 40.0), &capture);

        assert_eq!(down, StrokeOutcome::Ignored(IgnoreReason::GeneratedMode));
        assert_eq!(moved, StrokeOutcome::Ignored(IgnoreReason::NotTracing));
        assert_eq!(up, StrokeOutcome::Ignored(IgnoreReason::NotTracing));
        assert_eq!(presence.presence(), SignaturePresence::Empty);
        assert!(capture.calls.borrow().is_empty());
        assert_eq!(dark_pixels(&surface), 0);
    }

    #[test]
    fn stroke_positions_are_relative_to_surface_origin() {
        let host = FakeHost::new(200.0, 100.0, 1.0);
        host.origin.set(SurfacePoint::new(300.0, 400.0));
        let mut presence = PresenceMachine::new();
        let mut surface = ready_surface(&host, &mut presence);
        let mut strokes = StrokeInputController::default();

        let _ = strokes.pointer_down(
            PointerEvent::new(2, 310.0, 425.0),
            SignatureMode::Manual,
            &mut surface,
            &host,
            &NoPointerCapture,
            &mut presence,
        );
        assert_eq!(
            strokes.session().map(|session| session.last_point),
            Some(SurfacePoint::new(10.0, 25.0))
        );
    }

    #[test]
    fn cancel_keeps_painted_ink_and_releases_capture() {
        let host = FakeHost::new(200.0, 100.0, 2.0);
        let mut presence = PresenceMachine::new();
        let mut surface = ready_surface(&host, &mut presence);
        let capture = RecordingCapture::default();
        let mut strokes = StrokeInputController::default();

        let _ = strokes.pointer_down(
            PointerEvent::new(3, 10.0, 10.0),
            SignatureMode::Manual,
            &mut surface,
            &host,
            &capture,
            &mut presence,
        );
        let _ = strokes.pointer_move(
            PointerEvent::new(3, 150.0, 80.0),
            &surface,
            &host,
            &mut presence,
        );
        let cancelled = strokes.pointer_cancel(PointerEvent::new(3, 150.0, 80.0), &capture);

        assert_eq!(cancelled, StrokeOutcome::Released);
        assert_eq!(presence.presence(), SignaturePresence::Drawn);
        assert!(dark_pixels(&surface) > 0);
        assert_eq!(capture.calls.borrow().last(), Some(&("release", 3)));

        let again = strokes.pointer_cancel(PointerEvent::new(3, 150.0, 80.0), &capture);
        assert_eq!(again, StrokeOutcome::Ignored(IgnoreReason::NotTracing));
    }

    #[test]
    fn failing_capture_degrades_to_uncaptured_stroke() {
        let host = FakeHost::new(120.0, 60.0, 1.0);
        let mut presence = PresenceMachine::new();
        let mut surface = ready_surface(&host, &mut presence);
        let capture = RecordingCapture {
            fail: true,
            ..RecordingCapture::default()
        };
        let mut strokes = StrokeInputController::default();

        let down = strokes.pointer_down(
            PointerEvent::new(4, 10.0, 10.0),
            SignatureMode::Manual,
            &mut surface,
            &host,
            &capture,
            &mut presence,
        );
        let _ = strokes.pointer_move(
            PointerEvent::new(4, 50.0, 30.0),
            &surface,
            &host,
            &mut presence,
        );
        let up = strokes.pointer_up(PointerEvent::new(4, 50.0, 30.0), &capture);

        assert_eq!(down, StrokeOutcome::Started);
        assert_eq!(up, StrokeOutcome::Released);
        assert_eq!(presence.presence(), SignaturePresence::Drawn);
    }

    #[test]
    fn pointer_down_before_setup_measures_or_ignores() {
        let host = FakeHost::hidden();
        let mut presence = PresenceMachine::new();
        let mut surface = SurfaceGeometryManager::default();
        let mut strokes = StrokeInputController::default();

        let down = strokes.pointer_down(
            PointerEvent::new(5, 10.0, 10.0),
            SignatureMode::Manual,
            &mut surface,
            &host,
            &NoPointerCapture,
            &mut presence,
        );
        assert_eq!(down, StrokeOutcome::Ignored(IgnoreReason::SurfaceNotReady));

        host.size.set(crate::geometry::SurfaceSize::new(100.0, 50.0));
        let down = strokes.pointer_down(
            PointerEvent::new(5, 10.0, 10.0),
            SignatureMode::Manual,
            &mut surface,
            &host,
            &NoPointerCapture,
            &mut presence,
        );
        assert_eq!(down, StrokeOutcome::Started);
    }

    #[test]
    fn foreign_pointer_does_not_extend_the_stroke() {
        let host = FakeHost::new(120.0, 60.0, 1.0);
        let mut presence = PresenceMachine::new();
        let mut surface = ready_surface(&host, &mut presence);
        let mut strokes = StrokeInputController::default();

        let _ = strokes.pointer_down(
            PointerEvent::new(1, 10.0, 10.0),
            SignatureMode::Manual,
            &mut surface,
            &host,
            &NoPointerCapture,
            &mut presence,
        );
        let moved = strokes.pointer_move(
            PointerEvent::new(2, 50.0, 30.0),
            &surface,
            &host,
            &mut presence,
        );
        assert_eq!(moved, StrokeOutcome::Ignored(IgnoreReason::ForeignPointer));
        assert_eq!(presence.presence(), SignaturePresence::Empty);

        strokes.force_idle();
        assert!(!strokes.is_tracing());
    }

    #[test]
    fn set_width_clamps_to_usable_range() {
        let mut style = StrokeStyle::default();
        style.set_width(0.0);
        assert_eq!(style.width, 0.5);
        style.set_width(f64::NAN);
        assert_eq!(style.width, DEFAULT_STROKE_WIDTH);
    }
}
