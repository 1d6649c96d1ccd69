mod context;

pub use context::DrawingContext;

use crate::geometry::{CanvasGeometry, Color, SurfacePoint, SurfaceSize};
use crate::state::{PresenceEvent, PresenceMachine, StateError};
use thiserror::Error;

pub const DEFAULT_MAX_SETUP_RETRIES: u32 = 10;

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface never reached a positive size after {attempts} attempts")]
    GeometryUnavailable { attempts: u32 },
    #[error("drawing surface is not ready")]
    NotReady,
    #[error("unexpected surface pixel layout")]
    PixelLayout,
    #[error("cairo error: {0}")]
    Cairo(#[from] gtk4::cairo::Error),
    #[error("surface data unavailable: {0}")]
    Borrow(#[from] gtk4::cairo::BorrowError),
    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error(transparent)]
    State(#[from] StateError),
}

/// The widget hosting the drawing surface, as seen by the capture engine.
pub trait SurfaceHost {
    fn visible_size(&self) -> SurfaceSize;
    fn pixel_ratio(&self) -> f64;
    /// On-screen offset of the surface, in the coordinate space of pointer events.
    fn surface_origin(&self) -> SurfacePoint;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SetupStatus {
    Ready(CanvasGeometry),
    /// The container is not laid out yet; poll again on the next frame.
    Pending { attempt: u32 },
    /// Retry budget spent; drawing stays disabled until the next setup.
    Exhausted { attempts: u32 },
}

impl SetupStatus {
    pub const fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending { .. })
    }
}

#[derive(Debug)]
pub struct SurfaceGeometryManager {
    max_retries: u32,
    attempts: u32,
    background: Color,
    drawing: Option<DrawingContext>,
}

impl Default for SurfaceGeometryManager {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SETUP_RETRIES)
    }
}

impl SurfaceGeometryManager {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            attempts: 0,
            background: Color::WHITE,
            drawing: None,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_ready(&self) -> bool {
        self.drawing.is_some()
    }

    pub fn drawing(&self) -> Option<&DrawingContext> {
        self.drawing.as_ref()
    }

    pub fn geometry(&self) -> Option<CanvasGeometry> {
        self.drawing.as_ref().map(DrawingContext::geometry)
    }

    pub fn begin_setup(&mut self) {
        self.attempts = 0;
        self.drawing = None;
    }

    /// One initial attempt plus `max_retries` retries, then [`SetupStatus::Exhausted`].
    pub fn poll_setup(
        &mut self,
        host: &dyn SurfaceHost,
        presence: &mut PresenceMachine,
    ) -> SurfaceResult<SetupStatus> {
        if let Some(geometry) = self.geometry() {
            return Ok(SetupStatus::Ready(geometry));
        }
        if self.attempts > self.max_retries {
            return Ok(SetupStatus::Exhausted {
                attempts: self.attempts,
            });
        }

        self.attempts = self.attempts.saturating_add(1);
        if let Some(geometry) = self.try_install(host, presence)? {
            self.attempts = 0;
            return Ok(SetupStatus::Ready(geometry));
        }

        if self.attempts > self.max_retries {
            let err = SurfaceError::GeometryUnavailable {
                attempts: self.attempts,
            };
            tracing::warn!(attempts = self.attempts, %err, "giving up on surface setup");
            return Ok(SetupStatus::Exhausted {
                attempts: self.attempts,
            });
        }

        tracing::debug!(attempt = self.attempts, "surface not laid out yet; retrying next frame");
        Ok(SetupStatus::Pending {
            attempt: self.attempts,
        })
    }

    pub fn clear(
        &mut self,
        host: &dyn SurfaceHost,
        presence: &mut PresenceMachine,
    ) -> SurfaceResult<()> {
        if self.drawing.is_none() {
            return match self.try_install(host, presence)? {
                Some(_) => Ok(()),
                None => Err(SurfaceError::NotReady),
            };
        }

        if let Some(drawing) = self.drawing.as_ref() {
            drawing.fill_background(self.background)?;
        }
        presence.transition(PresenceEvent::Cleared)?;
        Ok(())
    }

    pub fn ensure_ready(
        &mut self,
        host: &dyn SurfaceHost,
        presence: &mut PresenceMachine,
    ) -> SurfaceResult<&DrawingContext> {
        if self.drawing.is_none() && self.try_install(host, presence)?.is_none() {
            return Err(SurfaceError::NotReady);
        }
        self.drawing.as_ref().ok_or(SurfaceError::NotReady)
    }

    pub fn encode_png(&self) -> SurfaceResult<Vec<u8>> {
        self.drawing
            .as_ref()
            .ok_or(SurfaceError::NotReady)?
            .encode_png()
    }

    fn try_install(
        &mut self,
        host: &dyn SurfaceHost,
        presence: &mut PresenceMachine,
    ) -> SurfaceResult<Option<CanvasGeometry>> {
        let size = host.visible_size();
        let pixel_ratio = host.pixel_ratio();
        tracing::debug!(
            width = size.width,
            height = size.height,
            pixel_ratio,
            "measuring signature surface"
        );
        let Some(geometry) = CanvasGeometry::measure(size, pixel_ratio) else {
            return Ok(None);
        };

        let drawing = DrawingContext::create(geometry)?;
        drawing.fill_background(self.background)?;
        self.drawing = Some(drawing);
        presence.transition(PresenceEvent::Cleared)?;
        tracing::info!(
            width = geometry.css_width,
            height = geometry.css_height,
            pixel_ratio = geometry.pixel_ratio,
            backing_width = geometry.backing_width,
            backing_height = geometry.backing_height,
            "signature surface ready"
        );
        Ok(Some(geometry))
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::FakeHost;
    use super::*;
    use crate::state::SignaturePresence;

    fn settle(
        manager: &mut SurfaceGeometryManager,
        host: &FakeHost,
        presence: &mut PresenceMachine,
    ) -> SetupStatus {
        loop {
            let status = manager.poll_setup(host, presence).expect("poll");
            if status.is_settled() {
                return status;
            }
        }
    }

    #[test]
    fn poll_setup_applies_scaled_geometry_on_first_visible_frame() {
        let host = FakeHost::new(300.0, 150.0, 2.0);
        let mut presence = PresenceMachine::new();
        let mut manager = SurfaceGeometryManager::default();
        manager.begin_setup();

        let status = manager.poll_setup(&host, &mut presence).expect("poll");
        let SetupStatus::Ready(geometry) = status else {
            panic!("expected ready, got {status:?}");
        };
        assert_eq!((geometry.backing_width, geometry.backing_height), (600, 300));
        assert!(manager.is_ready());
        assert_eq!(presence.presence(), SignaturePresence::Empty);
    }

    #[test]
    fn poll_setup_on_zero_size_retries_up_to_ceiling_then_stops() {
        let host = FakeHost::hidden();
        let mut presence = PresenceMachine::new();
        let mut manager = SurfaceGeometryManager::new(10);
        manager.begin_setup();

        for attempt in 1..=10 {
            let status = manager.poll_setup(&host, &mut presence).expect("poll");
            assert_eq!(status, SetupStatus::Pending { attempt });
        }
        let status = manager.poll_setup(&host, &mut presence).expect("poll");
        assert_eq!(status, SetupStatus::Exhausted { attempts: 11 });

        let status = manager.poll_setup(&host, &mut presence).expect("poll");
        assert_eq!(status, SetupStatus::Exhausted { attempts: 11 });
        assert_eq!(host.measurements.get(), 11);
        assert!(!manager.is_ready());
    }

    #[test]
    fn poll_setup_recovers_when_container_becomes_visible_mid_cycle() {
        let host = FakeHost::hidden();
        let mut presence = PresenceMachine::new();
        let mut manager = SurfaceGeometryManager::new(10);
        manager.begin_setup();

        for _ in 0..3 {
            let _ = manager.poll_setup(&host, &mut presence).expect("poll");
        }
        host.size.set(SurfaceSize::new(200.0, 80.0));

        let status = settle(&mut manager, &host, &mut presence);
        assert!(matches!(status, SetupStatus::Ready(_)));
        assert_eq!(manager.attempts(), 0);
    }

    #[test]
    fn begin_setup_remeasures_for_new_container_size() {
        let host = FakeHost::new(300.0, 150.0, 1.0);
        let mut presence = PresenceMachine::new();
        let mut manager = SurfaceGeometryManager::default();
        manager.begin_setup();
        let _ = settle(&mut manager, &host, &mut presence);

        host.size.set(SurfaceSize::new(180.0, 90.0));
        host.ratio.set(1.5);
        manager.begin_setup();
        assert!(!manager.is_ready());
        let _ = settle(&mut manager, &host, &mut presence);

        let geometry = manager.geometry().expect("geometry");
        assert_eq!((geometry.backing_width, geometry.backing_height), (270, 135));
        let matrix = manager.drawing().expect("drawing").cairo().matrix();
        assert_eq!(matrix.xx(), 1.5);
    }

    #[test]
    fn clear_twice_only_refills_background() {
        let host = FakeHost::new(100.0, 50.0, 1.0);
        let mut presence = PresenceMachine::new();
        let mut manager = SurfaceGeometryManager::default();
        manager.begin_setup();
        let _ = settle(&mut manager, &host, &mut presence);
        let _ = presence
            .transition(PresenceEvent::InkStroke)
            .expect("ink");

        manager.clear(&host, &mut presence).expect("first clear");
        let first = manager.encode_png().expect("png");
        manager.clear(&host, &mut presence).expect("second clear");
        let second = manager.encode_png().expect("png");

        assert_eq!(presence.presence(), SignaturePresence::Empty);
        assert_eq!(first, second);
        assert_eq!(manager.geometry().map(|g| g.backing_width), Some(100));
    }

    #[test]
    fn clear_without_context_measures_or_reports_not_ready() {
        let host = FakeHost::hidden();
        let mut presence = PresenceMachine::new();
        let mut manager = SurfaceGeometryManager::default();

        let err = manager
            .clear(&host, &mut presence)
            .expect_err("hidden surface cannot clear");
        assert!(matches!(err, SurfaceError::NotReady));

        host.size.set(SurfaceSize::new(64.0, 32.0));
        manager.clear(&host, &mut presence).expect("clear measures");
        assert!(manager.is_ready());
    }

    #[test]
    fn encode_png_without_context_is_not_ready() {
        let manager = SurfaceGeometryManager::default();
        assert!(matches!(
            manager.encode_png(),
            Err(SurfaceError::NotReady)
        ));
    }
}
