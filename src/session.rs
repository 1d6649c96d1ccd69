use crate::location::{self, Coordinates, LocationProvider};
use crate::mode::{GenerateTrigger, ModeCoordinator, ModeSync, ModeUi, SignatureMode, SurfaceAction};
use crate::state::{PresenceMachine, SignaturePresence};
use crate::stroke::{PointerCapture, PointerEvent, StrokeInputController, StrokeOutcome, StrokeStyle};
use crate::submit::{FormFields, SubmissionEncoder, SubmitError, SubmitResult};
use crate::surface::{
    SetupStatus, SurfaceError, SurfaceGeometryManager, SurfaceHost, DEFAULT_MAX_SETUP_RETRIES,
};
use crate::text::{TextSignatureOptions, TextSignatureRenderer};

/// Form widgets around the drawing surface.
pub trait SignatureFields {
    fn signer_name(&self) -> String;
    fn focus_signer_name(&self);
    fn set_hint(&self, hint: &str);
    fn set_generate_visible(&self, visible: bool);
    /// The hidden field the encoded signature is submitted through.
    fn set_transmission_value(&self, value: Option<&str>);
    fn show_message(&self, message: Option<&str>);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionOptions {
    pub max_setup_retries: u32,
    pub stroke: StrokeStyle,
    pub text: TextSignatureOptions,
    pub initial_mode: SignatureMode,
    pub trigger: GenerateTrigger,
    pub encoder: SubmissionEncoder,
    pub location: Option<Coordinates>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            max_setup_retries: DEFAULT_MAX_SETUP_RETRIES,
            stroke: StrokeStyle::default(),
            text: TextSignatureOptions::default(),
            initial_mode: SignatureMode::default(),
            trigger: GenerateTrigger::default(),
            encoder: SubmissionEncoder::default(),
            location: None,
        }
    }
}

pub struct SignatureSession {
    bound_events: bool,
    presence: PresenceMachine,
    surface: SurfaceGeometryManager,
    strokes: StrokeInputController,
    text: TextSignatureRenderer,
    modes: ModeCoordinator,
    encoder: SubmissionEncoder,
    location_provider: Box<dyn LocationProvider>,
    location: Option<Coordinates>,
}

impl std::fmt::Debug for SignatureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureSession")
            .field("bound_events", &self.bound_events)
            .field("presence", &self.presence.presence())
            .field("surface_ready", &self.surface.is_ready())
            .field("mode", &self.modes.mode())
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl Default for SignatureSession {
    fn default() -> Self {
        Self::new(SessionOptions::default())
    }
}

impl SignatureSession {
    pub fn new(options: SessionOptions) -> Self {
        Self {
            bound_events: false,
            presence: PresenceMachine::new(),
            surface: SurfaceGeometryManager::new(options.max_setup_retries),
            strokes: StrokeInputController::new(options.stroke),
            text: TextSignatureRenderer::new(options.text),
            modes: ModeCoordinator::new(options.initial_mode, options.trigger),
            encoder: options.encoder,
            location_provider: location::provider_for(options.location),
            location: None,
        }
    }

    pub fn with_location_provider(mut self, provider: Box<dyn LocationProvider>) -> Self {
        self.location_provider = provider;
        self
    }

    pub fn presence(&self) -> SignaturePresence {
        self.presence.presence()
    }

    pub fn mode(&self) -> SignatureMode {
        self.modes.mode()
    }

    pub fn surface(&self) -> &SurfaceGeometryManager {
        &self.surface
    }

    pub fn strokes(&self) -> &StrokeInputController {
        &self.strokes
    }

    pub fn location(&self) -> Option<Coordinates> {
        self.location
    }

    pub fn bind_events_once(&mut self) -> bool {
        if self.bound_events {
            return false;
        }
        self.bound_events = true;
        true
    }

    pub fn surface_became_visible(
        &mut self,
        host: &dyn SurfaceHost,
        fields: &dyn SignatureFields,
    ) -> SetupStatus {
        self.strokes.force_idle();
        self.location = location::capture_best_effort(self.location_provider.as_ref());
        fields.set_transmission_value(None);
        fields.show_message(None);
        self.apply_ui(self.modes.ui(), fields);
        self.surface.begin_setup();
        self.poll_surface_setup(host, fields)
    }

    pub fn poll_surface_setup(
        &mut self,
        host: &dyn SurfaceHost,
        fields: &dyn SignatureFields,
    ) -> SetupStatus {
        match self.surface.poll_setup(host, &mut self.presence) {
            Ok(SetupStatus::Ready(geometry)) => {
                fields.set_transmission_value(None);
                let sync = self.modes.sync(&fields.signer_name());
                self.apply_sync(sync, host, fields);
                SetupStatus::Ready(geometry)
            }
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(%err, "surface setup failed");
                SetupStatus::Exhausted {
                    attempts: self.surface.attempts(),
                }
            }
        }
    }

    pub fn surface_became_hidden(&mut self) {
        self.strokes.force_idle();
    }

    pub fn mode_changed(
        &mut self,
        mode: SignatureMode,
        host: &dyn SurfaceHost,
        fields: &dyn SignatureFields,
    ) {
        self.strokes.force_idle();
        let sync = self.modes.switch_to(mode, &fields.signer_name());
        self.apply_sync(sync, host, fields);
    }

    pub fn name_changed(&mut self, host: &dyn SurfaceHost, fields: &dyn SignatureFields) {
        if let Some(action) = self.modes.on_name_input(&fields.signer_name()) {
            self.apply_action(action, host, fields);
        }
    }

    pub fn generate_requested(&mut self, host: &dyn SurfaceHost, fields: &dyn SignatureFields) {
        if self.modes.mode() != SignatureMode::Generated {
            return;
        }
        let name = fields.signer_name();
        if name.trim().is_empty() {
            fields.show_message(Some(SubmitError::MissingName.user_message()));
            fields.focus_signer_name();
            return;
        }
        fields.show_message(None);
        self.apply_action(SurfaceAction::Render(name), host, fields);
    }

    pub fn clear_requested(&mut self, host: &dyn SurfaceHost, fields: &dyn SignatureFields) {
        self.strokes.force_idle();
        self.apply_action(SurfaceAction::Clear, host, fields);
    }

    pub fn pointer_down(
        &mut self,
        event: PointerEvent,
        host: &dyn SurfaceHost,
        capture: &dyn PointerCapture,
    ) -> StrokeOutcome {
        self.strokes.pointer_down(
            event,
            self.modes.mode(),
            &mut self.surface,
            host,
            capture,
            &mut self.presence,
        )
    }

    pub fn pointer_move(&mut self, event: PointerEvent, host: &dyn SurfaceHost) -> StrokeOutcome {
        self.strokes
            .pointer_move(event, &self.surface, host, &mut self.presence)
    }

    pub fn pointer_up(&mut self, event: PointerEvent, capture: &dyn PointerCapture) -> StrokeOutcome {
        self.strokes.pointer_up(event, capture)
    }

    pub fn pointer_cancel(
        &mut self,
        event: PointerEvent,
        capture: &dyn PointerCapture,
    ) -> StrokeOutcome {
        self.strokes.pointer_cancel(event, capture)
    }

    /// On failure the user-facing message is shown and nothing else changes.
    pub fn submit(&self, fields: &dyn SignatureFields) -> SubmitResult<FormFields> {
        let name = fields.signer_name();
        let payload = match self
            .encoder
            .validate_and_encode(&name, self.presence.presence(), &self.surface)
        {
            Ok(payload) => payload,
            Err(err) => {
                tracing::info!(%err, "signature submit rejected");
                fields.show_message(Some(err.user_message()));
                if matches!(err, SubmitError::MissingName) {
                    fields.focus_signer_name();
                }
                return Err(err);
            }
        };

        let form = self.encoder.build_form(&name, &payload, self.location);
        fields.set_transmission_value(form.get(self.encoder.signature_field()));
        fields.show_message(None);
        tracing::info!(
            presence = self.presence.presence().as_str(),
            located = self.location.is_some(),
            "signature submitted"
        );
        Ok(form)
    }

    fn apply_sync(&mut self, sync: ModeSync, host: &dyn SurfaceHost, fields: &dyn SignatureFields) {
        self.apply_ui(sync.ui, fields);
        self.apply_action(sync.action, host, fields);
    }

    fn apply_ui(&self, ui: ModeUi, fields: &dyn SignatureFields) {
        fields.set_hint(ui.hint);
        fields.set_generate_visible(ui.generate_visible);
    }

    fn apply_action(
        &mut self,
        action: SurfaceAction,
        host: &dyn SurfaceHost,
        fields: &dyn SignatureFields,
    ) {
        fields.set_transmission_value(None);
        let result = match action {
            SurfaceAction::Render(name) => self
                .text
                .render(&name, &mut self.surface, host, &mut self.presence)
                .map(|_| ()),
            SurfaceAction::Clear => self.surface.clear(host, &mut self.presence),
        };
        match result {
            Ok(()) => {}
            Err(SurfaceError::NotReady) => {
                tracing::debug!("surface not ready; skipping redraw");
            }
            Err(err) => tracing::warn!(%err, "failed to redraw signature surface"),
        }
    }
}
