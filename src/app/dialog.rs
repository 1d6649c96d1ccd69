use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::{
    glib, Align, Application, ApplicationWindow, Box as GtkBox, DrawingArea, Entry, Frame,
    Orientation,
};

use crate::mode::SignatureMode;
use crate::session::{SessionOptions, SignatureSession};
use crate::storage::SubmissionStorage;
use crate::ui::{mode_radio, text_button, wrapped_label, StyleTokens};

use super::canvas::configure_surface_draw;
use super::gestures::{connect_surface_draw_gesture, SurfaceGestureContext};
use super::host::{GtkSignatureFields, GtkSurfaceHost};
use super::tick::TickSlot;

pub(super) struct SignatureDialogDeps {
    pub(super) options: SessionOptions,
    pub(super) initial_name: Option<String>,
    pub(super) storage: Rc<dyn SubmissionStorage>,
    pub(super) tokens: StyleTokens,
}

pub(super) fn build_signature_dialog(app: &Application, deps: SignatureDialogDeps) -> ApplicationWindow {
    let SignatureDialogDeps {
        options,
        initial_name,
        storage,
        tokens,
    } = deps;
    let initial_mode = options.initial_mode;

    let window = ApplicationWindow::new(app);
    window.set_title(Some("Sign document"));
    window.set_default_size(tokens.dialog_default_width, tokens.dialog_default_height);
    window.add_css_class("signpad-root");

    let root = GtkBox::new(Orientation::Vertical, tokens.spacing_12);

    let area = DrawingArea::new();
    area.set_size_request(tokens.surface_min_width, tokens.surface_min_height);
    area.set_hexpand(true);
    area.set_vexpand(true);
    let frame = Frame::new(None);
    frame.add_css_class("signpad-surface-frame");
    frame.set_child(Some(&area));

    let manual_radio = mode_radio("Draw", None);
    let generated_radio = mode_radio("Generate from name", Some(&manual_radio));
    match initial_mode {
        SignatureMode::Manual => manual_radio.set_active(true),
        SignatureMode::Generated => generated_radio.set_active(true),
    }
    let mode_row = GtkBox::new(Orientation::Horizontal, tokens.spacing_16);
    mode_row.append(&manual_radio);
    mode_row.append(&generated_radio);

    let name_entry = Entry::new();
    name_entry.set_placeholder_text(Some("Full name"));
    if let Some(name) = initial_name.as_deref() {
        name_entry.set_text(name);
    }

    let hint_label = wrapped_label("signpad-hint");
    let message_label = wrapped_label("signpad-message");
    message_label.set_visible(false);

    let clear_button = text_button("Clear", "Erase the signature area", &[]);
    let generate_button = text_button(
        "Generate signature",
        "Render your name as a signature",
        &[],
    );
    generate_button.set_visible(false);
    let sign_button = text_button("Sign", "Submit the signature", &["suggested-action"]);
    let actions = GtkBox::new(Orientation::Horizontal, tokens.spacing_8);
    actions.add_css_class("signpad-actions");
    actions.set_halign(Align::End);
    actions.append(&clear_button);
    actions.append(&generate_button);
    actions.append(&sign_button);

    root.append(&mode_row);
    root.append(&frame);
    root.append(&name_entry);
    root.append(&hint_label);
    root.append(&message_label);
    root.append(&actions);
    window.set_child(Some(&root));

    let session = Rc::new(RefCell::new(SignatureSession::new(options)));
    let host = GtkSurfaceHost { area: area.clone() };
    let fields = GtkSignatureFields {
        name_entry: name_entry.clone(),
        hint_label,
        message_label: message_label.clone(),
        generate_button: generate_button.clone(),
    };

    configure_surface_draw(&area, session.clone());

    let setup_tick: Rc<TickSlot<gtk4::TickCallbackId>> = Rc::new(TickSlot::default());

    {
        let session_for_map = session.clone();
        let host_for_map = host.clone();
        let fields_for_map = fields.clone();
        let tick_for_map = setup_tick.clone();
        area.connect_map(move |area| {
            tick_for_map.cancel(gtk4::TickCallbackId::remove);
            let status = session_for_map
                .borrow_mut()
                .surface_became_visible(&host_for_map, &fields_for_map);
            area.queue_draw();
            if status.is_settled() {
                return;
            }
            let session = session_for_map.clone();
            let host = host_for_map.clone();
            let fields = fields_for_map.clone();
            let tick = tick_for_map.clone();
            let id = area.add_tick_callback(move |area, _clock| {
                let status = session.borrow_mut().poll_surface_setup(&host, &fields);
                area.queue_draw();
                if status.is_settled() {
                    tick.settled();
                    glib::ControlFlow::Break
                } else {
                    glib::ControlFlow::Continue
                }
            });
            tick_for_map.install(id, gtk4::TickCallbackId::remove);
        });
    }

    {
        let session_for_unmap = session.clone();
        let tick_for_unmap = setup_tick.clone();
        area.connect_unmap(move |_| {
            tick_for_unmap.cancel(gtk4::TickCallbackId::remove);
            session_for_unmap.borrow_mut().surface_became_hidden();
        });
    }

    let first_bind = session.borrow_mut().bind_events_once();
    if first_bind {
        connect_surface_draw_gesture(SurfaceGestureContext {
            session: session.clone(),
            host: host.clone(),
        });
        connect_mode_radio(&manual_radio, SignatureMode::Manual, &session, &host, &fields);
        connect_mode_radio(&generated_radio, SignatureMode::Generated, &session, &host, &fields);

        {
            let session = session.clone();
            let host = host.clone();
            let fields = fields.clone();
            name_entry.connect_changed(move |_| {
                session.borrow_mut().name_changed(&host, &fields);
                host.area.queue_draw();
            });
        }

        {
            let session = session.clone();
            let host = host.clone();
            let fields = fields.clone();
            clear_button.connect_clicked(move |_| {
                session.borrow_mut().clear_requested(&host, &fields);
                host.area.queue_draw();
            });
        }

        {
            let session = session.clone();
            let host = host.clone();
            let fields = fields.clone();
            generate_button.connect_clicked(move |_| {
                session.borrow_mut().generate_requested(&host, &fields);
                host.area.queue_draw();
            });
        }

        {
            let session = session.clone();
            let fields = fields.clone();
            let window = window.clone();
            sign_button.connect_clicked(move |_| {
                let submitted = session.borrow().submit(&fields);
                let Ok(form) = submitted else {
                    return;
                };
                match storage.save_submission(&form) {
                    Ok(destination) => {
                        let signer = fields.name_entry.text();
                        crate::notification::submission_saved(
                            signer.trim(),
                            destination.as_deref(),
                        );
                        window.close();
                    }
                    Err(err) => {
                        tracing::error!(%err, "failed to store signature submission");
                        fields
                            .message_label
                            .set_text("The signature could not be saved. Please try again.");
                        fields.message_label.set_visible(true);
                    }
                }
            });
        }
    }

    window
}

fn connect_mode_radio(
    radio: &gtk4::CheckButton,
    mode: SignatureMode,
    session: &Rc<RefCell<SignatureSession>>,
    host: &GtkSurfaceHost,
    fields: &GtkSignatureFields,
) {
    let session = session.clone();
    let host = host.clone();
    let fields = fields.clone();
    radio.connect_toggled(move |radio| {
        if !radio.is_active() {
            return;
        }
        session.borrow_mut().mode_changed(mode, &host, &fields);
        host.area.queue_draw();
    });
}
