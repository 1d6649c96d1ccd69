use std::cell::Cell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::Application;

use crate::config::{load_app_config, SignpadConfig};
use crate::error::{AppError, AppResult};
use crate::storage::{StorageService, SubmissionStorage, SubmissionTarget};
use crate::ui::{install_runtime_css, LAYOUT_TOKENS};

mod canvas;
mod dialog;
mod gestures;
mod host;
mod startup;
mod tick;

use self::dialog::{build_signature_dialog, SignatureDialogDeps};
pub(crate) use self::startup::{gtk_launch_args, StartupConfig};

const APPLICATION_ID: &str = "io.github.signpad";

pub struct App {
    config: SignpadConfig,
    startup: StartupConfig,
}

impl App {
    pub fn from_env() -> AppResult<Self> {
        Ok(Self {
            config: load_app_config(),
            startup: StartupConfig::from_args()?,
        })
    }

    pub fn start(&mut self) -> AppResult<()> {
        let options = self.config.session_options(self.startup.mode);
        tracing::info!(
            mode = options.initial_mode.as_str(),
            trigger = ?options.trigger,
            payload_format = ?options.encoder.format(),
            max_setup_retries = options.max_setup_retries,
            "starting signature dialog"
        );
        let storage: Rc<dyn SubmissionStorage> = Rc::new(StorageService::new(
            SubmissionTarget::from_output(self.startup.output.clone()),
        ));
        let initial_name = self.startup.name.clone();

        let application = Application::new(
            Some(APPLICATION_ID),
            gtk4::gio::ApplicationFlags::NON_UNIQUE,
        );

        let activate_once = Rc::new(Cell::new(false));
        application.connect_activate(move |app| {
            if activate_once.replace(true) {
                tracing::debug!("ignoring duplicate gtk activate signal");
                return;
            }
            install_runtime_css(LAYOUT_TOKENS);
            let window = build_signature_dialog(
                app,
                SignatureDialogDeps {
                    options: options.clone(),
                    initial_name: initial_name.clone(),
                    storage: storage.clone(),
                    tokens: LAYOUT_TOKENS,
                },
            );
            window.present();
        });

        let status = application.run_with_args(&gtk_launch_args());
        if status != gtk4::glib::ExitCode::SUCCESS {
            return Err(AppError::ExitFailure);
        }
        Ok(())
    }
}
