pub mod app;
mod config;
pub mod error;
pub mod geometry;
pub mod location;
pub mod logging;
pub mod mode;
pub mod notification;
pub mod session;
pub mod state;
pub mod storage;
pub mod stroke;
pub mod submit;
pub mod surface;
pub mod text;
pub mod ui;
pub use error::{AppError, AppResult};

/// Entrypoint used by the binary and by embedding launchers.
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting signpad");

    let mut app = app::App::from_env()?;
    app.start()?;

    tracing::info!("signature dialog closed");
    Ok(())
}
