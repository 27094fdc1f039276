//! Application entry point for the particle backdrop viewer.
//!
//! This binary sets up logging and eframe/egui, loads optional settings
//! from the JSON file named by the first argument, and delegates
//! everything else to [`Viewer`].

mod host;
mod settings;
mod surface;
mod viewer;

use std::path::PathBuf;

use settings::Settings;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// ### Returns
/// - `Ok(())` if the application runs to completion without errors.
/// - `Err` if eframe fails to create the native window or event loop.
fn main() -> eframe::Result<()> {
    env_logger::init();

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let settings = Settings::load_or_default(path.as_deref());
    let options = eframe::NativeOptions::default();

    eframe::run_native(
        "Backdrop",
        options,
        Box::new(|cc| Ok(Box::new(Viewer::new(&cc.egui_ctx, settings)))),
    )
}
