//! cuImage: upload the clipboard image with a global shortcut.
//!
//! ## Architecture
//!
//! ```text
//! run()
//!   |
//!   +-- config (AppConfig from env)
//!   +-- logging (env_logger, daily files)
//!   +-- preferences (typed store, JSON file)
//!   +-- shortcut (binder + global-hotkey backend)
//!   |     |
//!   |     +-- upload action --> upload (pasteboard -> imaging -> uploader)
//!   +-- app (winit event loop, drains hotkey events on the main thread)
//! ```

use std::sync::Arc;

pub mod app;
pub mod config;
pub mod error;
pub mod hosts;
pub mod imaging;
pub mod logging;
pub mod preferences;
pub mod shortcut;
pub mod upload;

use config::AppConfig;
use error::CuImageResult;
use preferences::keys::{KEEP_WINDOWS_ON_TOP, LAUNCH_AT_LOGIN};
use preferences::PreferenceManager;
use shortcut::{GlobalHotkeyBackend, ShortcutAction, ShortcutManager};
use upload::{LoggingUploader, SystemPasteboard, UploadController};

/// Start the app and run the platform event loop on the calling (main)
/// thread until it exits.
pub fn run() -> CuImageResult<()> {
    let config = AppConfig::from_env();
    logging::init_logging(&config)?;

    let preferences = Arc::new(PreferenceManager::open(&config.preferences_path)?);
    log::info!(
        "[APP] Preferences at {:?} (launch at login: {}, keep windows on top: {})",
        config.preferences_path,
        preferences.get(LAUNCH_AT_LOGIN),
        preferences.get(KEEP_WINDOWS_ON_TOP)
    );

    let controller = Arc::new(UploadController::new(
        SystemPasteboard::new(),
        LoggingUploader,
        &config,
    ));

    let upload_image: ShortcutAction = {
        let preferences = Arc::clone(&preferences);
        let controller = Arc::clone(&controller);
        Arc::new(move || {
            if let Some(file_name) = controller.upload_image_on_pasteboard(&preferences) {
                log::info!("[APP] Uploaded {}", file_name);
            }
        })
    };

    // The hotkey manager needs the platform loop to exist first
    let event_loop = app::create_event_loop()?;
    let shortcuts = ShortcutManager::init(&preferences, GlobalHotkeyBackend::new()?, upload_image)?;
    log::info!(
        "[APP] Ready, {} shortcut(s) active",
        shortcuts.binder().binding_count()
    );

    app::HotkeyApp::new(shortcuts).run(event_loop)
}
