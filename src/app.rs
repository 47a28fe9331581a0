//! Platform event loop for the windowless menu-bar process.
//!
//! `global-hotkey` only delivers events while the platform run loop is
//! spinning on the main thread (an NSApplication on macOS, a message loop on
//! Windows). `winit` provides that loop; this handler wakes every
//! `EVENT_POLL_INTERVAL` and dispatches whatever hotkey presses arrived.

use std::time::{Duration, Instant};

use winit::application::ApplicationHandler;
use winit::event::{StartCause, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::WindowId;

use crate::error::{CuImageResult, ResultExt};
use crate::shortcut::{pump_events, HotkeyBackend, ShortcutManager};

/// How often the loop wakes to drain hotkey events.
pub const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Create the platform event loop. Must run on the main thread, before the
/// hotkey manager is created.
pub fn create_event_loop() -> CuImageResult<EventLoop<()>> {
    let mut builder = EventLoop::builder();

    // Menu-bar utility: no Dock icon, no app menu
    #[cfg(target_os = "macos")]
    {
        use winit::platform::macos::{ActivationPolicy, EventLoopBuilderExtMacOS};
        builder.with_activation_policy(ActivationPolicy::Accessory);
    }

    builder
        .build()
        .with_context(|| "Failed to create event loop".to_string())
}

/// Event handler that owns the bound shortcuts.
pub struct HotkeyApp<B: HotkeyBackend> {
    shortcuts: ShortcutManager<B>,
    dispatched: usize,
}

impl<B: HotkeyBackend> HotkeyApp<B> {
    pub fn new(shortcuts: ShortcutManager<B>) -> Self {
        Self {
            shortcuts,
            dispatched: 0,
        }
    }

    /// Run until the loop exits. Blocks the main thread.
    pub fn run(mut self, event_loop: EventLoop<()>) -> CuImageResult<()> {
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + EVENT_POLL_INTERVAL));
        event_loop
            .run_app(&mut self)
            .with_context(|| "Event loop failed".to_string())?;
        log::info!("[APP] Event loop exited after {} shortcut actions", self.dispatched);
        Ok(())
    }
}

impl<B: HotkeyBackend> ApplicationHandler for HotkeyApp<B> {
    fn new_events(&mut self, _event_loop: &ActiveEventLoop, cause: StartCause) {
        if matches!(cause, StartCause::Init) {
            log::debug!("[APP] Event loop started");
        }
        self.dispatched += pump_events(self.shortcuts.binder(), Duration::ZERO);
    }

    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        _event: WindowEvent,
    ) {
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + EVENT_POLL_INTERVAL));
    }
}
