//! System hotkey registration via `global-hotkey`.
//!
//! On macOS and Windows the registering thread must run the platform event
//! loop for events to arrive; on Linux (X11) the library spawns its own
//! listener thread.

use std::collections::HashMap;
use std::time::Duration;

use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};

use super::binder::{HotkeyBackend, ShortcutBinder};
use super::descriptor::Shortcut;
use crate::error::{CuImageError, CuImageResult};

/// Hotkey backend backed by the operating system.
pub struct GlobalHotkeyBackend {
    manager: GlobalHotKeyManager,
    registered: HashMap<u32, HotKey>,
}

impl GlobalHotkeyBackend {
    pub fn new() -> CuImageResult<Self> {
        let manager = GlobalHotKeyManager::new()
            .map_err(|e| CuImageError::Hotkey(format!("Failed to create hotkey manager: {}", e)))?;
        Ok(Self {
            manager,
            registered: HashMap::new(),
        })
    }
}

impl HotkeyBackend for GlobalHotkeyBackend {
    fn register(&mut self, shortcut: &Shortcut) -> CuImageResult<u32> {
        let accelerator = shortcut.accelerator();
        let hotkey: HotKey = accelerator.parse().map_err(|e| {
            CuImageError::Hotkey(format!("Invalid shortcut {:?}: {}", accelerator, e))
        })?;

        self.manager
            .register(hotkey)
            .map_err(|e| CuImageError::Hotkey(format!("Failed to register {}: {}", shortcut, e)))?;

        let id = hotkey.id();
        self.registered.insert(id, hotkey);
        Ok(id)
    }

    fn unregister(&mut self, id: u32) -> CuImageResult<()> {
        let Some(hotkey) = self.registered.remove(&id) else {
            return Ok(());
        };
        self.manager
            .unregister(hotkey)
            .map_err(|e| CuImageError::Hotkey(format!("Failed to unregister hotkey {}: {}", id, e)))
    }
}

/// Wait up to `timeout` for hotkey events and dispatch every press.
///
/// Returns how many presses matched a binding.
pub fn pump_events<B: HotkeyBackend>(binder: &ShortcutBinder<B>, timeout: Duration) -> usize {
    let receiver = GlobalHotKeyEvent::receiver();
    let mut dispatched = 0;

    let mut next = receiver.recv_timeout(timeout).ok();
    while let Some(event) = next {
        if matches!(event.state(), HotKeyState::Pressed) && binder.dispatch(event.id()) {
            dispatched += 1;
        }
        next = receiver.try_recv().ok();
    }

    dispatched
}
