//! Test doubles for the shortcut module.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use super::binder::{HotkeyBackend, ShortcutAction};
use super::descriptor::Shortcut;
use crate::error::{CuImageError, CuImageResult};

#[derive(Default)]
struct FakeState {
    next_id: u32,
    active: Vec<(u32, Shortcut)>,
    fail_next: bool,
}

/// In-memory hotkey backend. Clones share state, so a test can keep one
/// handle while the binder owns another.
#[derive(Clone, Default)]
pub(crate) struct FakeHotkeyBackend {
    state: Arc<Mutex<FakeState>>,
}

impl FakeHotkeyBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Shortcuts currently registered, oldest first.
    pub(crate) fn active(&self) -> Vec<Shortcut> {
        self.state
            .lock()
            .active
            .iter()
            .map(|(_, shortcut)| shortcut.clone())
            .collect()
    }

    pub(crate) fn fail_next_registration(&self) {
        self.state.lock().fail_next = true;
    }
}

impl HotkeyBackend for FakeHotkeyBackend {
    fn register(&mut self, shortcut: &Shortcut) -> CuImageResult<u32> {
        let mut state = self.state.lock();
        if std::mem::take(&mut state.fail_next) {
            return Err(CuImageError::Hotkey(format!("{} is taken", shortcut)));
        }
        state.next_id += 1;
        let id = state.next_id;
        state.active.push((id, shortcut.clone()));
        Ok(id)
    }

    fn unregister(&mut self, id: u32) -> CuImageResult<()> {
        self.state.lock().active.retain(|(active_id, _)| *active_id != id);
        Ok(())
    }
}

/// An action that counts its invocations.
pub(crate) fn counting_action() -> (ShortcutAction, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&count);
    let action: ShortcutAction = Arc::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    (action, count)
}
