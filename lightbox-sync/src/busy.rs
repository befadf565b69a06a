//! Reference-counted blocking-indicator guard.

use std::sync::Mutex;

use tokio::sync::watch;

/// Nestable busy flag for a blocking progress indicator.
///
/// Unlike the rest of the sync core, this guard is touched from arbitrary
/// calling contexts, so the counter sits behind a mutex. Subscribers only
/// hear about the 0→1 and 1→0 transitions; nested `begin`/`end` pairs in
/// between are silent.
#[derive(Debug)]
pub struct BusyGuard {
    count: Mutex<u32>,
    notify: watch::Sender<bool>,
}

impl Default for BusyGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl BusyGuard {
    /// Creates an idle guard.
    pub fn new() -> Self {
        let (notify, _) = watch::channel(false);
        Self {
            count: Mutex::new(0),
            notify,
        }
    }

    /// Increments the busy count, announcing the 0→1 transition.
    pub fn begin(&self) {
        let mut count = self.count.lock().expect("busy count lock poisoned");
        *count += 1;
        if *count == 1 {
            self.notify.send_replace(true);
        }
    }

    /// Decrements the busy count, announcing the 1→0 transition.
    ///
    /// Calling `end` with the count already at zero is a no-op.
    pub fn end(&self) {
        let mut count = self.count.lock().expect("busy count lock poisoned");
        if *count == 0 {
            return;
        }
        *count -= 1;
        if *count == 0 {
            self.notify.send_replace(false);
        }
    }

    /// Returns true while at least one operation holds the guard.
    pub fn is_busy(&self) -> bool {
        *self.count.lock().expect("busy count lock poisoned") > 0
    }

    /// Subscribes to busy/idle transitions.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.notify.subscribe()
    }
}
