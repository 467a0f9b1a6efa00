//! Document-ready gate and timer
//!
//! The gate is process-wide. It starts closed, opens once when the host
//! signals that the document is complete, and never closes again.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

type ReadyCallback = Box<dyn FnOnce() + Send>;

static READY: AtomicBool = AtomicBool::new(false);
static PENDING: Mutex<Vec<ReadyCallback>> = Mutex::new(Vec::new());

/// Whether [`signal_ready`] has been called
pub fn is_ready() -> bool {
    READY.load(Ordering::Acquire)
}

/// Run `callback` once the document is ready
///
/// Runs immediately when the gate is already open.
pub fn on_ready(callback: impl FnOnce() + Send + 'static) {
    let mut pending = PENDING.lock().unwrap_or_else(|e| e.into_inner());
    if is_ready() {
        drop(pending);
        callback();
    } else {
        pending.push(Box::new(callback));
    }
}

/// Open the gate and run the queued callbacks in registration order
///
/// Later calls do nothing.
pub fn signal_ready() {
    let queued = {
        let mut pending = PENDING.lock().unwrap_or_else(|e| e.into_inner());
        if READY.swap(true, Ordering::AcqRel) {
            return;
        }
        std::mem::take(&mut *pending)
    };
    tracing::debug!(callbacks = queued.len(), "document ready");
    for callback in queued {
        callback();
    }
}

/// Resolve after `duration`
pub async fn delay(duration: Duration) {
    smol::Timer::after(duration).await;
}
