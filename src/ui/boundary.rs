//! Panic containment for the render pass.
//!
//! A panic while drawing a panel must not tear down the terminal. The
//! render closure runs inside [`catch`], and the panic hook installed by
//! [`install_panic_hook`] stays quiet for panics that [`catch`] will
//! recover from.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::thread::{self, ThreadId};

thread_local! {
    static CATCHING: Cell<bool> = const { Cell::new(false) };
}

/// Run `f`, turning a panic into `Err` with the panic message.
pub fn catch<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    let outer = CATCHING.with(|c| c.replace(true));
    let result = panic::catch_unwind(AssertUnwindSafe(f));
    CATCHING.with(|c| c.set(outer));
    result.map_err(|payload| panic_message(&*payload))
}

/// Whether the current thread is inside [`catch`].
pub fn is_catching() -> bool {
    CATCHING.with(Cell::get)
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Install a panic hook that restores the terminal before reporting.
///
/// Must be called from the thread that owns the terminal. Panics raised
/// inside [`catch`] are logged instead, since the dashboard keeps running
/// and shows them in the error panel. Panics on other threads (poll tasks
/// on runtime workers) are logged too and leave the terminal alone.
pub fn install_panic_hook(restore: impl Fn() + Send + Sync + 'static) {
    let ui_thread = thread::current().id();
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if is_catching() {
            tracing::error!(panic = %info, "panic while rendering");
            return;
        }
        if !owns_terminal(ui_thread) {
            tracing::error!(panic = %info, "panic in background task");
            return;
        }
        restore();
        original_hook(info);
    }));
}

/// Whether the current thread is the one the terminal belongs to.
fn owns_terminal(ui_thread: ThreadId) -> bool {
    thread::current().id() == ui_thread
}
