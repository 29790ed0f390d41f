#![cfg(target_arch = "wasm32")]

use gloo::timers::callback::Timeout;

/// Timer một lần có thể hủy và hẹn lại. Hẹn lại sẽ hủy lần hẹn trước.
#[derive(Default)]
pub struct CancellableTimer {
    pending: Option<Timeout>,
}

impl CancellableTimer {
    pub fn schedule<F>(&mut self, millis: u32, callback: F)
    where
        F: FnOnce() + 'static,
    {
        // Drop `Timeout` cũ tương đương clearTimeout.
        self.pending = Some(Timeout::new(millis, callback));
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
