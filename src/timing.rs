use crate::component::alert::unwrap_without_alert;
use crate::error::Error;
use crate::utils::get_location;
use gloo_timers::callback::Timeout;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const RELOAD_DELAY: u32 = 1000;
pub const REFRESH_DELAY: u32 = 500;

/// Runs only the last of a burst of calls, `wait` milliseconds after it.
pub struct Debouncer {
    wait: u32,
    pending: RefCell<Option<Timeout>>,
}

impl Debouncer {
    pub fn new(wait: u32) -> Self {
        Self {
            wait,
            pending: RefCell::new(None),
        }
    }

    pub fn call(&self, action: impl FnOnce() + 'static) {
        // Replacing the previous timeout drops it, which cancels it if still pending.
        let timeout = Timeout::new(self.wait, action);
        self.pending.replace(Some(timeout));
    }

    pub fn cancel(&self) {
        self.pending.take();
    }
}

/// Runs at most one call per `limit` milliseconds; calls made meanwhile are dropped.
pub struct Throttler {
    limit: u32,
    blocked: Rc<Cell<bool>>,
}

impl Throttler {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            blocked: Rc::new(Cell::new(false)),
        }
    }

    /// Returns whether `action` ran.
    pub fn call(&self, action: impl FnOnce()) -> bool {
        if self.blocked.get() {
            return false;
        }

        action();
        self.blocked.set(true);
        let blocked = self.blocked.clone();
        Timeout::new(self.limit, move || blocked.set(false)).forget();
        true
    }
}

/// Reload the current page once `delay` milliseconds have passed.
pub fn reload_after(delay: u32) {
    Timeout::new(delay, || {
        unwrap_without_alert(get_location().and_then(|location| {
            location
                .reload()
                .map_err(|error| Error::from_parent("Can't reload page", error.into()))
        }))
    })
    .forget();
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    async fn should_run_last_debounced_call_only() {
        let calls = Rc::new(RefCell::new(vec![]));
        let debouncer = Debouncer::new(20);
        for i in 0..3 {
            let calls = calls.clone();
            debouncer.call(move || calls.borrow_mut().push(i));
        }

        TimeoutFuture::new(60).await;

        assert_eq!(vec![2], *calls.borrow());
    }

    #[wasm_bindgen_test]
    async fn should_not_run_cancelled_call() {
        let calls = Rc::new(Cell::new(0));
        let debouncer = Debouncer::new(10);
        let counter = calls.clone();
        debouncer.call(move || counter.set(counter.get() + 1));
        debouncer.cancel();

        TimeoutFuture::new(30).await;

        assert_eq!(0, calls.get());
    }

    #[wasm_bindgen_test]
    async fn should_drop_calls_within_window() {
        let calls = Rc::new(Cell::new(0));
        let throttler = Throttler::new(20);
        let increment = || calls.set(calls.get() + 1);

        assert!(throttler.call(increment));
        assert!(!throttler.call(increment));
        TimeoutFuture::new(40).await;
        assert!(throttler.call(increment));

        assert_eq!(2, calls.get());
    }
}
