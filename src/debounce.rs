//! Trailing-edge debouncer for input events.
//!
//! Every `schedule` call cancels the pending callback and arms a new one, so a
//! burst of input produces a single callback carrying the last value. Must be
//! used from inside a `tokio::task::LocalSet`.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::trace;

pub struct Debouncer {
    quiet: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Debouncer {
            quiet,
            pending: None,
        }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Run `fire` after the quiet interval unless another call supersedes it
    pub fn schedule<F>(&mut self, fire: F)
    where
        F: FnOnce() + 'static,
    {
        if self.cancel() {
            trace!("Debounce timer re-armed");
        }
        let quiet = self.quiet;
        self.pending = Some(tokio::task::spawn_local(async move {
            tokio::time::sleep(quiet).await;
            fire();
        }));
    }

    /// Cancel the pending callback. Returns true if one was still waiting.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_waiting = !handle.is_finished();
                handle.abort();
                was_waiting
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tokio::task::LocalSet;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_burst_fires_once_with_last_value() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let fired = Rc::new(RefCell::new(Vec::new()));
                let mut debouncer = Debouncer::new(Duration::from_millis(300));

                for text in ["r", "ru", "rus", "rust"] {
                    let fired = fired.clone();
                    debouncer.schedule(move || fired.borrow_mut().push(text));
                    tokio::time::advance(Duration::from_millis(100)).await;
                }
                assert!(fired.borrow().is_empty());

                tokio::time::sleep(Duration::from_millis(400)).await;
                assert_eq!(*fired.borrow(), vec!["rust"]);
                assert!(!debouncer.is_pending());
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_separate_bursts_fire_separately() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let fired = Rc::new(RefCell::new(Vec::new()));
                let mut debouncer = Debouncer::new(Duration::from_millis(300));

                let f = fired.clone();
                debouncer.schedule(move || f.borrow_mut().push("first"));
                tokio::time::sleep(Duration::from_millis(350)).await;

                let f = fired.clone();
                debouncer.schedule(move || f.borrow_mut().push("second"));
                tokio::time::sleep(Duration::from_millis(350)).await;

                assert_eq!(*fired.borrow(), vec!["first", "second"]);
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn test_cancel_prevents_dispatch() {
        let local = LocalSet::new();
        local
            .run_until(async {
                let fired = Rc::new(RefCell::new(0));
                let mut debouncer = Debouncer::new(Duration::from_millis(300));

                let f = fired.clone();
                debouncer.schedule(move || *f.borrow_mut() += 1);
                tokio::task::yield_now().await;
                assert!(debouncer.is_pending());
                assert!(debouncer.cancel());

                tokio::time::sleep(Duration::from_secs(1)).await;
                assert_eq!(*fired.borrow(), 0);
                assert!(!debouncer.cancel());
            })
            .await;
    }
}
