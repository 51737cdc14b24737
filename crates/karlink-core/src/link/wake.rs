use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Wakes the loop early when there is work, and carries the shutdown flag.
///
/// Waits return as soon as either is raised, so neither the poll interval
/// nor the reconnect delay holds up an exit.
pub struct WakeSignal {
    shutdown: AtomicBool,
    pending: Mutex<bool>,
    condvar: Condvar,
}

impl WakeSignal {
    pub fn new() -> Self {
        Self {
            shutdown: AtomicBool::new(false),
            pending: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Raise the wake event
    pub fn notify(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            *pending = true;
        }
        self.condvar.notify_all();
    }

    /// Raise the shutdown flag and wake every waiter
    pub fn trigger_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.notify();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Wait until notified, shut down, or `timeout` passes. Clears the wake event.
    ///
    /// Returns `true` if shutdown was triggered.
    pub fn wait(&self, timeout: Duration) -> bool {
        if self.is_shutdown() {
            return true;
        }

        let Ok(guard) = self.pending.lock() else {
            // Poisoned, treat as shutdown
            return true;
        };
        match self
            .condvar
            .wait_timeout_while(guard, timeout, |pending| !*pending && !self.is_shutdown())
        {
            Ok((mut pending, _)) => {
                *pending = false;
                self.is_shutdown()
            }
            Err(_) => true,
        }
    }
}

impl Default for WakeSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_initial_state() {
        let signal = WakeSignal::new();
        assert!(!signal.is_shutdown());
    }

    #[test]
    fn test_wait_timeout() {
        let signal = WakeSignal::new();
        let start = Instant::now();
        assert!(!signal.wait(Duration::from_millis(50)));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_millis(500));
    }

    #[test]
    fn test_notify_wakes_and_clears() {
        let signal = WakeSignal::new();
        signal.notify();

        let start = Instant::now();
        assert!(!signal.wait(Duration::from_secs(10)));
        assert!(start.elapsed() < Duration::from_secs(1));

        // Event was consumed by the first wait
        let start = Instant::now();
        assert!(!signal.wait(Duration::from_millis(50)));
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_shutdown_interrupts_wait() {
        let signal = Arc::new(WakeSignal::new());
        let signal_clone = Arc::clone(&signal);

        let handle = thread::spawn(move || {
            let start = Instant::now();
            let shutdown = signal_clone.wait(Duration::from_secs(10));
            (shutdown, start.elapsed())
        });

        thread::sleep(Duration::from_millis(50));
        signal.trigger_shutdown();

        let (shutdown, elapsed) = handle.join().unwrap();
        assert!(shutdown);
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn test_wait_after_shutdown() {
        let signal = WakeSignal::new();
        signal.trigger_shutdown();
        assert!(signal.wait(Duration::from_secs(10)));
        assert!(signal.is_shutdown());
    }
}
