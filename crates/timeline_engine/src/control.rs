use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// Shared handle between the controls (stop button, delay field) and a
/// running harvest. Clones refer to the same state.
#[derive(Debug, Clone)]
pub struct RunControl {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    token: Mutex<CancellationToken>,
    delay_ms: AtomicU64,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

impl RunControl {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                token: Mutex::new(CancellationToken::new()),
                delay_ms: AtomicU64::new(duration_ms(delay)),
            }),
        }
    }

    /// Clears a previous stop request; called when a run starts.
    pub fn begin_run(&self) {
        if let Ok(mut token) = self.inner.token.lock() {
            *token = CancellationToken::new();
        }
    }

    /// Asks the current run to stop at its next iteration.
    pub fn stop(&self) {
        if let Ok(token) = self.inner.token.lock() {
            token.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner
            .token
            .lock()
            .map(|token| token.is_cancelled())
            .unwrap_or(true)
    }

    pub fn set_delay(&self, delay: Duration) {
        self.inner
            .delay_ms
            .store(duration_ms(delay), Ordering::Relaxed);
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.inner.delay_ms.load(Ordering::Relaxed))
    }
}

fn duration_ms(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}
