use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cancellation flag shared between a request handler and the work it starts.
#[derive(Clone, Debug, Default)]
pub struct CancelSignal {
    flag: Arc<AtomicBool>,
}

impl CancelSignal {
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

/// Owner side of a [`CancelSignal`].
#[derive(Clone, Debug, Default)]
pub struct CancelController {
    signal: CancelSignal,
}

impl CancelController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signal(&self) -> CancelSignal {
        self.signal.clone()
    }

    pub fn cancel(&self) {
        self.signal.cancel();
    }
}
