use std::{cell::Cell, rc::Rc};

use crate::page::Scheduler;

// coalesces bursts of events into at most one run per rendered frame
//
// while a frame is pending, further requests are dropped; the pending frame reads whatever state
// is current when it runs, so nothing is lost
#[derive(Clone, Debug, Default)]
pub struct FrameThrottle {
    pending: Rc<Cell<bool>>,
}

impl FrameThrottle {
    pub fn new() -> Self {
        FrameThrottle::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get()
    }

    // returns false if the request was folded into an already pending frame
    pub fn schedule<S: Scheduler + ?Sized>(
        &self,
        scheduler: &S,
        task: impl FnOnce() + 'static,
    ) -> bool {
        if self.pending.replace(true) {
            return false;
        }

        let pending = self.pending.clone();
        scheduler.request_frame(Box::new(move || {
            task();
            pending.set(false);
        }));
        true
    }
}
