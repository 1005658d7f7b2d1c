//! One-shot countdown barrier.

use crate::sync::{Backend, Monitor, ParkingLotBackend};

pub struct CountDownLatch<B: Backend = ParkingLotBackend> {
    count: B::Monitor<usize>,
}

impl<B: Backend> CountDownLatch<B> {
    pub fn new(count: usize) -> Self {
        Self {
            count: Monitor::new(count),
        }
    }

    /// Block until the count reaches zero.
    pub fn wait(&self) {
        self.count.wait_while(|count| *count > 0);
    }

    pub fn count_down(&self) {
        let released = self.count.lock(|count| {
            *count = count.saturating_sub(1);
            *count == 0
        });
        if released {
            self.count.notify_all();
        }
    }

    pub fn count(&self) -> usize {
        self.count.lock(|count| *count)
    }
}
