//! Deferred writer for the user-visible status lines.
//!
//! [`Console::report`] never blocks and may be called from interrupt context;
//! [`Console::run`] drains the queue onto a serial sink from a task.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;

use crate::command::Notice;
use crate::serial::ByteSink;

pub struct Console<M: RawMutex, const N: usize> {
    queue: Channel<M, Notice, N>,
}

impl<M: RawMutex, const N: usize> Console<M, N> {
    pub const fn new() -> Self {
        Self {
            queue: Channel::new(),
        }
    }

    /// Queues `notice` for the console task. Returns `false` if the queue was
    /// full and the notice got dropped.
    pub fn report(&self, notice: Notice) -> bool {
        match self.queue.try_send(notice) {
            Ok(()) => true,
            Err(_) => {
                trace!("console queue full, dropped {}", notice);
                false
            }
        }
    }

    /// Next queued notice, if any.
    pub fn try_next(&self) -> Option<Notice> {
        self.queue.try_receive().ok()
    }

    pub async fn run<S: ByteSink>(&self, sink: &mut S) -> ! {
        loop {
            let notice = self.queue.receive().await;
            if sink.write_all(notice.text().as_bytes()).await.is_err() {
                warn!("serial transmit failed for {}", notice);
            }
        }
    }
}

impl<M: RawMutex, const N: usize> Default for Console<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
