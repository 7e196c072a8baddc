//! Explicit turn-taking between the input filter (producer) and the output
//! apply task (consumer) for [`FlowControl::Alternating`].
//!
//! [`FlowControl::Alternating`]: crate::config::FlowControl::Alternating

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;

/// Records whose turn it is. Starts on the producer's turn.
pub struct Handshake<M: RawMutex> {
    consumer_turn: Mutex<M, Cell<bool>>,
    resumed: Signal<M, ()>,
}

impl<M: RawMutex> Handshake<M> {
    pub const fn new() -> Self {
        Self {
            consumer_turn: Mutex::new(Cell::new(false)),
            resumed: Signal::new(),
        }
    }

    pub fn is_producer_turn(&self) -> bool {
        !self.consumer_turn.lock(Cell::get)
    }

    /// Producer: the command about to be sent belongs to the consumer now.
    pub fn hand_over(&self) {
        self.consumer_turn.lock(|turn| turn.set(true));
    }

    /// Producer: the send failed, keep the turn.
    pub fn reclaim(&self) {
        self.consumer_turn.lock(|turn| turn.set(false));
    }

    /// Consumer: gives the turn back. No-op on the producer's turn.
    pub fn resume(&self) {
        let was_consumer = self.consumer_turn.lock(|turn| turn.replace(false));
        if was_consumer {
            self.resumed.signal(());
        }
    }

    /// Producer: waits until the consumer has resumed it.
    pub async fn wait_turn(&self) {
        while !self.is_producer_turn() {
            self.resumed.wait().await;
        }
    }
}

impl<M: RawMutex> Default for Handshake<M> {
    fn default() -> Self {
        Self::new()
    }
}
