//! Bounded FIFO carrying [`Command`]s from the input filter to the output
//! apply task.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, with_timeout};

use crate::command::Command;
use crate::error::Error;

/// Multi-producer, multi-consumer command queue of capacity `N`.
///
/// A full channel never overwrites: senders wait at most their bounded wait
/// and then get [`Error::ChannelFull`], the item being dropped with the send
/// future.
pub struct CommandChannel<M: RawMutex, const N: usize> {
    inner: Channel<M, Command, N>,
}

impl<M: RawMutex, const N: usize> CommandChannel<M, N> {
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    /// Enqueues `command`, blocking the calling task for at most `max_wait`.
    ///
    /// A zero `max_wait` never blocks.
    pub async fn send(&self, command: Command, max_wait: Duration) -> Result<(), Error> {
        if max_wait.as_ticks() == 0 {
            return self.try_send(command);
        }
        with_timeout(max_wait, self.inner.send(command))
            .await
            .map_err(|_| Error::ChannelFull)
    }

    /// Non-blocking enqueue, safe to call from interrupt context.
    pub fn try_send(&self, command: Command) -> Result<(), Error> {
        self.inner.try_send(command).map_err(|_| Error::ChannelFull)
    }

    /// Dequeues the oldest command, waiting at most `max_wait` for one.
    ///
    /// A zero `max_wait` never blocks.
    pub async fn receive(&self, max_wait: Duration) -> Option<Command> {
        if max_wait.as_ticks() == 0 {
            return self.try_receive();
        }
        with_timeout(max_wait, self.inner.receive()).await.ok()
    }

    /// Non-blocking dequeue: `None` if the channel is empty.
    pub fn try_receive(&self) -> Option<Command> {
        self.inner.try_receive().ok()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<M: RawMutex, const N: usize> Default for CommandChannel<M, N> {
    fn default() -> Self {
        Self::new()
    }
}
