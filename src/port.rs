//! The LED port shared by the edge handler, the output apply task and the
//! debounce callback.
//!
//! Each access is one short critical section, so a single write is never torn,
//! but nothing orders writers against each other: the last write wins.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::command::LedPattern;
use crate::hardware::traits::OutputPort;

pub struct SharedPort<M: RawMutex, P> {
    port: Mutex<M, RefCell<P>>,
}

impl<M: RawMutex, P: OutputPort> SharedPort<M, P> {
    pub const fn new(port: P) -> Self {
        Self {
            port: Mutex::new(RefCell::new(port)),
        }
    }

    pub fn write(&self, pattern: LedPattern) {
        self.port.lock(|port| port.borrow_mut().write(pattern));
    }

    pub fn read(&self) -> LedPattern {
        self.port.lock(|port| port.borrow_mut().read())
    }

    /// Complements the pattern read back from the port and returns the
    /// pattern written.
    pub fn toggle(&self) -> LedPattern {
        self.port.lock(|port| {
            let mut port = port.borrow_mut();
            let next = port.read().toggled();
            port.write(next);
            next
        })
    }

    /// Runs `f` with exclusive access to the underlying port.
    pub fn with<R>(&self, f: impl FnOnce(&mut P) -> R) -> R {
        self.port.lock(|port| f(&mut port.borrow_mut()))
    }
}
