//! Edge-triggered button handling.
//!
//! An [`EdgeSource`] reports which monitored lines saw an edge since the last
//! acknowledge, the way a GPIO interrupt status register does. [`EdgeLatch`]
//! is a lock-free software version of such a register, fed by the edge
//! watcher task, that also mirrors the current level of each line.

use core::sync::atomic::{AtomicU8, Ordering};

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::command::{LedPattern, Notice};
use crate::console::Console;
use crate::hardware::traits::{MonitoredLine, OutputPort};
use crate::periodic::{PeriodCycle, PeriodicSignal};
use crate::port::SharedPort;

/// The two monitored buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Starts the periodic toggle, then steps through the period table.
    Cycle,
    /// Forces every LED off.
    Clear,
}

impl Line {
    pub const fn mask(self) -> LineMask {
        match self {
            Line::Cycle => LineMask(1 << 4),
            Line::Clear => LineMask(1 << 0),
        }
    }
}

/// Set of lines, one bit per [`Line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineMask(u8);

impl LineMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(Line::Cycle.mask().0 | Line::Clear.mask().0);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, line: Line) -> bool {
        self.0 & line.mask().0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn with(self, line: Line) -> Self {
        Self(self.0 | line.mask().0)
    }
}

/// Interrupt status of the monitored lines.
pub trait EdgeSource {
    /// Lines asserted since they were last acknowledged.
    fn pending(&self) -> LineMask;
    /// Clears the status of every line in `mask`.
    fn acknowledge(&mut self, mask: LineMask);
}

/// Pending-edge and level register shared between the edge watcher and the
/// handler. Only atomics, so it is usable from any context.
pub struct EdgeLatch {
    pending: AtomicU8,
    level: AtomicU8,
}

impl EdgeLatch {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU8::new(0),
            level: AtomicU8::new(0),
        }
    }

    /// Records the new level of `line`. An assertion latches a pending edge.
    pub fn record(&self, line: Line, asserted: bool) {
        let bit = line.mask().bits();
        if asserted {
            self.level.fetch_or(bit, Ordering::AcqRel);
            self.pending.fetch_or(bit, Ordering::AcqRel);
        } else {
            self.level.fetch_and(!bit, Ordering::AcqRel);
        }
    }

    pub fn is_asserted(&self, line: Line) -> bool {
        LineMask(self.level.load(Ordering::Acquire)).contains(line)
    }

    /// A [`MonitoredLine`] view of one line's level.
    pub const fn line(&self, line: Line) -> LatchedLine<'_> {
        LatchedLine { latch: self, line }
    }
}

impl Default for EdgeLatch {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeSource for &EdgeLatch {
    fn pending(&self) -> LineMask {
        LineMask(self.pending.load(Ordering::Acquire))
    }

    fn acknowledge(&mut self, mask: LineMask) {
        self.pending.fetch_and(!mask.bits(), Ordering::AcqRel);
    }
}

#[derive(Clone, Copy)]
pub struct LatchedLine<'a> {
    latch: &'a EdgeLatch,
    line: Line,
}

impl MonitoredLine for LatchedLine<'_> {
    fn is_asserted(&self) -> bool {
        self.latch.is_asserted(self.line)
    }
}

/// Acknowledges the captured status when dropped, so no path out of the
/// handler can leave it set.
struct Acknowledge<'s, S: EdgeSource> {
    source: &'s mut S,
    status: LineMask,
}

impl<S: EdgeSource> Drop for Acknowledge<'_, S> {
    fn drop(&mut self) {
        self.source.acknowledge(self.status);
    }
}

/// Interrupt-context routine for the cycle and clear buttons.
///
/// Never blocks: it only touches the periodic signal's interrupt-safe entry
/// points, the shared port and the console queue.
pub struct EdgeHandler<'a, M: RawMutex, P, const C: usize> {
    signal: &'a PeriodicSignal<M>,
    cycle: &'a PeriodCycle<M>,
    port: &'a SharedPort<M, P>,
    console: &'a Console<M, C>,
}

impl<'a, M: RawMutex, P: OutputPort, const C: usize> EdgeHandler<'a, M, P, C> {
    pub const fn new(
        signal: &'a PeriodicSignal<M>,
        cycle: &'a PeriodCycle<M>,
        port: &'a SharedPort<M, P>,
        console: &'a Console<M, C>,
    ) -> Self {
        Self {
            signal,
            cycle,
            port,
            console,
        }
    }

    /// Services every pending line of `source` and acknowledges them.
    ///
    /// Returns the serviced status.
    pub fn on_interrupt<S: EdgeSource>(&self, source: &mut S) -> LineMask {
        let status = source.pending();
        let _ack = Acknowledge { source, status };

        if status.contains(Line::Cycle) {
            if self.signal.is_running() {
                let period = self.cycle.advance();
                self.signal.change_period(period);
                debug!("toggle period now {} ms", period.as_millis());
            } else {
                self.signal.start();
                debug!("toggle started at {} ms", self.signal.period().as_millis());
            }
        }

        // Bypasses the command channel: races with the output apply task.
        if status.contains(Line::Clear) {
            self.port.write(LedPattern::OFF);
            self.console.report(Notice::AllOff);
        }

        status
    }
}
