//! Tunables shared by the tasks and the firmware entry point.
//!
//! Everything is `const`-constructible so a [`Config`] can live in a `static`
//! or be built inside `main` before the context object is created.

use embassy_time::Duration;

/// Depth of the command channel between the input filter and output apply tasks.
pub const COMMAND_CAPACITY: usize = 10;

/// Depth of the console queue. Notices that do not fit are dropped.
pub const CONSOLE_CAPACITY: usize = 8;

/// Longest line accepted by [`crate::serial::read_line`], terminator excluded.
///
/// The firmware reads single command bytes; this sizes the buffer of
/// consumers that frame input by line instead.
pub const LINE_CAPACITY: usize = 32;

/// Toggle periods the cycle button steps through, first entry used on start.
pub const DEFAULT_PERIODS: [Duration; 5] = [
    Duration::from_millis(1000),
    Duration::from_millis(2000),
    Duration::from_millis(3000),
    Duration::from_millis(4000),
    Duration::from_millis(5000),
];

/// How the producer and consumer tasks pace each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    /// The producer keeps reading and enqueueing; the channel absorbs bursts.
    #[default]
    Independent,
    /// The producer waits after every accepted command until the consumer has
    /// taken it, so at most one command is ever in flight.
    Alternating,
}

/// What the output apply task does between two polls of the channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PollPolicy {
    /// Hand the executor back to other ready tasks, then poll again at once.
    #[default]
    Yield,
    /// Sleep for a fixed interval between polls.
    Every(Duration),
}

/// When the output apply task prints the status line for the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Announce {
    /// On every pass, together with the port write.
    #[default]
    EveryPass,
    /// Only when a command arrives, and once at start.
    OnChange,
}

/// Runtime configuration of the toggler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Longest time the input filter blocks on a full channel before dropping
    /// the command.
    pub send_timeout: Duration,
    /// Pause between the two samples of the debounce callback.
    pub settle_delay: Duration,
    /// Ordered table of periods for the periodic signal. Must not be empty.
    pub periods: &'static [Duration],
    pub flow: FlowControl,
    pub poll: PollPolicy,
    pub announce: Announce,
    /// Serial line speed used by the firmware.
    pub baud_rate: u32,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            send_timeout: Duration::from_millis(100),
            settle_delay: Duration::from_millis(300),
            periods: &DEFAULT_PERIODS,
            flow: FlowControl::Independent,
            poll: PollPolicy::Yield,
            announce: Announce::EveryPass,
            baud_rate: 128_000,
        }
    }

    pub const fn with_flow(mut self, flow: FlowControl) -> Self {
        self.flow = flow;
        self
    }

    pub const fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub const fn with_announce(mut self, announce: Announce) -> Self {
        self.announce = announce;
        self
    }

    pub const fn with_periods(mut self, periods: &'static [Duration]) -> Self {
        self.periods = periods;
        self
    }

    pub const fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    pub const fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
