//! Toggle-on-expiry with software debouncing of the originating button.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::{Duration, Timer};

use crate::hardware::traits::{MonitoredLine, OutputPort};
use crate::periodic::TimerCallback;
use crate::port::SharedPort;

/// Toggles the port on a firing only if `line` reads asserted both before and
/// after the settle delay.
pub struct DebounceToggle<'a, L, M: RawMutex, P> {
    line: L,
    port: &'a SharedPort<M, P>,
    settle: Duration,
}

impl<'a, L: MonitoredLine, M: RawMutex, P: OutputPort> DebounceToggle<'a, L, M, P> {
    pub const fn new(line: L, port: &'a SharedPort<M, P>, settle: Duration) -> Self {
        Self { line, port, settle }
    }
}

impl<L: MonitoredLine, M: RawMutex, P: OutputPort> TimerCallback for DebounceToggle<'_, L, M, P> {
    async fn on_expiry(&mut self) {
        if !self.line.is_asserted() {
            return;
        }

        Timer::after(self.settle).await;

        if !self.line.is_asserted() {
            trace!("bounce rejected");
            return;
        }

        let pattern = self.port.toggle();
        debug!("toggled leds to {}", pattern);
    }
}
