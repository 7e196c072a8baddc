//! The context object: every piece of shared state, constructed once at
//! startup and handed by reference to each task and to the edge watcher.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::channel::CommandChannel;
use crate::config::{COMMAND_CAPACITY, CONSOLE_CAPACITY, Config};
use crate::console::Console;
use crate::debounce::DebounceToggle;
use crate::edge::{EdgeHandler, EdgeLatch, LatchedLine, Line};
use crate::error::Error;
use crate::handshake::Handshake;
use crate::hardware::traits::OutputPort;
use crate::periodic::{PeriodCycle, PeriodicSignal};
use crate::port::SharedPort;

pub struct Toggler<M: RawMutex, P> {
    pub config: Config,
    pub commands: CommandChannel<M, COMMAND_CAPACITY>,
    pub signal: PeriodicSignal<M>,
    pub cycle: PeriodCycle<M>,
    pub port: SharedPort<M, P>,
    pub console: Console<M, CONSOLE_CAPACITY>,
    pub handshake: Handshake<M>,
    pub edges: EdgeLatch,
}

impl<M: RawMutex, P: OutputPort> Toggler<M, P> {
    /// Builds the context around `port`. The periodic signal starts dormant
    /// at the first period of the table.
    pub fn new(port: P, config: Config) -> Result<Self, Error> {
        let cycle = PeriodCycle::new(config.periods)?;
        Ok(Self {
            config,
            commands: CommandChannel::new(),
            signal: PeriodicSignal::new(cycle.current()),
            cycle,
            port: SharedPort::new(port),
            console: Console::new(),
            handshake: Handshake::new(),
            edges: EdgeLatch::new(),
        })
    }

    pub fn edge_handler(&self) -> EdgeHandler<'_, M, P, CONSOLE_CAPACITY> {
        EdgeHandler::new(&self.signal, &self.cycle, &self.port, &self.console)
    }

    /// Debounced toggle on the cycle button, for the timer service.
    pub fn debounce_toggle(&self) -> DebounceToggle<'_, LatchedLine<'_>, M, P> {
        DebounceToggle::new(
            self.edges.line(Line::Cycle),
            &self.port,
            self.config.settle_delay,
        )
    }
}
