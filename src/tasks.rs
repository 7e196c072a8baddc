//! Task bodies. The firmware wraps each in an `#[embassy_executor::task]`
//! with concrete types; tests drive them directly.

use embassy_futures::yield_now;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_time::Timer;

use crate::command::{Command, LedPattern, Notice};
use crate::config::{Announce, FlowControl, PollPolicy};
use crate::hardware::traits::OutputPort;
use crate::serial::{ByteSink, ByteSource};
use crate::toggler::Toggler;

#[cfg(feature = "async")]
use {
    crate::edge::{EdgeLatch, EdgeSource, Line, LineMask},
    crate::hardware::gpio_button::GpioButton,
    core::convert::Infallible,
    embassy_futures::select::{Either, select},
    embedded_hal::digital::InputPin,
    embedded_hal_async::digital::Wait,
};

/// Producer: filters serial bytes to commands and queues them.
///
/// A command that cannot be queued within the send timeout is dropped with a
/// warning on the console; it is never retried.
pub async fn input_filter<M, P, S>(toggler: &Toggler<M, P>, source: &mut S) -> !
where
    M: RawMutex,
    P: OutputPort,
    S: ByteSource,
{
    let alternating = toggler.config.flow == FlowControl::Alternating;
    toggler.console.report(Notice::Prompt);

    loop {
        let byte = match source.read_byte().await {
            Ok(byte) => byte,
            Err(_) => {
                warn!("serial receive error");
                continue;
            }
        };
        let Some(command) = Command::from_byte(byte) else {
            trace!("ignored byte {=u8:#x}", byte);
            continue;
        };

        if alternating {
            toggler.handshake.hand_over();
        }
        match toggler.commands.send(command, toggler.config.send_timeout).await {
            Ok(()) => {
                debug!("queued {}", command);
                if alternating {
                    toggler.handshake.wait_turn().await;
                }
            }
            Err(e) => {
                warn!("dropping {}: {}", command, e);
                toggler.console.report(Notice::CommandDropped);
                if alternating {
                    toggler.handshake.reclaim();
                }
            }
        }
    }
}

/// Consumer: polls the channel without blocking and applies the latest
/// command to the port and the console on every pass.
///
/// The port is rewritten on every pass, so a write from the edge handler or
/// the debounce toggle lasts until the next pass. With [`Announce::OnChange`]
/// the status line is only printed when a command arrives, and once at start.
pub async fn output_apply<M, P>(toggler: &Toggler<M, P>) -> !
where
    M: RawMutex,
    P: OutputPort,
{
    let alternating = toggler.config.flow == FlowControl::Alternating;
    let every_pass = toggler.config.announce == Announce::EveryPass;
    let mut current: Option<Command> = None;
    let mut announced = false;

    loop {
        let received = toggler.commands.try_receive();
        if received.is_some() {
            current = received;
        }

        let (pattern, notice) = match current {
            Some(command) => (command.pattern(), command.notice()),
            None => (LedPattern::OFF, Notice::AllOff),
        };
        toggler.port.write(pattern);
        if every_pass || received.is_some() || !announced {
            toggler.console.report(notice);
            announced = true;
        }

        if alternating && received.is_some() {
            toggler.handshake.resume();
        }

        match toggler.config.poll {
            PollPolicy::Yield => yield_now().await,
            PollPolicy::Every(interval) => Timer::after(interval).await,
        }
    }
}

/// Services the periodic signal, running the debounced toggle on every
/// firing.
pub async fn timer_service<M, P>(toggler: &Toggler<M, P>) -> !
where
    M: RawMutex,
    P: OutputPort,
{
    let mut toggle = toggler.debounce_toggle();
    toggler.signal.run(&mut toggle).await
}

/// Drains queued notices onto the serial transmitter.
pub async fn console_writer<M, P, S>(toggler: &Toggler<M, P>, sink: &mut S) -> !
where
    M: RawMutex,
    P: OutputPort,
    S: ByteSink,
{
    toggler.console.run(sink).await
}

/// Mirrors both buttons into the edge latch and runs the edge handler for
/// every press.
#[cfg(feature = "async")]
pub async fn watch_edges<M, P, A, B>(
    toggler: &Toggler<M, P>,
    cycle: &mut GpioButton<A>,
    clear: &mut GpioButton<B>,
) -> !
where
    M: RawMutex,
    P: OutputPort,
    A: Wait<Error = Infallible> + InputPin,
    B: Wait<Error = Infallible> + InputPin,
{
    let handler = toggler.edge_handler();
    let mut source = &toggler.edges;

    toggler.edges.record(Line::Cycle, cycle.is_pressed());
    toggler.edges.record(Line::Clear, clear.is_pressed());
    // Buttons held at boot are levels, not edges.
    source.acknowledge(LineMask::ALL);

    loop {
        let edge = select(cycle.changed(), clear.changed()).await;
        let (line, pressed) = match edge {
            Either::First(pressed) => (cycle.line(), pressed),
            Either::Second(pressed) => (clear.line(), pressed),
        };
        toggler.edges.record(line, pressed);
        // The losing wait was dropped, so its line was disarmed until now.
        resync(&toggler.edges, cycle);
        resync(&toggler.edges, clear);
        if !source.pending().is_empty() {
            handler.on_interrupt(&mut source);
        }
    }
}

/// Brings the latch in line with the button's current level. A press seen
/// only here still latches an edge.
#[cfg(feature = "async")]
fn resync<P>(latch: &EdgeLatch, button: &mut GpioButton<P>)
where
    P: Wait<Error = Infallible> + InputPin,
{
    let pressed = button.is_pressed();
    if pressed != latch.is_asserted(button.line()) {
        latch.record(button.line(), pressed);
    }
}

/// Writes [`Notice::SystemFault`] straight to `sink`, bypassing the console
/// queue. Returns whether it was sent.
pub async fn report_fault<S: ByteSink>(sink: &mut S) -> bool {
    match sink.write_all(Notice::SystemFault.text().as_bytes()).await {
        Ok(()) => true,
        Err(_) => {
            error!("fault report not sent");
            false
        }
    }
}

/// Parks the calling task forever. Used when a resource it needs could not
/// be created.
pub async fn park() -> ! {
    loop {
        core::future::pending::<()>().await;
    }
}
