//! Interrupt-driven, queue-mediated LED toggler for embassy targets.
//!
//! The library holds every piece that does not touch registers:
//!
//! - [`channel::CommandChannel`]: bounded FIFO of colour commands with a
//!   bounded-wait send and a non-blocking receive
//! - [`periodic::PeriodicSignal`]: a software timer whose period may be changed
//!   from interrupt context, firing its callback in task context
//! - [`edge::EdgeHandler`]: the interrupt-context routine for the two buttons
//! - [`debounce::DebounceToggle`]: double-sampling toggle run on every firing
//! - [`tasks`]: producer, consumer, timer service, console and edge watcher
//!   task bodies, wrapped by `#[embassy_executor::task]`s in the firmware
//!
//! All collaborators (serial line, LED port, buttons) are traits, so the whole
//! pipeline also runs on the host under `embassy_futures::block_on`.

#![cfg_attr(not(test), no_std)]
#![allow(async_fn_in_trait)]

// This mod MUST go first, so that the others see its macros.
#[macro_use]
pub(crate) mod fmt;

pub mod channel;
pub mod command;
pub mod config;
pub mod console;
pub mod debounce;
pub mod edge;
pub mod error;
pub mod handshake;
pub mod hardware;
pub mod periodic;
pub mod port;
pub mod serial;
pub mod tasks;
pub mod toggler;

pub use command::{Command, LedPattern, Notice};
pub use config::Config;
pub use error::Error;
pub use toggler::Toggler;
