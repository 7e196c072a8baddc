//! Adapters from board peripherals to the toggler's collaborator traits.

#[cfg(feature = "async")]
pub mod gpio_button;
pub mod gpio_led;
pub mod traits;
#[cfg(feature = "stm32")]
pub mod uart;
