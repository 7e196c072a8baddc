use core::convert::Infallible;

use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

use crate::edge::Line;

/// Push button wired to ground with a pull-up: pressed reads low.
pub struct GpioButton<P> {
    pin: P,
    line: Line,
}

impl<P> GpioButton<P>
where
    P: Wait<Error = Infallible> + InputPin,
{
    pub fn new(pin: P, line: Line) -> Self {
        Self { pin, line }
    }

    pub fn line(&self) -> Line {
        self.line
    }

    pub fn is_pressed(&mut self) -> bool {
        let Ok(low) = self.pin.is_low();
        low
    }

    /// Waits for the next edge on the pin and returns whether the button is
    /// pressed afterwards.
    pub async fn changed(&mut self) -> bool {
        let Ok(()) = self.pin.wait_for_any_edge().await;
        self.is_pressed()
    }
}
